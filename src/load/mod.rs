//! The two loading policies
//!
//! [`eager::load`] validates the whole schema before anything else runs and
//! fails atomically with every field-level problem. [`lazy::RawEnv`] is the
//! opposite strategy, kept on purpose as a faithful model of deferred
//! validation so the two can be contrasted and tested against each other.

pub mod eager;
pub mod lazy;

pub use eager::load;
pub use lazy::RawEnv;
