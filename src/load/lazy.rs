//! Lazy (defer-validation) access, the anti-pattern, modeled faithfully
//!
//! [`RawEnv`] is a direct, unchecked passthrough to a source: no type
//! awareness, no validation, no notion of "required". Coercion happens at
//! each call site at the moment a typed value is first needed, which may be
//! arbitrarily deep in a long-running process, after irreversible side
//! effects. A bad value aborts the remaining work without undoing anything
//! already done, and only the first field dereferenced is ever reported.
//!
//! This exists for contrast with [`crate::load::eager::load`] and is kept
//! deliberately hazardous. New code wants the eager loader.

use crate::source::Source;

/// Unchecked raw access over any source.
pub struct RawEnv<'a> {
    source: &'a dyn Source,
}

impl<'a> RawEnv<'a> {
    pub fn new(source: &'a dyn Source) -> Self {
        Self { source }
    }

    /// The raw string for `key`, or `None` when absent.
    ///
    /// A missing required variable is indistinguishable here from one that
    /// is simply not needed yet; nothing fails until a call site tries to
    /// use the value.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.source.get(key)
    }
}
