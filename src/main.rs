//! envscout: validate process configuration before anything else runs
//!
//! This binary checks an environment against a declared schema, dumps
//! validated snapshots, and ships a small training-loop demo contrasting
//! fail-fast loading with deferred validation.

use anyhow::Result;

fn main() -> Result<()> {
    envscout::cli::run()
}
