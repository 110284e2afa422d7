//! Shared helpers for the CLI commands

use anyhow::Result;
use std::path::Path;

use crate::source::{env_with_dotenv, Layered};

/// The source stack every command loads from: the process environment,
/// with an optional dotenv file filling gaps underneath.
pub fn build_source(env_file: Option<&Path>) -> Result<Layered> {
    if let Some(path) = env_file {
        tracing::debug!("layering env file {} under the process environment", path.display());
    }
    env_with_dotenv(env_file)
}
