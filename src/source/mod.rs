//! Key/value providers feeding the loaders
//!
//! The environment is passed in as an explicit collaborator rather than read
//! through ambient global lookups, so loaders are testable without mutating
//! real process state.

pub mod dotenv;

pub use dotenv::DotenvFile;

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// A raw configuration source. Values are always text; typing happens in
/// the loaders.
pub trait Source {
    fn get(&self, key: &str) -> Option<String>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn name(&self) -> &str {
        "process environment"
    }
}

/// An in-memory source for tests and programmatic use.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    entries: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: BTreeMap::new() }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Source for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered union of sources: the first layer holding a key wins, later
/// layers only fill gaps.
#[derive(Default)]
pub struct Layered {
    layers: Vec<Box<dyn Source>>,
}

impl Layered {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer with lower precedence than everything before it.
    pub fn with(mut self, layer: impl Source + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl Source for Layered {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    fn name(&self) -> &str {
        "layered"
    }
}

/// The canonical stack: process environment over an optional dotenv file.
///
/// A value already present in the environment is never overridden by the
/// file; the file only fills gaps.
pub fn env_with_dotenv(env_file: Option<&Path>) -> Result<Layered> {
    let mut source = Layered::new().with(ProcessEnv);
    if let Some(path) = env_file {
        source = source.with(DotenvFile::load(path)?);
    }
    Ok(source)
}
