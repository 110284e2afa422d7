//! Dotenv-style file parsing
//!
//! Line-oriented `KEY=VALUE` pairs: blank lines and `#` comments skipped,
//! an optional leading `export ` tolerated, matching surrounding quotes
//! stripped. The file is read once; there is no watching or re-reading.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Source;

/// The parsed contents of one dotenv-style file.
#[derive(Debug, Clone)]
pub struct DotenvFile {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl DotenvFile {
    /// Read and parse the file in one blocking pass.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed reading env file: {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), entries: parse(&content) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Source for DotenvFile {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn name(&self) -> &str {
        "env file"
    }
}

fn parse(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            tracing::warn!("skipping malformed env line {}: no '='", lineno + 1);
            continue;
        };
        entries.insert(key.trim().to_string(), unquote(value.trim()).to_string());
    }
    entries
}

/// Strip one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
