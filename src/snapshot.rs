//! Immutable configuration snapshots

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use url::Url;

use crate::error::SnapshotError;
use crate::secret::SecretString;
use crate::value::Value;

/// One fully-typed configuration instance.
///
/// Constructed only by a successful eager load, so every field is known to
/// satisfy its type and validators; a snapshot can never exist in a
/// partially valid state. It is immutable and safely shared by any number
/// of readers without synchronization.
///
/// Serializing a snapshot (diagnostic dumps included) redacts secret fields
/// by default; only [`SecretString::expose`] reveals them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    pub(crate) fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Result<&Value, SnapshotError> {
        self.values.get(name).ok_or_else(|| SnapshotError::UnknownField(name.to_string()))
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        requested: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, SnapshotError> {
        let value = self.get(name)?;
        extract(value).ok_or_else(|| SnapshotError::WrongType {
            field: name.to_string(),
            actual: value.kind(),
            requested,
        })
    }

    pub fn bool(&self, name: &str) -> Result<bool, SnapshotError> {
        self.typed(name, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn int(&self, name: &str) -> Result<i64, SnapshotError> {
        self.typed(name, "int", |v| match v {
            Value::Int(n) => Some(*n),
            _ => None,
        })
    }

    pub fn float(&self, name: &str) -> Result<f64, SnapshotError> {
        self.typed(name, "float", |v| match v {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        })
    }

    pub fn str(&self, name: &str) -> Result<&str, SnapshotError> {
        self.typed(name, "string", |v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The secret handle; call [`SecretString::expose`] on it to reveal.
    pub fn secret(&self, name: &str) -> Result<&SecretString, SnapshotError> {
        self.typed(name, "secret", |v| match v {
            Value::Secret(s) => Some(s),
            _ => None,
        })
    }

    pub fn url(&self, name: &str) -> Result<&Url, SnapshotError> {
        self.typed(name, "url", |v| match v {
            Value::Url(u) => Some(u),
            _ => None,
        })
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, SnapshotError> {
        self.typed(name, "date", |v| match v {
            Value::Date(d) => Some(*d),
            _ => None,
        })
    }

    pub fn list(&self, name: &str) -> Result<&[String], SnapshotError> {
        self.typed(name, "list", |v| match v {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        })
    }

    pub fn map(&self, name: &str) -> Result<&BTreeMap<String, String>, SnapshotError> {
        self.typed(name, "map", |v| match v {
            Value::Map(entries) => Some(entries),
            _ => None,
        })
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Holder for applications that reload configuration.
///
/// A replacement snapshot is built in full off to the side and swapped in
/// wholesale; readers hold an `Arc` to whichever snapshot was current when
/// they asked and never observe a half-updated one.
pub struct SnapshotCell {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotCell {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// The snapshot as of this call.
    pub fn current(&self) -> Arc<Snapshot> {
        // A poisoned lock cannot leave a half-written Arc behind, so reads
        // recover rather than propagate the panic.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Replace the snapshot as a unit, returning the previous one.
    pub fn swap(&self, next: Snapshot) -> Arc<Snapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, Arc::new(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::SecretString;

    fn sample() -> Snapshot {
        let mut values = BTreeMap::new();
        values.insert("debug".to_string(), Value::Bool(true));
        values.insert("max_connections".to_string(), Value::Int(20));
        values.insert("api_key".to_string(), Value::Secret(SecretString::from("sk-123")));
        Snapshot::new(values)
    }

    #[test]
    fn test_typed_getters() {
        let snapshot = sample();
        assert!(snapshot.bool("debug").expect("debug"));
        assert_eq!(snapshot.int("max_connections").expect("max"), 20);
        assert_eq!(snapshot.secret("api_key").expect("key").expose(), "sk-123");
    }

    #[test]
    fn test_unknown_field() {
        let err = sample().bool("nope").expect_err("unknown");
        assert_eq!(err, SnapshotError::UnknownField("nope".into()));
    }

    #[test]
    fn test_wrong_type() {
        let err = sample().int("debug").expect_err("wrong type");
        assert_eq!(
            err,
            SnapshotError::WrongType { field: "debug".into(), actual: "bool", requested: "int" }
        );
    }

    #[test]
    fn test_serialized_dump_redacts_secrets() {
        let json = serde_json::to_string(&sample()).expect("serialize");
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("sk-123"));
        // Non-secret fields serialize as their real values.
        assert!(json.contains("\"max_connections\":20"));
    }

    #[test]
    fn test_snapshot_cell_swaps_wholesale() {
        let cell = SnapshotCell::new(sample());
        let before = cell.current();

        let mut values = BTreeMap::new();
        values.insert("max_connections".to_string(), Value::Int(50));
        let previous = cell.swap(Snapshot::new(values));

        // The reader that asked earlier still sees its complete old
        // snapshot; new readers see the complete new one.
        assert_eq!(before.int("max_connections").expect("old"), 20);
        assert_eq!(previous.int("max_connections").expect("previous"), 20);
        assert_eq!(cell.current().int("max_connections").expect("new"), 50);
    }

    #[test]
    fn test_snapshot_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Snapshot>();
        assert_send_sync::<SnapshotCell>();
    }
}
