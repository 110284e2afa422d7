//! Error taxonomy for configuration loading

use thiserror::Error;

/// Why a single field failed to load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldErrorKind {
    /// No source value and no default.
    #[error("missing required value")]
    Missing,

    /// Source value present but not convertible to the declared type.
    #[error("cannot interpret {raw:?} as {expected}")]
    Coercion { raw: String, expected: &'static str },

    /// Coerced value fails a field-specific predicate.
    #[error("{reason}")]
    Invalid { reason: String },
}

/// A single field-level problem, tagged with the field and its source key.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} (env {key}): {kind}")]
pub struct FieldError {
    pub field: String,
    pub key: String,
    pub kind: FieldErrorKind,
}

/// Everything that went wrong in one eager load, not just the first problem.
///
/// Printed as one diagnostic block so an entrypoint can surface every
/// misconfigured variable in a single run.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} configuration error(s):\n{}", .errors.len(), format_field_errors(.errors))]
pub struct AggregateError {
    errors: Vec<FieldError>,
}

impl AggregateError {
    /// Invariant: `errors` is non-empty; a load with zero errors succeeds.
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
}

/// Problems in a schema declaration itself (bad default, misplaced validator).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field {field:?}: invalid default {raw:?}: {kind}")]
    BadDefault {
        field: String,
        raw: String,
        kind: FieldErrorKind,
    },

    #[error("field {field:?}: {message}")]
    BadValidator { field: String, message: String },
}

/// Getter misuse on a loaded snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("no field named {0:?} in this snapshot")]
    UnknownField(String),

    #[error("field {field:?} holds a {actual}, not a {requested}")]
    WrongType {
        field: String,
        actual: &'static str,
        requested: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_lists_every_error() {
        let agg = AggregateError::new(vec![
            FieldError {
                field: "max_connections".into(),
                key: "APP_MAX_CONNECTIONS".into(),
                kind: FieldErrorKind::Missing,
            },
            FieldError {
                field: "debug".into(),
                key: "APP_DEBUG".into(),
                kind: FieldErrorKind::Coercion { raw: "maybe".into(), expected: "boolean" },
            },
        ]);

        let rendered = agg.to_string();
        assert!(rendered.starts_with("2 configuration error(s):"));
        assert!(rendered.contains("max_connections (env APP_MAX_CONNECTIONS): missing required value"));
        assert!(rendered.contains("debug (env APP_DEBUG): cannot interpret \"maybe\" as boolean"));
    }

    #[test]
    fn test_field_error_display_carries_raw_value() {
        let err = FieldError {
            field: "port".into(),
            key: "PORT".into(),
            kind: FieldErrorKind::Coercion { raw: "eighty".into(), expected: "integer" },
        };
        assert_eq!(err.to_string(), "port (env PORT): cannot interpret \"eighty\" as integer");
    }
}
