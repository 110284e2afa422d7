//! Eager (fail-fast) loading

use std::collections::BTreeMap;

use crate::error::{AggregateError, FieldError, FieldErrorKind};
use crate::schema::{DefaultValue, Schema};
use crate::snapshot::Snapshot;
use crate::source::Source;
use crate::value::{coerce, Value};

/// Load and validate every field of `schema` from `source` in one pass.
///
/// Field-level problems accumulate; if any field is missing, uncoercible,
/// or invalid, the whole load fails with an [`AggregateError`] listing all
/// of them and no snapshot is produced. On success every field holds a
/// typed value (defaults filled in where the source was absent), and the
/// snapshot can never be observed in a partially valid state.
///
/// Computed defaults run exactly once here; their results are cached in
/// the snapshot and never recomputed.
///
/// Call this before any other subsystem starts, so configuration errors
/// surface before the first observable side effect.
pub fn load(schema: &Schema, source: &dyn Source) -> Result<Snapshot, AggregateError> {
    let mut values = BTreeMap::new();
    let mut errors = Vec::new();

    for field in schema.fields() {
        let key = field.source_key(schema.prefix());
        let error = |kind: FieldErrorKind| FieldError {
            field: field.name().to_string(),
            key: key.clone(),
            kind,
        };

        match source.get(&key) {
            Some(raw) => match coerce(field.ty(), &raw) {
                Ok(value) => match first_validator_failure(field.validators(), &value) {
                    None => {
                        values.insert(field.name().to_string(), value);
                    }
                    Some(reason) => errors.push(error(FieldErrorKind::Invalid { reason })),
                },
                Err(kind) => errors.push(error(kind)),
            },
            None => match field.default() {
                Some(DefaultValue::Static(value)) => {
                    values.insert(field.name().to_string(), value.clone());
                }
                Some(DefaultValue::Computed(compute)) => {
                    values.insert(field.name().to_string(), compute());
                }
                None => errors.push(error(FieldErrorKind::Missing)),
            },
        }
    }

    if errors.is_empty() {
        tracing::debug!(
            fields = values.len(),
            source = source.name(),
            "configuration loaded"
        );
        Ok(Snapshot::new(values))
    } else {
        Err(AggregateError::new(errors))
    }
}

fn first_validator_failure(
    validators: &[crate::schema::Validator],
    value: &Value,
) -> Option<String> {
    validators.iter().find_map(|v| v.check(value).err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, Validator};
    use crate::source::MapSource;
    use crate::value::FieldType;

    fn app_schema() -> Schema {
        Schema::new("APP_")
            .field(FieldSpec::new("debug", FieldType::Bool).default_raw("false").expect("default"))
            .field(FieldSpec::new("max_connections", FieldType::PositiveInt))
            .field(FieldSpec::new("api_key", FieldType::Secret))
    }

    #[test]
    fn test_success_fills_defaults_and_types_every_field() {
        let source = MapSource::new("test")
            .set("APP_MAX_CONNECTIONS", "20")
            .set("APP_API_KEY", "sk-123");

        let snapshot = load(&app_schema(), &source).expect("load");
        assert_eq!(snapshot.bool("debug").expect("debug"), false);
        assert_eq!(snapshot.int("max_connections").expect("max_connections"), 20);
        assert_eq!(snapshot.secret("api_key").expect("api_key").expose(), "sk-123");
    }

    #[test]
    fn test_every_problem_reported_in_one_aggregate() {
        // Two required fields missing, one present but malformed.
        let source = MapSource::new("test").set("APP_DEBUG", "maybe");

        let err = load(&app_schema(), &source).expect_err("should fail");
        assert_eq!(err.len(), 3);

        let fields: Vec<&str> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"debug"));
        assert!(fields.contains(&"max_connections"));
        assert!(fields.contains(&"api_key"));
    }

    #[test]
    fn test_no_snapshot_escapes_on_failure() {
        let source = MapSource::new("test");
        let result = load(&app_schema(), &source);
        assert!(result.is_err(), "missing required fields must abort the whole load");
    }

    #[test]
    fn test_coercion_and_validation_failures_carry_distinct_kinds() {
        let schema = Schema::new("")
            .field(FieldSpec::new("learning_rate", FieldType::PositiveFloat))
            .field(FieldSpec::new("epochs", FieldType::Int));
        let source =
            MapSource::new("test").set("LEARNING_RATE", "-1.0").set("EPOCHS", "several");

        let err = load(&schema, &source).expect_err("should fail");
        let by_field = |name: &str| {
            err.errors()
                .iter()
                .find(|e| e.field == name)
                .map(|e| e.kind.clone())
                .expect("field present")
        };
        assert!(matches!(by_field("learning_rate"), FieldErrorKind::Invalid { .. }));
        assert!(matches!(by_field("epochs"), FieldErrorKind::Coercion { .. }));
    }

    #[test]
    fn test_validators_run_after_coercion() {
        let schema = Schema::new("").field(
            FieldSpec::new("level", FieldType::String)
                .validator(Validator::OneOf(vec!["debug".into(), "info".into()])),
        );
        let bad = MapSource::new("test").set("LEVEL", "loud");
        let err = load(&schema, &bad).expect_err("should fail");
        assert!(err.to_string().contains("must be one of"));

        let good = MapSource::new("test").set("LEVEL", "info");
        let snapshot = load(&schema, &good).expect("load");
        assert_eq!(snapshot.str("level").expect("level"), "info");
    }

    #[test]
    fn test_idempotent_for_an_unchanged_source() {
        let source = MapSource::new("test")
            .set("APP_MAX_CONNECTIONS", "20")
            .set("APP_API_KEY", "sk-123");

        let first = load(&app_schema(), &source).expect("first");
        let second = load(&app_schema(), &source).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn test_computed_default_runs_once_per_load_and_is_deterministic() {
        fn pick_model_url() -> Value {
            // Deterministic capability probe: the same process state always
            // picks the same URL.
            if cfg!(target_pointer_width = "64") {
                Value::Str("https://models.example/large".into())
            } else {
                Value::Str("https://models.example/small".into())
            }
        }

        let schema = Schema::new("APP_")
            .field(FieldSpec::new("model_url", FieldType::String).computed_default(pick_model_url));
        let source = MapSource::new("test");

        let first = load(&schema, &source).expect("first");
        let second = load(&schema, &source).expect("second");
        assert_eq!(
            first.str("model_url").expect("model_url"),
            second.str("model_url").expect("model_url")
        );
    }

    #[test]
    fn test_source_value_beats_computed_default() {
        let schema = Schema::new("APP_").field(
            FieldSpec::new("model_url", FieldType::String)
                .computed_default(|| Value::Str("fallback".into())),
        );
        let source = MapSource::new("test").set("APP_MODEL_URL", "explicit");

        let snapshot = load(&schema, &source).expect("load");
        assert_eq!(snapshot.str("model_url").expect("model_url"), "explicit");
    }

    #[test]
    fn test_loading_reads_only_the_declared_keys() {
        // A schema never trips over unrelated variables in the source.
        let source = MapSource::new("test")
            .set("APP_MAX_CONNECTIONS", "20")
            .set("APP_API_KEY", "k")
            .set("UNRELATED_GARBAGE", "!!!");
        let snapshot = load(&app_schema(), &source).expect("load");
        assert_eq!(snapshot.len(), 3);
    }
}
