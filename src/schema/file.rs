//! Schema file loading (TOML or YAML)
//!
//! Lets the CLI check an environment against a schema without recompiling.
//! File defaults are raw strings pushed through the same coercion path as
//! environment values, so a malformed default is caught at parse time.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::SchemaError;
use crate::schema::{FieldSpec, Schema, Validator};
use crate::value::FieldType;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    prefix: String,
    fields: BTreeMap<String, FieldFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldFile {
    #[serde(rename = "type")]
    ty: FieldType,
    default: Option<String>,
    env: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    starts_with: Option<String>,
    regex: Option<String>,
    one_of: Option<Vec<String>>,
}

/// Load a schema declaration from a TOML or YAML file.
pub fn from_file(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading schema file: {}", path.display()))?;

    let ext =
        path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed: SchemaFile = match ext.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML schema: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML schema: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported schema extension '.{}' for file {}",
            other,
            path.display()
        ),
    };

    build_schema(parsed).with_context(|| format!("Invalid schema: {}", path.display()))
}

fn build_schema(file: SchemaFile) -> Result<Schema, SchemaError> {
    let mut schema = Schema::new(file.prefix);
    for (name, decl) in file.fields {
        schema = schema.field(build_field(&name, decl)?);
    }
    Ok(schema)
}

fn numeric(ty: FieldType) -> bool {
    matches!(
        ty,
        FieldType::Int | FieldType::PositiveInt | FieldType::Float | FieldType::PositiveFloat
    )
}

fn textual(ty: FieldType) -> bool {
    matches!(ty, FieldType::String | FieldType::Secret | FieldType::Url)
}

fn build_field(name: &str, decl: FieldFile) -> Result<FieldSpec, SchemaError> {
    let mut field = FieldSpec::new(name, decl.ty);

    if let Some(key) = decl.env {
        field = field.env(key);
    }

    let misplaced = |message: String| SchemaError::BadValidator { field: name.to_string(), message };

    if let Some(bound) = decl.min {
        if !numeric(decl.ty) {
            return Err(misplaced(format!("min requires a numeric type, not {:?}", decl.ty)));
        }
        field = field.validator(Validator::Min(bound));
    }
    if let Some(bound) = decl.max {
        if !numeric(decl.ty) {
            return Err(misplaced(format!("max requires a numeric type, not {:?}", decl.ty)));
        }
        field = field.validator(Validator::Max(bound));
    }
    if let Some(prefix) = decl.starts_with {
        if !textual(decl.ty) {
            return Err(misplaced(format!(
                "starts_with requires a textual type, not {:?}",
                decl.ty
            )));
        }
        field = field.validator(Validator::StartsWith(prefix));
    }
    if let Some(pattern) = decl.regex {
        if !textual(decl.ty) {
            return Err(misplaced(format!("regex requires a textual type, not {:?}", decl.ty)));
        }
        let validator = Validator::matches(&pattern)
            .map_err(|e| misplaced(format!("invalid regex {pattern:?}: {e}")))?;
        field = field.validator(validator);
    }
    if let Some(allowed) = decl.one_of {
        if !textual(decl.ty) {
            return Err(misplaced(format!("one_of requires a textual type, not {:?}", decl.ty)));
        }
        field = field.validator(Validator::OneOf(allowed));
    }

    // Default last: coercion catches malformed defaults here, at parse time.
    if let Some(raw) = decl.default {
        field = field.default_raw(&raw)?;
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_schema() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        fs::write(
            &path,
            r#"
prefix = "APP_"

[fields.max_connections]
type = "positive_int"

[fields.debug]
type = "bool"
default = "false"

[fields.zoo_source]
type = "string"
env = "ZOO_SOURCE"
"#,
        )
        .expect("write");

        let schema = from_file(&path).expect("schema");
        assert_eq!(schema.prefix(), "APP_");
        assert_eq!(schema.len(), 3);

        let debug = schema
            .fields()
            .iter()
            .find(|f| f.name() == "debug")
            .expect("debug field");
        assert!(!debug.required());

        let zoo = schema
            .fields()
            .iter()
            .find(|f| f.name() == "zoo_source")
            .expect("zoo field");
        assert_eq!(zoo.source_key("APP_"), "ZOO_SOURCE");
    }

    #[test]
    fn test_load_yaml_schema() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.yaml");
        fs::write(
            &path,
            "prefix: APP_\nfields:\n  api_key:\n    type: secret\n  level:\n    type: string\n    one_of: [debug, info, warn]\n",
        )
        .expect("write");

        let schema = from_file(&path).expect("schema");
        assert_eq!(schema.len(), 2);
        let api_key = schema
            .fields()
            .iter()
            .find(|f| f.name() == "api_key")
            .expect("api_key field");
        assert!(api_key.required());
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.ini");
        fs::write(&path, "x").expect("write");
        let err = from_file(&path).expect_err("should fail");
        assert!(err.to_string().contains("Unsupported schema extension"));
    }

    #[test]
    fn test_malformed_default_fails_at_parse_time() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        fs::write(&path, "[fields.port]\ntype = \"int\"\ndefault = \"eighty\"\n")
            .expect("write");
        let err = from_file(&path).expect_err("bad default");
        assert!(format!("{err:#}").contains("invalid default"));
    }

    #[test]
    fn test_min_on_textual_type_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        fs::write(&path, "[fields.name]\ntype = \"string\"\nmin = 1.0\n").expect("write");
        let err = from_file(&path).expect_err("misplaced validator");
        assert!(format!("{err:#}").contains("min requires a numeric type"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        fs::write(&path, "[fields.email]\ntype = \"string\"\nregex = \"[\"\n").expect("write");
        let err = from_file(&path).expect_err("bad regex");
        assert!(format!("{err:#}").contains("invalid regex"));
    }

    #[test]
    fn test_unknown_declaration_key_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.toml");
        // "typ" is a typo for "type"; deny_unknown_fields should catch it.
        fs::write(&path, "[fields.port]\ntyp = \"int\"\n").expect("write");
        assert!(from_file(&path).is_err());
    }
}
