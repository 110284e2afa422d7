//! Schema declaration: fields, source keys, defaults, validators
//!
//! A [`Schema`] is a pure description of what a process expects from its
//! environment. Declaring one never touches the environment; only the
//! loaders in [`crate::load`] read anything.

pub mod file;
pub mod validate;

pub use validate::Validator;

use crate::error::SchemaError;
use crate::value::{coerce, FieldType, Value};

/// A field default: fixed at declaration time, or computed once per load.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Static(Value),
    /// Runs exactly once during a load; the result is cached in the
    /// snapshot and never recomputed. Must be deterministic for a given
    /// process state (e.g. probe an installed capability, pick a URL).
    Computed(fn() -> Value),
}

/// One declared field: name, source key, type, default, validators.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    env: Option<String>,
    default: Option<DefaultValue>,
    validators: Vec<Validator>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self { name: name.into(), ty, env: None, default: None, validators: Vec::new() }
    }

    /// Bind to an explicit environment variable, bypassing the schema
    /// prefix entirely.
    pub fn env(mut self, key: impl Into<String>) -> Self {
        self.env = Some(key.into());
        self
    }

    /// Fixed default. Defaults are trusted: they skip field validators,
    /// matching how declarative settings libraries treat declared defaults.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Static(value));
        self
    }

    /// Default given as a raw string; coerced through the field's own type
    /// so a malformed default fails at schema-build time, not at load time.
    pub fn default_raw(mut self, raw: &str) -> Result<Self, SchemaError> {
        let value = coerce(self.ty, raw).map_err(|kind| SchemaError::BadDefault {
            field: self.name.clone(),
            raw: raw.to_string(),
            kind,
        })?;
        self.default = Some(DefaultValue::Static(value));
        Ok(self)
    }

    /// Default computed at load time (see [`DefaultValue::Computed`]).
    pub fn computed_default(mut self, compute: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Computed(compute));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> FieldType {
        self.ty
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// A field is required exactly when it has no default.
    pub fn required(&self) -> bool {
        self.default.is_none()
    }

    /// The environment variable this field binds to.
    ///
    /// Derivation rule: the schema prefix followed by the upper-cased field
    /// name (`max_connections` under prefix `APP_` binds to
    /// `APP_MAX_CONNECTIONS`). An explicit [`FieldSpec::env`] override is
    /// used verbatim with no prefix applied.
    pub fn source_key(&self, prefix: &str) -> String {
        match &self.env {
            Some(key) => key.clone(),
            None => format!("{prefix}{}", self.name.to_ascii_uppercase()),
        }
    }
}

/// A fixed, named set of fields plus the source-key prefix.
///
/// Authored once, never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    prefix: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// A schema whose source keys carry the given prefix. Use `""` for
    /// unprefixed variables.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), fields: Vec::new() }
    }

    /// Load a schema declaration from a TOML or YAML file.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        file::from_file(path)
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
