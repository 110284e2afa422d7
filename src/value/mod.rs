//! Typed field values and the raw-string coercion engine
//!
//! Every raw source value is text. [`coerce`] is the one total function from
//! text to a typed [`Value`]: it either produces the declared type or a
//! structured [`FieldErrorKind`], never a silent fallback.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::error::FieldErrorKind;
use crate::secret::SecretString;

/// The declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    Int,
    PositiveInt,
    Float,
    PositiveFloat,
    String,
    Secret,
    Url,
    Date,
    FutureDate,
    List,
    Map,
}

impl FieldType {
    /// Human-readable name used in coercion error messages.
    pub fn expected(self) -> &'static str {
        match self {
            FieldType::Bool => "boolean",
            FieldType::Int => "integer",
            FieldType::PositiveInt => "positive integer",
            FieldType::Float => "float",
            FieldType::PositiveFloat => "positive float",
            FieldType::String => "string",
            FieldType::Secret => "secret string",
            FieldType::Url => "http(s) url",
            FieldType::Date => "date (YYYY-MM-DD)",
            FieldType::FutureDate => "future date (YYYY-MM-DD)",
            FieldType::List => "string list",
            FieldType::Map => "string map (JSON object)",
        }
    }
}

/// A field value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Secret(SecretString),
    Url(Url),
    Date(NaiveDate),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Value {
    /// The kind name used in wrong-type getter errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Secret(_) => "secret",
            Value::Url(_) => "url",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Numeric view shared by the min/max validators.
    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Textual view shared by the shape validators. Secrets are included so
    /// a key-prefix check can run; validator failures never echo the value.
    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Secret(s) => Some(s.expose()),
            Value::Url(u) => Some(u.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Secret(s) => write!(f, "{s}"),
            Value::Url(u) => f.write_str(u.as_str()),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::List(items) => f.write_str(&items.join(",")),
            Value::Map(entries) => {
                let rendered: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                f.write_str(&rendered.join(","))
            }
        }
    }
}

/// Coerce a raw source string into the declared type.
///
/// Parse failures come back as [`FieldErrorKind::Coercion`] with the raw
/// value and expected type; constraint failures on parseable values
/// (non-positive, past date, non-http scheme) come back as
/// [`FieldErrorKind::Invalid`].
pub fn coerce(ty: FieldType, raw: &str) -> Result<Value, FieldErrorKind> {
    match ty {
        FieldType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            // Unrecognized strings are an error, never "false".
            _ => Err(FieldErrorKind::Coercion {
                raw: raw.to_string(),
                expected: ty.expected(),
            }),
        },
        FieldType::Int => raw.trim().parse::<i64>().map(Value::Int).map_err(|_| coercion_err(ty, raw)),
        FieldType::PositiveInt => {
            let n = raw.trim().parse::<i64>().map_err(|_| coercion_err(ty, raw))?;
            if n > 0 {
                Ok(Value::Int(n))
            } else {
                Err(FieldErrorKind::Invalid { reason: format!("must be > 0 (got {n})") })
            }
        }
        FieldType::Float => raw.trim().parse::<f64>().map(Value::Float).map_err(|_| coercion_err(ty, raw)),
        FieldType::PositiveFloat => {
            let x = raw.trim().parse::<f64>().map_err(|_| coercion_err(ty, raw))?;
            if x > 0.0 {
                Ok(Value::Float(x))
            } else {
                Err(FieldErrorKind::Invalid { reason: format!("must be > 0 (got {x})") })
            }
        }
        FieldType::String => Ok(Value::Str(raw.to_string())),
        FieldType::Secret => Ok(Value::Secret(SecretString::from(raw))),
        FieldType::Url => {
            let parsed = Url::parse(raw.trim()).map_err(|_| coercion_err(ty, raw))?;
            match parsed.scheme() {
                "http" | "https" => Ok(Value::Url(parsed)),
                other => Err(FieldErrorKind::Invalid {
                    reason: format!("scheme must be http or https (got {other})"),
                }),
            }
        }
        FieldType::Date => {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map(Value::Date).map_err(|_| coercion_err(ty, raw))
        }
        FieldType::FutureDate => {
            let date =
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| coercion_err(ty, raw))?;
            let today = Local::now().date_naive();
            if date > today {
                Ok(Value::Date(date))
            } else {
                Err(FieldErrorKind::Invalid {
                    reason: format!("must be after {today} (got {date})"),
                })
            }
        }
        FieldType::List => {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                serde_json::from_str::<Vec<String>>(trimmed).map(Value::List).map_err(|_| coercion_err(ty, raw))
            } else {
                let items: Vec<String> = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok(Value::List(items))
            }
        }
        FieldType::Map => {
            let trimmed = raw.trim();
            if trimmed.starts_with('{') {
                serde_json::from_str::<BTreeMap<String, String>>(trimmed)
                    .map(Value::Map)
                    .map_err(|_| coercion_err(ty, raw))
            } else {
                Err(FieldErrorKind::Coercion {
                    raw: raw.to_string(),
                    expected: ty.expected(),
                })
            }
        }
    }
}

fn coercion_err(ty: FieldType, raw: &str) -> FieldErrorKind {
    FieldErrorKind::Coercion { raw: raw.to_string(), expected: ty.expected() }
}
