//! Field validators: predicates that run after coercion

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// A predicate checked against a coerced value, with a reason on failure.
///
/// Validator failures never echo the value they rejected, so they are safe
/// to run against secret fields (e.g. a key-prefix check).
#[derive(Debug, Clone)]
pub enum Validator {
    /// Numeric lower bound (inclusive).
    Min(f64),
    /// Numeric upper bound (inclusive).
    Max(f64),
    /// Textual prefix, e.g. "starts with http".
    StartsWith(String),
    /// Full-match against a regular expression.
    Matches(Regex),
    /// Value must be one of a closed set.
    OneOf(Vec<String>),
    /// Arbitrary predicate with a fixed message.
    Custom {
        check: fn(&Value) -> bool,
        message: &'static str,
    },
}

impl Validator {
    /// Compile a regex validator, surfacing the pattern error to the caller.
    pub fn matches(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Validator::Matches)
    }

    /// Loose email-shape check (`local@domain.tld`).
    pub fn email_shape() -> Self {
        Validator::Matches(EMAIL_SHAPE.clone())
    }

    /// Run the predicate. `Err` carries the human-readable reason.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Validator::Min(bound) => match value.as_number() {
                Some(n) if n >= *bound => Ok(()),
                Some(n) => Err(format!("must be >= {bound} (got {n})")),
                None => Err(format!("min validator requires a numeric field, not {}", value.kind())),
            },
            Validator::Max(bound) => match value.as_number() {
                Some(n) if n <= *bound => Ok(()),
                Some(n) => Err(format!("must be <= {bound} (got {n})")),
                None => Err(format!("max validator requires a numeric field, not {}", value.kind())),
            },
            Validator::StartsWith(prefix) => match value.as_text() {
                Some(s) if s.starts_with(prefix.as_str()) => Ok(()),
                Some(_) => Err(format!("must start with {prefix:?}")),
                None => Err(format!(
                    "starts_with validator requires a textual field, not {}",
                    value.kind()
                )),
            },
            Validator::Matches(re) => match value.as_text() {
                Some(s) if re.is_match(s) => Ok(()),
                Some(_) => Err(format!("must match {:?}", re.as_str())),
                None => Err(format!(
                    "regex validator requires a textual field, not {}",
                    value.kind()
                )),
            },
            Validator::OneOf(allowed) => match value.as_text() {
                Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
                Some(_) => Err(format!("must be one of {allowed:?}")),
                None => Err(format!(
                    "one_of validator requires a textual field, not {}",
                    value.kind()
                )),
            },
            Validator::Custom { check, message } => {
                if check(value) {
                    Ok(())
                } else {
                    Err((*message).to_string())
                }
            }
        }
    }
}
