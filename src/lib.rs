//! envscout: fail-fast, typed environment configuration snapshots
//!
//! A process declares a [`Schema`] once (field names, source keys, types,
//! defaults, validators) and loads it from an injectable key/value
//! [`Source`] (process environment, optional dotenv file, in-memory map).
//! Two policies are offered:
//!
//! - **Eager** ([`load`]): read and validate every field before any other
//!   work begins; construction fails atomically with an [`AggregateError`]
//!   listing every problem, or yields an immutable [`Snapshot`].
//! - **Lazy** ([`RawEnv`]): an unchecked raw passthrough that defers
//!   coercion to each call site, preserved faithfully as the anti-pattern
//!   the eager policy exists to eliminate.
//!
//! ```no_run
//! use envscout::{FieldSpec, FieldType, Schema, ProcessEnv};
//!
//! fn main() -> anyhow::Result<()> {
//!     let schema = Schema::new("APP_")
//!         .field(FieldSpec::new("debug", FieldType::Bool).default_raw("false")?)
//!         .field(FieldSpec::new("max_connections", FieldType::PositiveInt))
//!         .field(FieldSpec::new("api_key", FieldType::Secret));
//!
//!     // Before anything else runs: all problems surface here, at once.
//!     let config = envscout::load(&schema, &ProcessEnv)?;
//!
//!     let _workers = config.int("max_connections")?;
//!     let _key = config.secret("api_key")?.expose();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod load;
pub mod schema;
pub mod secret;
pub mod snapshot;
pub mod source;
pub mod value;

pub use error::{AggregateError, FieldError, FieldErrorKind, SchemaError, SnapshotError};
pub use load::{load, RawEnv};
pub use schema::{DefaultValue, FieldSpec, Schema, Validator};
pub use secret::SecretString;
pub use snapshot::{Snapshot, SnapshotCell};
pub use source::{env_with_dotenv, DotenvFile, Layered, MapSource, ProcessEnv, Source};
pub use value::{coerce, FieldType, Value};
