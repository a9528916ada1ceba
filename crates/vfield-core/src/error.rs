//! # Error Types
//!
//! Rust-level errors for schema construction and field invocation. All
//! errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Validation failures are *data*: they live in
//!   [`ValidationOutcome`](crate::outcome::ValidationOutcome) and never
//!   appear here.
//! - Malformed schemas are rejected once, at construction time, with
//!   [`SchemaError`].
//! - A failing computation surfaces as [`FieldError::Resolver`] and is
//!   forwarded to the host unchanged.

use thiserror::Error;

/// Boxed error returned by wrapped computations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema construction failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two fields of one object share a name.
    #[error("duplicate field '{field}' in object '{object}'")]
    DuplicateField {
        /// Object type name.
        object: String,
        /// Conflicting field name.
        field: String,
    },

    /// A non-null wrapper was applied to a type that is already non-null.
    #[error("non-null type cannot wrap another non-null type")]
    NestedNonNull,

    /// A per-item rule was attached to a field whose type is not a list.
    #[error("field '{field}' has an item rule but its type is not a list")]
    ItemRuleOnNonList {
        /// Offending field name.
        field: String,
    },

    /// A field or object was declared without a name.
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// What was being named ("field", "object").
        kind: &'static str,
    },

    /// A pattern used by a rule failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler error message.
        reason: String,
    },

    /// A name would collide with a key the outcome reserves for itself.
    #[error("{kind} name '{name}' is reserved")]
    ReservedName {
        /// What was being named ("field", "envelope key").
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// Two validated fields were registered under the same name.
    #[error("field '{0}' is already registered")]
    DuplicateRegistration(String),
}

/// Invoking a validated field failed.
#[derive(Error, Debug)]
pub enum FieldError {
    /// The wrapped computation returned an error after validation passed.
    #[error("computation for field '{field}' failed: {source}")]
    Resolver {
        /// Field whose computation failed.
        field: String,
        /// Underlying error from the computation.
        #[source]
        source: BoxError,
    },

    /// No field with this name is registered.
    #[error("unknown field '{0}'")]
    UnknownField(String),
}
