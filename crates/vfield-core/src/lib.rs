//! # vfield-core: Schema-Driven Field Validation
//!
//! Validates a field's already-decoded arguments against a typed schema
//! whose nodes may carry validation rules, and only then runs the field's
//! computation. Failures come back as a path-addressed error tree that
//! mirrors the shape of the input.
//!
//! ## Components
//!
//! - [`types`]: the closed [`TypeNode`] model and [`FieldSpec`] rules.
//! - [`walker`]: the type-tree walker and sub-error placement.
//! - [`items`]: first-failure list walking with positional paths.
//! - [`outcome`]: the [`ValidationOutcome`] error tree.
//! - [`field`]: [`ValidatedField`] and its [`ResultEnvelope`].
//! - [`output`]: one-time assembly of the field's result type.
//! - [`registry`]: name-indexed field dispatch for hosts.
//! - [`demo`]: built-in demonstration fields.
//!
//! ## Crate Policy
//!
//! - Validation is synchronous and pure; schemas are immutable and
//!   `Send + Sync` after construction.
//! - Validation failures are data, never `Err`. `Err` is reserved for
//!   malformed schemas ([`SchemaError`]) and failed computations
//!   ([`FieldError`]).
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod demo;
pub mod error;
pub mod field;
pub mod items;
pub mod outcome;
pub mod output;
pub mod registry;
pub mod types;
pub mod walker;

pub use error::{BoxError, FieldError, SchemaError};
pub use field::{FieldConfig, ResultEnvelope, Resolver, ValidatedField};
pub use items::{ItemFailure, ItemFailureReason};
pub use outcome::{ValidationOutcome, RESERVED_KEYS};
pub use output::{OutputField, OutputType, ResultSchema, TypeDefinition};
pub use registry::FieldRegistry;
pub use types::{is_falsy, rule, rule_error, FieldSpec, ObjectType, Rule, ScalarType, TypeNode};
pub use walker::{create_sub_errors, Position};
