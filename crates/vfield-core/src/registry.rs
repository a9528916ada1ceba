//! # Field Registry
//!
//! Name-indexed collection of validated fields, used by hosts that dispatch
//! invocations by field name. Built once, then shared read-only.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{FieldError, SchemaError};
use crate::field::{ResultEnvelope, ValidatedField};

/// Validated fields indexed by name.
#[derive(Debug)]
pub struct FieldRegistry<C> {
    fields: BTreeMap<String, ValidatedField<C>>,
}

impl<C> Default for FieldRegistry<C> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<C> FieldRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateRegistration`] if the name is taken.
    pub fn register(&mut self, field: ValidatedField<C>) -> Result<(), SchemaError> {
        if self.fields.contains_key(field.name()) {
            return Err(SchemaError::DuplicateRegistration(field.name().to_string()));
        }
        self.fields.insert(field.name().to_string(), field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ValidatedField<C>> {
        self.fields.get(name)
    }

    /// Registered field names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Invoke a field by name.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] if no such field is registered, or any
    /// error from [`ValidatedField::resolve`].
    pub fn resolve(&self, name: &str, ctx: &C, args: &Value) -> Result<ResultEnvelope, FieldError> {
        self.lookup(name)?.resolve(ctx, args)
    }

    /// Invoke a field by name and render the envelope as JSON.
    pub fn resolve_json(&self, name: &str, ctx: &C, args: &Value) -> Result<Value, FieldError> {
        self.lookup(name)?.resolve_json(ctx, args)
    }

    /// SDL for the result types of every registered field.
    pub fn to_sdl(&self) -> String {
        self.fields
            .values()
            .map(|field| field.output_type().to_sdl())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn lookup(&self, name: &str) -> Result<&ValidatedField<C>, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }
}
