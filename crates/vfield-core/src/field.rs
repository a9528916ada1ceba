//! # Validated Field
//!
//! The public entry point. A [`ValidatedField`] bundles a field's argument
//! schema, its computation and its assembled result type. Invoking it runs
//! validation first and only calls the computation when every rule passed.
//!
//! ## Envelope
//!
//! ```text
//! valid:   { "valid": true,  "result": <computation value> }
//! invalid: { "valid": false, "error": .., "suberrors": {..}, "path": [..] }
//! ```
//!
//! The `valid` and `result` keys can be renamed per field.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{BoxError, FieldError, SchemaError};
use crate::outcome::{is_reserved, ValidationOutcome};
use crate::output::{self, upper_first, Assembly, ResultSchema};
use crate::types::{rule, FieldSpec, ObjectType, Rule, TypeNode};
use crate::walker::{self, Position};

/// Default envelope key for the validity flag.
pub const DEFAULT_VALID_NAME: &str = "valid";
/// Default envelope key for the computation result.
pub const DEFAULT_RESULT_NAME: &str = "result";

/// The wrapped computation: resolution context plus argument object.
pub type Resolver<C> = Arc<dyn Fn(&C, &Value) -> Result<Value, BoxError> + Send + Sync>;

/// Outcome of one validated field invocation.
///
/// `result` is present only when `valid`; `errors` is empty only when
/// `valid`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    valid: bool,
    result: Option<Value>,
    errors: ValidationOutcome,
}

impl ResultEnvelope {
    fn success(result: Value) -> Self {
        Self {
            valid: true,
            result: Some(result),
            errors: ValidationOutcome::valid(),
        }
    }

    fn failure(errors: ValidationOutcome) -> Self {
        Self {
            valid: false,
            result: None,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn errors(&self) -> &ValidationOutcome {
        &self.errors
    }

    /// Render as JSON, merging the error tree into the top level.
    pub fn to_value(&self, valid_name: &str, result_name: &str) -> Value {
        let mut map: Map<String, Value> = self.errors.to_map();
        map.insert(valid_name.to_string(), Value::Bool(self.valid));
        if let Some(result) = &self.result {
            map.insert(result_name.to_string(), result.clone());
        }
        Value::Object(map)
    }
}

/// Construction-time configuration of a validated field.
pub struct FieldConfig<C> {
    name: String,
    ty: TypeNode,
    args: Vec<(String, FieldSpec)>,
    resolve: Resolver<C>,
    error_codes: Vec<String>,
    validate: Option<Rule>,
    valid_name: String,
    result_name: String,
}

impl<C> FieldConfig<C> {
    /// Start a field named `name` whose computation returns a `ty` value.
    pub fn new<F>(name: impl Into<String>, ty: TypeNode, resolve: F) -> Self
    where
        F: Fn(&C, &Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            ty,
            args: Vec::new(),
            resolve: Arc::new(resolve),
            error_codes: Vec::new(),
            validate: None,
            valid_name: DEFAULT_VALID_NAME.to_string(),
            result_name: DEFAULT_RESULT_NAME.to_string(),
        }
    }

    /// Declare an argument.
    pub fn arg(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.args.push((name.into(), spec));
        self
    }

    /// Rule applied to the whole argument object before any argument.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.validate = Some(rule(f));
        self
    }

    /// Codes the field-level rule may report.
    pub fn error_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn valid_name(mut self, name: impl Into<String>) -> Self {
        self.valid_name = name.into();
        self
    }

    pub fn result_name(mut self, name: impl Into<String>) -> Self {
        self.result_name = name.into();
        self
    }

    /// Derive a field name from a host type name: drop a trailing `Type`,
    /// lower-case the first letter (`SavePhoneNumbersType` →
    /// `savePhoneNumbers`).
    pub fn derive_name(type_name: &str) -> String {
        let base = type_name.strip_suffix("Type").unwrap_or(type_name);
        let mut chars = base.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Assemble the field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for an empty name, an invalid result type,
    /// an envelope key that is empty, reserved or shared by `valid` and
    /// `result`, or any invalid argument declaration.
    pub fn build(self) -> Result<ValidatedField<C>, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName { kind: "field" });
        }
        for key in [&self.valid_name, &self.result_name] {
            if key.is_empty() {
                return Err(SchemaError::EmptyName { kind: "envelope key" });
            }
            if is_reserved(key) {
                return Err(SchemaError::ReservedName {
                    kind: "envelope key",
                    name: key.clone(),
                });
            }
        }
        if self.valid_name == self.result_name {
            return Err(SchemaError::ReservedName {
                kind: "envelope key",
                name: self.result_name,
            });
        }
        self.ty.check()?;

        let object = self
            .args
            .into_iter()
            .fold(
                ObjectType::builder(format!("{}Args", upper_first(&self.name))),
                |builder, (name, spec)| builder.field(name, spec),
            )
            .build()?;
        let args = FieldSpec::new(TypeNode::object(object))
            .with_rule(self.validate)
            .error_codes(self.error_codes);

        let output = output::assemble(Assembly {
            field_name: &self.name,
            result_name: &self.result_name,
            valid_name: &self.valid_name,
            result_type: &self.ty,
            args: &args,
        });

        Ok(ValidatedField {
            name: self.name,
            ty: self.ty,
            args,
            resolve: self.resolve,
            valid_name: self.valid_name,
            result_name: self.result_name,
            output,
        })
    }
}

/// A field whose computation only runs on validated arguments.
pub struct ValidatedField<C> {
    name: String,
    ty: TypeNode,
    args: FieldSpec,
    resolve: Resolver<C>,
    valid_name: String,
    result_name: String,
    output: ResultSchema,
}

impl<C> ValidatedField<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the computation's result.
    pub fn result_type(&self) -> &TypeNode {
        &self.ty
    }

    /// The argument object type.
    pub fn args(&self) -> Option<&ObjectType> {
        self.args.ty().as_object()
    }

    /// The assembled result type.
    pub fn output_type(&self) -> &ResultSchema {
        &self.output
    }

    pub fn valid_name(&self) -> &str {
        &self.valid_name
    }

    pub fn result_name(&self) -> &str {
        &self.result_name
    }

    /// Validate arguments without running the computation.
    pub fn validate(&self, args: &Value) -> ValidationOutcome {
        walker::validate(&self.args, args, Position::ROOT)
    }

    /// Validate `args` and, if valid, run the computation.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Resolver`] if the computation fails. Validation
    /// failures are not errors; they come back as an invalid envelope.
    pub fn resolve(&self, ctx: &C, args: &Value) -> Result<ResultEnvelope, FieldError> {
        let errors = self.validate(args);
        if !errors.is_empty() {
            tracing::debug!(field = %self.name, "validation failed, computation skipped");
            return Ok(ResultEnvelope::failure(errors));
        }

        let result = (self.resolve)(ctx, args).map_err(|source| FieldError::Resolver {
            field: self.name.clone(),
            source,
        })?;
        tracing::debug!(field = %self.name, "validation passed");
        Ok(ResultEnvelope::success(result))
    }

    /// [`resolve`](Self::resolve), rendered with this field's key names.
    pub fn resolve_json(&self, ctx: &C, args: &Value) -> Result<Value, FieldError> {
        Ok(self
            .resolve(ctx, args)?
            .to_value(&self.valid_name, &self.result_name))
    }
}

impl<C> std::fmt::Debug for ValidatedField<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedField")
            .field("name", &self.name)
            .field("ty", &self.ty.to_string())
            .field("args", &self.args)
            .field("valid_name", &self.valid_name)
            .field("result_name", &self.result_name)
            .finish()
    }
}
