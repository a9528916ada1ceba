//! # Schema Types
//!
//! The minimal host type model the validator walks: a closed [`TypeNode`]
//! enum (scalar, list, non-null, object) and [`FieldSpec`], which attaches
//! optional validation rules to one node of the tree.
//!
//! ## Invariants
//!
//! - `NonNull` never wraps `NonNull` ([`TypeNode::non_null`] and
//!   [`ObjectTypeBuilder::build`] reject it).
//! - Object field names are unique.
//! - Item rules only appear on list-typed fields.
//!
//! Schema values are immutable once built and are `Send + Sync`, so one
//! schema can serve any number of concurrent validation calls.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::SchemaError;
use crate::outcome::is_reserved;

/// A validation rule: returns an error payload, or `None` for success.
///
/// A *falsy* payload (`null`, `false`, `0`, `""`, `[]`, `{}`) also means
/// success; see [`is_falsy`].
pub type Rule = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Wrap a closure as a [`Rule`].
pub fn rule<F>(f: F) -> Rule
where
    F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Build the conventional `{code, msg}` error payload.
///
/// Rules may return any payload; this shape is the one the assembled
/// output types describe.
pub fn rule_error(code: &str, msg: &str) -> Value {
    serde_json::json!({ "code": code, "msg": msg })
}

/// Returns true when a rule payload means "no error".
///
/// Follows loose truthiness: the string `"0"` counts as falsy too.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Invoke a rule, normalizing falsy payloads to `None`.
pub(crate) fn apply_rule(rule: &Rule, value: &Value) -> Option<Value> {
    rule(value).filter(|payload| !is_falsy(payload))
}

/// Built-in scalar kinds. Only used for naming types in rendered schemas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Boolean,
    Id,
    /// A host-defined scalar.
    Custom(String),
}

impl ScalarType {
    /// GraphQL name of the scalar.
    pub fn name(&self) -> &str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::Id => "ID",
            ScalarType::Custom(name) => name,
        }
    }
}

/// One node of a declared input type tree.
#[derive(Debug, Clone)]
pub enum TypeNode {
    Scalar(ScalarType),
    List(Box<TypeNode>),
    NonNull(Box<TypeNode>),
    Object(Arc<ObjectType>),
}

impl TypeNode {
    pub fn string() -> Self {
        TypeNode::Scalar(ScalarType::String)
    }

    pub fn int() -> Self {
        TypeNode::Scalar(ScalarType::Int)
    }

    pub fn float() -> Self {
        TypeNode::Scalar(ScalarType::Float)
    }

    pub fn boolean() -> Self {
        TypeNode::Scalar(ScalarType::Boolean)
    }

    pub fn id() -> Self {
        TypeNode::Scalar(ScalarType::Id)
    }

    /// A list of `inner`.
    pub fn list(inner: TypeNode) -> Self {
        TypeNode::List(Box::new(inner))
    }

    /// A non-null `inner`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NestedNonNull`] if `inner` is already non-null.
    pub fn non_null(inner: TypeNode) -> Result<Self, SchemaError> {
        if matches!(inner, TypeNode::NonNull(_)) {
            return Err(SchemaError::NestedNonNull);
        }
        Ok(TypeNode::NonNull(Box::new(inner)))
    }

    pub fn object(object: ObjectType) -> Self {
        TypeNode::Object(Arc::new(object))
    }

    /// True if this node is a list, looking through a non-null wrapper.
    pub fn is_list(&self) -> bool {
        match self {
            TypeNode::List(_) => true,
            TypeNode::NonNull(inner) => inner.is_list(),
            TypeNode::Scalar(_) | TypeNode::Object(_) => false,
        }
    }

    /// Strip every list and non-null wrapper, returning the named type.
    pub fn unwrap_all(&self) -> &TypeNode {
        match self {
            TypeNode::List(inner) | TypeNode::NonNull(inner) => inner.unwrap_all(),
            TypeNode::Scalar(_) | TypeNode::Object(_) => self,
        }
    }

    /// The object type behind this node, if the named type is an object.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self.unwrap_all() {
            TypeNode::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Verify wrapper nesting throughout the tree.
    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        match self {
            TypeNode::NonNull(inner) => {
                if matches!(**inner, TypeNode::NonNull(_)) {
                    return Err(SchemaError::NestedNonNull);
                }
                inner.check()
            }
            TypeNode::List(inner) => inner.check(),
            // Object fields were checked when the object was built.
            TypeNode::Scalar(_) | TypeNode::Object(_) => Ok(()),
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Scalar(scalar) => write!(f, "{}", scalar.name()),
            TypeNode::List(inner) => write!(f, "[{inner}]"),
            TypeNode::NonNull(inner) => write!(f, "{inner}!"),
            TypeNode::Object(object) => write!(f, "{}", object.name()),
        }
    }
}

/// A type node plus the validation attached to it.
#[derive(Clone)]
pub struct FieldSpec {
    ty: TypeNode,
    validate: Option<Rule>,
    validate_item: Option<Rule>,
    error_codes: Vec<String>,
    suberror_codes: Vec<String>,
    description: Option<String>,
}

impl FieldSpec {
    pub fn new(ty: TypeNode) -> Self {
        Self {
            ty,
            validate: None,
            validate_item: None,
            error_codes: Vec::new(),
            suberror_codes: Vec::new(),
            description: None,
        }
    }

    /// Attach a whole-value rule.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.validate = Some(rule(f));
        self
    }

    pub(crate) fn with_rule(mut self, rule: Option<Rule>) -> Self {
        self.validate = rule;
        self
    }

    /// Attach a per-item rule. Only valid on list-typed fields.
    pub fn validate_item<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.validate_item = Some(rule(f));
        self
    }

    /// Error codes the whole-value rule may report.
    pub fn error_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Error codes the item rule may report.
    pub fn suberror_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suberror_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }

    pub fn rule(&self) -> Option<&Rule> {
        self.validate.as_ref()
    }

    pub fn item_rule(&self) -> Option<&Rule> {
        self.validate_item.as_ref()
    }

    pub fn error_code_list(&self) -> &[String] {
        &self.error_codes
    }

    pub fn suberror_code_list(&self) -> &[String] {
        &self.suberror_codes
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("ty", &self.ty.to_string())
            .field("validate", &self.validate.is_some())
            .field("validate_item", &self.validate_item.is_some())
            .field("error_codes", &self.error_codes)
            .field("suberror_codes", &self.suberror_codes)
            .finish()
    }
}

/// A named object type whose fields each carry a [`FieldSpec`].
#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
    fields: BTreeMap<String, FieldSpec>,
    order: Vec<String>,
}

impl ObjectType {
    pub fn builder(name: impl Into<String>) -> ObjectTypeBuilder {
        ObjectTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.order
            .iter()
            .filter_map(|name| self.fields.get(name).map(|spec| (name.as_str(), spec)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collects fields for an [`ObjectType`] and checks schema invariants.
#[derive(Debug)]
pub struct ObjectTypeBuilder {
    name: String,
    fields: Vec<(String, FieldSpec)>,
}

impl ObjectTypeBuilder {
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Finish the object type.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::DuplicateField`] if two fields share a name.
    /// - [`SchemaError::NestedNonNull`] if any field type nests non-null.
    /// - [`SchemaError::ItemRuleOnNonList`] if an item rule sits on a
    ///   non-list field.
    /// - [`SchemaError::EmptyName`] for an unnamed field.
    /// - [`SchemaError::ReservedName`] for a field named `error`,
    ///   `suberrors` or `path`.
    pub fn build(self) -> Result<ObjectType, SchemaError> {
        let mut fields = BTreeMap::new();
        let mut order = Vec::with_capacity(self.fields.len());

        for (field, spec) in self.fields {
            if field.is_empty() {
                return Err(SchemaError::EmptyName { kind: "field" });
            }
            if is_reserved(&field) {
                return Err(SchemaError::ReservedName {
                    kind: "field",
                    name: field,
                });
            }
            spec.ty.check()?;
            if spec.validate_item.is_some() && !spec.ty.is_list() {
                return Err(SchemaError::ItemRuleOnNonList { field });
            }
            if fields.contains_key(&field) {
                return Err(SchemaError::DuplicateField {
                    object: self.name,
                    field,
                });
            }
            order.push(field.clone());
            fields.insert(field, spec);
        }

        Ok(ObjectType {
            name: self.name,
            fields,
            order,
        })
    }
}
