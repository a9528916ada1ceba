//! # Output-Type Assembly
//!
//! Builds the declared result type of a validated field once, at
//! construction time. The result object carries the payload, the validity
//! flag and a structured error tree whose types mirror the argument
//! schema: one error type per argument that can fail, `suberrors` objects
//! for nested arguments, and `path` for list arguments with item rules.
//!
//! Error codes declared on fields become enums, so clients can switch on
//! them. The types describe the conventional `{code, msg}` payload built by
//! [`rule_error`](crate::types::rule_error).
//!
//! Nothing here runs on the validation path.

use std::fmt::Write as _;

use crate::types::{FieldSpec, ObjectType, TypeNode};

const RESULT_DESCRIPTION: &str = "The payload, if any";
const VALID_DESCRIPTION: &str = "Whether all validation passed. True for yes, false for no.";

/// A reference to a type in an assembled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputType {
    Named(String),
    List(Box<OutputType>),
    NonNull(Box<OutputType>),
}

impl OutputType {
    fn named(name: impl Into<String>) -> Self {
        OutputType::Named(name.into())
    }

    fn non_null(inner: OutputType) -> Self {
        OutputType::NonNull(Box::new(inner))
    }

    fn list(inner: OutputType) -> Self {
        OutputType::List(Box::new(inner))
    }

    /// Mirror an input type node. The top-level non-null wrapper is
    /// dropped since the payload is absent whenever validation fails.
    fn nullable_from(node: &TypeNode) -> Self {
        match node {
            TypeNode::NonNull(inner) => Self::from_node(inner),
            other => Self::from_node(other),
        }
    }

    fn from_node(node: &TypeNode) -> Self {
        match node {
            TypeNode::Scalar(scalar) => OutputType::named(scalar.name()),
            TypeNode::Object(object) => OutputType::named(object.name()),
            TypeNode::List(inner) => OutputType::list(Self::from_node(inner)),
            TypeNode::NonNull(inner) => OutputType::non_null(Self::from_node(inner)),
        }
    }
}

impl std::fmt::Display for OutputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputType::Named(name) => write!(f, "{name}"),
            OutputType::List(inner) => write!(f, "[{inner}]"),
            OutputType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// One field of an output object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    pub name: String,
    pub ty: OutputType,
    pub description: Option<String>,
}

impl OutputField {
    fn new(name: impl Into<String>, ty: OutputType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named type produced by assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Object {
        name: String,
        fields: Vec<OutputField>,
    },
    Enum {
        name: String,
        values: Vec<String>,
    },
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Object { name, .. } | TypeDefinition::Enum { name, .. } => name,
        }
    }

    /// Fields of an object definition; empty for enums.
    pub fn fields(&self) -> &[OutputField] {
        match self {
            TypeDefinition::Object { fields, .. } => fields.as_slice(),
            TypeDefinition::Enum { .. } => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&OutputField> {
        self.fields().iter().find(|field| field.name == name)
    }

    fn write_sdl(&self, out: &mut String) {
        match self {
            TypeDefinition::Object { name, fields } => {
                let _ = writeln!(out, "type {name} {{");
                for field in fields {
                    if let Some(description) = &field.description {
                        let _ = writeln!(out, "  \"{}\"", escape_string(description));
                    }
                    let _ = writeln!(out, "  {}: {}", field.name, field.ty);
                }
                out.push_str("}\n");
            }
            TypeDefinition::Enum { name, values } => {
                let _ = writeln!(out, "enum {name} {{");
                for value in values {
                    let _ = writeln!(out, "  {value}");
                }
                out.push_str("}\n");
            }
        }
    }
}

/// The assembled result type of one validated field, plus every type it
/// references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSchema {
    root: String,
    types: Vec<TypeDefinition>,
}

impl ResultSchema {
    /// Name of the result object type.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// The result object type.
    pub fn root(&self) -> Option<&TypeDefinition> {
        self.get(&self.root)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|def| def.name() == name)
    }

    /// All definitions, result type first.
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Render every definition as GraphQL SDL.
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        for (i, def) in self.types.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            def.write_sdl(&mut out);
        }
        out
    }
}

/// Inputs for assembling a field's result type.
pub(crate) struct Assembly<'a> {
    pub field_name: &'a str,
    pub result_name: &'a str,
    pub valid_name: &'a str,
    pub result_type: &'a TypeNode,
    /// The argument object, carrying the field-level rule and codes.
    pub args: &'a FieldSpec,
}

pub(crate) fn assemble(input: Assembly<'_>) -> ResultSchema {
    let prefix = upper_first(input.field_name);
    let root = format!("{prefix}Result");
    let mut types = Vec::new();

    let mut fields = vec![
        OutputField::new(input.result_name, OutputType::nullable_from(input.result_type))
            .describe(RESULT_DESCRIPTION),
        OutputField::new(input.valid_name, OutputType::non_null(OutputType::named("Boolean")))
            .describe(VALID_DESCRIPTION),
    ];

    if input.args.rule().is_some() || !input.args.error_code_list().is_empty() {
        let error = direct_error_type(&prefix, input.args.error_code_list(), &mut types);
        fields.push(OutputField::new("error", OutputType::named(error)));
    }
    if let Some(object) = input.args.ty().as_object() {
        if let Some(suberrors) = suberrors_type(&prefix, object, &mut types) {
            fields.push(OutputField::new("suberrors", OutputType::named(suberrors)));
        }
    }

    types.insert(0, TypeDefinition::Object { name: root.clone(), fields });
    ResultSchema { root, types }
}

/// `{prefix}Error { code, msg }` plus its code enum.
fn direct_error_type(prefix: &str, codes: &[String], types: &mut Vec<TypeDefinition>) -> String {
    let name = format!("{prefix}Error");
    let mut fields = Vec::new();
    if !codes.is_empty() {
        let code_enum = format!("{prefix}ErrorCode");
        types.push(TypeDefinition::Enum {
            name: code_enum.clone(),
            values: codes.to_vec(),
        });
        fields.push(OutputField::new("code", OutputType::named(code_enum)));
    }
    fields.push(OutputField::new("msg", OutputType::named("String")));
    types.push(TypeDefinition::Object {
        name: name.clone(),
        fields,
    });
    name
}

/// `{prefix}Suberrors` with one entry per child that can fail.
fn suberrors_type(
    prefix: &str,
    object: &ObjectType,
    types: &mut Vec<TypeDefinition>,
) -> Option<String> {
    let fields = child_error_fields(prefix, object, types);
    if fields.is_empty() {
        return None;
    }
    let name = format!("{prefix}Suberrors");
    types.push(TypeDefinition::Object {
        name: name.clone(),
        fields,
    });
    Some(name)
}

fn child_error_fields(
    prefix: &str,
    object: &ObjectType,
    types: &mut Vec<TypeDefinition>,
) -> Vec<OutputField> {
    object
        .fields()
        .filter_map(|(name, spec)| {
            let child_prefix = format!("{prefix}_{}", upper_first(name));
            field_error_type(&child_prefix, spec, types).map(|ty| {
                let field = OutputField::new(name, OutputType::named(ty));
                match spec.description_text() {
                    Some(description) => field.describe(description),
                    None => field,
                }
            })
        })
        .collect()
}

/// Error type for one field, or `None` if the field can never fail.
fn field_error_type(prefix: &str, spec: &FieldSpec, types: &mut Vec<TypeDefinition>) -> Option<String> {
    let is_list = spec.ty().is_list();
    let has_rule = spec.rule().is_some();
    let has_item_rule = spec.item_rule().is_some();
    let mut fields = Vec::new();

    let mut codes = spec.error_code_list().to_vec();
    if is_list {
        codes.extend(spec.suberror_code_list().iter().cloned());
    }
    if has_rule || has_item_rule || !codes.is_empty() {
        let error = direct_error_type(prefix, &codes, types);
        fields.push(OutputField::new("error", OutputType::named(error)));
    }

    if let Some(object) = spec.ty().as_object() {
        // List items always nest; plain objects nest only with their own rule.
        let walked = !is_list || has_rule || has_item_rule;
        if walked && (is_list || has_rule) {
            if let Some(suberrors) = suberrors_type(prefix, object, types) {
                fields.push(OutputField::new("suberrors", OutputType::named(suberrors)));
            }
        } else if walked {
            fields.extend(child_error_fields(prefix, object, types));
        }
    }

    if is_list && (has_rule || has_item_rule) && !fields.is_empty() {
        fields.push(OutputField::new(
            "path",
            OutputType::list(OutputType::non_null(OutputType::named("Int"))),
        ));
    }

    if fields.is_empty() {
        return None;
    }
    let name = format!("{prefix}ErrorTree");
    types.push(TypeDefinition::Object {
        name: name.clone(),
        fields,
    });
    Some(name)
}

/// Escape a value for an SDL string literal.
fn escape_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(escaped, "\\u{:04X}", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
