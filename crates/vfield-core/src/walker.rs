//! # Type-Tree Walker
//!
//! Walks a value along its declared [`TypeNode`], runs the rules attached
//! to each node, and aggregates failures into a [`ValidationOutcome`].
//!
//! Dispatch is an exhaustive `match` on the type tag, so a new type shape
//! cannot silently fall through to "no validation".
//!
//! ## Sub-error placement
//!
//! An object's failing children go under `suberrors[key]` when
//! [`create_sub_errors`] holds (the object has its own rule, is the root,
//! or is a list item). Otherwise they surface directly under `key`.

use serde_json::Value;

use crate::items;
use crate::outcome::ValidationOutcome;
use crate::types::{apply_rule, FieldSpec, ObjectType, Rule, TypeNode};

/// Where a node sits relative to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// The node is the argument object of a validated field.
    pub is_root: bool,
    /// The node is an element of a list.
    pub is_parent_list: bool,
}

impl Position {
    pub const ROOT: Position = Position {
        is_root: true,
        is_parent_list: false,
    };

    pub const CHILD: Position = Position {
        is_root: false,
        is_parent_list: false,
    };

    pub const LIST_ITEM: Position = Position {
        is_root: false,
        is_parent_list: true,
    };
}

/// Whether an object's child errors nest under `suberrors`.
pub fn create_sub_errors(has_own_rule: bool, position: Position) -> bool {
    has_own_rule || position.is_root || position.is_parent_list
}

#[derive(Clone, Copy, Default)]
struct Rules<'a> {
    validate: Option<&'a Rule>,
    validate_item: Option<&'a Rule>,
}

/// Validate `value` against `spec` at the given position.
pub fn validate(spec: &FieldSpec, value: &Value, position: Position) -> ValidationOutcome {
    let rules = Rules {
        validate: spec.rule(),
        validate_item: spec.item_rule(),
    };
    validate_node(spec.ty(), rules, value, position)
}

/// Validate `value` against a bare type, with no rules on the node itself.
///
/// Rules declared on object fields further down still run.
pub fn validate_type(ty: &TypeNode, value: &Value, position: Position) -> ValidationOutcome {
    validate_node(ty, Rules::default(), value, position)
}

fn validate_node(
    ty: &TypeNode,
    rules: Rules<'_>,
    value: &Value,
    position: Position,
) -> ValidationOutcome {
    match ty {
        TypeNode::NonNull(inner) => validate_node(inner, rules, value, position),
        TypeNode::List(element) => validate_list(element, rules, value),
        TypeNode::Object(object) => validate_object(object, rules.validate, value, position),
        TypeNode::Scalar(_) => rules
            .validate
            .and_then(|rule| apply_rule(rule, value))
            .map(ValidationOutcome::direct)
            .unwrap_or_default(),
    }
}

fn validate_list(element: &TypeNode, rules: Rules<'_>, value: &Value) -> ValidationOutcome {
    if let Some(payload) = rules.validate.and_then(|rule| apply_rule(rule, value)) {
        return ValidationOutcome::direct(payload);
    }
    if rules.validate.is_none() && rules.validate_item.is_none() {
        return ValidationOutcome::valid();
    }
    let Value::Array(values) = value else {
        return ValidationOutcome::valid();
    };

    match items::validate_items(values, element, rules.validate_item) {
        Ok(()) => ValidationOutcome::valid(),
        Err(failure) => failure.into_outcome(),
    }
}

fn validate_object(
    object: &ObjectType,
    own_rule: Option<&Rule>,
    value: &Value,
    position: Position,
) -> ValidationOutcome {
    if let Some(payload) = own_rule.and_then(|rule| apply_rule(rule, value)) {
        return ValidationOutcome::direct(payload);
    }

    let nested = create_sub_errors(own_rule.is_some(), position);
    let mut outcome = ValidationOutcome::valid();

    if let Value::Object(entries) = value {
        for (key, child_value) in entries {
            // Undeclared keys are the host's structural concern.
            let Some(spec) = object.field(key) else {
                continue;
            };
            let child = validate(spec, child_value, Position::CHILD);
            outcome.insert_child(key, child, nested);
        }
    }

    outcome
}
