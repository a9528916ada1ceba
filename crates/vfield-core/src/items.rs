//! # List-Item Path Tracker
//!
//! Walks a (possibly nested) list item by item and stops at the first
//! failure, reporting its positional path. Lists of lists of any depth get
//! one path segment per level.
//!
//! Each item is checked twice: by the field's item rule, then (if that
//! passes) by re-validating the item against the innermost element type.
//! The second pass catches object items whose *children* are invalid.

use serde_json::Value;

use crate::outcome::ValidationOutcome;
use crate::types::{apply_rule, Rule, TypeNode};
use crate::walker::{self, Position};

/// The first failing item of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Index of the failing item at each nesting level.
    pub path: Vec<usize>,
    pub reason: ItemFailureReason,
}

/// Why an item failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemFailureReason {
    /// The item rule returned this payload.
    Rule(Value),
    /// The item passed its rule but its own structure is invalid.
    Nested(ValidationOutcome),
}

impl ItemFailure {
    /// Convert to outcome data at the list boundary.
    ///
    /// A rule failure becomes `{error, path}`. A nested failure keeps its
    /// `suberrors` as-is and gets `path` attached next to them, without an
    /// `error` wrapper. Clients rely on both shapes.
    pub fn into_outcome(self) -> ValidationOutcome {
        match self.reason {
            ItemFailureReason::Rule(payload) => {
                ValidationOutcome::direct(payload).with_path(self.path)
            }
            ItemFailureReason::Nested(outcome) => outcome.with_path(self.path),
        }
    }
}

/// Validate the items of a list whose element type is `element`.
///
/// Returns the first failing item; items after it are never evaluated.
pub fn validate_items(
    values: &[Value],
    element: &TypeNode,
    item_rule: Option<&Rule>,
) -> Result<(), ItemFailure> {
    let mut path = vec![0];
    walk(values, &mut path, element.unwrap_all(), item_rule)
}

fn walk(
    values: &[Value],
    path: &mut Vec<usize>,
    named: &TypeNode,
    item_rule: Option<&Rule>,
) -> Result<(), ItemFailure> {
    for (idx, item) in values.iter().enumerate() {
        if let Some(last) = path.last_mut() {
            *last = idx;
        }

        if let Value::Array(inner) = item {
            path.push(0);
            walk(inner, path, named, item_rule)?;
            path.pop();
            continue;
        }

        let reason = match item_rule.and_then(|rule| apply_rule(rule, item)) {
            Some(payload) => Some(ItemFailureReason::Rule(payload)),
            None => {
                let nested = walker::validate_type(named, item, Position::LIST_ITEM);
                (!nested.is_empty()).then_some(ItemFailureReason::Nested(nested))
            }
        };

        if let Some(reason) = reason {
            tracing::trace!(path = ?path, "list item failed validation");
            return Err(ItemFailure {
                path: path.clone(),
                reason,
            });
        }
    }
    Ok(())
}
