//! # Validation Outcome
//!
//! The path-addressed error tree produced by one validation call. An empty
//! outcome means the value is valid.
//!
//! ## Shape
//!
//! ```text
//! {
//!   "error":     <direct error payload>,        // own rule failed
//!   "suberrors": { "<field>": <outcome>, ... },  // children, nested
//!   "path":      [i, j, ...],                    // first failing list item
//!   "<field>":   <outcome>                       // children, flattened
//! }
//! ```
//!
//! Whether a child lands under `suberrors` or directly under its own key
//! is decided by [`create_sub_errors`](crate::walker::create_sub_errors).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys the outcome writes itself. Child fields and envelope keys may not
/// use them, since children of pass-through objects share the same map.
pub const RESERVED_KEYS: [&str; 3] = ["error", "suberrors", "path"];

pub(crate) fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// Structured result of validating one value. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    suberrors: BTreeMap<String, ValidationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<usize>>,
    #[serde(flatten)]
    fields: BTreeMap<String, ValidationOutcome>,
}

impl ValidationOutcome {
    /// An empty (valid) outcome.
    pub fn valid() -> Self {
        Self::default()
    }

    /// An outcome holding only a direct error.
    pub fn direct(payload: Value) -> Self {
        Self {
            error: Some(payload),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none()
            && self.suberrors.is_empty()
            && self.path.is_none()
            && self.fields.is_empty()
    }

    /// The direct error payload, if this node's own rule failed.
    pub fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    /// Child outcomes nested under `suberrors`.
    pub fn suberrors(&self) -> &BTreeMap<String, ValidationOutcome> {
        &self.suberrors
    }

    pub fn suberror(&self, key: &str) -> Option<&ValidationOutcome> {
        self.suberrors.get(key)
    }

    /// Positional path of the first failing list item.
    pub fn path(&self) -> Option<&[usize]> {
        self.path.as_deref()
    }

    /// Child outcomes surfaced directly under their own key.
    pub fn fields(&self) -> &BTreeMap<String, ValidationOutcome> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&ValidationOutcome> {
        self.fields.get(key)
    }

    /// Record a child outcome. Empty outcomes contribute no key.
    pub(crate) fn insert_child(&mut self, key: &str, child: ValidationOutcome, nested: bool) {
        if child.is_empty() {
            return;
        }
        let bucket = if nested {
            &mut self.suberrors
        } else {
            &mut self.fields
        };
        bucket.insert(key.to_string(), child);
    }

    pub(crate) fn with_path(mut self, path: Vec<usize>) -> Self {
        self.path = Some(path);
        self
    }

    /// Render as a JSON object (empty object when valid).
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Render as a JSON map, ready to merge into an envelope.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // Serializing string-keyed maps of JSON values cannot fail.
            _ => Map::new(),
        }
    }
}
