//! Rewrite rule records.
//!
//! Rules arrive from the configuration layer as serde-deserializable records.
//! The modern shape addresses a node anywhere in the document through a path
//! (`candidates.[*].content.parts.[*].thoughtSignature`); the legacy shape
//! only ever addressed a top-level key and converts into a single-segment
//! path.
//!
//! Payloads come in two forms: `valueBytes` is pre-validated JSON emitted
//! verbatim (zero-copy fast path), `value` is an abstract value serialised
//! on demand. When both are present, `valueBytes` wins.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The operation a rule performs at its target path.
///
/// - `Remove` deletes an existing field or element (absent target: no-op).
/// - `Set` replaces the value of an existing field or element (absent
///   target: no-op).
/// - `Add` injects a field into the target object when the key is absent
///   (present key: no-op, the original value is preserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Delete the matched field or element.
    Remove,
    /// Replace the matched value.
    Set,
    /// Inject a field into the target object.
    Add,
}

/// A path-addressed rewrite rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    /// Dot-separated target path. Rules with an empty path are dropped at
    /// engine construction.
    pub path: String,
    /// Operation to perform at the target.
    pub action: Action,
    /// Abstract payload, serialised on demand. Ignored when `value_bytes`
    /// is present. A `set`/`add` without any payload encodes as JSON `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Pre-validated JSON payload bytes, emitted verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_bytes: Option<Bytes>,
}

impl PathRule {
    /// A `remove` rule for `path`.
    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            action: Action::Remove,
            value: None,
            value_bytes: None,
        }
    }

    /// A `set` rule replacing the value at `path` with `value`.
    #[must_use]
    pub fn set(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            action: Action::Set,
            value: Some(value),
            value_bytes: None,
        }
    }

    /// A `set` rule with a pre-validated JSON payload. The bytes are
    /// emitted verbatim; the caller guarantees they are valid JSON.
    #[must_use]
    pub fn set_raw(path: impl Into<String>, value_bytes: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            action: Action::Set,
            value: None,
            value_bytes: Some(value_bytes.into()),
        }
    }

    /// An `add` rule injecting `value` at `path` when the key is absent.
    #[must_use]
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            action: Action::Add,
            value: Some(value),
            value_bytes: None,
        }
    }

    /// An `add` rule with a pre-validated JSON payload.
    #[must_use]
    pub fn add_raw(path: impl Into<String>, value_bytes: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            action: Action::Add,
            value: None,
            value_bytes: Some(value_bytes.into()),
        }
    }
}

impl From<Rule> for PathRule {
    fn from(rule: Rule) -> Self {
        Self {
            path: rule.key,
            action: rule.action,
            value: rule.value,
            value_bytes: None,
        }
    }
}

/// Legacy rule shape: a single top-level key instead of a path.
///
/// Accepted for compatibility with older configuration records and treated
/// as a path with one literal segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Target top-level key.
    pub key: String,
    /// Operation to perform.
    pub action: Action,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Rule {
    /// Whether the rule can be admitted: the key must be non-empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty()
    }
}
