//! Validation results and validator signatures.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use super::FormNode;
use crate::messages::MessageParam;

/// Validation status of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlStatus {
    /// All validators pass
    #[default]
    Valid,
    /// The node or a descendant has errors
    Invalid,
    /// Async validation is outstanding
    Pending,
    /// Excluded from validation and from the parent's value
    Disabled,
}

impl ControlStatus {
    /// Upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlStatus::Valid => "VALID",
            ControlStatus::Invalid => "INVALID",
            ControlStatus::Pending => "PENDING",
            ControlStatus::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a single validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// The error carries no data
    Flag,
    /// A literal message
    Text(String),
    /// Named parameters for message interpolation
    Params(BTreeMap<String, MessageParam>),
}

impl ErrorDetail {
    /// Build a parameter payload.
    pub fn params<K, P>(params: impl IntoIterator<Item = (K, P)>) -> Self
    where
        K: Into<String>,
        P: Into<MessageParam>,
    {
        ErrorDetail::Params(
            params
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        )
    }

    /// Look up a named parameter.
    pub fn param(&self, name: &str) -> Option<&MessageParam> {
        match self {
            ErrorDetail::Params(params) => params.get(name),
            _ => None,
        }
    }
}

impl Serialize for ErrorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorDetail::Flag => serializer.serialize_bool(true),
            ErrorDetail::Text(text) => serializer.serialize_str(text),
            ErrorDetail::Params(params) => params.serialize(serializer),
        }
    }
}

/// Errors reported by validators, keyed by validator name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, ErrorDetail>);

impl ValidationErrors {
    /// An empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single flag error, e.g. `{required: true}`.
    pub fn flag(key: impl Into<String>) -> Self {
        Self::single(key, ErrorDetail::Flag)
    }

    /// A single error with a payload.
    pub fn single(key: impl Into<String>, detail: ErrorDetail) -> Self {
        let mut errors = Self::new();
        errors.insert(key, detail);
        errors
    }

    /// Add or replace an error.
    pub fn insert(&mut self, key: impl Into<String>, detail: ErrorDetail) {
        self.0.insert(key.into(), detail);
    }

    /// Get an error by key.
    pub fn get(&self, key: &str) -> Option<&ErrorDetail> {
        self.0.get(key)
    }

    /// Whether an error is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Error keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over errors in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorDetail)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another map in; later entries win on key clashes.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// `None` when empty.
    pub fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl<K: Into<String>> FromIterator<(K, ErrorDetail)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, ErrorDetail)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A synchronous validator.
///
/// Returns `Ok(None)` when the node is valid. `Err` is reserved for wiring
/// bugs such as a sibling reference of the wrong kind.
pub type ValidatorFn = Rc<dyn Fn(&FormNode) -> crate::Result<Option<ValidationErrors>>>;

/// Wrap a closure as a [`ValidatorFn`].
pub fn validator_fn(
    f: impl Fn(&FormNode) -> crate::Result<Option<ValidationErrors>> + 'static,
) -> ValidatorFn {
    Rc::new(f)
}

/// An asynchronous validator, run by [`FormNode::validate_async`].
#[async_trait(?Send)]
pub trait AsyncValidator {
    /// Validate the node; `Ok(None)` when valid.
    async fn validate(&self, node: &FormNode) -> crate::Result<Option<ValidationErrors>>;
}

/// Shared handle to an async validator.
pub type AsyncValidatorFn = Rc<dyn AsyncValidator>;
