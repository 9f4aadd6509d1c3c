//! Error types for form tree operations.

use thiserror::Error;

/// Structured errors raised by misuse of a form tree.
///
/// These describe wiring bugs (a sibling reference of the wrong kind, a
/// value whose shape does not match the tree). Failed validation is never an
/// error; it is reported through [`ValidationErrors`](super::ValidationErrors).
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Sibling lookup on a node that is not attached to a parent
    #[error("Cannot look up sibling '{key}' of a node without a parent")]
    NoParent { key: String },

    /// Sibling key of the wrong kind for the parent
    #[error("Invalid sibling key '{key}': a {parent} parent expects {expected}")]
    InvalidKeyKind {
        key: String,
        parent: String,
        expected: String,
    },

    /// Array index outside the array
    #[error("Index {index} is out of range for an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation not available on this kind of node
    #[error("Operation '{operation}' is not supported on a {kind} node")]
    WrongNodeKind { operation: String, kind: String },

    /// `set_value` on a group without a value for one of its children
    #[error("Must supply a value for form control '{key}'")]
    MissingValue { key: String },

    /// A value was supplied for a child that does not exist
    #[error("Cannot find form control '{key}'")]
    NoControl { key: String },

    /// Two children of a group share a name
    #[error("Duplicate form control name '{key}'")]
    DuplicateKey { key: String },

    /// The value does not have the shape the node expects
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The array has no item factory, so it cannot grow on its own
    #[error("Array has no item factory and cannot grow to {len} items")]
    NoItemFactory { len: usize },
}

impl FormError {
    /// Check if this error comes from an invalid sibling reference
    pub fn is_sibling_error(&self) -> bool {
        matches!(
            self,
            FormError::NoParent { .. }
                | FormError::InvalidKeyKind { .. }
                | FormError::IndexOutOfRange { .. }
        )
    }

    /// Check if this error indicates a missing child or value
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FormError::MissingValue { .. } | FormError::NoControl { .. }
        )
    }

    /// Check if this error indicates a name clash
    pub fn is_conflict(&self) -> bool {
        matches!(self, FormError::DuplicateKey { .. })
    }

    /// Check if this error is related to value shapes or node kinds
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            FormError::TypeMismatch { .. } | FormError::WrongNodeKind { .. }
        )
    }
}

impl From<FormError> for crate::Error {
    fn from(err: FormError) -> Self {
        crate::Error::Form(err)
    }
}
