//! Error types for form generation.

use thiserror::Error;

/// Structured errors raised while turning descriptors into a form tree.
///
/// All of these indicate misconfiguration: a descriptor nothing can build,
/// or parameters of the wrong shape. They abort generation.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No registered validator factory accepted the descriptor
    #[error("{subsystem}: cannot find a validator factory that can create validator with info: {descriptor}")]
    UnresolvedValidator {
        subsystem: String,
        descriptor: String,
    },

    /// No registered validator factory accepted the async descriptor
    #[error("{subsystem}: cannot find a validator factory that can create async validator with info: {descriptor}")]
    UnresolvedAsyncValidator {
        subsystem: String,
        descriptor: String,
    },

    /// No registered control factory accepted the descriptor
    #[error("Cannot find a control factory that can create form control with info: {descriptor}")]
    UnresolvedControl { descriptor: String },

    /// A validator descriptor carries parameters of the wrong shape
    #[error("Invalid parameters for validator '{validator}': {reason}")]
    InvalidParameters { validator: String, reason: String },
}

impl GenerationError {
    /// Check if no factory could handle a descriptor
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            GenerationError::UnresolvedValidator { .. }
                | GenerationError::UnresolvedAsyncValidator { .. }
                | GenerationError::UnresolvedControl { .. }
        )
    }

    /// Check if this error is about validator parameters
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, GenerationError::InvalidParameters { .. })
    }

    /// The subsystem that requested the resolution, if recorded
    pub fn subsystem(&self) -> Option<&str> {
        match self {
            GenerationError::UnresolvedValidator { subsystem, .. }
            | GenerationError::UnresolvedAsyncValidator { subsystem, .. } => Some(subsystem),
            _ => None,
        }
    }
}

impl From<GenerationError> for crate::Error {
    fn from(err: GenerationError) -> Self {
        crate::Error::Generation(err)
    }
}
