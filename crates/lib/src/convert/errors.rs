//! Error types for value synchronization.

use thiserror::Error;

/// Structured error types for wiring a [`ValueSync`](super::ValueSync).
///
/// Coercion failures are never errors (see [`Coerced`](super::Coerced));
/// these variants only describe misuse of the synchronization core.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// A second bound control was attached while one is active
    #[error("More than one control accessor attached to the {converter} converter")]
    AccessorAlreadyAttached { converter: String },

    /// The synchronization core was used after teardown
    #[error("The {converter} converter has been destroyed")]
    Destroyed { converter: String },
}

impl ConvertError {
    /// Check if this error is a duplicate accessor registration
    pub fn is_duplicate_accessor(&self) -> bool {
        matches!(self, ConvertError::AccessorAlreadyAttached { .. })
    }

    /// Check if this error indicates use after teardown
    pub fn is_destroyed(&self) -> bool {
        matches!(self, ConvertError::Destroyed { .. })
    }
}

impl From<ConvertError> for crate::Error {
    fn from(err: ConvertError) -> Self {
        crate::Error::Convert(err)
    }
}
