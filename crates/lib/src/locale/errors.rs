//! Error types for locale and format configuration.

use thiserror::Error;

/// Structured error types for locale configuration.
///
/// Parse failures of user input are not errors; they surface as `None` from
/// the provider and as a rejected coercion in the converters. These variants
/// only cover invalid configuration.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// A culture name could not be resolved to a supported culture
    #[error("Unsupported culture: {name}")]
    UnsupportedCulture { name: String },

    /// A custom date pattern contains invalid format items
    #[error("Invalid date pattern '{pattern}'")]
    InvalidDatePattern { pattern: String },
}

impl LocaleError {
    /// Check if this error is an unknown culture
    pub fn is_unsupported_culture(&self) -> bool {
        matches!(self, LocaleError::UnsupportedCulture { .. })
    }

    /// Check if this error is an invalid format
    pub fn is_format_error(&self) -> bool {
        matches!(self, LocaleError::InvalidDatePattern { .. })
    }
}

impl From<LocaleError> for crate::Error {
    fn from(err: LocaleError) -> Self {
        crate::Error::Locale(err)
    }
}
