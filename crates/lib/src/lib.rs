//!
//! formkit: typed form trees with culture-aware value conversion.
//! This library provides the building blocks for declarative, validated and localized forms.
//!
//! ## Core Concepts
//!
//! formkit is built around several key concepts:
//!
//! * **Values (`value::Value`)**: The dynamic value model shared by every layer: null, booleans, numbers, text, dates, lists and groups.
//! * **Form trees (`form::FormNode`)**: Controls, groups and arrays with parent links, aggregated values, validation status and touched/dirty/pending/disabled flags.
//!     * **FormControl**, **FormGroup**, **FormArray**: Typed handles over the three node kinds.
//! * **Validators (`validators`)**: Named predicates over nodes, including cross-field comparisons against siblings.
//! * **Conversion (`convert::ValueSync`)**: Two-way synchronization between a typed logical value and the text shown by a bound control, with number, integer, date and to-null strategies.
//! * **Locales (`locale::LocaleProvider`)**: Culture-aware number and date parsing and formatting, plus a current-culture holder with change notification.
//! * **Generation (`generation::FormGenerator`)**: Serializable descriptors turned into form trees through priority-ordered validator and control factories.
//! * **Messages (`messages::MessageService`)**: Localized validation messages with parameter interpolation.

pub mod clock;
pub mod convert;
pub mod form;
pub mod generation;
pub mod locale;
pub mod messages;
pub mod validators;
pub mod value;

/// Re-export the `Value` enum for easier access.
pub use value::Value;

pub use clock::{Clock, SystemClock};

/// Deterministic clock for tests, available with the "testing" feature.
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;

/// Result type used throughout the formkit library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the formkit library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured value synchronization errors from the convert module
    #[error(transparent)]
    Convert(convert::ConvertError),

    /// Structured form tree errors from the form module
    #[error(transparent)]
    Form(form::FormError),

    /// Structured generation errors from the generation module
    #[error(transparent)]
    Generation(generation::GenerationError),

    /// Structured locale configuration errors from the locale module
    #[error(transparent)]
    Locale(locale::LocaleError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Convert(_) => "convert",
            Error::Form(_) => "form",
            Error::Generation(_) => "generation",
            Error::Locale(_) => "locale",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a missing child or value.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Form(form_err) => form_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (duplicate name or accessor).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Form(form_err) => form_err.is_conflict(),
            Error::Convert(convert_err) => convert_err.is_duplicate_accessor(),
            _ => false,
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Form(form_err) => form_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is form tree-related.
    pub fn is_form_error(&self) -> bool {
        matches!(self, Error::Form(_))
    }

    /// Check if this error comes from an invalid sibling reference.
    pub fn is_sibling_error(&self) -> bool {
        match self {
            Error::Form(form_err) => form_err.is_sibling_error(),
            _ => false,
        }
    }

    /// Check if this error is generation-related.
    pub fn is_generation_error(&self) -> bool {
        matches!(self, Error::Generation(_))
    }

    /// Check if no factory could handle a descriptor.
    pub fn is_unresolved(&self) -> bool {
        match self {
            Error::Generation(generation_err) => generation_err.is_unresolved(),
            _ => false,
        }
    }

    /// Check if a validator descriptor carried unusable parameters.
    pub fn is_invalid_parameters(&self) -> bool {
        match self {
            Error::Generation(generation_err) => generation_err.is_invalid_parameters(),
            _ => false,
        }
    }

    /// Check if this error is value synchronization-related.
    pub fn is_convert_error(&self) -> bool {
        matches!(self, Error::Convert(_))
    }

    /// Check if this error is locale-related.
    pub fn is_locale_error(&self) -> bool {
        matches!(self, Error::Locale(_))
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }

    /// Check if this error indicates a misconfiguration that aborts form
    /// construction.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::Generation(_) | Error::Locale(_) => true,
            Error::Form(form_err) => form_err.is_sibling_error(),
            _ => false,
        }
    }
}
