//! Localized messages.
//!
//! A [`TranslationService`] maps `(culture, context, key)` to a message
//! format; [`MessageService`] interpolates parameters into those formats
//! and renders the validation errors of a form tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Value;

mod service;
mod translation;

pub use service::MessageService;
pub use translation::{DefaultTranslationService, TranslationService, sentence_case};

/// Context of validation error messages.
pub const FORM_VALIDATION_CONTEXT: &str = "validation";

/// Context of field labels.
pub const FORM_FIELD_CONTEXT: &str = "form";

/// The default context.
pub const NO_CONTEXT: &str = "";

/// Built-in English validation messages, registered in
/// [`FORM_VALIDATION_CONTEXT`].
pub const DEFAULT_VALIDATION_MESSAGES: &[(&str, &str)] = &[
    ("min", "Value of {key} must be greater than or equal to {min}."),
    ("max", "Value of {key} must be less than or equal to {max}."),
    ("required", "{key} is required."),
    ("requiredTrue", "{key} must be checked."),
    ("email", "{key} must be valid email address."),
    (
        "minLength",
        "The length of {key} must be greater than or equal to {minLength}.",
    ),
    (
        "maxLength",
        "The length of {key} must be less than or equal to {maxLength}.",
    ),
    ("pattern", "The value of {key} is invalid."),
];

/// A message reference with parameters, resolved at display time.
///
/// ```
/// use formkit::messages::{ParameterizedMessage, FORM_FIELD_CONTEXT};
///
/// let label = ParameterizedMessage::new("firstName", FORM_FIELD_CONTEXT);
/// let json = serde_json::to_value(&label)?;
/// assert_eq!(json, serde_json::json!({"messageKey": "firstName", "context": "form"}));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterizedMessage {
    /// Message key
    pub message_key: String,
    /// Context namespace; empty for none
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Interpolation parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, MessageParam>,
}

impl ParameterizedMessage {
    /// A message without parameters.
    pub fn new(message_key: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            message_key: message_key.into(),
            context: context.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, param: impl Into<MessageParam>) -> Self {
        self.parameters.insert(name.into(), param.into());
        self
    }
}

/// A message parameter: a plain value or a nested message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageParam {
    /// Resolved and translated before interpolation
    Message(ParameterizedMessage),
    /// Formatted for the target culture
    Value(Value),
}

impl From<Value> for MessageParam {
    fn from(value: Value) -> Self {
        MessageParam::Value(value)
    }
}

impl From<ParameterizedMessage> for MessageParam {
    fn from(message: ParameterizedMessage) -> Self {
        MessageParam::Message(message)
    }
}

impl From<f64> for MessageParam {
    fn from(n: f64) -> Self {
        MessageParam::Value(Value::Number(n))
    }
}

impl From<&str> for MessageParam {
    fn from(s: &str) -> Self {
        MessageParam::Value(Value::from(s))
    }
}

/// Messages of one culture and context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCollection {
    /// Culture name
    pub lang: String,
    /// Context namespace; empty for none
    #[serde(default)]
    pub context: String,
    /// Message formats by key
    pub messages: BTreeMap<String, String>,
}

impl MessageCollection {
    /// A collection from key/format pairs.
    pub fn new<K, M>(
        lang: impl Into<String>,
        context: impl Into<String>,
        messages: impl IntoIterator<Item = (K, M)>,
    ) -> Self
    where
        K: Into<String>,
        M: Into<String>,
    {
        Self {
            lang: lang.into(),
            context: context.into(),
            messages: messages
                .into_iter()
                .map(|(k, m)| (k.into(), m.into()))
                .collect(),
        }
    }

    /// The built-in validation messages for `lang`.
    pub fn default_validation(lang: impl Into<String>) -> Self {
        Self::new(
            lang,
            FORM_VALIDATION_CONTEXT,
            DEFAULT_VALIDATION_MESSAGES.iter().copied(),
        )
    }
}
