//! Rendering localized messages and validation errors.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{
    FORM_FIELD_CONTEXT, FORM_VALIDATION_CONTEXT, MessageParam, ParameterizedMessage,
    TranslationService,
};
use crate::Value;
use crate::form::{ErrorDetail, FormNode, action_recursive, control_key};
use crate::locale::{CurrentCulture, DateFormat, LocaleProvider, NumberFormat};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)(?::([^}]+))?\}").expect("valid regex")
});

/// Label used for nodes without a key (a detached control or a root).
const ANONYMOUS_FIELD: &str = "field";

/// Turns [`ParameterizedMessage`]s and node errors into display strings.
///
/// Placeholders are `{name}` or `{name:format}`. Numbers accept `n` with an
/// optional digit cap (`{min:n2}`) and `p` for percent; dates accept `d`
/// (short), `D` (date and time), `i` (ISO) or a chrono pattern. Missing
/// parameters render as empty text.
///
/// ```
/// use std::rc::Rc;
/// use formkit::locale::{CurrentCulture, Globalization};
/// use formkit::messages::{
///     DefaultTranslationService, MessageService, ParameterizedMessage, FORM_VALIDATION_CONTEXT,
/// };
///
/// let service = MessageService::new(
///     Rc::new(DefaultTranslationService::with_default_messages(&["en", "de"], [])),
///     Rc::new(Globalization::default()),
///     CurrentCulture::new("de"),
/// );
/// let message = ParameterizedMessage::new("min", FORM_VALIDATION_CONTEXT)
///     .with_param("key", "Amount")
///     .with_param("min", 1.5);
/// assert_eq!(
///     service.get_message(&message),
///     "Value of Amount must be greater than or equal to 1,5."
/// );
/// ```
#[derive(Clone)]
pub struct MessageService {
    translation: Rc<dyn TranslationService>,
    locale: Rc<dyn LocaleProvider>,
    culture: Rc<CurrentCulture>,
}

impl MessageService {
    /// Render messages from `translation`, formatting parameters with
    /// `locale` in the culture held by `culture`.
    pub fn new(
        translation: Rc<dyn TranslationService>,
        locale: Rc<dyn LocaleProvider>,
        culture: Rc<CurrentCulture>,
    ) -> Self {
        Self {
            translation,
            locale,
            culture,
        }
    }

    /// The culture messages are rendered in by default.
    pub fn culture(&self) -> &Rc<CurrentCulture> {
        &self.culture
    }

    /// Render a message in the current culture.
    pub fn get_message(&self, message: &ParameterizedMessage) -> String {
        self.get_message_with_language(&self.culture.get(), message)
    }

    /// Render a message in `lang`. Nested message parameters are rendered
    /// first, in the same language.
    pub fn get_message_with_language(&self, lang: &str, message: &ParameterizedMessage) -> String {
        let format = self
            .translation
            .message_string(Some(lang), &message.message_key, &message.context);
        if message.parameters.is_empty() {
            return format;
        }
        let params: BTreeMap<String, Value> = message
            .parameters
            .iter()
            .map(|(name, param)| (name.clone(), self.resolve_param(lang, param)))
            .collect();
        self.format_message(&format, lang, &params)
    }

    /// Substitute placeholders in `format` with culture-formatted values.
    pub fn format_message(&self, format: &str, lang: &str, params: &BTreeMap<String, Value>) -> String {
        PLACEHOLDER
            .replace_all(format, |caps: &Captures<'_>| {
                let value = params.get(&caps[1]).unwrap_or(&Value::Null);
                self.format_param(lang, value, caps.get(2).map(|m| m.as_str()))
            })
            .into_owned()
    }

    /// Messages for the errors currently set on `node`.
    ///
    /// The field label is the node's key (prefixed with `prefix.` when given)
    /// looked up in [`FORM_FIELD_CONTEXT`]; the message itself comes from
    /// [`FORM_VALIDATION_CONTEXT`] under the error key. Text errors are
    /// returned verbatim.
    pub fn control_errors(&self, node: &FormNode, prefix: Option<&str>) -> Vec<String> {
        let Some(errors) = node.errors() else {
            return Vec::new();
        };
        let label = match (control_key(node), prefix) {
            (None, _) => ANONYMOUS_FIELD.to_string(),
            (Some(key), Some(prefix)) if !prefix.is_empty() => format!("{prefix}.{key}"),
            (Some(key), _) => key.to_string(),
        };
        let label = MessageParam::Message(ParameterizedMessage::new(label, FORM_FIELD_CONTEXT));

        errors
            .iter()
            .map(|(key, detail)| {
                let mut message = ParameterizedMessage::new(key, FORM_VALIDATION_CONTEXT)
                    .with_param("key", label.clone());
                match detail {
                    ErrorDetail::Text(text) => return text.clone(),
                    ErrorDetail::Params(params) => message.parameters.extend(params.clone()),
                    ErrorDetail::Flag => {}
                }
                self.get_message(&message)
            })
            .collect()
    }

    /// Messages for every touched node in the subtree rooted at `node`.
    pub fn all_control_errors(&self, node: &FormNode, prefix: Option<&str>) -> Vec<String> {
        let mut out = Vec::new();
        action_recursive(node, &mut |n| {
            if n.is_touched() {
                out.extend(self.control_errors(n, prefix));
            }
            true
        });
        out
    }

    fn resolve_param(&self, lang: &str, param: &MessageParam) -> Value {
        match param {
            MessageParam::Message(nested) => Value::Text(self.get_message_with_language(lang, nested)),
            MessageParam::Value(value) => value.clone(),
        }
    }

    fn format_param(&self, lang: &str, value: &Value, spec: Option<&str>) -> String {
        match (value, spec) {
            (Value::Number(n), Some(spec)) => {
                self.locale.format_number(lang, *n, &number_format(spec))
            }
            (Value::Date(d), Some(spec)) => self.locale.format_date(lang, d, &date_format(spec)),
            _ => self.locale.stringify(lang, value),
        }
    }
}

fn number_format(spec: &str) -> NumberFormat {
    let split = spec.char_indices().nth(1).map_or(spec.len(), |(i, _)| i);
    let (style, digits) = spec.split_at(split);
    let format = match style {
        "p" | "P" => NumberFormat::percent(),
        _ => NumberFormat::default(),
    };
    match digits.parse::<u32>() {
        Ok(digits) => format.max_fraction_digits(digits),
        Err(_) => format,
    }
}

fn date_format(spec: &str) -> DateFormat {
    match spec {
        "d" => DateFormat::Short,
        "D" => DateFormat::DateTime,
        "i" => DateFormat::Iso,
        pattern => DateFormat::pattern(pattern).unwrap_or_else(|err| {
            tracing::warn!(pattern, error = %err, "Invalid date placeholder format");
            DateFormat::Short
        }),
    }
}

impl fmt::Debug for MessageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageService")
            .field("culture", &self.culture.get())
            .finish_non_exhaustive()
    }
}
