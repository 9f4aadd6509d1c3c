//! Date converter.

use chrono::NaiveDateTime;

use super::{Coerced, ConvertContext, Converter, is_blank};
use crate::Value;
use crate::locale::DateFormat;

/// Coerces culture-formatted text into a date.
///
/// Dates compare by instant, so reformatting a date under another culture
/// never registers as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateConverter {
    format: DateFormat,
}

impl DateConverter {
    /// Converter using the culture's short date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with an explicit format.
    pub fn with_format(format: DateFormat) -> Self {
        Self { format }
    }

    /// The date format in use
    pub fn date_format(&self) -> &DateFormat {
        &self.format
    }
}

impl Converter for DateConverter {
    type Output = NaiveDateTime;

    fn name(&self) -> &'static str {
        "date"
    }

    fn coerce(&self, raw: Option<&str>, ctx: &ConvertContext<'_>) -> Coerced<NaiveDateTime> {
        let Some(text) = raw.filter(|_| !is_blank(raw)) else {
            return Coerced::Cleared;
        };
        match ctx.locale.parse_date(ctx.culture, text, &self.format) {
            Some(d) => Coerced::Value(d),
            None => Coerced::Rejected,
        }
    }

    fn format(&self, value: &NaiveDateTime, ctx: &ConvertContext<'_>) -> String {
        ctx.locale.format_date(ctx.culture, value, &self.format)
    }

    fn values_equal(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
        a.and_utc().timestamp_millis() == b.and_utc().timestamp_millis()
    }

    fn from_model(&self, value: &Value) -> Option<NaiveDateTime> {
        value.as_date().copied()
    }
}
