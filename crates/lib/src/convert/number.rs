//! Number and integer converters.

use super::{Coerced, ConvertContext, Converter, is_blank};
use crate::Value;
use crate::locale::NumberFormat;

/// Coerces culture-formatted text into a finite `f64`.
///
/// With a fraction digit cap the display is rounded while the logical value
/// keeps full precision; the round-trip law then only holds for values
/// already within the cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConverter {
    format: NumberFormat,
}

impl NumberConverter {
    /// Converter with the culture's default number format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with an explicit format.
    pub fn with_format(format: NumberFormat) -> Self {
        Self { format }
    }

    /// Shorthand for a fraction digit cap on the default format.
    pub fn with_fraction_digits(digits: u32) -> Self {
        Self::with_format(NumberFormat::default().max_fraction_digits(digits))
    }

    /// The number format in use
    pub fn number_format(&self) -> &NumberFormat {
        &self.format
    }
}

impl Converter for NumberConverter {
    type Output = f64;

    fn name(&self) -> &'static str {
        "number"
    }

    fn coerce(&self, raw: Option<&str>, ctx: &ConvertContext<'_>) -> Coerced<f64> {
        let Some(text) = raw.filter(|_| !is_blank(raw)) else {
            return Coerced::Cleared;
        };
        match ctx.locale.parse_number(ctx.culture, text, &self.format) {
            Some(n) if n.is_finite() => Coerced::Value(n),
            _ => Coerced::Rejected,
        }
    }

    fn format(&self, value: &f64, ctx: &ConvertContext<'_>) -> String {
        ctx.locale.format_number(ctx.culture, *value, &self.format)
    }

    fn values_equal(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn from_model(&self, value: &Value) -> Option<f64> {
        value.as_number()
    }
}

/// Like [`NumberConverter`] but rejects values with a fractional part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegerConverter {
    inner: NumberConverter,
}

impl IntegerConverter {
    /// Integer converter with grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Integer converter with an explicit format.
    pub fn with_format(format: NumberFormat) -> Self {
        Self {
            inner: NumberConverter::with_format(format),
        }
    }
}

impl Converter for IntegerConverter {
    type Output = f64;

    fn name(&self) -> &'static str {
        "integer"
    }

    fn coerce(&self, raw: Option<&str>, ctx: &ConvertContext<'_>) -> Coerced<f64> {
        match self.inner.coerce(raw, ctx) {
            Coerced::Value(n) if n != n.round() => Coerced::Rejected,
            other => other,
        }
    }

    fn format(&self, value: &f64, ctx: &ConvertContext<'_>) -> String {
        self.inner.format(value, ctx)
    }

    fn values_equal(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn from_model(&self, value: &Value) -> Option<f64> {
        value.as_number().filter(|n| *n == n.round())
    }
}
