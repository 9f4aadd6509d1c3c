//! Empty-to-null converter.

use super::{Coerced, ConvertContext, Converter, is_blank};
use crate::Value;

/// Passes text through unchanged but turns blank input into null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToNullConverter;

impl Converter for ToNullConverter {
    type Output = Value;

    fn name(&self) -> &'static str {
        "to-null"
    }

    fn coerce(&self, raw: Option<&str>, _ctx: &ConvertContext<'_>) -> Coerced<Value> {
        match raw {
            Some(text) if !is_blank(raw) => Coerced::Value(Value::Text(text.to_string())),
            _ => Coerced::Cleared,
        }
    }

    fn format(&self, value: &Value, ctx: &ConvertContext<'_>) -> String {
        match value {
            Value::Text(s) => s.clone(),
            other => ctx.locale.stringify(ctx.culture, other),
        }
    }

    fn values_equal(&self, a: &Value, b: &Value) -> bool {
        a == b
    }

    fn from_model(&self, value: &Value) -> Option<Value> {
        Some(value.clone())
    }
}
