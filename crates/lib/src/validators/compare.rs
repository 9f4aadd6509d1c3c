//! Cross-field comparison validators.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::form::{ControlKey, ErrorDetail, FormNode, ValidationErrors, ValidatorFn};
use crate::messages::{FORM_FIELD_CONTEXT, MessageParam, ParameterizedMessage};
use crate::{Result, Value};

/// Compare a node's value with a sibling's.
///
/// Returns `Ok(None)` when either value is empty, the sibling does not
/// exist, or the two values differ in type. Numbers and dates compare by
/// magnitude, text case-insensitively with lower case first on ties.
/// Sibling references of the wrong kind are errors.
pub fn compare_values(node: &FormNode, other_key: &ControlKey) -> Result<Option<Ordering>> {
    let value = node.value();
    if value.is_empty() {
        return Ok(None);
    }
    let Some(other) = node.sibling(other_key)? else {
        return Ok(None);
    };
    let other = other.value();
    if other.is_empty() || !value.same_type(&other) {
        return Ok(None);
    }
    Ok(match (&value, &other) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(locale_compare(a, b)),
        _ => None,
    })
}

fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| {
        let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
        case(a).cmp(&case(b))
    })
}

fn compare_validator(name: &'static str, other_key: ControlKey, accept: fn(Ordering) -> bool) -> ValidatorFn {
    Rc::new(move |node| {
        let Some(ordering) = compare_values(node, &other_key)? else {
            return Ok(None);
        };
        if accept(ordering) {
            return Ok(None);
        }
        let key = match node.value() {
            Value::Date(_) => format!("{name}Date"),
            _ => name.to_string(),
        };
        let reference = ParameterizedMessage::new(other_key.to_string(), FORM_FIELD_CONTEXT);
        Ok(Some(ValidationErrors::single(
            key,
            ErrorDetail::params([("otherKey", MessageParam::Message(reference))]),
        )))
    })
}

/// Value must be greater than or equal to the sibling's.
pub fn gte(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("gte", other_key.into(), |o| o != Ordering::Less)
}

/// Value must be greater than the sibling's.
pub fn gt(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("gt", other_key.into(), |o| o == Ordering::Greater)
}

/// Value must be less than or equal to the sibling's.
pub fn lte(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("lte", other_key.into(), |o| o != Ordering::Greater)
}

/// Value must be less than the sibling's.
pub fn lt(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("lt", other_key.into(), |o| o == Ordering::Less)
}

/// Value must equal the sibling's.
pub fn eq(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("eq", other_key.into(), |o| o == Ordering::Equal)
}

/// Value must differ from the sibling's.
pub fn neq(other_key: impl Into<ControlKey>) -> ValidatorFn {
    compare_validator("neq", other_key.into(), |o| o != Ordering::Equal)
}
