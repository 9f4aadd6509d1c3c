//! Built-in validators.
//!
//! Predicates with no parameters are plain functions usable directly as a
//! [`ValidatorFn`](crate::form::ValidatorFn) (`Rc::new(validators::email)`);
//! parameterized validators are constructors returning one.
//!
//! Apart from `required` and `requiredTrue`, validators accept empty input
//! (null, empty or whitespace-only text) so that optional fields are valid
//! until filled in.

use std::rc::Rc;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDateTime;
use regex::Regex;

use crate::clock::{Clock, SystemClock};
use crate::form::{ErrorDetail, FormNode, ValidationErrors, ValidatorFn};
use crate::{Result, Value};

mod compare;

pub use compare::{compare_values, eq, gt, gte, lt, lte, neq};

const LETTER: &str = r"(?:\p{M}|\p{Ll}|\p{Lu}|\p{Lt}|\p{Lo}|\p{Lm})";

static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{LETTER}+(?:-|'| |{LETTER})*$")).expect("valid person name regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?-u:\w)+([-+.'](?-u:\w)+)*@(?-u:\w)+([-.](?-u:\w)+)*\.(?-u:\w)+([-.](?-u:\w)+)*$")
        .expect("valid email regex")
});

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[a-fA-F0-9]{3}|[a-fA-F0-9]{6}|[a-fA-F0-9]{8})$").expect("valid color regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\(?\+?[0-9]*\)?)?[0-9_\-/\\ ()]*$").expect("valid phone regex")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    let uc = r"\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";
    let unreserved = format!(r"[a-z0-9\-._~{uc}]");
    let pct = r"%[0-9a-f]{2}";
    let sub = r"[!$&'()*+,;=]";
    let octet = r"(?:[0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])";
    let alnum = format!(r"[a-z0-9{uc}]");
    let alpha = format!(r"[a-z{uc}]");
    let label = format!(r"(?:{alnum}|{alnum}{unreserved}*{alnum})");
    let tld = format!(r"(?:{alpha}|{alpha}{unreserved}*{alpha})");
    let pchar = format!(r"(?:{unreserved}|{pct}|{sub}|:|@)");
    let pattern = format!(
        concat!(
            r"(?i)^(?:https?|ftp)://",
            r"(?:(?:{unreserved}|{pct}|{sub}|:)*@)?",
            r"(?:{octet}\.{octet}\.{octet}\.{octet}|(?:{label}\.)*{tld}\.?)",
            r"(?::[0-9]*)?",
            r"(?:/(?:{pchar}+(?:/{pchar}*)*)?)?",
            r"(?:\?(?:{pchar}|[\x{{E000}}-\x{{F8FF}}]|/|\?)*)?",
            r"(?:[#](?:{pchar}|/|\?)*)?$",
        ),
        unreserved = unreserved,
        pct = pct,
        sub = sub,
        octet = octet,
        label = label,
        tld = tld,
        pchar = pchar,
    );
    Regex::new(&pattern).expect("valid url regex")
});

/// Null, empty or whitespace-only text.
fn is_empty_value(value: &Value) -> bool {
    value.is_empty()
}

/// Null, empty text or an empty list.
fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    }
}

/// Number held by the value, parsing text the way a browser would.
fn numeric_input(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| !n.is_nan())
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::Text(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

fn matches_text(regex: &Regex, value: &Value) -> bool {
    match value {
        Value::Text(s) => regex.is_match(s),
        other => regex.is_match(&other.to_string()),
    }
}

fn regex_validator(node: &FormNode, regex: &Regex, key: &str) -> Result<Option<ValidationErrors>> {
    let value = node.value();
    if is_empty_value(&value) || matches_text(regex, &value) {
        return Ok(None);
    }
    Ok(Some(ValidationErrors::flag(key)))
}

/// Fails on null, empty text and empty lists.
pub fn required(node: &FormNode) -> Result<Option<ValidationErrors>> {
    Ok(is_empty_input(&node.value()).then(|| ValidationErrors::flag("required")))
}

/// Fails unless the value is `true`.
pub fn required_true(node: &FormNode) -> Result<Option<ValidationErrors>> {
    Ok((node.value() != Value::Bool(true)).then(|| ValidationErrors::flag("requiredTrue")))
}

/// Fails on numbers below `min`. Text is parsed as a number.
pub fn min(min: f64) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        if is_empty_input(&value) || min.is_nan() {
            return Ok(None);
        }
        Ok(numeric_input(&value).filter(|n| *n < min).map(|_| {
            ValidationErrors::single(
                "min",
                ErrorDetail::params([("min", Value::Number(min)), ("actual", value.clone())]),
            )
        }))
    })
}

/// Fails on numbers above `max`. Text is parsed as a number.
pub fn max(max: f64) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        if is_empty_input(&value) || max.is_nan() {
            return Ok(None);
        }
        Ok(numeric_input(&value).filter(|n| *n > max).map(|_| {
            ValidationErrors::single(
                "max",
                ErrorDetail::params([("max", Value::Number(max)), ("actual", value.clone())]),
            )
        }))
    })
}

/// Fails on text or lists shorter than `min_length`.
pub fn min_length(min_length: usize) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        if is_empty_input(&value) {
            return Ok(None);
        }
        Ok(length_of(&value).filter(|len| *len < min_length).map(|len| {
            ValidationErrors::single(
                "minLength",
                ErrorDetail::params([
                    ("minLength", Value::from(min_length as f64)),
                    ("actualLength", Value::from(len as f64)),
                ]),
            )
        }))
    })
}

/// Fails on text or lists longer than `max_length`.
pub fn max_length(max_length: usize) -> ValidatorFn {
    Rc::new(move |node| {
        Ok(length_of(&node.value())
            .filter(|len| *len > max_length)
            .map(|len| {
                ValidationErrors::single(
                    "maxLength",
                    ErrorDetail::params([
                        ("maxLength", Value::from(max_length as f64)),
                        ("actualLength", Value::from(len as f64)),
                    ]),
                )
            }))
    })
}

/// Fails unless the whole text matches `pattern`.
///
/// The pattern is anchored at both ends unless it already is.
pub fn pattern(pattern: &str) -> std::result::Result<ValidatorFn, regex::Error> {
    let mut anchored = String::with_capacity(pattern.len() + 2);
    if !pattern.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(pattern);
    if !pattern.ends_with('$') {
        anchored.push('$');
    }
    let regex = Regex::new(&anchored)?;
    Ok(Rc::new(move |node| {
        let value = node.value();
        if is_empty_input(&value) || matches_text(&regex, &value) {
            return Ok(None);
        }
        Ok(Some(ValidationErrors::single(
            "pattern",
            ErrorDetail::params([
                ("requiredPattern", Value::from(anchored.as_str())),
                ("actualValue", value.clone()),
            ]),
        )))
    }))
}

/// Letters, combining marks, hyphens, apostrophes and spaces, starting
/// with a letter.
pub fn person_name(node: &FormNode) -> Result<Option<ValidationErrors>> {
    regex_validator(node, &PERSON_NAME, "personName")
}

/// A plain e-mail address.
pub fn email(node: &FormNode) -> Result<Option<ValidationErrors>> {
    regex_validator(node, &EMAIL, "email")
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn color(node: &FormNode) -> Result<Option<ValidationErrors>> {
    regex_validator(node, &COLOR, "color")
}

/// An http, https or ftp URL.
pub fn url(node: &FormNode) -> Result<Option<ValidationErrors>> {
    regex_validator(node, &URL, "url")
}

/// Digits with optional leading `+`, parentheses and separators.
pub fn phone(node: &FormNode) -> Result<Option<ValidationErrors>> {
    regex_validator(node, &PHONE, "phone")
}

/// A finite whole number.
pub fn integer(node: &FormNode) -> Result<Option<ValidationErrors>> {
    let value = node.value();
    if is_empty_value(&value) {
        return Ok(None);
    }
    let ok = value
        .as_number()
        .is_some_and(|n| n.is_finite() && n.round() == n);
    Ok((!ok).then(|| ValidationErrors::flag("integer")))
}

/// A finite number.
pub fn numeric(node: &FormNode) -> Result<Option<ValidationErrors>> {
    let value = node.value();
    if is_empty_value(&value) {
        return Ok(None);
    }
    let ok = value.as_number().is_some_and(f64::is_finite);
    Ok((!ok).then(|| ValidationErrors::flag("numeric")))
}

/// A date.
pub fn date(node: &FormNode) -> Result<Option<ValidationErrors>> {
    let value = node.value();
    if is_empty_value(&value) || value.as_date().is_some() {
        return Ok(None);
    }
    Ok(Some(ValidationErrors::flag("date")))
}

/// Fails on dates before `min_date`. Other values pass.
pub fn min_date(min_date: NaiveDateTime) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        Ok(value.as_date().filter(|d| **d < min_date).map(|_| {
            ValidationErrors::single(
                "minDate",
                ErrorDetail::params([("minDate", Value::Date(min_date)), ("actual", value.clone())]),
            )
        }))
    })
}

/// Fails on dates after `max_date`. Other values pass.
pub fn max_date(max_date: NaiveDateTime) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        Ok(value.as_date().filter(|d| **d > max_date).map(|_| {
            ValidationErrors::single(
                "maxDate",
                ErrorDetail::params([("maxDate", Value::Date(max_date)), ("actual", value.clone())]),
            )
        }))
    })
}

/// Dates strictly before now.
pub fn past(node: &FormNode) -> Result<Option<ValidationErrors>> {
    check_past(node, &SystemClock)
}

/// Dates strictly after now.
pub fn future(node: &FormNode) -> Result<Option<ValidationErrors>> {
    check_future(node, &SystemClock)
}

/// [`past`] against an explicit clock.
pub fn past_with_clock(clock: Arc<dyn Clock>) -> ValidatorFn {
    Rc::new(move |node| check_past(node, clock.as_ref()))
}

/// [`future`] against an explicit clock.
pub fn future_with_clock(clock: Arc<dyn Clock>) -> ValidatorFn {
    Rc::new(move |node| check_future(node, clock.as_ref()))
}

fn check_past(node: &FormNode, clock: &dyn Clock) -> Result<Option<ValidationErrors>> {
    let millis = node.value().as_millis();
    Ok(millis
        .filter(|m| *m >= clock.now_millis())
        .map(|_| ValidationErrors::flag("past")))
}

fn check_future(node: &FormNode, clock: &dyn Clock) -> Result<Option<ValidationErrors>> {
    let millis = node.value().as_millis();
    Ok(millis
        .filter(|m| *m <= clock.now_millis())
        .map(|_| ValidationErrors::flag("future")))
}

const MILLIS_PER_YEAR: i64 = 1000 * 3600 * 24 * 365;

/// Age in whole 365-day years between a birth date and now must lie in
/// `min_age..=max_age`. Non-date values always fail.
pub fn age_range(min_age: i64, max_age: i64) -> ValidatorFn {
    age_range_with_clock(min_age, max_age, Arc::new(SystemClock))
}

/// [`age_range`] against an explicit clock.
pub fn age_range_with_clock(min_age: i64, max_age: i64, clock: Arc<dyn Clock>) -> ValidatorFn {
    Rc::new(move |node| {
        let value = node.value();
        if is_empty_value(&value) {
            return Ok(None);
        }
        let error = |actual: Value| {
            ValidationErrors::single(
                "ageRange",
                ErrorDetail::params([
                    ("minAge", Value::from(min_age)),
                    ("maxAge", Value::from(max_age)),
                    ("actual", actual),
                ]),
            )
        };
        match value.as_millis() {
            Some(born) => {
                let age = (clock.now_millis() - born).div_euclid(MILLIS_PER_YEAR);
                Ok((age < min_age || age > max_age).then(|| error(Value::from(age))))
            }
            None => Ok(Some(error(value.clone()))),
        }
    })
}
