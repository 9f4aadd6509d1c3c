//! Single-field validators through a real form tree.

use std::sync::Arc;

use formkit::form::{
    ErrorDetail, FormControl, FormGroup, FormNode, SetValueOptions, ValidatorFn, validator_fn,
};
use formkit::messages::MessageParam;
use formkit::{Value, validators};

use crate::helpers::{clock_at, date, set_clock};

/// A control with one validator inside a group, evaluated for `value`.
fn check(validator: ValidatorFn, value: impl Into<Value>) -> Option<Vec<String>> {
    let control = FormControl::new(Value::Null).with_validators(vec![validator]);
    let _form = FormGroup::new([("field", control.clone().into_node())]).unwrap();
    control
        .set_value(&value.into(), SetValueOptions::default())
        .unwrap();
    control
        .errors()
        .map(|e| e.keys().map(str::to_string).collect())
}

fn fails(validator: ValidatorFn, value: impl Into<Value>, key: &str) {
    let errors = check(validator, value).unwrap_or_default();
    assert_eq!(errors, vec![key.to_string()]);
}

fn passes(validator: ValidatorFn, value: impl Into<Value>) {
    assert_eq!(check(validator, value), None);
}

#[test]
fn required_rejects_empty_input() {
    let required = || validator_fn(validators::required);
    fails(required(), Value::Null, "required");
    fails(required(), "", "required");
    fails(required(), Value::List(vec![]), "required");
    passes(required(), " ");
    passes(required(), 0.0);
    passes(required(), false);
}

#[test]
fn required_true_needs_true() {
    fails(validator_fn(validators::required_true), false, "requiredTrue");
    fails(validator_fn(validators::required_true), Value::Null, "requiredTrue");
    passes(validator_fn(validators::required_true), true);
}

#[test]
fn email_addresses() {
    for ok in ["ada@example.com", "first.last+tag@mail.example.co.uk", "o'neil@x.io"] {
        passes(validator_fn(validators::email), ok);
    }
    for bad in ["ada", "ada@", "@example.com", "ada@example", "a b@example.com"] {
        fails(validator_fn(validators::email), bad, "email");
    }
    passes(validator_fn(validators::email), "");
}

#[test]
fn person_names_allow_marks_and_separators() {
    for ok in ["Zoë", "Jean-Luc", "O'Brien", "Mary Ann", "Łukasz"] {
        passes(validator_fn(validators::person_name), ok);
    }
    for bad in ["-Ann", "R2D2", "Ann!"] {
        fails(validator_fn(validators::person_name), bad, "personName");
    }
}

#[test]
fn phone_numbers() {
    passes(validator_fn(validators::phone), "+1 (555) 010-9999");
    passes(validator_fn(validators::phone), "(+49)30/1234");
    fails(validator_fn(validators::phone), "555-CALL", "phone");
}

#[test]
fn color_and_url() {
    passes(validator_fn(validators::color), "#0af");
    passes(validator_fn(validators::color), "#00aaff80");
    fails(validator_fn(validators::color), "#0afx", "color");
    passes(validator_fn(validators::url), "https://example.com/a/b?q=1#top");
    passes(validator_fn(validators::url), "ftp://192.168.0.1:21/pub");
    fails(validator_fn(validators::url), "mailto:ada@example.com", "url");
}

#[test]
fn numbers_and_integers() {
    passes(validator_fn(validators::integer), 42.0);
    fails(validator_fn(validators::integer), 4.2, "integer");
    fails(validator_fn(validators::integer), "42", "integer");
    passes(validator_fn(validators::numeric), 4.2);
    fails(validator_fn(validators::numeric), f64::INFINITY, "numeric");
    passes(validator_fn(validators::date), Value::Date(date(2000, 1, 1)));
    fails(validator_fn(validators::date), "2000-01-01", "date");
}

#[test]
fn bounds_report_their_parameters() {
    let control = FormControl::new(3.0).with_validators(vec![validators::min(5.0)]);
    let form = FormGroup::new([("n", control.clone().into_node())]).unwrap();
    assert!(form.is_invalid());
    let errors = control.errors().unwrap();
    let Some(ErrorDetail::Params(params)) = errors.get("min") else {
        panic!("expected parameters");
    };
    assert_eq!(params.get("min"), Some(&MessageParam::Value(Value::Number(5.0))));
    assert_eq!(params.get("actual"), Some(&MessageParam::Value(Value::Number(3.0))));

    passes(validators::max(10.0), "9.5");
    fails(validators::max(10.0), "10.5", "max");
    passes(validators::min(5.0), Value::Null);
}

#[test]
fn lengths_count_characters_and_items() {
    fails(validators::min_length(3), "ab", "minLength");
    passes(validators::min_length(3), "äöü");
    fails(validators::max_length(2), Value::List(vec![1.0.into(); 3]), "maxLength");
    passes(validators::max_length(2), "ab");
}

#[test]
fn patterns_are_anchored() {
    let zip = || validators::pattern(r"\d{5}").unwrap();
    passes(zip(), "12345");
    fails(zip(), "123456", "pattern");
    fails(zip(), "x12345", "pattern");
    passes(zip(), "");
    assert!(validators::pattern("(").is_err());
}

#[test]
fn date_windows_and_age() {
    let clock = clock_at(date(2024, 3, 1));
    let past = || validators::past_with_clock(clock.clone());
    let future = || validators::future_with_clock(clock.clone());
    passes(past(), Value::Date(date(2024, 2, 29)));
    fails(past(), Value::Date(date(2024, 3, 1)), "past");
    fails(future(), Value::Date(date(2024, 3, 1)), "future");
    passes(future(), Value::Date(date(2024, 3, 2)));

    passes(validators::min_date(date(2024, 1, 1)), Value::Date(date(2024, 1, 1)));
    fails(validators::max_date(date(2024, 1, 1)), Value::Date(date(2024, 1, 2)), "maxDate");

    let adult = || validators::age_range_with_clock(18, 120, clock.clone());
    passes(adult(), Value::Date(date(2000, 1, 1)));
    fails(adult(), Value::Date(date(2010, 1, 1)), "ageRange");
    fails(adult(), "not a date", "ageRange");
    passes(adult(), Value::Null);
}

#[test]
fn errors_merge_across_validators() {
    let control = FormControl::new("x").with_validators(vec![
        validators::min_length(3),
        validators::pattern("[0-9]+").unwrap(),
    ]);
    let node: FormNode = control.into_node();
    node.update_value_and_validity(SetValueOptions::default())
        .unwrap();
    let keys: Vec<String> = node
        .errors()
        .unwrap()
        .keys()
        .map(str::to_string)
        .collect();
    assert_eq!(keys, vec!["minLength", "pattern"]);
}

#[test]
fn clock_is_shared_not_copied() {
    let clock = clock_at(date(2024, 1, 1));
    let shared: Arc<dyn formkit::Clock> = clock.clone();
    let control = FormControl::new(Value::Date(date(2024, 6, 1)))
        .with_validators(vec![validators::future_with_clock(shared)]);
    control
        .update_value_and_validity(SetValueOptions::default())
        .unwrap();
    assert!(control.is_valid());

    set_clock(&clock, date(2025, 1, 1));
    control
        .update_value_and_validity(SetValueOptions::default())
        .unwrap();
    assert!(control.has_error("future"));
}
