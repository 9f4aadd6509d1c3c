//! Forms generated from JSON descriptor documents.

use formkit::form::{FormArray, SetValueOptions};
use formkit::generation::{FormGenerator, GroupDescriptor};
use formkit::{Value, group_value};

use crate::helpers::node;

fn registration() -> GroupDescriptor {
    let json = serde_json::json!({
        "name": "registration",
        "items": [
            {"kind": "inputGroup", "label": "Name", "content": [
                {"kind": "icon", "icon": "user"},
                {"kind": "control", "name": "firstName", "validators": [{"name": "required"}, {"name": "personName"}]},
                {"kind": "control", "name": "lastName"}
            ]},
            {"kind": "control", "name": "email", "validators": [{"name": "email"}]},
            {"kind": "control", "name": "age", "initialValue": 17,
             "validators": [{"name": "min", "parameters": [18]}, {"name": "integer"}]},
            {"kind": "group", "name": "password", "items": [
                {"kind": "control", "name": "value", "validators": [{"name": "minLength", "parameters": [8]}]},
                {"kind": "control", "name": "confirm", "validators": [{"name": "eq", "parameters": ["value"]}]}
            ]},
            {"kind": "array", "name": "phones", "allowDelete": false,
             "itemType": {"kind": "control", "name": "phone", "validators": [{"name": "phone"}]}}
        ]
    });
    serde_json::from_value(json).expect("Failed to parse descriptor")
}

#[test]
fn json_document_builds_tree() {
    let form = FormGenerator::new()
        .create_form_group(&registration())
        .unwrap();
    assert_eq!(
        form.names(),
        vec!["firstName", "lastName", "email", "age", "password", "phones"]
    );
    assert!(node(&form, "firstName").has_error("required"));
    assert!(node(&form, "age").has_error("min"));
    assert!(!node(&form, "age").has_error("integer"));
    assert!(form.is_invalid());

    let phones = FormArray::try_from(node(&form, "phones")).unwrap();
    assert!(phones.is_empty());
    assert!(phones.allows_add());
    assert!(!phones.allows_delete());
}

#[test]
fn filled_document_becomes_valid() {
    let form = FormGenerator::new()
        .create_form_group(&registration())
        .unwrap();
    form.set_value(
        &group_value! {
            "firstName" => "Ada",
            "lastName" => "Lovelace",
            "email" => "ada@example.com",
            "age" => 36.0,
            "password" => group_value! { "value" => "analytical", "confirm" => "analytical" },
            "phones" => Value::List(vec!["+44 20 7946 0000".into()]),
        },
        SetValueOptions::default(),
    )
    .unwrap();
    assert!(form.is_valid(), "{form:?}");
    assert_eq!(FormArray::try_from(node(&form, "phones")).unwrap().len(), 1);

    node(&form, "phones.0")
        .set_value(&"call me".into(), SetValueOptions::default())
        .unwrap();
    assert!(node(&form, "phones.0").has_error("phone"));
    assert!(form.is_invalid());
}

#[test]
fn sibling_comparison_inside_nested_group() {
    let form = FormGenerator::new()
        .create_form_group(&registration())
        .unwrap();
    let password = node(&form, "password");
    password
        .set_value(
            &group_value! { "value" => "analytical", "confirm" => "engine" },
            SetValueOptions::default(),
        )
        .unwrap();
    assert!(node(&form, "password.confirm").has_error("eq"));
}

#[test]
fn descriptors_round_trip_through_json() {
    let descriptor = registration();
    let json = serde_json::to_string(&descriptor).unwrap();
    let parsed: GroupDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, descriptor);
}

#[test]
fn bad_parameters_abort_generation() {
    let json = serde_json::json!({
        "name": "g",
        "items": [{"kind": "control", "name": "a", "validators": [{"name": "min", "parameters": ["ten"]}]}]
    });
    let descriptor: GroupDescriptor = serde_json::from_value(json).unwrap();
    let err = FormGenerator::new()
        .create_form_group(&descriptor)
        .unwrap_err();
    assert!(err.is_invalid_parameters());
    assert!(!err.is_unresolved());
}
