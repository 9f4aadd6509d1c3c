//! Arrays: length normalization, item factories and permissions.

use formkit::form::{
    ArrayOptions, ControlKey, FormArray, FormControl, FormGroup, SetValueOptions, validator_fn,
};
use formkit::{Value, group_value, validators};

use crate::helpers::node;

fn contact() -> formkit::Result<formkit::form::FormNode> {
    Ok(FormGroup::new([
        (
            "email",
            FormControl::new(Value::Null)
                .with_validators(vec![validator_fn(validators::email)])
                .into_node(),
        ),
        ("primary", FormControl::new(false).into_node()),
    ])?
    .into_node())
}

fn contacts() -> FormArray {
    FormArray::with_options(Vec::new(), ArrayOptions::with_factory(contact))
        .expect("Failed to create contacts")
}

fn list(emails: &[&str]) -> Value {
    Value::List(
        emails
            .iter()
            .map(|e| group_value! { "email" => *e, "primary" => false })
            .collect(),
    )
}

#[test]
fn set_value_grows_and_shrinks() {
    let array = contacts();
    array
        .set_value(&list(&["a@x.io", "b@x.io", "c@x.io"]), SetValueOptions::default())
        .unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(node(&array, "2.email").value(), Value::from("c@x.io"));

    array
        .set_value(&list(&["z@x.io"]), SetValueOptions::default())
        .unwrap();
    assert_eq!(array.len(), 1);
    assert_eq!(array.value(), list(&["z@x.io"]));
}

#[test]
fn patch_value_grows_but_keeps_omitted_fields() {
    let array = contacts();
    array.push_new_item().unwrap();
    node(&array, "0.primary")
        .set_value(&true.into(), SetValueOptions::default())
        .unwrap();

    let patch = Value::List(vec![
        group_value! { "email" => "a@x.io" },
        group_value! { "email" => "b@x.io" },
    ]);
    array.patch_value(&patch, SetValueOptions::default()).unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(node(&array, "0.primary").value(), Value::Bool(true));
    assert_eq!(node(&array, "1.email").value(), Value::from("b@x.io"));
}

#[test]
fn invalid_item_invalidates_array() {
    let array = contacts();
    array
        .set_value(&list(&["a@x.io", "nope"]), SetValueOptions::default())
        .unwrap();
    assert!(node(&array, "1.email").has_error("email"));
    assert!(array.is_invalid());

    array.remove_at(1).unwrap();
    assert!(array.is_valid());
    assert!(array.remove_at(5).is_err());
}

#[test]
fn reset_with_list_rebuilds_items() {
    let array = contacts();
    array.resize(4).unwrap();
    assert_eq!(array.len(), 4);

    array
        .reset(Some(&list(&["a@x.io"])), SetValueOptions::default())
        .unwrap();
    assert_eq!(array.len(), 1);
    assert!(array.is_pristine());

    array.reset(None, SetValueOptions::default()).unwrap();
    assert!(array.is_empty());
}

#[test]
fn insert_clamps_to_end() {
    let array = FormArray::new(vec![FormControl::new(1.0).into_node()]).unwrap();
    array.insert(0, FormControl::new(0.0).into_node()).unwrap();
    array.insert(99, FormControl::new(2.0).into_node()).unwrap();
    assert_eq!(
        array.value(),
        Value::List(vec![0.0.into(), 1.0.into(), 2.0.into()])
    );
    assert_eq!(array.at(2).and_then(|n| n.key()), Some(ControlKey::Index(2)));

    array.clear().unwrap();
    assert!(array.is_empty());
}

#[test]
fn array_level_validators_see_items() {
    let array = FormArray::with_options(
        vec![FormControl::new("x").into_node()],
        ArrayOptions {
            validators: vec![validators::min_length(2)],
            ..ArrayOptions::default()
        },
    )
    .unwrap();
    assert!(array.has_error("minLength"));

    array.push(FormControl::new("y").into_node()).unwrap();
    assert!(array.is_valid());
}

#[test]
fn resize_without_factory_cannot_grow() {
    let array = FormArray::new(vec![
        FormControl::new(1.0).into_node(),
        FormControl::new(2.0).into_node(),
    ])
    .unwrap();
    assert!(!array.has_item_factory());
    assert!(array.resize(3).is_err());
    array.resize(1).unwrap();
    assert_eq!(array.len(), 2, "without a factory existing items stay");
}
