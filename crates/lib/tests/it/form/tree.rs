//! Value roll-up, status and interaction flags across nested trees.

use std::cell::RefCell;
use std::rc::Rc;

use formkit::form::{
    ControlStatus, FormArray, FormControl, FormGroup, FormState, SetValueOptions,
    compute_control_id, mark_as_dirty_recursive, mark_as_pristine_recursive, validator_fn,
};
use formkit::{Value, group_value, validators};

use crate::helpers::{node, pair};

fn profile() -> FormGroup {
    let address = FormGroup::new([
        ("street", FormControl::new("Main St").into_node()),
        (
            "zip",
            FormControl::new("12345")
                .with_validators(vec![validators::min_length(5)])
                .into_node(),
        ),
    ])
    .expect("Failed to create address");
    FormGroup::new([
        (
            "name",
            FormControl::new("Ada")
                .with_validators(vec![validator_fn(validators::required)])
                .into_node(),
        ),
        ("address", address.into_node()),
    ])
    .expect("Failed to create profile")
}

#[test]
fn value_rolls_up_through_nested_groups() {
    let form = profile();
    assert_eq!(
        form.value(),
        group_value! {
            "name" => "Ada",
            "address" => group_value! { "street" => "Main St", "zip" => "12345" },
        }
    );

    node(&form, "address.street")
        .set_value(&"Side St".into(), SetValueOptions::default())
        .unwrap();
    assert_eq!(
        node(&form, "address").value(),
        group_value! { "street" => "Side St", "zip" => "12345" }
    );
}

#[test]
fn invalid_leaf_invalidates_ancestors() {
    let form = profile();
    assert!(form.is_valid());

    let zip = node(&form, "address.zip");
    zip.set_value(&"12".into(), SetValueOptions::default())
        .unwrap();
    assert!(zip.has_error("minLength"));
    assert_eq!(node(&form, "address").status(), ControlStatus::Invalid);
    assert_eq!(form.status(), ControlStatus::Invalid);
    // The group's own errors stay empty; only the status rolls up.
    assert!(form.errors().is_none());

    zip.set_value(&"54321".into(), SetValueOptions::default())
        .unwrap();
    assert!(form.is_valid());
}

#[test]
fn only_self_leaves_ancestors_stale() {
    let form = profile();
    let name = node(&form, "name");
    name.set_value(&Value::Null, SetValueOptions::default().self_only())
        .unwrap();
    assert!(name.is_invalid());
    assert!(form.is_valid());

    form.update_value_and_validity(SetValueOptions::default())
        .unwrap();
    assert!(form.is_invalid());
}

#[test]
fn value_listeners_fire_bottom_up() {
    let form = profile();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    node(&form, "address").subscribe_value_changes(move |_| sink.borrow_mut().push("address"));
    let sink = seen.clone();
    form.subscribe_value_changes(move |_| sink.borrow_mut().push("root"));

    node(&form, "address.zip")
        .set_value(&"99999".into(), SetValueOptions::default())
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["address", "root"]);

    seen.borrow_mut().clear();
    node(&form, "address.zip")
        .set_value(
            &"11111".into(),
            SetValueOptions {
                emit_event: false,
                ..SetValueOptions::default()
            },
        )
        .unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn reset_restores_values_and_flags() {
    let form = profile();
    let name = node(&form, "name");
    name.mark_as_touched();
    name.mark_as_dirty();
    assert!(form.is_touched() && form.is_dirty());

    form.reset(
        Some(&group_value! { "name" => "Grace" }),
        SetValueOptions::default(),
    )
    .unwrap();
    assert_eq!(name.value(), Value::from("Grace"));
    assert_eq!(node(&form, "address.street").value(), Value::Null);
    assert!(!form.is_touched());
    assert!(form.is_pristine());
}

#[test]
fn set_value_rejects_unknown_keys() {
    let form = pair(1.0, 2.0);
    let err = form
        .set_value(
            &group_value! { "a" => 1.0, "b" => 2.0, "c" => 3.0 },
            SetValueOptions::default(),
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(form.value(), group_value! { "a" => 1.0, "b" => 2.0 });

    let err = form
        .set_value(&Value::from(5.0), SetValueOptions::default())
        .unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn disabling_every_child_disables_the_group() {
    let form = pair(1.0, 2.0);
    node(&form, "a").disable(SetValueOptions::default()).unwrap();
    assert!(form.is_enabled());
    node(&form, "b").disable(SetValueOptions::default()).unwrap();
    assert_eq!(form.status(), ControlStatus::Disabled);

    node(&form, "a").enable(SetValueOptions::default()).unwrap();
    assert!(form.is_valid());
    assert_eq!(form.value(), group_value! { "a" => 1.0 });
}

#[test]
fn disabled_state_hides_errors() {
    let control = FormControl::from_state(FormState::disabled(Value::Null))
        .with_validators(vec![validator_fn(validators::required)]);
    let form = FormGroup::new([("c", control.clone().into_node())]).unwrap();
    assert!(control.is_disabled());
    assert!(control.errors().is_none());

    let transitions = Rc::new(RefCell::new(Vec::new()));
    let sink = transitions.clone();
    control.register_on_disabled_change(move |d| sink.borrow_mut().push(d));
    control.enable(SetValueOptions::default()).unwrap();
    assert!(control.has_error("required"));
    assert!(form.is_invalid());
    assert_eq!(*transitions.borrow(), vec![false]);
}

#[test]
fn recursive_flags_reach_array_items() {
    let phones = FormArray::new(vec![
        FormControl::new("555").into_node(),
        FormControl::new("556").into_node(),
    ])
    .unwrap();
    let form = FormGroup::new([("phones", phones.into_node())]).unwrap();

    mark_as_dirty_recursive(&form);
    assert!(node(&form, "phones.1").is_dirty());
    node(&form, "phones.0").mark_as_pristine();
    assert!(form.is_dirty());
    mark_as_pristine_recursive(&form);
    assert!(!node(&form, "phones.1").is_dirty());

    assert_eq!(
        compute_control_id(&node(&form, "phones.1")).as_deref(),
        Some("phones_1")
    );
}

#[test]
fn manual_errors_roll_up() {
    let form = pair(1.0, 2.0);
    let a = node(&form, "a");
    a.set_errors(Some(formkit::form::ValidationErrors::flag("server")));
    assert!(form.is_invalid());
    a.set_errors(None);
    assert!(form.is_valid());
}
