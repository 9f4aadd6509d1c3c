//! Generator behaviour: flattening, arrays and clock-driven validators.

use formkit::form::{FormArray, SetValueOptions};
use formkit::generation::{
    ArrayDescriptor, AsyncValidatorDescriptor, ControlDescriptor, FormGenerator, GroupDescriptor,
    InputGroupDescriptor, ValidatorDescriptor, flatten_items,
};
use formkit::{Value, group_value};

use crate::helpers::{clock_at, date, generator_with_clock, node, set_clock};

#[test]
fn input_groups_flatten_in_order() {
    let d = GroupDescriptor::new("root")
        .item(
            InputGroupDescriptor::new()
                .icon("at")
                .control(ControlDescriptor::new("A")),
        )
        .item(ControlDescriptor::new("B"))
        .item(
            InputGroupDescriptor::new()
                .control(ControlDescriptor::new("C"))
                .text("kg"),
        );
    let names: Vec<&str> = flatten_items(&d).iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let form = FormGenerator::new().create_form_group(&d).unwrap();
    assert_eq!(form.names(), vec!["A", "B", "C"]);
    assert_eq!(form.children().len(), 3);
}

#[test]
fn push_new_item_grows_by_one() {
    let d = GroupDescriptor::new("order").item(ArrayDescriptor::new(
        "lines",
        GroupDescriptor::new("line")
            .item(ControlDescriptor::new("sku").validator(ValidatorDescriptor::new("required")))
            .item(ControlDescriptor::new("qty").initial_value(1.0)),
    ));
    let form = FormGenerator::new().create_form_group(&d).unwrap();
    let lines = FormArray::try_from(node(&form, "lines")).unwrap();
    assert!(form.is_valid());

    for expected in 1..=3 {
        let item = lines.push_new_item().unwrap();
        assert_eq!(lines.len(), expected);
        assert!(item.ptr_eq(&lines.at(expected - 1).unwrap()));
    }
    assert!(node(&form, "lines.2.sku").has_error("required"));
    assert!(form.is_invalid());

    lines
        .set_value(
            &Value::List(vec![group_value! { "sku" => "A-1", "qty" => 2.0 }]),
            SetValueOptions::default(),
        )
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert!(form.is_valid());
}

#[test]
fn array_of_controls_with_array_validator() {
    let d = ArrayDescriptor::new("tags", ControlDescriptor::new("tag"))
        .validator(ValidatorDescriptor::with_params("minLength", [2.0]));
    let tags = FormGenerator::new().create_form_array(&d).unwrap();
    assert!(tags.is_valid(), "an empty list counts as unset");
    tags.push_new_item().unwrap();
    assert!(tags.has_error("minLength"));
    tags.push_new_item().unwrap();
    assert!(tags.is_valid());
}

#[test]
fn date_validators_follow_the_clock() {
    let clock = clock_at(date(2020, 6, 1));
    let generator = generator_with_clock(clock.clone());
    let form = generator
        .create_form_group(
            &GroupDescriptor::new("person")
                .item(
                    ControlDescriptor::new("birthDate")
                        .validator(ValidatorDescriptor::new("past"))
                        .validator(ValidatorDescriptor::with_params("ageRange", [18.0, 65.0])),
                )
                .item(
                    ControlDescriptor::new("appointment")
                        .validator(ValidatorDescriptor::new("future")),
                ),
        )
        .unwrap();
    assert!(form.is_valid(), "empty dates are valid");

    let birth = node(&form, "birthDate");
    birth
        .set_value(&Value::Date(date(1990, 1, 1)), SetValueOptions::default())
        .unwrap();
    assert!(birth.is_valid());

    birth
        .set_value(&Value::Date(date(2010, 1, 1)), SetValueOptions::default())
        .unwrap();
    assert!(birth.has_error("ageRange"));

    birth
        .set_value(&Value::Date(date(2021, 1, 1)), SetValueOptions::default())
        .unwrap();
    assert!(birth.has_error("past"));

    let appointment = node(&form, "appointment");
    appointment
        .set_value(&Value::Date(date(2020, 7, 1)), SetValueOptions::default())
        .unwrap();
    assert!(appointment.is_valid());

    set_clock(&clock, date(2020, 8, 1));
    appointment
        .update_value_and_validity(SetValueOptions::default())
        .unwrap();
    assert!(appointment.has_error("future"));
}

#[test]
fn min_and_max_date_parameters_accept_iso_text() {
    let form = FormGenerator::new()
        .create_form_group(
            &GroupDescriptor::new("trip").item(
                ControlDescriptor::new("start")
                    .validator(ValidatorDescriptor::with_params("minDate", ["2024-01-01"]))
                    .validator(ValidatorDescriptor::with_params(
                        "maxDate",
                        ["2024-12-31T23:59:59"],
                    )),
            ),
        )
        .unwrap();
    let start = node(&form, "start");
    start
        .set_value(&Value::Date(date(2023, 12, 31)), SetValueOptions::default())
        .unwrap();
    assert!(start.has_error("minDate"));
    start
        .set_value(&Value::Date(date(2025, 1, 1)), SetValueOptions::default())
        .unwrap();
    assert!(start.has_error("maxDate"));
    start
        .set_value(&Value::Date(date(2024, 5, 5)), SetValueOptions::default())
        .unwrap();
    assert!(start.is_valid());
}

#[test]
fn disabled_descriptor_builds_disabled_control() {
    let form = FormGenerator::new()
        .create_form_group(
            &GroupDescriptor::new("g")
                .item(
                    ControlDescriptor::new("locked")
                        .initial_value("x")
                        .disabled(true)
                        .validator(ValidatorDescriptor::new("email")),
                )
                .item(ControlDescriptor::new("open")),
        )
        .unwrap();
    assert!(node(&form, "locked").is_disabled());
    assert!(node(&form, "locked").errors().is_none());
    assert_eq!(form.value(), group_value! { "open" => Value::Null });
}

#[test]
fn async_descriptors_need_a_factory() {
    let err = FormGenerator::new()
        .create_form_group(
            &GroupDescriptor::new("g").item(
                ControlDescriptor::new("user")
                    .async_validator(AsyncValidatorDescriptor::named("uniqueUser")),
            ),
        )
        .unwrap_err();
    assert!(err.is_unresolved());
    assert!(err.to_string().contains("uniqueUser"));
}
