//! Pluggable validator and control factories.

use std::cell::Cell;
use std::rc::Rc;

use formkit::Value;
use formkit::form::{FormControl, FormState, ValidationErrors, ValidatorFn, validator_fn};
use formkit::generation::{
    ControlDescriptor, ControlFactory, DEFAULT_CONTROL_FACTORY_PRIORITY, FormGenerator,
    GroupDescriptor, ValidatorDescriptor, ValidatorFactory, ValidatorResolver,
};

use crate::helpers::node;

/// Claims `custom` (or declines it) and counts how often it is asked.
struct CustomFactory {
    priority: i32,
    error_key: &'static str,
    accepts: bool,
    calls: Rc<Cell<usize>>,
}

impl CustomFactory {
    fn new(priority: i32, error_key: &'static str, accepts: bool) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let factory = Self {
            priority,
            error_key,
            accepts,
            calls: calls.clone(),
        };
        (factory, calls)
    }
}

impl ValidatorFactory for CustomFactory {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn create_validator(&self, d: &ValidatorDescriptor) -> formkit::Result<Option<ValidatorFn>> {
        if d.name != "custom" {
            return Ok(None);
        }
        self.calls.set(self.calls.get() + 1);
        if !self.accepts {
            return Ok(None);
        }
        let key = self.error_key;
        Ok(Some(validator_fn(move |_| Ok(Some(ValidationErrors::flag(key))))))
    }
}

fn custom_form(generator: &FormGenerator) -> formkit::form::FormGroup {
    generator
        .create_form_group(
            &GroupDescriptor::new("g")
                .item(ControlDescriptor::new("a").validator(ValidatorDescriptor::new("custom"))),
        )
        .expect("Failed to generate form")
}

#[test]
fn lower_priority_wins() {
    let (late, late_calls) = CustomFactory::new(20, "late", true);
    let (early, early_calls) = CustomFactory::new(10, "early", true);
    let generator = FormGenerator::builder()
        .validator_factory(late)
        .validator_factory(early)
        .build();
    assert_eq!(
        generator.validators().factories().priorities().collect::<Vec<_>>(),
        vec![10, 20, 1000]
    );

    let form = custom_form(&generator);
    let a = node(&form, "a");
    assert!(a.has_error("early"));
    assert!(!a.has_error("late"));
    assert_eq!(early_calls.get(), 1);
    assert_eq!(late_calls.get(), 0);
}

#[test]
fn declining_factory_falls_through() {
    let (declines, declined) = CustomFactory::new(1, "never", false);
    let (accepts, accepted) = CustomFactory::new(5, "fallback", true);
    let generator = FormGenerator::builder()
        .validator_factory(declines)
        .validator_factory(accepts)
        .build();

    let form = custom_form(&generator);
    assert!(node(&form, "a").has_error("fallback"));
    assert_eq!(declined.get(), 1);
    assert_eq!(accepted.get(), 1);

    // Built-in names still reach the default factory behind both.
    let resolved = generator
        .validators()
        .create_validators("test", &[ValidatorDescriptor::new("required")])
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(declined.get(), 1);
}

#[test]
fn equal_priorities_keep_registration_order() {
    let (first, first_calls) = CustomFactory::new(10, "first", true);
    let (second, second_calls) = CustomFactory::new(10, "second", true);
    let generator = FormGenerator::builder()
        .validator_factory(first)
        .validator_factory(second)
        .build();
    let form = custom_form(&generator);
    assert!(node(&form, "a").has_error("first"));
    assert_eq!((first_calls.get(), second_calls.get()), (1, 0));
}

#[test]
fn unresolved_custom_name_names_the_descriptor() {
    let err = FormGenerator::new()
        .create_form_group(
            &GroupDescriptor::new("g")
                .item(ControlDescriptor::new("a").validator(ValidatorDescriptor::new("custom"))),
        )
        .unwrap_err();
    assert!(err.is_unresolved());
    assert!(err.is_configuration_error());
    let message = err.to_string();
    assert!(message.contains("DefaultControlFactory"), "{message}");
    assert!(message.contains("custom"), "{message}");
}

/// Builds read-only controls for descriptors labelled `readonly`.
struct ReadOnlyControls;

impl ControlFactory for ReadOnlyControls {
    fn priority(&self) -> i32 {
        DEFAULT_CONTROL_FACTORY_PRIORITY - 1
    }

    fn create_control(
        &self,
        d: &ControlDescriptor,
        validators: &ValidatorResolver,
    ) -> formkit::Result<Option<FormControl>> {
        if d.label.as_deref() != Some("readonly") {
            return Ok(None);
        }
        let control = FormControl::from_state(FormState::disabled(d.initial_value.clone()))
            .with_validators(validators.create_validators("ReadOnlyControls", &d.validators)?);
        Ok(Some(control))
    }
}

#[test]
fn control_factories_are_consulted_in_order() {
    let generator = FormGenerator::builder()
        .control_factory(ReadOnlyControls)
        .build();
    let form = generator
        .create_form_group(
            &GroupDescriptor::new("account")
                .item(ControlDescriptor::new("id").label("readonly").initial_value(7.0))
                .item(ControlDescriptor::new("nick").initial_value("ada")),
        )
        .unwrap();
    assert!(node(&form, "id").is_disabled());
    assert!(node(&form, "nick").is_enabled());
    assert_eq!(form.value(), formkit::group_value! { "nick" => "ada" });
    assert_eq!(form.raw_value().get("id"), Some(&Value::Number(7.0)));
}
