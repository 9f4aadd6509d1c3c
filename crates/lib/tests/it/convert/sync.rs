//! ValueSync reconciliation between the logical value and the display.

use std::cell::RefCell;
use std::rc::Rc;

use formkit::Value;
use formkit::convert::{DateConverter, IntegerConverter, Logical, NumberConverter, TextInput};

use crate::helpers::{attached, date, record_changes};

#[test]
fn typing_an_equivalent_value_does_not_rewrite_the_control() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    sync.write_value(&Value::Number(1.5));
    assert_eq!(input.text(), "1.5");
    let writes = input.writes();

    for typed in ["1.50", "01.5", "1.5"] {
        input.type_text(typed);
        sync.control_changed(typed);
        assert_eq!(input.writes(), writes, "{typed} caused a write");
        assert_eq!(input.text(), typed);
    }

    // A model write of the same number keeps the user's text as well.
    sync.write_value(&Value::Number(1.5));
    assert_eq!(input.writes(), writes);
    assert_eq!(input.text(), "1.5");

    sync.write_value(&Value::Number(2.0));
    assert_eq!(input.text(), "2");
    assert_eq!(input.writes(), writes + 1);
}

#[test]
fn unparsable_text_survives_until_a_culture_parses_it() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    let seen = record_changes(&mut sync);

    sync.set_raw_input("١٫٥");
    assert_eq!(sync.value(), &Logical::Raw("١٫٥".to_string()));
    assert_eq!(input.text(), "١٫٥");

    sync.set_culture("de");
    assert_eq!(sync.value(), &Logical::Raw("١٫٥".to_string()));

    let writes = input.writes();
    sync.set_culture("ar-EG");
    assert_eq!(sync.value(), &Logical::Typed(1.5));
    assert_eq!(input.writes(), writes);
    assert_eq!(
        *seen.borrow(),
        vec![Value::from("١٫٥"), Value::Number(1.5)]
    );
}

#[test]
fn raw_input_is_reported_before_promotion() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    let seen = record_changes(&mut sync);

    sync.set_raw_input("-");
    sync.set_raw_input("-5");
    assert_eq!(
        *seen.borrow(),
        vec![Value::from("-"), Value::from("-5"), Value::Number(-5.0)]
    );
    assert_eq!(input.text(), "-5");

    // Repeating the same raw text is a no-op.
    sync.set_raw_input("-");
    let count = seen.borrow().len();
    sync.set_raw_input("-");
    assert_eq!(seen.borrow().len(), count);
}

#[test]
fn listeners_run_before_the_display_is_updated() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    sync.write_value(&Value::Number(1.0));

    let shown_during_callback = Rc::new(RefCell::new(Vec::new()));
    let probe = input.clone();
    let sink = shown_during_callback.clone();
    sync.register_on_change(move |_| sink.borrow_mut().push(probe.text()));

    sync.write_value(&Value::Number(3.0));
    assert_eq!(*shown_during_callback.borrow(), vec!["1"]);
    assert_eq!(input.text(), "3");
}

#[test]
fn null_clears_the_control() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    sync.write_value(&Value::Number(7.0));
    sync.write_value(&Value::Null);
    assert_eq!(input.text(), "");
    assert_eq!(sync.model_value(), Value::Null);

    input.type_text("   ");
    sync.control_changed("   ");
    assert_eq!(sync.value(), &Logical::Null);
}

#[test]
fn culture_switch_reformats_typed_values() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    sync.write_value(&Value::Number(1234.5));
    assert_eq!(input.text(), "1,234.5");
    sync.set_culture("de-DE");
    assert_eq!(input.text(), "1.234,5");
    sync.set_culture("fr");
    assert_eq!(input.text(), "1\u{202f}234,5");
}

#[test]
fn dates_follow_the_culture() {
    let (mut sync, input) = attached(DateConverter::new(), "en-GB");
    input.type_text("03/12/2020");
    sync.control_changed("03/12/2020");
    assert_eq!(sync.model_value(), Value::Date(date(2020, 12, 3)));

    sync.set_culture("en-US");
    assert_eq!(input.text(), "12/03/2020");
    sync.set_culture("de");
    assert_eq!(input.text(), "03.12.2020");
}

#[test]
fn integers_keep_fractional_model_values() {
    let (mut sync, input) = attached(IntegerConverter::new(), "en");
    sync.write_value(&Value::Number(1.5));
    assert_eq!(sync.value(), &Logical::Model(Value::Number(1.5)));
    assert_eq!(sync.model_value(), Value::Number(1.5));
    assert_eq!(input.text(), "1.5");

    sync.set_culture("de");
    assert_eq!(input.text(), "1,5");
    assert_eq!(sync.model_value(), Value::Number(1.5));

    sync.control_changed("2");
    assert_eq!(sync.model_value(), Value::Number(2.0));
}

#[test]
fn disabled_state_reaches_the_control() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    sync.set_disabled_state(true);
    assert!(input.is_disabled());
    assert!(sync.is_disabled());

    // A control attached later receives the current state.
    let other = TextInput::new();
    sync.detach();
    sync.attach(Box::new(other.clone())).unwrap();
    assert!(other.is_disabled());
}

#[test]
fn one_accessor_at_a_time() {
    let (mut sync, _input) = attached(NumberConverter::new(), "en");
    let err = sync.attach(Box::new(TextInput::new())).unwrap_err();
    assert!(err.is_duplicate_accessor());
}

#[test]
fn destroyed_core_is_inert() {
    let (mut sync, input) = attached(NumberConverter::new(), "en");
    let seen = record_changes(&mut sync);
    let writes = input.writes();
    sync.destroy();
    sync.destroy();

    sync.write_value(&Value::Number(5.0));
    sync.control_changed("6");
    assert!(seen.borrow().is_empty());
    assert_eq!(input.writes(), writes);
    assert!(sync.is_destroyed());
    assert!(!sync.is_attached());
}
