use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDateTime;
use formkit::{
    FixedClock, Value,
    convert::{Converter, TextInput, ValueSync},
    form::{FormGroup, FormNode},
    generation::FormGenerator,
    locale::{CurrentCulture, Globalization},
    messages::{DefaultTranslationService, MessageCollection, MessageService},
};

// Re-export tokio test macro for convenience
pub use tokio;

/// A shared clock frozen at `instant`.
pub fn clock_at(instant: NaiveDateTime) -> Arc<FixedClock> {
    Arc::new(FixedClock::at(instant))
}

/// Move a fixed clock to `instant`.
pub fn set_clock(clock: &FixedClock, instant: NaiveDateTime) {
    clock.set(instant.and_utc().timestamp_millis());
}

/// Midnight of a calendar date.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

/// A generator whose date validators run against `clock`.
pub fn generator_with_clock(clock: Arc<FixedClock>) -> FormGenerator {
    FormGenerator::builder().clock(clock).build()
}

/// A group of two plain controls named `a` and `b`.
pub fn pair(a: impl Into<Value>, b: impl Into<Value>) -> FormGroup {
    FormGroup::new([
        ("a", formkit::form::FormControl::new(a).into_node()),
        ("b", formkit::form::FormControl::new(b).into_node()),
    ])
    .expect("Failed to create pair")
}

/// A synchronization core attached to a fresh text input.
pub fn attached<C: Converter>(converter: C, culture: &str) -> (ValueSync<C>, TextInput) {
    let input = TextInput::new();
    let mut sync = ValueSync::new(converter, Rc::new(Globalization::default()), culture);
    sync.attach(Box::new(input.clone()))
        .expect("Failed to attach input");
    (sync, input)
}

/// Record every value a core reports to its change listeners.
pub fn record_changes<C: Converter>(sync: &mut ValueSync<C>) -> Rc<RefCell<Vec<Value>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    sync.register_on_change(move |v| sink.borrow_mut().push(v.clone()));
    seen
}

/// A message service over English and German with a few field labels.
pub fn message_service(culture: &str) -> MessageService {
    let translation = DefaultTranslationService::with_default_messages(
        &["en", "de"],
        [
            MessageCollection::new(
                "en",
                "form",
                [("firstName", "First name"), ("birthDate", "Date of birth")],
            ),
            MessageCollection::new(
                "en",
                "validation",
                [
                    ("gte", "{key} must be at least {otherKey}."),
                    ("ltDate", "{key} must be before {otherKey}."),
                ],
            ),
            MessageCollection::new("de", "form", [("firstName", "Vorname")]),
            MessageCollection::new(
                "de",
                "validation",
                [
                    ("required", "{key} ist ein Pflichtfeld."),
                    ("min", "{key} muss mindestens {min:n2} sein."),
                ],
            ),
        ],
    );
    MessageService::new(
        Rc::new(translation),
        Rc::new(Globalization::default()),
        CurrentCulture::new(culture),
    )
}

/// The child at `path`, panicking with the path when missing.
pub fn node(root: &FormNode, path: &str) -> FormNode {
    root.get(path)
        .unwrap_or_else(|| panic!("no node at '{path}'"))
}
