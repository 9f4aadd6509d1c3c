//! Bidirectional value synchronization.
//!
//! A [`ValueSync`] sits between a bound control (a text box, rendered by the
//! host) and the logical value of a form field. It coerces raw text into a
//! typed value through a [`Converter`], formats typed values back for
//! display, suppresses redundant writes, and notifies change listeners.
//!
//! ## Logical values
//!
//! The logical value is deliberately not `Typed | Null`: text that does not
//! parse is kept verbatim as [`Logical::Raw`], so a half-typed `-` or a date
//! written for another culture survives until a culture change makes it
//! parse. See [`ValueSync::set_culture`].
//!
//! ## Ordering
//!
//! A logical value change notifies listeners first and reconciles the display
//! afterwards. Reconciliation also runs on every culture change.
//!
//! ```
//! use std::rc::Rc;
//! use formkit::convert::{NumberConverter, TextInput, ValueSync};
//! use formkit::locale::Globalization;
//!
//! let input = TextInput::new();
//! let mut sync = ValueSync::new(NumberConverter::new(), Rc::new(Globalization::default()), "en-GB");
//! sync.attach(Box::new(input.clone()))?;
//! sync.control_changed("2.1");
//! assert_eq!(sync.model_value(), formkit::Value::Number(2.1));
//!
//! sync.set_culture("de");
//! assert_eq!(input.text(), "2,1");
//! # Ok::<(), formkit::Error>(())
//! ```

use std::fmt;
use std::rc::Rc;

use crate::Value;
use crate::locale::LocaleProvider;

mod accessor;
mod binding;
mod date;
mod errors;
mod number;
mod to_null;

pub use accessor::{ControlAccessor, TextInput, TextInputState};
pub use binding::{bind_control, bind_culture};
pub use date::DateConverter;
pub use errors::ConvertError;
pub use number::{IntegerConverter, NumberConverter};
pub use to_null::ToNullConverter;

/// Outcome of a coercion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// Empty input: the field is cleared
    Cleared,
    /// Non-empty input that does not parse: keep the raw text
    Rejected,
    /// A typed value
    Value(T),
}

impl<T> Coerced<T> {
    /// Returns true for [`Coerced::Cleared`]
    pub fn is_cleared(&self) -> bool {
        matches!(self, Coerced::Cleared)
    }

    /// Returns true for [`Coerced::Rejected`]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Coerced::Rejected)
    }

    /// The typed value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Coerced::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Culture context handed to converters.
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    /// Parse/format functions
    pub locale: &'a dyn LocaleProvider,
    /// Active culture name
    pub culture: &'a str,
}

/// A per-type coercion strategy.
///
/// Implementations must be pure for a given context and must satisfy the
/// round-trip law: for every `v` that `coerce` can produce,
/// `coerce(format(v))` yields a value equal to `v` under `values_equal`.
pub trait Converter {
    /// Typed value produced by this converter
    type Output: Clone + fmt::Debug + Into<Value>;

    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Coerce raw text. `None` is an absent value.
    ///
    /// Absent, empty and whitespace-only input must yield
    /// [`Coerced::Cleared`]; unparsable input yields [`Coerced::Rejected`].
    fn coerce(&self, raw: Option<&str>, ctx: &ConvertContext<'_>) -> Coerced<Self::Output>;

    /// Format a typed value for display.
    fn format(&self, value: &Self::Output, ctx: &ConvertContext<'_>) -> String;

    /// Equality used to suppress redundant writes.
    fn values_equal(&self, a: &Self::Output, b: &Self::Output) -> bool;

    /// Interpret a model value that is neither null nor text.
    fn from_model(&self, value: &Value) -> Option<Self::Output>;
}

/// Returns true for absent, empty and whitespace-only input.
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.is_none_or(|s| s.trim().is_empty())
}

/// The logical value of a synchronized field.
#[derive(Debug, Clone, PartialEq)]
pub enum Logical<T> {
    /// Cleared
    Null,
    /// Text kept verbatim because it did not (yet) coerce
    Raw(String),
    /// A coerced value
    Typed(T),
    /// A model value the converter cannot represent, kept as given and
    /// displayed through the locale's generic stringifier
    Model(Value),
}

impl<T: Clone + Into<Value>> Logical<T> {
    /// The model-side representation.
    pub fn to_value(&self) -> Value {
        match self {
            Logical::Null => Value::Null,
            Logical::Raw(s) => Value::Text(s.clone()),
            Logical::Typed(v) => v.clone().into(),
            Logical::Model(v) => v.clone(),
        }
    }
}

type ChangeListener = Box<dyn FnMut(&Value)>;
type TouchListener = Box<dyn FnMut()>;

enum Step<T> {
    Promote(Logical<T>),
    Write(String),
    Keep,
}

/// Synchronization core for one bound control.
pub struct ValueSync<C: Converter> {
    converter: C,
    locale: Rc<dyn LocaleProvider>,
    culture: String,
    value: Logical<C::Output>,
    /// Last text known to be in the bound control; `None` until first write.
    control_value: Option<String>,
    accessor: Option<Box<dyn ControlAccessor>>,
    on_change: Vec<ChangeListener>,
    on_touched: Vec<TouchListener>,
    disabled: bool,
    destroyed: bool,
}

impl<C: Converter> ValueSync<C> {
    /// Create a core with a null logical value.
    pub fn new(converter: C, locale: Rc<dyn LocaleProvider>, culture: &str) -> Self {
        let culture = locale.supported_culture(culture);
        Self {
            converter,
            locale,
            culture,
            value: Logical::Null,
            control_value: None,
            accessor: None,
            on_change: Vec::new(),
            on_touched: Vec::new(),
            disabled: false,
            destroyed: false,
        }
    }

    /// The converter in use
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// The active culture
    pub fn culture(&self) -> &str {
        &self.culture
    }

    /// The logical value
    pub fn value(&self) -> &Logical<C::Output> {
        &self.value
    }

    /// The logical value as a model value
    pub fn model_value(&self) -> Value {
        self.value.to_value()
    }

    /// Last text known to be displayed by the bound control
    pub fn control_value(&self) -> Option<&str> {
        self.control_value.as_deref()
    }

    /// Whether the field is disabled
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a bound control is attached
    pub fn is_attached(&self) -> bool {
        self.accessor.is_some()
    }

    /// Whether [`destroy`](Self::destroy) was called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ctx(&self) -> ConvertContext<'_> {
        ConvertContext {
            locale: self.locale.as_ref(),
            culture: &self.culture,
        }
    }

    /// Coerce text under the active culture.
    pub fn coerce(&self, raw: Option<&str>) -> Coerced<C::Output> {
        self.converter.coerce(raw, &self.ctx())
    }

    /// Format a typed value under the active culture.
    pub fn format(&self, value: &C::Output) -> String {
        self.converter.format(value, &self.ctx())
    }

    /// Accept a value from the form model.
    ///
    /// Text is kept raw; other values are interpreted by the converter, and
    /// values it cannot represent are kept unchanged so the model never
    /// changes type.
    pub fn write_value(&mut self, model: &Value) {
        let logical = match model {
            Value::Null => Logical::Null,
            Value::Text(s) => Logical::Raw(s.clone()),
            other => match self.converter.from_model(other) {
                Some(v) => Logical::Typed(v),
                None => {
                    tracing::trace!(
                        converter = self.converter.name(),
                        kind = other.type_name(),
                        "Model value not representable, keeping as is"
                    );
                    Logical::Model(other.clone())
                }
            },
        };
        self.set_value(logical);
    }

    /// Store raw text as the logical value without coercing it.
    ///
    /// Coercion happens during reconciliation, so listeners first see the
    /// text and then, if it parses, the promoted value.
    pub fn set_raw_input(&mut self, raw: &str) {
        self.set_value(Logical::Raw(raw.to_string()));
    }

    /// Replace the logical value.
    ///
    /// Unchanged raw text and typed values equal under the converter are
    /// no-ops. Otherwise listeners are notified in registration order, then
    /// the display is reconciled.
    pub fn set_value(&mut self, value: Logical<C::Output>) {
        if self.destroyed {
            return;
        }
        let unchanged = match (&value, &self.value) {
            (Logical::Raw(new), Logical::Raw(current)) => new == current,
            (Logical::Null, Logical::Null) => true,
            (Logical::Model(new), Logical::Model(current)) => new == current,
            (Logical::Typed(new), Logical::Typed(current)) => {
                self.converter.values_equal(new, current)
            }
            _ => false,
        };
        if unchanged {
            return;
        }
        self.value = value;
        self.raise_on_change();
        self.reconcile();
    }

    /// Report text typed into the bound control.
    pub fn control_changed(&mut self, raw: &str) {
        if self.destroyed {
            return;
        }
        self.control_value = Some(raw.to_string());
        let next = match self.coerce(Some(raw)) {
            Coerced::Cleared => Logical::Null,
            Coerced::Value(v) => Logical::Typed(v),
            Coerced::Rejected => Logical::Raw(raw.to_string()),
        };
        self.set_value(next);
    }

    /// Report that the bound control was touched.
    pub fn touched(&mut self) {
        if self.destroyed {
            return;
        }
        for listener in self.on_touched.iter_mut() {
            listener();
        }
    }

    /// Switch culture and reconcile the display.
    pub fn set_culture(&mut self, culture: &str) {
        if self.destroyed {
            return;
        }
        self.culture = self.locale.supported_culture(culture);
        tracing::trace!(converter = self.converter.name(), culture = %self.culture, "Culture changed");
        self.reconcile();
    }

    /// Attach the bound control. Only one may be active.
    pub fn attach(&mut self, mut accessor: Box<dyn ControlAccessor>) -> Result<(), ConvertError> {
        if self.destroyed {
            return Err(ConvertError::Destroyed {
                converter: self.converter.name().to_string(),
            });
        }
        if self.accessor.is_some() {
            return Err(ConvertError::AccessorAlreadyAttached {
                converter: self.converter.name().to_string(),
            });
        }
        accessor.set_disabled_state(self.disabled);
        self.accessor = Some(accessor);
        self.reconcile();
        Ok(())
    }

    /// Detach and return the bound control.
    pub fn detach(&mut self) -> Option<Box<dyn ControlAccessor>> {
        self.control_value = None;
        self.accessor.take()
    }

    /// Enable or disable, forwarding to the bound control.
    pub fn set_disabled_state(&mut self, disabled: bool) {
        self.disabled = disabled;
        if let Some(accessor) = self.accessor.as_mut() {
            accessor.set_disabled_state(disabled);
        }
    }

    /// Register a listener for logical value changes.
    pub fn register_on_change(&mut self, listener: impl FnMut(&Value) + 'static) {
        if !self.destroyed {
            self.on_change.push(Box::new(listener));
        }
    }

    /// Register a listener for touch events.
    pub fn register_on_touched(&mut self, listener: impl FnMut() + 'static) {
        if !self.destroyed {
            self.on_touched.push(Box::new(listener));
        }
    }

    /// Tear down: drop the bound control and all listeners. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.accessor = None;
        self.on_change.clear();
        self.on_touched.clear();
        tracing::trace!(converter = self.converter.name(), "Value sync destroyed");
    }

    fn raise_on_change(&mut self) {
        let value = self.value.to_value();
        for listener in self.on_change.iter_mut() {
            listener(&value);
        }
    }

    /// Bring the bound control in line with the logical value.
    fn reconcile(&mut self) {
        if self.destroyed || self.accessor.is_none() {
            return;
        }
        let step = match &self.value {
            Logical::Raw(raw) => match self.coerce(Some(raw)) {
                Coerced::Value(v) if Into::<Value>::into(v.clone()) != Value::Text(raw.clone()) => {
                    Step::Promote(Logical::Typed(v))
                }
                Coerced::Cleared => Step::Promote(Logical::Null),
                _ if self.control_value.as_deref() != Some(raw.as_str()) => Step::Write(raw.clone()),
                _ => Step::Keep,
            },
            Logical::Null => {
                if self.control_value.as_deref() != Some("") {
                    Step::Write(String::new())
                } else {
                    Step::Keep
                }
            }
            Logical::Typed(v) => match self.coerce(self.control_value.as_deref()) {
                Coerced::Value(shown) if self.converter.values_equal(&shown, v) => Step::Keep,
                _ => Step::Write(self.format(v)),
            },
            Logical::Model(v) => {
                let text = self.locale.stringify(&self.culture, v);
                if self.control_value.as_deref() != Some(text.as_str()) {
                    Step::Write(text)
                } else {
                    Step::Keep
                }
            }
        };

        match step {
            Step::Promote(next) => self.set_value(next),
            Step::Write(text) => self.write_to_control(text),
            Step::Keep => {}
        }
    }

    fn write_to_control(&mut self, text: String) {
        tracing::trace!(converter = self.converter.name(), %text, "Writing to bound control");
        if let Some(accessor) = self.accessor.as_mut() {
            accessor.write_value(&text);
        }
        self.control_value = Some(text);
    }
}

impl<C: Converter + fmt::Debug> fmt::Debug for ValueSync<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSync")
            .field("converter", &self.converter)
            .field("culture", &self.culture)
            .field("value", &self.value)
            .field("control_value", &self.control_value)
            .field("attached", &self.accessor.is_some())
            .field("disabled", &self.disabled)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
