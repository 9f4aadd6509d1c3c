//! Culture-aware parsing and formatting.
//!
//! The converters never parse or format numbers and dates themselves; they
//! delegate to a [`LocaleProvider`] keyed by culture name. [`Globalization`]
//! is the built-in provider covering a small table of cultures, and
//! [`CurrentCulture`] holds the active culture and notifies listeners when it
//! changes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};

use crate::Value;

mod builtin;
mod errors;

pub use builtin::{CultureInfo, Globalization};
pub use errors::LocaleError;

/// Presentation style of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberStyle {
    /// Plain decimal number
    #[default]
    Decimal,
    /// Value multiplied by 100 and shown with the culture's percent sign
    Percent,
}

/// Structured number format.
///
/// ```
/// use formkit::locale::{NumberFormat, NumberStyle};
///
/// let format = NumberFormat::default().max_fraction_digits(2).grouping(false);
/// assert_eq!(format.style, NumberStyle::Decimal);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    /// Number style
    pub style: NumberStyle,
    /// Cap on displayed fraction digits; `None` shows the shortest exact form
    pub max_fraction_digits: Option<u32>,
    /// Whether to insert group separators in the integer part
    pub use_grouping: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            max_fraction_digits: None,
            use_grouping: true,
        }
    }
}

impl NumberFormat {
    /// Percent style with whole-number display.
    pub fn percent() -> Self {
        Self {
            style: NumberStyle::Percent,
            ..Self::default()
        }
    }

    /// Set the fraction digit cap
    pub fn max_fraction_digits(mut self, digits: u32) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }

    /// Enable or disable grouping
    pub fn grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    /// Effective fraction digit cap after style defaults.
    pub(crate) fn effective_fraction_digits(&self) -> Option<u32> {
        match (self.max_fraction_digits, self.style) {
            (Some(d), _) => Some(d),
            (None, NumberStyle::Percent) => Some(0),
            (None, NumberStyle::Decimal) => None,
        }
    }
}

/// Structured date format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// The culture's short date
    #[default]
    Short,
    /// The culture's short date followed by hours and minutes
    DateTime,
    /// ISO-8601, independent of culture
    Iso,
    /// A custom chrono pattern, validated on construction
    Pattern(String),
}

impl DateFormat {
    /// Build a custom pattern format, rejecting patterns chrono cannot use.
    pub fn pattern(pattern: impl Into<String>) -> Result<Self, LocaleError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LocaleError::InvalidDatePattern { pattern });
        }
        Ok(DateFormat::Pattern(pattern))
    }
}

/// On-demand culture-aware parse and format functions.
///
/// Implementations must be deterministic for a given culture and format, and
/// must never panic on user input: unparsable input is `None`.
pub trait LocaleProvider: fmt::Debug {
    /// Resolve a requested culture name to the closest supported one.
    fn supported_culture(&self, name: &str) -> String;

    /// Parse a number written in the given culture.
    fn parse_number(&self, culture: &str, text: &str, format: &NumberFormat) -> Option<f64>;

    /// Format a number for the given culture.
    fn format_number(&self, culture: &str, value: f64, format: &NumberFormat) -> String;

    /// Parse a date written in the given culture.
    fn parse_date(&self, culture: &str, text: &str, format: &DateFormat) -> Option<NaiveDateTime>;

    /// Format a date for the given culture.
    fn format_date(&self, culture: &str, value: &NaiveDateTime, format: &DateFormat) -> String;

    /// Stringify any value with the culture's default formats.
    fn stringify(&self, culture: &str, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Number(n) => self.format_number(culture, *n, &NumberFormat::default()),
            Value::Date(d) => self.format_date(culture, d, &DateFormat::Short),
            Value::List(items) => items
                .iter()
                .map(|item| self.stringify(culture, item))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        }
    }
}

/// Resolve `name` against `supported` culture names.
///
/// Tries an exact (case-insensitive) match, then the language part of
/// `name` against whole supported names, then against their language parts.
/// Falls back to the first supported culture; returns `None` only when
/// `supported` is empty.
pub fn resolve_culture<'a>(supported: &'a [String], name: &str) -> Option<&'a str> {
    let language = |s: &str| s.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();

    supported
        .iter()
        .find(|c| c.eq_ignore_ascii_case(name))
        .or_else(|| {
            let lang = language(name);
            supported
                .iter()
                .find(|c| c.eq_ignore_ascii_case(&lang))
                .or_else(|| supported.iter().find(|c| language(c) == lang))
        })
        .or_else(|| supported.first())
        .map(String::as_str)
}

type CultureListener = Rc<dyn Fn(&str)>;

/// The active culture, with change notification.
///
/// Listeners are appended and only cleared wholesale; they run in
/// registration order each time the culture actually changes.
pub struct CurrentCulture {
    name: RefCell<String>,
    listeners: RefCell<Vec<CultureListener>>,
}

impl CurrentCulture {
    /// Create a holder with an initial culture.
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: RefCell::new(name.into()),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// The current culture name.
    pub fn get(&self) -> String {
        self.name.borrow().clone()
    }

    /// Change the culture, notifying listeners if it differs.
    pub fn set(&self, name: impl Into<String>) {
        let name = name.into();
        if *self.name.borrow() == name {
            return;
        }
        tracing::debug!(culture = %name, "Current culture changed");
        *self.name.borrow_mut() = name.clone();

        // Clone out so listeners may subscribe or read the culture.
        let listeners: Vec<CultureListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&name);
        }
    }

    /// Register a listener called with the new culture name.
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Drop all listeners.
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for CurrentCulture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentCulture")
            .field("name", &*self.name.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
