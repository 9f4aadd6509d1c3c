//! The bound control seen by a [`ValueSync`](super::ValueSync).

use std::cell::RefCell;
use std::rc::Rc;

/// The display side of a synchronized field: whatever the host renders.
///
/// User edits do not flow through this trait; the host reports them with
/// [`ValueSync::control_changed`](super::ValueSync::control_changed) and
/// [`ValueSync::touched`](super::ValueSync::touched).
pub trait ControlAccessor {
    /// Replace the displayed text.
    fn write_value(&mut self, text: &str);

    /// Enable or disable the control.
    ///
    /// Controls without a disabled state keep the default no-op; the
    /// synchronization core tracks the flag either way.
    fn set_disabled_state(&mut self, _disabled: bool) {}
}

/// State of a [`TextInput`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// Currently displayed text
    pub text: String,
    /// Disabled flag
    pub disabled: bool,
    /// Number of `write_value` calls received
    pub writes: usize,
}

/// An in-memory text box.
///
/// Clones share state, so one clone can be attached to a `ValueSync` while
/// another is kept to inspect what was written.
///
/// ```
/// use formkit::convert::{ControlAccessor, TextInput};
///
/// let input = TextInput::new();
/// let mut attached = input.clone();
/// attached.write_value("42");
/// assert_eq!(input.text(), "42");
/// assert_eq!(input.writes(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    state: Rc<RefCell<TextInputState>>,
}

impl TextInput {
    /// Create an empty, enabled input.
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed text.
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Whether the input is disabled.
    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    /// Number of writes the input received.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    /// Snapshot of the full state.
    pub fn state(&self) -> TextInputState {
        self.state.borrow().clone()
    }

    /// Simulate typing: replaces the text without counting a write.
    pub fn type_text(&self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }
}

impl ControlAccessor for TextInput {
    fn write_value(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.writes += 1;
    }

    fn set_disabled_state(&mut self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }
}
