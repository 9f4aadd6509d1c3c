//! Leaf controls.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::node::{FormNode, NodeKind, NodeType};
use super::validation::{AsyncValidatorFn, ValidatorFn};
use super::FormError;
use crate::Value;

/// Initial value and disabled flag of a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// Initial value
    #[serde(default)]
    pub value: Value,
    /// Start disabled
    #[serde(default)]
    pub disabled: bool,
}

impl FormState {
    /// An enabled state
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
        }
    }

    /// A disabled state
    pub fn disabled(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            disabled: true,
        }
    }
}

impl From<Value> for FormState {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A leaf node holding a single value.
///
/// Validators attached with [`with_validators`](Self::with_validators) run
/// on the next update; groups and arrays validate their whole subtree when
/// the control is added to them.
#[derive(Debug, Clone)]
pub struct FormControl(FormNode);

impl FormControl {
    /// An enabled control with an initial value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::from_state(FormState::new(value))
    }

    /// A control from an initial state.
    pub fn from_state(state: FormState) -> Self {
        FormControl(FormNode::new(
            NodeKind::Control { value: state.value },
            state.disabled,
        ))
    }

    /// Attach synchronous validators.
    pub fn with_validators(self, validators: Vec<ValidatorFn>) -> Self {
        self.0.set_validators(validators);
        self
    }

    /// Attach async validators.
    pub fn with_async_validators(self, validators: Vec<AsyncValidatorFn>) -> Self {
        self.0.set_async_validators(validators);
        self
    }

    /// The underlying node
    pub fn node(&self) -> &FormNode {
        &self.0
    }

    /// Unwrap into the underlying node
    pub fn into_node(self) -> FormNode {
        self.0
    }
}

impl Deref for FormControl {
    type Target = FormNode;

    fn deref(&self) -> &FormNode {
        &self.0
    }
}

impl From<FormControl> for FormNode {
    fn from(control: FormControl) -> Self {
        control.0
    }
}

impl TryFrom<FormNode> for FormControl {
    type Error = FormError;

    fn try_from(node: FormNode) -> Result<Self, Self::Error> {
        match node.node_type() {
            NodeType::Control => Ok(FormControl(node)),
            other => Err(FormError::TypeMismatch {
                expected: NodeType::Control.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}
