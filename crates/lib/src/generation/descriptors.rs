//! Serializable descriptions of forms.
//!
//! Every node descriptor is tagged with a `kind` field in JSON:
//!
//! ```json
//! {
//!   "name": "person",
//!   "items": [
//!     {"kind": "inputGroup", "content": [
//!       {"kind": "icon", "icon": "user"},
//!       {"kind": "control", "name": "firstName", "validators": [{"name": "required"}]}
//!     ]},
//!     {"kind": "control", "name": "age", "validators": [{"name": "min", "parameters": [18]}]}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::Value;

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

/// Reference to a validator, resolved by a
/// [`ValidatorFactory`](super::ValidatorFactory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDescriptor {
    pub name: String,
    /// Positional parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
}

impl ValidatorDescriptor {
    /// A descriptor without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// A descriptor with positional parameters.
    pub fn with_params<P: Into<Value>>(name: impl Into<String>, params: impl IntoIterator<Item = P>) -> Self {
        Self {
            name: name.into(),
            parameters: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reference to an async validator.
///
/// Either `name` or `path` identifies it; the built-in factory resolves
/// neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncValidatorDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
}

impl AsyncValidatorDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDescriptor {
    pub name: String,
    /// Display label, unused by generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub initial_value: Value,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub async_validators: Vec<AsyncValidatorDescriptor>,
}

impl ControlDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = value.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn validator(mut self, validator: ValidatorDescriptor) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn async_validator(mut self, validator: AsyncValidatorDescriptor) -> Self {
        self.async_validators.push(validator);
        self
    }
}

/// Named children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub async_validators: Vec<AsyncValidatorDescriptor>,
    pub items: Vec<GroupItem>,
}

impl GroupDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn item(mut self, item: impl Into<GroupItem>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn validator(mut self, validator: ValidatorDescriptor) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn async_validator(mut self, validator: AsyncValidatorDescriptor) -> Self {
        self.async_validators.push(validator);
        self
    }
}

/// A homogeneous list built on demand from `item_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayDescriptor {
    pub name: String,
    pub item_type: Box<ArrayItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub async_validators: Vec<AsyncValidatorDescriptor>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub allow_add: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub allow_delete: bool,
}

impl ArrayDescriptor {
    pub fn new(name: impl Into<String>, item_type: impl Into<ArrayItem>) -> Self {
        Self {
            name: name.into(),
            item_type: Box::new(item_type.into()),
            validators: Vec::new(),
            async_validators: Vec::new(),
            allow_add: true,
            allow_delete: true,
        }
    }

    pub fn allow_add(mut self, allow: bool) -> Self {
        self.allow_add = allow;
        self
    }

    pub fn allow_delete(mut self, allow: bool) -> Self {
        self.allow_delete = allow;
        self
    }

    pub fn validator(mut self, validator: ValidatorDescriptor) -> Self {
        self.validators.push(validator);
        self
    }
}

/// A visual wrapper around controls and decorations.
///
/// Only the controls inside it become nodes; the wrapper itself and its
/// text and icon entries never appear in the generated tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputGroupDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub content: Vec<InputGroupItem>,
}

impl InputGroupDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content.push(InputGroupItem::Text { text: text.into() });
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.content.push(InputGroupItem::Icon { icon: icon.into() });
        self
    }

    pub fn control(mut self, control: ControlDescriptor) -> Self {
        self.content.push(InputGroupItem::Control(control));
        self
    }
}

/// Entries of a group descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GroupItem {
    Control(ControlDescriptor),
    Group(GroupDescriptor),
    Array(ArrayDescriptor),
    InputGroup(InputGroupDescriptor),
}

/// Entries of an input group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputGroupItem {
    Text { text: String },
    Icon { icon: String },
    Control(ControlDescriptor),
}

/// Item type of an array descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ArrayItem {
    Control(ControlDescriptor),
    Group(GroupDescriptor),
}

/// A data-bearing entry of a group after input groups are flattened away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeDescriptor<'a> {
    Control(&'a ControlDescriptor),
    Group(&'a GroupDescriptor),
    Array(&'a ArrayDescriptor),
}

impl<'a> NodeDescriptor<'a> {
    /// Name of the node this entry produces.
    pub fn name(&self) -> &'a str {
        match *self {
            NodeDescriptor::Control(d) => &d.name,
            NodeDescriptor::Group(d) => &d.name,
            NodeDescriptor::Array(d) => &d.name,
        }
    }
}

impl From<ControlDescriptor> for GroupItem {
    fn from(d: ControlDescriptor) -> Self {
        GroupItem::Control(d)
    }
}

impl From<GroupDescriptor> for GroupItem {
    fn from(d: GroupDescriptor) -> Self {
        GroupItem::Group(d)
    }
}

impl From<ArrayDescriptor> for GroupItem {
    fn from(d: ArrayDescriptor) -> Self {
        GroupItem::Array(d)
    }
}

impl From<InputGroupDescriptor> for GroupItem {
    fn from(d: InputGroupDescriptor) -> Self {
        GroupItem::InputGroup(d)
    }
}

impl From<ControlDescriptor> for ArrayItem {
    fn from(d: ControlDescriptor) -> Self {
        ArrayItem::Control(d)
    }
}

impl From<GroupDescriptor> for ArrayItem {
    fn from(d: GroupDescriptor) -> Self {
        ArrayItem::Group(d)
    }
}
