//! Arrays of indexed children.

use std::ops::Deref;
use std::rc::Rc;

use super::control::FormState;
use super::node::{FormNode, ItemFactory, NodeKind, NodeType, SetValueOptions};
use super::validation::{AsyncValidatorFn, ValidatorFn};
use super::FormError;
use crate::Result;

/// Construction options for a [`FormArray`].
#[derive(Clone)]
pub struct ArrayOptions {
    /// Builds default items when the array grows
    pub factory: Option<ItemFactory>,
    /// Array-level validators
    pub validators: Vec<ValidatorFn>,
    /// Array-level async validators
    pub async_validators: Vec<AsyncValidatorFn>,
    /// Whether the user may add items
    pub allow_add: bool,
    /// Whether the user may delete items
    pub allow_delete: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            factory: None,
            validators: Vec::new(),
            async_validators: Vec::new(),
            allow_add: true,
            allow_delete: true,
        }
    }
}

impl ArrayOptions {
    /// Options with an item factory.
    pub fn with_factory(factory: impl Fn() -> Result<FormNode> + 'static) -> Self {
        Self {
            factory: Some(Rc::new(factory)),
            ..Self::default()
        }
    }
}

/// A node with indexed children.
///
/// With an item factory, `set_value`, `patch_value` and `reset` resize the
/// array to the length of the given list: trailing items are removed and
/// missing ones are built by the factory.
///
/// ```
/// use formkit::form::{ArrayOptions, FormArray, FormControl, SetValueOptions};
/// use formkit::Value;
///
/// let array = FormArray::with_options(
///     Vec::new(),
///     ArrayOptions::with_factory(|| Ok(FormControl::new(Value::Null).into())),
/// )?;
/// array.set_value(&Value::List(vec![1.0.into(), 2.0.into()]), SetValueOptions::default())?;
/// assert_eq!(array.len(), 2);
/// array.push_new_item()?;
/// assert_eq!(array.len(), 3);
/// # Ok::<(), formkit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FormArray(FormNode);

impl FormArray {
    /// An array over existing items, without a factory.
    pub fn new(items: Vec<FormNode>) -> Result<Self> {
        Self::with_options(items, ArrayOptions::default())
    }

    /// An array with explicit options.
    pub fn with_options(items: Vec<FormNode>, options: ArrayOptions) -> Result<Self> {
        let node = FormNode::new(
            NodeKind::Array {
                children: Vec::new(),
                factory: options.factory,
                allow_add: options.allow_add,
                allow_delete: options.allow_delete,
            },
            false,
        );
        for item in items {
            node.attach_array_child(item, None)?;
        }
        node.set_validators(options.validators);
        node.set_async_validators(options.async_validators);
        node.validate_tree()?;
        Ok(FormArray(node))
    }

    /// An array whose items are built by the factory from initial states.
    pub fn from_states(states: Vec<FormState>, options: ArrayOptions) -> Result<Self> {
        let factory = options
            .factory
            .clone()
            .ok_or(FormError::NoItemFactory { len: states.len() })?;
        let mut items = Vec::with_capacity(states.len());
        for state in states {
            let item = factory()?;
            item.set_value(&state.value, SetValueOptions::silent_self())?;
            if state.disabled {
                item.disable(SetValueOptions::silent_self())?;
            }
            items.push(item);
        }
        Self::with_options(items, options)
    }

    /// Item at `index`
    pub fn at(&self, index: usize) -> Option<FormNode> {
        self.0.child(&index.into())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.children().len()
    }

    /// Whether the array has no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an item and revalidate.
    pub fn push(&self, item: FormNode) -> Result<()> {
        self.insert(usize::MAX, item)
    }

    /// Insert an item (clamped to the end) and revalidate.
    pub fn insert(&self, index: usize, item: FormNode) -> Result<()> {
        self.0.attach_array_child(item.clone(), Some(index))?;
        item.validate_tree()?;
        self.0.update_value_and_validity(SetValueOptions::default())
    }

    /// Remove the item at `index` and revalidate.
    pub fn remove_at(&self, index: usize) -> Result<FormNode> {
        let removed = self.0.detach_array_child(index)?;
        self.0.update_value_and_validity(SetValueOptions::default())?;
        Ok(removed)
    }

    /// Remove all items and revalidate.
    pub fn clear(&self) -> Result<()> {
        while !self.is_empty() {
            self.0.detach_array_child(self.len() - 1)?;
        }
        self.0.update_value_and_validity(SetValueOptions::default())
    }

    /// Grow by exactly one factory-built item and return it.
    pub fn push_new_item(&self) -> Result<FormNode> {
        let factory = self
            .0
            .item_factory()
            .ok_or(FormError::NoItemFactory {
                len: self.len() + 1,
            })?;
        let item = factory()?;
        self.push(item.clone())?;
        Ok(item)
    }

    /// Grow or shrink to `len` items and revalidate.
    pub fn resize(&self, len: usize) -> Result<()> {
        if len > self.len() && !self.has_item_factory() {
            return Err(FormError::NoItemFactory { len }.into());
        }
        self.0.ensure_len(len, false)?;
        self.0.validate_tree()?;
        self.0.update_value_and_validity(SetValueOptions::default())
    }

    /// Whether the array can build its own items
    pub fn has_item_factory(&self) -> bool {
        self.0.has_item_factory()
    }

    /// Whether the user may add items
    pub fn allows_add(&self) -> bool {
        self.0.array_flags().is_some_and(|(add, _)| add)
    }

    /// Whether the user may delete items
    pub fn allows_delete(&self) -> bool {
        self.0.array_flags().is_some_and(|(_, delete)| delete)
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

impl Deref for FormArray {
    type Target = FormNode;

    fn deref(&self) -> &FormNode {
        &self.0
    }
}

impl From<FormArray> for FormNode {
    fn from(array: FormArray) -> Self {
        array.0
    }
}

impl TryFrom<FormNode> for FormArray {
    type Error = FormError;

    fn try_from(node: FormNode) -> std::result::Result<Self, Self::Error> {
        match node.node_type() {
            NodeType::Array => Ok(FormArray(node)),
            other => Err(FormError::TypeMismatch {
                expected: NodeType::Array.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}
