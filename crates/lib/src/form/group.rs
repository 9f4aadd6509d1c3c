//! Groups of named children.

use std::collections::HashSet;
use std::ops::Deref;

use super::node::{ControlKey, FormNode, NodeKind, NodeType, SetValueOptions};
use super::validation::{AsyncValidatorFn, ValidatorFn};
use super::FormError;
use crate::Result;

/// A node with named children, kept in insertion order.
#[derive(Debug, Clone)]
pub struct FormGroup(FormNode);

impl FormGroup {
    /// A group over the given children.
    ///
    /// ```
    /// use formkit::form::{FormControl, FormGroup};
    ///
    /// let group = FormGroup::new([
    ///     ("first", FormControl::new("Ada").into()),
    ///     ("last", FormControl::new("Lovelace").into()),
    /// ])?;
    /// assert_eq!(group.names(), vec!["first", "last"]);
    /// # Ok::<(), formkit::Error>(())
    /// ```
    pub fn new<K: Into<String>>(controls: impl IntoIterator<Item = (K, FormNode)>) -> Result<Self> {
        Self::with_validators(controls, Vec::new(), Vec::new())
    }

    /// A group with group-level validators.
    ///
    /// The whole subtree is validated once the children are attached.
    pub fn with_validators<K: Into<String>>(
        controls: impl IntoIterator<Item = (K, FormNode)>,
        validators: Vec<ValidatorFn>,
        async_validators: Vec<AsyncValidatorFn>,
    ) -> Result<Self> {
        let node = FormNode::new(
            NodeKind::Group {
                children: Vec::new(),
            },
            false,
        );
        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for (name, child) in controls {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(FormError::DuplicateKey { key: name }.into());
            }
            node.adopt(&child);
            children.push((name, child));
        }
        if let NodeKind::Group { children: slot } = &mut node.0.borrow_mut().kind {
            *slot = children;
        }
        node.set_validators(validators);
        node.set_async_validators(async_validators);
        node.validate_tree()?;
        Ok(FormGroup(node))
    }

    /// Child names in order.
    pub fn names(&self) -> Vec<String> {
        self.0
            .child_entries()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Direct child by name.
    pub fn control(&self, name: &str) -> Option<FormNode> {
        self.0.child(&ControlKey::Name(name.to_string()))
    }

    /// Whether an enabled child with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.control(name).is_some_and(|c| c.is_enabled())
    }

    /// Append a child and revalidate.
    pub fn add_control(&self, name: impl Into<String>, control: FormNode) -> Result<()> {
        let name = name.into();
        if self.control(&name).is_some() {
            return Err(FormError::DuplicateKey { key: name }.into());
        }
        self.0.adopt(&control);
        if let NodeKind::Group { children } = &mut self.0.0.borrow_mut().kind {
            children.push((name, control.clone()));
        }
        control.validate_tree()?;
        self.0.update_value_and_validity(SetValueOptions::default())
    }

    /// Remove a child and revalidate.
    pub fn remove_control(&self, name: &str) -> Result<Option<FormNode>> {
        let removed = match &mut self.0.0.borrow_mut().kind {
            NodeKind::Group { children } => children
                .iter()
                .position(|(n, _)| n == name)
                .map(|i| children.remove(i).1),
            _ => None,
        };
        if let Some(child) = &removed {
            FormNode::orphan(child);
            self.0.update_value_and_validity(SetValueOptions::default())?;
        }
        Ok(removed)
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

impl Deref for FormGroup {
    type Target = FormNode;

    fn deref(&self) -> &FormNode {
        &self.0
    }
}

impl From<FormGroup> for FormNode {
    fn from(group: FormGroup) -> Self {
        group.0
    }
}

impl TryFrom<FormNode> for FormGroup {
    type Error = FormError;

    fn try_from(node: FormNode) -> std::result::Result<Self, Self::Error> {
        match node.node_type() {
            NodeType::Group => Ok(FormGroup(node)),
            other => Err(FormError::TypeMismatch {
                expected: NodeType::Group.to_string(),
                actual: other.to_string(),
            }),
        }
    }
}
