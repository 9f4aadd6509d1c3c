//! The shared node handle behind controls, groups and arrays.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::validation::{AsyncValidatorFn, ControlStatus, ValidationErrors, ValidatorFn};
use super::FormError;
use crate::{Result, Value};

/// Builds a fresh array item on demand.
pub type ItemFactory = Rc<dyn Fn() -> Result<FormNode>>;

type ValueListener = Rc<dyn Fn(&Value)>;
type DisabledListener = Rc<dyn Fn(bool)>;

/// Kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Leaf holding a single value
    Control,
    /// Named children
    Group,
    /// Indexed children
    Array,
}

impl NodeType {
    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Control => "control",
            NodeType::Group => "group",
            NodeType::Array => "array",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a child under its parent: a name in a group, an index in an
/// array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlKey {
    /// Position in an array
    Index(usize),
    /// Name in a group
    Name(String),
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKey::Index(i) => write!(f, "{i}"),
            ControlKey::Name(n) => f.write_str(n),
        }
    }
}

impl From<&str> for ControlKey {
    fn from(name: &str) -> Self {
        ControlKey::Name(name.to_string())
    }
}

impl From<String> for ControlKey {
    fn from(name: String) -> Self {
        ControlKey::Name(name)
    }
}

impl From<usize> for ControlKey {
    fn from(index: usize) -> Self {
        ControlKey::Index(index)
    }
}

/// Options for value updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetValueOptions {
    /// Do not propagate to ancestors
    pub only_self: bool,
    /// Notify value-change listeners
    pub emit_event: bool,
    /// Push the new value to bound views (controls only)
    pub emit_model_to_view: bool,
}

impl Default for SetValueOptions {
    fn default() -> Self {
        Self {
            only_self: false,
            emit_event: true,
            emit_model_to_view: true,
        }
    }
}

impl SetValueOptions {
    /// Update this node only, without events.
    pub fn silent_self() -> Self {
        Self {
            only_self: true,
            emit_event: false,
            emit_model_to_view: true,
        }
    }

    /// Same options restricted to the node itself.
    pub fn self_only(self) -> Self {
        Self {
            only_self: true,
            ..self
        }
    }
}

pub(crate) enum NodeKind {
    Control {
        value: Value,
    },
    Group {
        children: Vec<(String, FormNode)>,
    },
    Array {
        children: Vec<FormNode>,
        factory: Option<ItemFactory>,
        allow_add: bool,
        allow_delete: bool,
    },
}

impl NodeKind {
    fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Control { .. } => NodeType::Control,
            NodeKind::Group { .. } => NodeType::Group,
            NodeKind::Array { .. } => NodeType::Array,
        }
    }
}

pub(crate) struct NodeInner {
    pub(crate) kind: NodeKind,
    parent: Weak<RefCell<NodeInner>>,
    validators: Vec<ValidatorFn>,
    async_validators: Vec<AsyncValidatorFn>,
    errors: Option<ValidationErrors>,
    status: ControlStatus,
    touched: bool,
    dirty: bool,
    value_listeners: Vec<ValueListener>,
    view_writers: Vec<ValueListener>,
    disabled_listeners: Vec<DisabledListener>,
}

/// A node of a form tree.
///
/// Cloning yields another handle to the same node. Children hold a weak link
/// to their parent, so dropping the root drops the tree.
#[derive(Clone)]
pub struct FormNode(pub(crate) Rc<RefCell<NodeInner>>);

/// Non-owning handle to a [`FormNode`].
#[derive(Clone)]
pub struct WeakFormNode(Weak<RefCell<NodeInner>>);

impl WeakFormNode {
    /// The node, if still alive
    pub fn upgrade(&self) -> Option<FormNode> {
        self.0.upgrade().map(FormNode)
    }
}

impl FormNode {
    pub(crate) fn new(kind: NodeKind, disabled: bool) -> Self {
        FormNode(Rc::new(RefCell::new(NodeInner {
            kind,
            parent: Weak::new(),
            validators: Vec::new(),
            async_validators: Vec::new(),
            errors: None,
            status: if disabled {
                ControlStatus::Disabled
            } else {
                ControlStatus::Valid
            },
            touched: false,
            dirty: false,
            value_listeners: Vec::new(),
            view_writers: Vec::new(),
            disabled_listeners: Vec::new(),
        })))
    }

    /// Kind of this node
    pub fn node_type(&self) -> NodeType {
        self.0.borrow().kind.node_type()
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &FormNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A non-owning handle
    pub fn downgrade(&self) -> WeakFormNode {
        WeakFormNode(Rc::downgrade(&self.0))
    }

    // ---- structure ----

    /// The parent node, if attached
    pub fn parent(&self) -> Option<FormNode> {
        self.0.borrow().parent.upgrade().map(FormNode)
    }

    /// The topmost ancestor (or the node itself)
    pub fn root(&self) -> FormNode {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    pub(crate) fn adopt(&self, child: &FormNode) {
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
    }

    pub(crate) fn orphan(child: &FormNode) {
        child.0.borrow_mut().parent = Weak::new();
    }

    /// Direct children in order; empty for controls.
    pub fn children(&self) -> Vec<FormNode> {
        match &self.0.borrow().kind {
            NodeKind::Control { .. } => Vec::new(),
            NodeKind::Group { children } => children.iter().map(|(_, c)| c.clone()).collect(),
            NodeKind::Array { children, .. } => children.clone(),
        }
    }

    /// Direct children with their keys.
    pub fn child_entries(&self) -> Vec<(ControlKey, FormNode)> {
        match &self.0.borrow().kind {
            NodeKind::Control { .. } => Vec::new(),
            NodeKind::Group { children } => children
                .iter()
                .map(|(name, c)| (ControlKey::Name(name.clone()), c.clone()))
                .collect(),
            NodeKind::Array { children, .. } => children
                .iter()
                .enumerate()
                .map(|(i, c)| (ControlKey::Index(i), c.clone()))
                .collect(),
        }
    }

    /// Direct child by key; `None` when absent or of the wrong key kind.
    pub fn child(&self, key: &ControlKey) -> Option<FormNode> {
        match (&self.0.borrow().kind, key) {
            (NodeKind::Group { children }, ControlKey::Name(name)) => children
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| c.clone()),
            (NodeKind::Array { children, .. }, ControlKey::Index(i)) => children.get(*i).cloned(),
            _ => None,
        }
    }

    /// Descendant by dotted path, e.g. `address.lines.0`.
    pub fn get(&self, path: &str) -> Option<FormNode> {
        path.split('.').try_fold(self.clone(), |node, segment| {
            let key = match node.node_type() {
                NodeType::Array => ControlKey::Index(segment.parse().ok()?),
                _ => ControlKey::Name(segment.to_string()),
            };
            node.child(&key)
        })
    }

    /// Key of this node under its parent.
    pub fn key(&self) -> Option<ControlKey> {
        let parent = self.parent()?;
        parent
            .child_entries()
            .into_iter()
            .find(|(_, c)| c.ptr_eq(self))
            .map(|(key, _)| key)
    }

    /// A node sharing this node's parent.
    ///
    /// Group parents take a name and array parents an index. A name that is
    /// not in the group yields `Ok(None)`; a missing parent, a key of the
    /// wrong kind or an index past the end is an error.
    pub fn sibling(&self, key: &ControlKey) -> Result<Option<FormNode>> {
        let parent = self.parent().ok_or_else(|| FormError::NoParent {
            key: key.to_string(),
        })?;
        let inner = parent.0.borrow();
        match (&inner.kind, key) {
            (NodeKind::Group { children }, ControlKey::Name(name)) => Ok(children
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, c)| c.clone())),
            (NodeKind::Array { children, .. }, ControlKey::Index(index)) => children
                .get(*index)
                .cloned()
                .map(Some)
                .ok_or_else(|| {
                    FormError::IndexOutOfRange {
                        index: *index,
                        len: children.len(),
                    }
                    .into()
                }),
            (kind, key) => {
                let expected = match kind.node_type() {
                    NodeType::Array => "an index",
                    _ => "a name",
                };
                Err(FormError::InvalidKeyKind {
                    key: key.to_string(),
                    parent: kind.node_type().to_string(),
                    expected: expected.to_string(),
                }
                .into())
            }
        }
    }

    // ---- value ----

    /// The aggregated value. Disabled children are left out unless this
    /// node is disabled itself.
    pub fn value(&self) -> Value {
        let include_disabled = self.is_disabled();
        match &self.0.borrow().kind {
            NodeKind::Control { value } => value.clone(),
            NodeKind::Group { children } => Value::Group(
                children
                    .iter()
                    .filter(|(_, c)| include_disabled || c.is_enabled())
                    .map(|(name, c)| (name.clone(), c.value()))
                    .collect(),
            ),
            NodeKind::Array { children, .. } => Value::List(
                children
                    .iter()
                    .filter(|c| include_disabled || c.is_enabled())
                    .map(FormNode::value)
                    .collect(),
            ),
        }
    }

    /// The value including disabled children.
    pub fn raw_value(&self) -> Value {
        match &self.0.borrow().kind {
            NodeKind::Control { value } => value.clone(),
            NodeKind::Group { children } => Value::Group(
                children
                    .iter()
                    .map(|(name, c)| (name.clone(), c.raw_value()))
                    .collect(),
            ),
            NodeKind::Array { children, .. } => {
                Value::List(children.iter().map(FormNode::raw_value).collect())
            }
        }
    }

    /// Replace the value.
    ///
    /// Groups require a value for every child and reject unknown keys.
    /// Arrays with an item factory grow or shrink to the given length;
    /// arrays without one require the exact length.
    pub fn set_value(&self, value: &Value, opts: SetValueOptions) -> Result<()> {
        match self.node_type() {
            NodeType::Control => self.write_control_value(value, opts)?,
            NodeType::Group => {
                let map = expect_group(value)?;
                let children = self.child_entries();
                for (key, _) in &children {
                    let key = key.to_string();
                    if !map.contains_key(&key) {
                        return Err(FormError::MissingValue { key }.into());
                    }
                }
                for key in map.keys() {
                    if self.child(&ControlKey::Name(key.clone())).is_none() {
                        return Err(FormError::NoControl { key: key.clone() }.into());
                    }
                }
                for (key, child) in children {
                    if let Some(v) = map.get(&key.to_string()) {
                        child.set_value(v, opts.self_only())?;
                    }
                }
            }
            NodeType::Array => {
                let items = expect_list(value)?;
                self.ensure_len(items.len(), true)?;
                for (child, item) in self.children().iter().zip(items) {
                    child.set_value(item, opts.self_only())?;
                }
            }
        }
        self.update_value_and_validity(opts)
    }

    /// Update the children present in `value`, ignoring the rest.
    pub fn patch_value(&self, value: &Value, opts: SetValueOptions) -> Result<()> {
        match self.node_type() {
            NodeType::Control => self.write_control_value(value, opts)?,
            NodeType::Group => {
                let map = expect_group(value)?;
                for (key, v) in map {
                    if let Some(child) = self.child(&ControlKey::Name(key.clone())) {
                        child.patch_value(v, opts.self_only())?;
                    }
                }
            }
            NodeType::Array => {
                let items = expect_list(value)?;
                self.ensure_len(items.len(), false)?;
                for (child, item) in self.children().iter().zip(items) {
                    child.patch_value(item, opts.self_only())?;
                }
            }
        }
        self.update_value_and_validity(opts)
    }

    /// Reset value and interaction state.
    ///
    /// Controls take the given value or null. Arrays with an item factory
    /// are resized to the given list, so resetting with `None` empties them.
    pub fn reset(&self, value: Option<&Value>, opts: SetValueOptions) -> Result<()> {
        match self.node_type() {
            NodeType::Control => {
                self.write_control_value(value.unwrap_or(&Value::Null), opts)?;
            }
            NodeType::Group => {
                let map = value.map(expect_group).transpose()?;
                for (key, child) in self.child_entries() {
                    let v = map.and_then(|m| m.get(&key.to_string()));
                    child.reset(v, opts.self_only())?;
                }
            }
            NodeType::Array => {
                let items = value.map(expect_list).transpose()?;
                self.ensure_len(items.map_or(0, <[Value]>::len), false)?;
                for (i, child) in self.children().iter().enumerate() {
                    child.reset(items.and_then(|l| l.get(i)), opts.self_only())?;
                }
            }
        }
        {
            let mut inner = self.0.borrow_mut();
            inner.touched = false;
            inner.dirty = false;
        }
        self.update_value_and_validity(opts)?;
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.refresh_interaction_flags();
        }
        Ok(())
    }

    fn write_control_value(&self, value: &Value, opts: SetValueOptions) -> Result<()> {
        if let NodeKind::Control { value: current } = &mut self.0.borrow_mut().kind {
            *current = value.clone();
        }
        if opts.emit_model_to_view {
            let writers = self.0.borrow().view_writers.clone();
            for writer in writers {
                writer(value);
            }
        }
        Ok(())
    }

    /// Grow or shrink an array to `len` children.
    ///
    /// Without an item factory, `strict` turns a length mismatch into an
    /// error; otherwise the existing children are left alone.
    pub(crate) fn ensure_len(&self, len: usize, strict: bool) -> Result<()> {
        let (factory, current) = match &self.0.borrow().kind {
            NodeKind::Array {
                factory, children, ..
            } => (factory.clone(), children.len()),
            kind => {
                return Err(FormError::WrongNodeKind {
                    operation: "resize".to_string(),
                    kind: kind.node_type().to_string(),
                }
                .into());
            }
        };

        let Some(factory) = factory else {
            if strict && current < len {
                return Err(FormError::NoControl {
                    key: current.to_string(),
                }
                .into());
            }
            if strict && current > len {
                return Err(FormError::MissingValue {
                    key: len.to_string(),
                }
                .into());
            }
            return Ok(());
        };

        if current != len {
            tracing::debug!(from = current, to = len, "Resizing form array");
        }
        for _ in len..current {
            self.remove_last_child();
        }
        for _ in current..len {
            let child = factory()?;
            self.attach_array_child(child, None)?;
        }
        Ok(())
    }

    pub(crate) fn attach_array_child(&self, child: FormNode, index: Option<usize>) -> Result<()> {
        self.adopt(&child);
        let mut inner = self.0.borrow_mut();
        match &mut inner.kind {
            NodeKind::Array { children, .. } => {
                let at = index.unwrap_or(children.len()).min(children.len());
                children.insert(at, child);
                Ok(())
            }
            kind => Err(FormError::WrongNodeKind {
                operation: "push".to_string(),
                kind: kind.node_type().to_string(),
            }
            .into()),
        }
    }

    pub(crate) fn detach_array_child(&self, index: usize) -> Result<FormNode> {
        let removed = {
            let mut inner = self.0.borrow_mut();
            match &mut inner.kind {
                NodeKind::Array { children, .. } => {
                    if index >= children.len() {
                        return Err(FormError::IndexOutOfRange {
                            index,
                            len: children.len(),
                        }
                        .into());
                    }
                    children.remove(index)
                }
                kind => {
                    return Err(FormError::WrongNodeKind {
                        operation: "remove".to_string(),
                        kind: kind.node_type().to_string(),
                    }
                    .into());
                }
            }
        };
        FormNode::orphan(&removed);
        Ok(removed)
    }

    fn remove_last_child(&self) {
        let removed = match &mut self.0.borrow_mut().kind {
            NodeKind::Array { children, .. } => children.pop(),
            _ => None,
        };
        if let Some(child) = removed {
            FormNode::orphan(&child);
        }
    }

    // ---- validation ----

    /// Validation status
    pub fn status(&self) -> ControlStatus {
        self.0.borrow().status
    }

    /// Errors reported by this node's own validators
    pub fn errors(&self) -> Option<ValidationErrors> {
        self.0.borrow().errors.clone()
    }

    /// Whether this node's own errors include `key`
    pub fn has_error(&self, key: &str) -> bool {
        self.0
            .borrow()
            .errors
            .as_ref()
            .is_some_and(|e| e.contains(key))
    }

    /// Status is `Valid`
    pub fn is_valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// Status is `Invalid`
    pub fn is_invalid(&self) -> bool {
        self.status() == ControlStatus::Invalid
    }

    /// Status is `Pending`
    pub fn is_pending(&self) -> bool {
        self.status() == ControlStatus::Pending
    }

    /// Status is `Disabled`
    pub fn is_disabled(&self) -> bool {
        self.status() == ControlStatus::Disabled
    }

    /// Status is anything but `Disabled`
    pub fn is_enabled(&self) -> bool {
        !self.is_disabled()
    }

    /// Append a validator. It runs on the next update.
    pub fn add_validator(&self, validator: ValidatorFn) {
        self.0.borrow_mut().validators.push(validator);
    }

    /// Replace all validators. They run on the next update.
    pub fn set_validators(&self, validators: Vec<ValidatorFn>) {
        self.0.borrow_mut().validators = validators;
    }

    /// Number of synchronous validators
    pub fn validator_count(&self) -> usize {
        self.0.borrow().validators.len()
    }

    /// Replace all async validators. They run on [`validate_async`](Self::validate_async).
    pub fn set_async_validators(&self, validators: Vec<AsyncValidatorFn>) {
        self.0.borrow_mut().async_validators = validators;
    }

    /// Number of async validators
    pub fn async_validator_count(&self) -> usize {
        self.0.borrow().async_validators.len()
    }

    /// Overwrite this node's errors and refresh ancestor statuses.
    pub fn set_errors(&self, errors: Option<ValidationErrors>) {
        self.0.borrow_mut().errors = errors.and_then(ValidationErrors::into_option);
        if self.is_enabled() {
            let status = self.calculate_status();
            self.0.borrow_mut().status = status;
        }
        self.refresh_ancestor_status();
    }

    /// Re-run validators and recompute status, then notify listeners and
    /// (unless `only_self`) repeat for the ancestors.
    ///
    /// A node whose synchronous validators pass and that has async
    /// validators becomes `Pending` until [`validate_async`](Self::validate_async).
    pub fn update_value_and_validity(&self, opts: SetValueOptions) -> Result<()> {
        let initial = if self.all_controls_disabled() {
            ControlStatus::Disabled
        } else {
            ControlStatus::Valid
        };
        self.0.borrow_mut().status = initial;

        if self.is_enabled() {
            let errors = self.run_validators()?;
            self.0.borrow_mut().errors = errors;
            let mut status = self.calculate_status();
            if matches!(status, ControlStatus::Valid | ControlStatus::Pending)
                && !self.0.borrow().async_validators.is_empty()
            {
                status = ControlStatus::Pending;
            }
            self.0.borrow_mut().status = status;
        }

        if opts.emit_event {
            self.emit_value_changed();
        }
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts)?;
        }
        Ok(())
    }

    /// Validate the node and all descendants, children first.
    pub fn validate_tree(&self) -> Result<()> {
        for child in self.children() {
            child.validate_tree()?;
        }
        self.update_value_and_validity(SetValueOptions::silent_self())
    }

    /// Run async validators over the subtree, children first, and return
    /// the resulting status.
    ///
    /// Async validators only run on enabled nodes whose synchronous
    /// validators passed.
    pub async fn validate_async(&self) -> Result<ControlStatus> {
        for child in self.children() {
            Box::pin(child.validate_async()).await?;
        }

        let validators = self.0.borrow().async_validators.clone();
        let has_sync_errors = self.0.borrow().errors.is_some();
        let mut errors = ValidationErrors::new();
        if self.is_enabled() && !has_sync_errors {
            for validator in validators {
                if let Some(e) = validator.validate(self).await? {
                    errors.merge(e);
                }
            }
            self.0.borrow_mut().errors = errors.into_option();
        }

        if self.is_enabled() {
            let status = self.calculate_status();
            self.0.borrow_mut().status = status;
        }
        self.refresh_ancestor_status();
        Ok(self.status())
    }

    fn run_validators(&self) -> Result<Option<ValidationErrors>> {
        let validators = self.0.borrow().validators.clone();
        let mut errors = ValidationErrors::new();
        for validator in validators {
            if let Some(e) = validator(self)? {
                errors.merge(e);
            }
        }
        Ok(errors.into_option())
    }

    fn all_controls_disabled(&self) -> bool {
        let own = self.0.borrow().status == ControlStatus::Disabled;
        let children = self.children();
        if children.is_empty() {
            return own;
        }
        match self.node_type() {
            NodeType::Control => own,
            _ => children.iter().all(FormNode::is_disabled),
        }
    }

    fn calculate_status(&self) -> ControlStatus {
        if self.all_controls_disabled() {
            return ControlStatus::Disabled;
        }
        if self.0.borrow().errors.is_some() {
            return ControlStatus::Invalid;
        }
        let children = self.children();
        if children.iter().any(FormNode::is_invalid) {
            ControlStatus::Invalid
        } else if children.iter().any(FormNode::is_pending) {
            ControlStatus::Pending
        } else {
            ControlStatus::Valid
        }
    }

    fn refresh_ancestor_status(&self) {
        let mut node = self.parent();
        while let Some(parent) = node {
            if parent.is_enabled() {
                let status = parent.calculate_status();
                parent.0.borrow_mut().status = status;
            }
            node = parent.parent();
        }
    }

    // ---- enable / disable ----

    /// Disable this node and its descendants.
    ///
    /// Disabled nodes skip validation and drop out of their parent's value.
    pub fn disable(&self, opts: SetValueOptions) -> Result<()> {
        self.set_disabled_recursive();
        if opts.emit_event {
            self.emit_value_changed();
        }
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts)?;
            parent.refresh_interaction_flags();
        }
        Ok(())
    }

    fn set_disabled_recursive(&self) {
        {
            let mut inner = self.0.borrow_mut();
            inner.status = ControlStatus::Disabled;
            inner.errors = None;
        }
        for child in self.children() {
            child.set_disabled_recursive();
        }
        self.notify_disabled(true);
    }

    /// Enable this node and its descendants and re-run validation.
    pub fn enable(&self, opts: SetValueOptions) -> Result<()> {
        self.set_enabled_recursive(opts.emit_event)?;
        if !opts.only_self
            && let Some(parent) = self.parent()
        {
            parent.update_value_and_validity(opts)?;
            parent.refresh_interaction_flags();
        }
        Ok(())
    }

    fn set_enabled_recursive(&self, emit_event: bool) -> Result<()> {
        self.0.borrow_mut().status = ControlStatus::Valid;
        for child in self.children() {
            child.set_enabled_recursive(emit_event)?;
        }
        self.update_value_and_validity(SetValueOptions {
            only_self: true,
            emit_event,
            emit_model_to_view: true,
        })?;
        self.notify_disabled(false);
        Ok(())
    }

    // ---- interaction flags ----

    /// Whether the user has left the control (or a descendant)
    pub fn is_touched(&self) -> bool {
        self.0.borrow().touched
    }

    /// Whether the user has changed the value (or a descendant's)
    pub fn is_dirty(&self) -> bool {
        self.0.borrow().dirty
    }

    /// Not dirty
    pub fn is_pristine(&self) -> bool {
        !self.is_dirty()
    }

    /// Mark touched, together with all ancestors.
    pub fn mark_as_touched(&self) {
        self.0.borrow_mut().touched = true;
        if let Some(parent) = self.parent() {
            parent.mark_as_touched();
        }
    }

    /// Mark dirty, together with all ancestors.
    pub fn mark_as_dirty(&self) {
        self.0.borrow_mut().dirty = true;
        if let Some(parent) = self.parent() {
            parent.mark_as_dirty();
        }
    }

    /// Clear touched on this node and its descendants; ancestors stay
    /// touched only if another child is.
    pub fn mark_as_untouched(&self) {
        self.clear_flags(true, false);
        if let Some(parent) = self.parent() {
            parent.refresh_interaction_flags();
        }
    }

    /// Clear dirty on this node and its descendants; ancestors stay dirty
    /// only if another child is.
    pub fn mark_as_pristine(&self) {
        self.clear_flags(false, true);
        if let Some(parent) = self.parent() {
            parent.refresh_interaction_flags();
        }
    }

    /// Set status to `Pending`, together with all ancestors.
    pub fn mark_as_pending(&self) {
        self.0.borrow_mut().status = ControlStatus::Pending;
        if let Some(parent) = self.parent() {
            parent.mark_as_pending();
        }
    }

    fn clear_flags(&self, touched: bool, dirty: bool) {
        {
            let mut inner = self.0.borrow_mut();
            if touched {
                inner.touched = false;
            }
            if dirty {
                inner.dirty = false;
            }
        }
        for child in self.children() {
            child.clear_flags(touched, dirty);
        }
    }

    fn refresh_interaction_flags(&self) {
        let children = self.children();
        let touched = children.iter().any(FormNode::is_touched);
        let dirty = children.iter().any(FormNode::is_dirty);
        {
            let mut inner = self.0.borrow_mut();
            inner.touched = touched;
            inner.dirty = dirty;
        }
        if let Some(parent) = self.parent() {
            parent.refresh_interaction_flags();
        }
    }

    // ---- listeners ----

    /// Listen to value changes. Listeners run in registration order.
    pub fn subscribe_value_changes(&self, listener: impl Fn(&Value) + 'static) {
        self.0.borrow_mut().value_listeners.push(Rc::new(listener));
    }

    /// Register a view to receive model-to-view writes (controls only).
    pub fn register_view_writer(&self, writer: impl Fn(&Value) + 'static) {
        self.0.borrow_mut().view_writers.push(Rc::new(writer));
    }

    /// Listen to enable/disable transitions.
    pub fn register_on_disabled_change(&self, listener: impl Fn(bool) + 'static) {
        self.0.borrow_mut().disabled_listeners.push(Rc::new(listener));
    }

    fn emit_value_changed(&self) {
        let listeners = self.0.borrow().value_listeners.clone();
        if listeners.is_empty() {
            return;
        }
        let value = self.value();
        for listener in listeners {
            listener(&value);
        }
    }

    fn notify_disabled(&self, disabled: bool) {
        let listeners = self.0.borrow().disabled_listeners.clone();
        for listener in listeners {
            listener(disabled);
        }
    }

    // ---- array flags ----

    pub(crate) fn array_flags(&self) -> Option<(bool, bool)> {
        match &self.0.borrow().kind {
            NodeKind::Array {
                allow_add,
                allow_delete,
                ..
            } => Some((*allow_add, *allow_delete)),
            _ => None,
        }
    }

    pub(crate) fn has_item_factory(&self) -> bool {
        matches!(
            &self.0.borrow().kind,
            NodeKind::Array {
                factory: Some(_),
                ..
            }
        )
    }

    pub(crate) fn item_factory(&self) -> Option<ItemFactory> {
        match &self.0.borrow().kind {
            NodeKind::Array { factory, .. } => factory.clone(),
            _ => None,
        }
    }
}

fn expect_group(value: &Value) -> Result<&std::collections::BTreeMap<String, Value>> {
    value.as_group().ok_or_else(|| {
        FormError::TypeMismatch {
            expected: "group".to_string(),
            actual: value.type_name().to_string(),
        }
        .into()
    })
}

fn expect_list(value: &Value) -> Result<&[Value]> {
    value.as_list().ok_or_else(|| {
        FormError::TypeMismatch {
            expected: "list".to_string(),
            actual: value.type_name().to_string(),
        }
        .into()
    })
}

impl fmt::Debug for FormNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let mut s = f.debug_struct("FormNode");
        s.field("type", &inner.kind.node_type())
            .field("status", &inner.status)
            .field("errors", &inner.errors)
            .field("touched", &inner.touched)
            .field("dirty", &inner.dirty);
        match &inner.kind {
            NodeKind::Control { value } => s.field("value", value),
            NodeKind::Group { children } => s.field("children", children),
            NodeKind::Array { children, .. } => s.field("children", children),
        };
        s.finish()
    }
}
