//! Tree-wide helpers.

use super::node::{ControlKey, FormNode};
use crate::Result;

/// Visit `node` and its descendants depth-first. Returning `false` from
/// `action` skips that node's children.
pub fn action_recursive(node: &FormNode, action: &mut impl FnMut(&FormNode) -> bool) {
    if !action(node) {
        return;
    }
    for child in node.children() {
        action_recursive(&child, action);
    }
}

/// Mark the node and every descendant as touched.
pub fn mark_as_touched_recursive(node: &FormNode) {
    action_recursive(node, &mut |n| {
        n.mark_as_touched();
        true
    });
}

/// Mark the node and every descendant as untouched.
pub fn mark_as_untouched_recursive(node: &FormNode) {
    node.mark_as_untouched();
}

/// Mark the node and every descendant as dirty.
pub fn mark_as_dirty_recursive(node: &FormNode) {
    action_recursive(node, &mut |n| {
        n.mark_as_dirty();
        true
    });
}

/// Mark the node and every descendant as pristine.
pub fn mark_as_pristine_recursive(node: &FormNode) {
    node.mark_as_pristine();
}

/// Mark the node and every descendant as pending.
pub fn mark_as_pending_recursive(node: &FormNode) {
    action_recursive(node, &mut |n| {
        n.mark_as_pending();
        true
    });
}

/// Identifier built from the keys on the path from the root, joined by `_`.
///
/// The root itself has no identifier.
///
/// ```
/// use formkit::form::{compute_control_id, FormArray, FormControl, FormGroup};
///
/// let phones = FormArray::new(vec![FormControl::new("555").into()])?;
/// let form = FormGroup::new([("phones", phones.into())])?;
/// let first = form.get("phones.0").unwrap();
/// assert_eq!(compute_control_id(&first).as_deref(), Some("phones_0"));
/// assert_eq!(compute_control_id(&form), None);
/// # Ok::<(), formkit::Error>(())
/// ```
pub fn compute_control_id(node: &FormNode) -> Option<String> {
    let parent = node.parent()?;
    let key = node.key()?;
    Some(match compute_control_id(&parent) {
        Some(parent_id) => format!("{parent_id}_{key}"),
        None => key.to_string(),
    })
}

/// Key of `node` under its parent.
pub fn control_key(node: &FormNode) -> Option<ControlKey> {
    node.key()
}

/// A sibling of `node`; see [`FormNode::sibling`].
pub fn sibling(node: &FormNode, key: &ControlKey) -> Result<Option<FormNode>> {
    node.sibling(key)
}
