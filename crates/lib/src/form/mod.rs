//! Form trees.
//!
//! A form is a tree of [`FormNode`]s: [`FormControl`] leaves hold values,
//! [`FormGroup`]s hold named children and [`FormArray`]s hold indexed ones.
//! Every node carries validators, a [`ControlStatus`], touched/dirty flags
//! and value-change listeners. Status and value roll up from children to
//! parents.
//!
//! Trees are single-threaded: handles are reference counted and children
//! only keep a weak link to their parent.

mod array;
mod control;
mod errors;
mod group;
mod helpers;
mod node;
mod validation;

pub use array::{ArrayOptions, FormArray};
pub use control::{FormControl, FormState};
pub use errors::FormError;
pub use group::FormGroup;
pub use helpers::{
    action_recursive, compute_control_id, control_key, mark_as_dirty_recursive,
    mark_as_pending_recursive, mark_as_pristine_recursive, mark_as_touched_recursive,
    mark_as_untouched_recursive, sibling,
};
pub use node::{
    ControlKey, FormNode, ItemFactory, NodeType, SetValueOptions, WeakFormNode,
};
pub use validation::{
    AsyncValidator, AsyncValidatorFn, ControlStatus, ErrorDetail, ValidationErrors, ValidatorFn,
    validator_fn,
};
