//! Declarative form generation.
//!
//! Descriptors ([`GroupDescriptor`], [`ArrayDescriptor`],
//! [`ControlDescriptor`]) describe a form; a [`FormGenerator`] turns them
//! into a live [`FormNode`](crate::form::FormNode) tree. Validators and
//! controls are created by pluggable factories consulted in ascending
//! priority order; a descriptor that no factory accepts aborts generation.

mod descriptors;
mod errors;
mod factory;
mod generator;
mod registry;

pub use descriptors::{
    ArrayDescriptor, ArrayItem, AsyncValidatorDescriptor, ControlDescriptor, GroupDescriptor,
    GroupItem, InputGroupDescriptor, InputGroupItem, NodeDescriptor, ValidatorDescriptor,
};
pub use errors::GenerationError;
pub use factory::{
    ControlFactory, DEFAULT_CONTROL_FACTORY_PRIORITY, DEFAULT_VALIDATOR_FACTORY_PRIORITY,
    DefaultControlFactory, DefaultValidatorFactory, ValidatorFactory, ValidatorResolver,
};
pub use generator::{FormGenerator, FormGeneratorBuilder, flatten_items};
pub use registry::PriorityList;
