//! Materializing descriptors into form trees.

use std::rc::Rc;
use std::sync::Arc;

use super::descriptors::{
    ArrayDescriptor, ArrayItem, ControlDescriptor, GroupDescriptor, GroupItem, InputGroupItem,
    NodeDescriptor,
};
use super::errors::GenerationError;
use super::factory::{
    ControlFactory, DefaultControlFactory, DefaultValidatorFactory, ValidatorFactory,
    ValidatorResolver, describe,
};
use super::registry::PriorityList;
use crate::Result;
use crate::clock::Clock;
use crate::form::{ArrayOptions, FormArray, FormControl, FormGroup, FormNode};

const SUBSYSTEM: &str = "FormGenerator";

/// Builds form trees from descriptors.
///
/// Cloning is cheap; array nodes keep a clone to build new items.
///
/// ```
/// use formkit::generation::{ControlDescriptor, FormGenerator, GroupDescriptor, ValidatorDescriptor};
///
/// let generator = FormGenerator::new();
/// let form = generator.create_form_group(
///     &GroupDescriptor::new("person")
///         .item(ControlDescriptor::new("name").validator(ValidatorDescriptor::new("required"))),
/// )?;
/// assert!(form.get("name").unwrap().has_error("required"));
/// # Ok::<(), formkit::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct FormGenerator {
    validators: ValidatorResolver,
    controls: PriorityList<dyn ControlFactory>,
}

impl Default for FormGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormGenerator {
    /// A generator with only the built-in factories.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring factories and the clock.
    pub fn builder() -> FormGeneratorBuilder {
        FormGeneratorBuilder::default()
    }

    /// The validator factories in lookup order.
    pub fn validators(&self) -> &ValidatorResolver {
        &self.validators
    }

    /// Build a group and everything below it.
    ///
    /// Input groups are flattened into the group's own children. The group
    /// validates its subtree once all children are attached.
    pub fn create_form_group(&self, d: &GroupDescriptor) -> Result<FormGroup> {
        tracing::debug!(group = %d.name, "Creating form group");
        let mut controls = Vec::new();
        for item in flatten_items(d) {
            let node: FormNode = match item {
                NodeDescriptor::Group(group) => self.create_form_group(group)?.into(),
                NodeDescriptor::Array(array) => self.create_form_array(array)?.into(),
                NodeDescriptor::Control(control) => self.create_form_control(control)?.into(),
            };
            controls.push((item.name().to_string(), node));
        }
        FormGroup::with_validators(
            controls,
            self.validators.create_validators(SUBSYSTEM, &d.validators)?,
            self.validators
                .create_async_validators(SUBSYSTEM, &d.async_validators)?,
        )
    }

    /// Build an empty array whose items are generated from `item_type` on
    /// demand.
    pub fn create_form_array(&self, d: &ArrayDescriptor) -> Result<FormArray> {
        tracing::debug!(array = %d.name, "Creating form array");
        let generator = self.clone();
        let item_type = (*d.item_type).clone();
        let options = ArrayOptions {
            factory: Some(Rc::new(move || generator.create_item(&item_type))),
            validators: self.validators.create_validators(SUBSYSTEM, &d.validators)?,
            async_validators: self
                .validators
                .create_async_validators(SUBSYSTEM, &d.async_validators)?,
            allow_add: d.allow_add,
            allow_delete: d.allow_delete,
        };
        FormArray::with_options(Vec::new(), options)
    }

    /// Build a control through the first control factory that accepts it.
    ///
    /// The control is not validated here; attaching it to a group or array
    /// does that.
    pub fn create_form_control(&self, d: &ControlDescriptor) -> Result<FormControl> {
        let created = self
            .controls
            .find_map(|factory| factory.create_control(d, &self.validators))?;
        match created {
            Some(control) => {
                tracing::debug!(control = %d.name, "Created form control");
                Ok(control)
            }
            None => {
                let descriptor = describe(d, &d.name);
                tracing::error!(%descriptor, "Unresolved control");
                Err(GenerationError::UnresolvedControl { descriptor }.into())
            }
        }
    }

    /// Build one array item.
    pub fn create_item(&self, item: &ArrayItem) -> Result<FormNode> {
        tracing::debug!("Generating array item");
        Ok(match item {
            ArrayItem::Group(group) => self.create_form_group(group)?.into(),
            ArrayItem::Control(control) => self.create_form_control(control)?.into(),
        })
    }
}

/// The data-bearing entries of a group in order, with input groups replaced
/// by the controls they contain.
pub fn flatten_items(d: &GroupDescriptor) -> Vec<NodeDescriptor<'_>> {
    let mut items = Vec::with_capacity(d.items.len());
    for item in &d.items {
        match item {
            GroupItem::Control(control) => items.push(NodeDescriptor::Control(control)),
            GroupItem::Group(group) => items.push(NodeDescriptor::Group(group)),
            GroupItem::Array(array) => items.push(NodeDescriptor::Array(array)),
            GroupItem::InputGroup(input_group) => {
                items.extend(input_group.content.iter().filter_map(|entry| match entry {
                    InputGroupItem::Control(control) => Some(NodeDescriptor::Control(control)),
                    InputGroupItem::Text { .. } | InputGroupItem::Icon { .. } => None,
                }))
            }
        }
    }
    items
}

/// Configures the factories of a [`FormGenerator`].
#[derive(Default)]
pub struct FormGeneratorBuilder {
    validator_factories: Vec<Rc<dyn ValidatorFactory>>,
    control_factories: Vec<Rc<dyn ControlFactory>>,
    clock: Option<Arc<dyn Clock>>,
    without_defaults: bool,
}

impl FormGeneratorBuilder {
    /// Register a validator factory at its own priority.
    pub fn validator_factory(mut self, factory: impl ValidatorFactory + 'static) -> Self {
        self.validator_factories.push(Rc::new(factory));
        self
    }

    /// Register a control factory at its own priority.
    pub fn control_factory(mut self, factory: impl ControlFactory + 'static) -> Self {
        self.control_factories.push(Rc::new(factory));
        self
    }

    /// Time source of the built-in date validators.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Skip the built-in validator and control factories.
    pub fn without_defaults(mut self) -> Self {
        self.without_defaults = true;
        self
    }

    /// Sort the registered factories by priority. The built-in factories
    /// are appended last unless [`without_defaults`](Self::without_defaults)
    /// was called, so they lose ties.
    pub fn build(self) -> FormGenerator {
        let mut validator_factories = self.validator_factories;
        let mut control_factories = self.control_factories;
        if !self.without_defaults {
            let mut defaults = DefaultValidatorFactory::new();
            if let Some(clock) = self.clock {
                defaults = defaults.with_clock(clock);
            }
            validator_factories.push(Rc::new(defaults));
            control_factories.push(Rc::new(DefaultControlFactory::new()));
        }

        let mut validators: PriorityList<dyn ValidatorFactory> = PriorityList::new();
        for factory in validator_factories {
            validators.insert(factory.priority(), factory);
        }
        let mut controls: PriorityList<dyn ControlFactory> = PriorityList::new();
        for factory in control_factories {
            controls.insert(factory.priority(), factory);
        }
        tracing::debug!(
            validator_factories = validators.len(),
            control_factories = controls.len(),
            "Built form generator"
        );
        FormGenerator {
            validators: ValidatorResolver::new(validators),
            controls,
        }
    }
}
