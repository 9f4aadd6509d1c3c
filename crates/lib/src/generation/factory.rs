//! Validator and control factories.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::descriptors::{AsyncValidatorDescriptor, ControlDescriptor, ValidatorDescriptor};
use super::errors::GenerationError;
use super::registry::PriorityList;
use crate::clock::{Clock, SystemClock};
use crate::form::{AsyncValidatorFn, ControlKey, FormControl, FormState, ValidatorFn};
use crate::{Result, Value, validators};

/// Priority of [`DefaultValidatorFactory`] unless configured otherwise.
pub const DEFAULT_VALIDATOR_FACTORY_PRIORITY: i32 = 1000;

/// Priority of [`DefaultControlFactory`] unless configured otherwise.
pub const DEFAULT_CONTROL_FACTORY_PRIORITY: i32 = 1000;

/// Turns validator descriptors into validators.
///
/// Factories are consulted in ascending priority; the first one returning
/// `Some` wins. Returning `Ok(None)` passes the descriptor on to the next
/// factory.
pub trait ValidatorFactory {
    /// Lower values are consulted first.
    fn priority(&self) -> i32;

    fn create_validator(&self, descriptor: &ValidatorDescriptor) -> Result<Option<ValidatorFn>>;

    fn create_async_validator(
        &self,
        _descriptor: &AsyncValidatorDescriptor,
    ) -> Result<Option<AsyncValidatorFn>> {
        Ok(None)
    }
}

/// Turns control descriptors into controls.
pub trait ControlFactory {
    /// Lower values are consulted first.
    fn priority(&self) -> i32;

    /// Build a control, resolving its validators through `validators`.
    fn create_control(
        &self,
        descriptor: &ControlDescriptor,
        validators: &ValidatorResolver,
    ) -> Result<Option<FormControl>>;
}

/// Resolves descriptor lists against the registered validator factories.
#[derive(Clone, Default)]
pub struct ValidatorResolver {
    factories: PriorityList<dyn ValidatorFactory>,
}

impl ValidatorResolver {
    /// Resolve against `factories`, consulted in their priority order.
    pub fn new(factories: PriorityList<dyn ValidatorFactory>) -> Self {
        Self { factories }
    }

    /// The registered validator factories in lookup order.
    pub fn factories(&self) -> &PriorityList<dyn ValidatorFactory> {
        &self.factories
    }

    /// Resolve every descriptor; `subsystem` names the requester in errors.
    pub fn create_validators(
        &self,
        subsystem: &str,
        descriptors: &[ValidatorDescriptor],
    ) -> Result<Vec<ValidatorFn>> {
        descriptors
            .iter()
            .map(|descriptor| {
                let found = self
                    .factories
                    .find_map(|factory| factory.create_validator(descriptor))?;
                found.ok_or_else(|| {
                    let descriptor = describe(descriptor, &descriptor.name);
                    tracing::error!(subsystem, %descriptor, "Unresolved validator");
                    GenerationError::UnresolvedValidator {
                        subsystem: subsystem.to_string(),
                        descriptor,
                    }
                    .into()
                })
            })
            .collect()
    }

    /// Resolve every async descriptor; `subsystem` names the requester in
    /// errors.
    pub fn create_async_validators(
        &self,
        subsystem: &str,
        descriptors: &[AsyncValidatorDescriptor],
    ) -> Result<Vec<AsyncValidatorFn>> {
        descriptors
            .iter()
            .map(|descriptor| {
                let found = self
                    .factories
                    .find_map(|factory| factory.create_async_validator(descriptor))?;
                found.ok_or_else(|| {
                    let fallback = descriptor.name.as_deref().unwrap_or("<unnamed>");
                    let descriptor = describe(descriptor, fallback);
                    tracing::error!(subsystem, %descriptor, "Unresolved async validator");
                    GenerationError::UnresolvedAsyncValidator {
                        subsystem: subsystem.to_string(),
                        descriptor,
                    }
                    .into()
                })
            })
            .collect()
    }
}

impl fmt::Debug for ValidatorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorResolver")
            .field("priorities", &self.factories)
            .finish()
    }
}

pub(crate) fn describe(descriptor: &impl serde::Serialize, fallback: &str) -> String {
    serde_json::to_string(descriptor).unwrap_or_else(|_| fallback.to_string())
}

/// The built-in validator set.
///
/// | name | parameters |
/// |------|------------|
/// | `required`, `requiredTrue`, `email`, `personName`, `phone`, `integer`, `numeric`, `date`, `past`, `future` | none |
/// | `min`, `max` | number |
/// | `minLength`, `maxLength` | non-negative integer |
/// | `pattern` | regular expression |
/// | `minDate`, `maxDate` | date, ISO text or epoch milliseconds |
/// | `ageRange` | two integers |
/// | `gte`, `gt`, `lte`, `lt`, `eq`, `neq` | sibling name or index |
///
/// Async validators are never resolved here.
#[derive(Debug, Clone)]
pub struct DefaultValidatorFactory {
    priority: i32,
    clock: Arc<dyn Clock>,
}

impl Default for DefaultValidatorFactory {
    fn default() -> Self {
        Self {
            priority: DEFAULT_VALIDATOR_FACTORY_PRIORITY,
            clock: Arc::new(SystemClock),
        }
    }
}

impl DefaultValidatorFactory {
    /// The built-in validators at [`DEFAULT_VALIDATOR_FACTORY_PRIORITY`],
    /// reading the time from the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register at `priority` instead of the default.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Time source for `past`, `future` and `ageRange`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl ValidatorFactory for DefaultValidatorFactory {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn create_validator(&self, d: &ValidatorDescriptor) -> Result<Option<ValidatorFn>> {
        let validator: ValidatorFn = match d.name.as_str() {
            "required" => Rc::new(validators::required),
            "requiredTrue" => Rc::new(validators::required_true),
            "email" => Rc::new(validators::email),
            "personName" => Rc::new(validators::person_name),
            "phone" => Rc::new(validators::phone),
            "integer" => Rc::new(validators::integer),
            "numeric" => Rc::new(validators::numeric),
            "date" => Rc::new(validators::date),
            "past" => validators::past_with_clock(self.clock.clone()),
            "future" => validators::future_with_clock(self.clock.clone()),
            "min" => validators::min(number_param(d, 0)?),
            "max" => validators::max(number_param(d, 0)?),
            "minLength" => validators::min_length(length_param(d, 0)?),
            "maxLength" => validators::max_length(length_param(d, 0)?),
            "pattern" => {
                validators::pattern(text_param(d, 0)?).map_err(|err| invalid(d, err.to_string()))?
            }
            "minDate" => validators::min_date(date_param(d, 0)?),
            "maxDate" => validators::max_date(date_param(d, 0)?),
            "ageRange" => validators::age_range_with_clock(
                integer_param(d, 0)?,
                integer_param(d, 1)?,
                self.clock.clone(),
            ),
            "gte" => validators::gte(key_param(d, 0)?),
            "gt" => validators::gt(key_param(d, 0)?),
            "lte" => validators::lte(key_param(d, 0)?),
            "lt" => validators::lt(key_param(d, 0)?),
            "eq" => validators::eq(key_param(d, 0)?),
            "neq" => validators::neq(key_param(d, 0)?),
            _ => return Ok(None),
        };
        Ok(Some(validator))
    }
}

fn invalid(d: &ValidatorDescriptor, reason: impl Into<String>) -> crate::Error {
    let err = GenerationError::InvalidParameters {
        validator: d.name.clone(),
        reason: reason.into(),
    };
    tracing::error!(error = %err, "Rejected validator parameters");
    err.into()
}

fn param(d: &ValidatorDescriptor, index: usize) -> Result<&Value> {
    d.parameters
        .get(index)
        .ok_or_else(|| invalid(d, format!("missing parameter {index}")))
}

fn number_param(d: &ValidatorDescriptor, index: usize) -> Result<f64> {
    match param(d, index)? {
        Value::Number(n) if n.is_finite() => Ok(*n),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| invalid(d, format!("parameter {index} is not a number"))),
        other => Err(invalid(
            d,
            format!("parameter {index} must be a number, found {}", other.type_name()),
        )),
    }
}

fn integer_param(d: &ValidatorDescriptor, index: usize) -> Result<i64> {
    let n = number_param(d, index)?;
    if n.fract() != 0.0 {
        return Err(invalid(d, format!("parameter {index} must be an integer")));
    }
    Ok(n as i64)
}

fn length_param(d: &ValidatorDescriptor, index: usize) -> Result<usize> {
    let n = integer_param(d, index)?;
    usize::try_from(n).map_err(|_| invalid(d, format!("parameter {index} must not be negative")))
}

fn text_param(d: &ValidatorDescriptor, index: usize) -> Result<&str> {
    match param(d, index)? {
        Value::Text(s) => Ok(s),
        other => Err(invalid(
            d,
            format!("parameter {index} must be text, found {}", other.type_name()),
        )),
    }
}

fn date_param(d: &ValidatorDescriptor, index: usize) -> Result<NaiveDateTime> {
    let parsed = match param(d, index)? {
        Value::Date(date) => Some(*date),
        Value::Number(ms) if ms.fract() == 0.0 => {
            DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.naive_utc())
        }
        Value::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            }),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(d, format!("parameter {index} is not a date")))
}

fn key_param(d: &ValidatorDescriptor, index: usize) -> Result<ControlKey> {
    match param(d, index)? {
        Value::Text(name) => Ok(ControlKey::Name(name.clone())),
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Ok(ControlKey::Index(*n as usize)),
        _ => Err(invalid(
            d,
            format!("parameter {index} must be a sibling name or a non-negative index"),
        )),
    }
}

/// Builds plain controls from the descriptor's initial value and disabled
/// flag. Accepts every descriptor.
#[derive(Debug, Clone)]
pub struct DefaultControlFactory {
    priority: i32,
}

impl Default for DefaultControlFactory {
    fn default() -> Self {
        Self {
            priority: DEFAULT_CONTROL_FACTORY_PRIORITY,
        }
    }
}

impl DefaultControlFactory {
    /// Plain controls at [`DEFAULT_CONTROL_FACTORY_PRIORITY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register at `priority` instead of the default.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

const DEFAULT_CONTROL_FACTORY: &str = "DefaultControlFactory";

impl ControlFactory for DefaultControlFactory {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn create_control(
        &self,
        d: &ControlDescriptor,
        validators: &ValidatorResolver,
    ) -> Result<Option<FormControl>> {
        let state = FormState {
            value: d.initial_value.clone(),
            disabled: d.disabled,
        };
        let control = FormControl::from_state(state)
            .with_validators(validators.create_validators(DEFAULT_CONTROL_FACTORY, &d.validators)?)
            .with_async_validators(
                validators.create_async_validators(DEFAULT_CONTROL_FACTORY, &d.async_validators)?,
            );
        Ok(Some(control))
    }
}
