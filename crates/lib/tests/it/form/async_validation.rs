//! Async validators: pending state, ordering and interplay with sync errors.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use formkit::form::{
    AsyncValidator, ControlStatus, FormControl, FormGroup, FormNode, SetValueOptions,
    ValidationErrors, validator_fn,
};
use formkit::{Value, validators};

use crate::helpers::node;

/// Rejects user names already in `taken`, counting its calls.
struct UniqueName {
    taken: Vec<&'static str>,
    calls: Rc<Cell<usize>>,
}

#[async_trait(?Send)]
impl AsyncValidator for UniqueName {
    async fn validate(&self, node: &FormNode) -> formkit::Result<Option<ValidationErrors>> {
        self.calls.set(self.calls.get() + 1);
        tokio::time::sleep(Duration::from_millis(1)).await;
        let taken = node
            .value()
            .as_text()
            .is_some_and(|name| self.taken.iter().any(|t| *t == name));
        Ok(taken.then(|| ValidationErrors::flag("taken")))
    }
}

fn signup(initial: &str) -> (FormGroup, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let user = FormControl::new(initial)
        .with_validators(vec![validator_fn(validators::required)])
        .with_async_validators(vec![Rc::new(UniqueName {
            taken: vec!["admin", "root"],
            calls: calls.clone(),
        })]);
    let form = FormGroup::new([
        ("user", user.into_node()),
        ("bio", FormControl::new("").into_node()),
    ])
    .expect("Failed to create signup form");
    (form, calls)
}

#[tokio::test]
async fn pending_until_async_validation_runs() {
    let (form, calls) = signup("ada");
    assert_eq!(node(&form, "user").status(), ControlStatus::Pending);
    assert_eq!(form.status(), ControlStatus::Pending);
    assert_eq!(calls.get(), 0);

    let status = form.validate_async().await.unwrap();
    assert_eq!(status, ControlStatus::Valid);
    assert!(node(&form, "user").is_valid());
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn async_errors_roll_up() {
    let (form, _) = signup("ada");
    let user = node(&form, "user");
    user.set_value(&"root".into(), SetValueOptions::default())
        .unwrap();
    assert!(form.is_pending());

    assert_eq!(user.validate_async().await.unwrap(), ControlStatus::Invalid);
    assert!(user.has_error("taken"));
    assert_eq!(form.status(), ControlStatus::Invalid);
}

#[tokio::test]
async fn sync_errors_skip_async_validators() {
    let (form, calls) = signup("ada");
    let user = node(&form, "user");
    user.set_value(&Value::Null, SetValueOptions::default())
        .unwrap();
    assert!(user.is_invalid(), "sync failure is not pending");

    form.validate_async().await.unwrap();
    assert_eq!(calls.get(), 0);
    assert!(user.has_error("required"));
    assert!(!user.has_error("taken"));
}

#[tokio::test]
async fn disabled_nodes_are_not_validated() {
    let (form, calls) = signup("admin");
    node(&form, "user")
        .disable(SetValueOptions::default())
        .unwrap();
    assert_eq!(form.validate_async().await.unwrap(), ControlStatus::Valid);
    assert_eq!(calls.get(), 0);
}
