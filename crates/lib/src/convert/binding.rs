//! Wiring a [`ValueSync`] to a form control and to the current culture.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Converter, ValueSync};
use crate::Result;
use crate::form::{FormError, FormNode, NodeType, SetValueOptions};
use crate::locale::CurrentCulture;

/// Connect a synchronization core to a control node.
///
/// The control's current value and disabled state are pushed to the core.
/// From then on, model writes on the control reach the core, and values
/// produced by the core are written back to the control without echoing to
/// the view. Touch events mark the control touched.
///
/// Both sides only hold weak references to each other.
pub fn bind_control<C>(control: &FormNode, sync: &Rc<RefCell<ValueSync<C>>>) -> Result<()>
where
    C: Converter + 'static,
{
    if control.node_type() != NodeType::Control {
        return Err(FormError::WrongNodeKind {
            operation: "bind".to_string(),
            kind: control.node_type().to_string(),
        }
        .into());
    }

    {
        let mut core = sync.borrow_mut();
        core.write_value(&control.value());
        core.set_disabled_state(control.is_disabled());

        let target = control.downgrade();
        core.register_on_change(move |value| {
            let Some(control) = target.upgrade() else {
                return;
            };
            // Model writes come back through here with the value the
            // control already holds.
            if control.value() == *value {
                return;
            }
            control.mark_as_dirty();
            let opts = SetValueOptions {
                emit_model_to_view: false,
                ..SetValueOptions::default()
            };
            if let Err(err) = control.set_value(value, opts) {
                tracing::error!(error = %err, "Failed to update control from view");
            }
        });

        let target = control.downgrade();
        core.register_on_touched(move || {
            if let Some(control) = target.upgrade() {
                control.mark_as_touched();
            }
        });
    }

    let core = Rc::downgrade(sync);
    control.register_view_writer(move |value| {
        let Some(core) = core.upgrade() else {
            return;
        };
        match core.try_borrow_mut() {
            Ok(mut core) => core.write_value(value),
            Err(_) => tracing::warn!("Value sync busy, skipping re-entrant model write"),
        }
    });

    let core = Rc::downgrade(sync);
    control.register_on_disabled_change(move |disabled| {
        let Some(core) = core.upgrade() else {
            return;
        };
        match core.try_borrow_mut() {
            Ok(mut core) => core.set_disabled_state(disabled),
            Err(_) => tracing::warn!("Value sync busy, skipping disabled state change"),
        }
    });

    Ok(())
}

/// Keep a synchronization core on the active culture.
pub fn bind_culture<C>(culture: &CurrentCulture, sync: &Rc<RefCell<ValueSync<C>>>)
where
    C: Converter + 'static,
{
    sync.borrow_mut().set_culture(&culture.get());
    let core = Rc::downgrade(sync);
    culture.subscribe(move |name| {
        let Some(core) = core.upgrade() else {
            return;
        };
        match core.try_borrow_mut() {
            Ok(mut core) => core.set_culture(name),
            Err(_) => tracing::warn!(culture = name, "Value sync busy, skipping culture change"),
        }
    });
}
