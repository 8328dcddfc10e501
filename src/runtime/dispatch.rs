//! Execution of a single action or lifecycle hook.
//!
//! Both entry points are exhaustive matches over [`Action`]. A shape that is
//! illegal in its position is a defect in the state table and panics.

use crate::core::{Action, Hook, Metadata};
use crate::runtime::Machine;
use serde_json::Value;

/// Run `action` for `event` while the machine is in `current`, returning the
/// candidate next state.
pub(crate) fn dispatch(action: &Action, current: &str, event: &str, args: &[Value]) -> String {
    let next = match action {
        Action::Stay => current.to_string(),
        Action::Goto(target) => target.clone(),
        Action::Run(f) => {
            f();
            current.to_string()
        }
        Action::RunWith(f) => {
            f(args);
            current.to_string()
        }
        Action::Decide(f) => f(),
        Action::DecideWith(f) => f(args),
        Action::Hook(_) => invalid_shape(action, current, event),
    };

    tracing::trace!(state = current, event, shape = action.shape(), next = %next, "action dispatched");
    next
}

/// Run the lifecycle hook stored under `event` in `state`, if any.
pub(crate) fn run_hook(
    action: Option<&Action>,
    machine: &Machine,
    metadata: &Metadata,
    state: &str,
    event: &str,
) {
    let Some(action) = action else {
        return;
    };

    match action {
        Action::Stay => {}
        Action::Hook(Hook::Plain(f)) => f(),
        Action::Hook(Hook::WithMachine(f)) => f(machine),
        Action::Hook(Hook::WithMetadata(f)) => f(metadata),
        Action::Hook(Hook::Full(f)) => f(machine, metadata),
        Action::Goto(_)
        | Action::Run(_)
        | Action::RunWith(_)
        | Action::Decide(_)
        | Action::DecideWith(_) => invalid_shape(action, state, event),
    }
}

fn invalid_shape(action: &Action, state: &str, event: &str) -> ! {
    tracing::error!(
        state,
        event,
        shape = action.shape(),
        "invalid action shape in transition table"
    );
    panic!(
        "invalid type for action {event:?} on state {state:?}: {} is not allowed here",
        action.shape()
    )
}
