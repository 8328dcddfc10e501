//! Operational errors reported by a running machine.

use thiserror::Error;

/// Recoverable errors returned by [`Machine`](crate::Machine) operations.
///
/// None of these leave the machine partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("Calling lifecycle action '{event}' manually is illegal (current state '{state}')")]
    LifecycleInvocation { event: String, state: String },

    #[error("'{event}' is not a valid action for the current state '{state}'")]
    NoSuchAction { event: String, state: String },

    #[error("A state named '{name}' already exists")]
    DuplicateState { name: String },
}

impl MachineError {
    /// The state the machine was in when an event was rejected.
    ///
    /// `fire` never returns a state name alongside an error, so this is where
    /// callers find out where the machine ended up.
    pub fn current_state(&self) -> Option<&str> {
        match self {
            Self::LifecycleInvocation { state, .. } | Self::NoSuchAction { state, .. } => {
                Some(state)
            }
            Self::DuplicateState { .. } => None,
        }
    }
}
