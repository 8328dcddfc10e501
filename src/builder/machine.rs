//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::core::{States, Transitions};
use crate::runtime::Machine;

/// Builder for constructing machines with a fluent API.
///
/// Unlike [`Machine::new`], a missing or unknown initial state is reported
/// as a [`BuildError`].
#[derive(Debug, Default)]
pub struct MachineBuilder {
    initial: Option<String>,
    states: States,
}

impl MachineBuilder {
    /// Start with no initial state and an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add or replace a state.
    pub fn state(mut self, name: impl Into<String>, transitions: Transitions) -> Self {
        self.states.insert(name, transitions);
        self
    }

    /// Add or merge a state, incoming entries winning on collision.
    pub fn merge_state(mut self, name: impl Into<String>, transitions: Transitions) -> Self {
        self.states.merge(name, transitions);
        self
    }

    /// Add every state of `states`, replacing same-named ones.
    pub fn states(mut self, states: States) -> Self {
        for (name, transitions) in states {
            self.states.insert(name, transitions);
        }
        self
    }

    /// Build the machine and run the initial state's `@enter` hook.
    pub fn build(self) -> Result<Machine, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        Machine::try_new(initial, self.states)
    }
}
