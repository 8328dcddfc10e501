//! Core data types of the state machine.
//!
//! This module holds the plain data the engine works on:
//! - Action shapes via the `Action` and `Hook` enums
//! - Transition metadata handed to lifecycle hooks
//! - Transition and state tables
//!
//! Nothing here takes locks or runs user code; see `runtime` for that.

mod action;
mod metadata;
mod table;

pub use action::{
    is_lifecycle, Action, ArgsDecision, ArgsProcedure, Decision, Hook, Procedure, ENTER, EXIT,
};
pub use metadata::Metadata;
pub use table::{States, Transitions};
