//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder, the `states!` macro, and helpers
//! for common table shapes.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;

use crate::core::{States, Transitions};

/// Create a ring of states where `event` moves each state to the next one
/// and the last back to the first.
///
/// # Example
///
/// ```
/// use statewise::builder::cycle;
/// use statewise::Machine;
///
/// let light = Machine::new("red", cycle(&["red", "green", "yellow"], "change"));
///
/// assert_eq!(light.fire("change").unwrap(), "green");
/// assert_eq!(light.fire("change").unwrap(), "yellow");
/// assert_eq!(light.fire("change").unwrap(), "red");
/// ```
pub fn cycle(states: &[&str], event: &str) -> States {
    states
        .iter()
        .zip(states.iter().cycle().skip(1))
        .map(|(state, next)| (*state, Transitions::new().on(event, *next)))
        .collect()
}

/// Create two states that flip into each other on `event`.
///
/// # Example
///
/// ```
/// use statewise::builder::toggle;
/// use statewise::Machine;
///
/// let switch = Machine::new("off", toggle("off", "on", "toggle"));
/// assert_eq!(switch.fire("toggle").unwrap(), "on");
/// ```
pub fn toggle(a: &str, b: &str, event: &str) -> States {
    cycle(&[a, b], event)
}
