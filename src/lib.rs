//! Statewise: a thread-safe finite state machine over named states
//!
//! A machine is built from an initial state name and a table mapping every
//! state to its transitions. Firing an event runs the action mapped to it in
//! the current state; if the action leads somewhere else, the old state's
//! `@exit` hook runs, the state is swapped, subscribers are notified, and the
//! new state's `@enter` hook runs.
//!
//! # Core Concepts
//!
//! - **Actions**: A closed set of shapes, from a plain target name to
//!   closures that pick the next state from the caller's arguments
//! - **Hooks**: `@enter`/`@exit` callbacks receiving transition metadata
//! - **Subscriptions**: Observers notified of every committed transition
//!
//! Every `Machine` method takes `&self` and may be called from many threads
//! at once. User code never runs under the table lock, so actions, hooks and
//! subscribers may call back into the machine.
//!
//! # Example
//!
//! ```rust
//! use statewise::{states, Hook, Machine};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let switched_on = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&switched_on);
//!
//! let lamp = Machine::new("off", states! {
//!     "off" => { "toggle" => "on" },
//!     "on" => {
//!         "toggle" => "off",
//!         "@enter" => Hook::with_metadata(move |meta| {
//!             assert_eq!(meta.from.as_deref(), Some("off"));
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         }),
//!     },
//! });
//!
//! lamp.fire("toggle").unwrap();
//! lamp.fire("toggle").unwrap();
//!
//! assert_eq!(lamp.current_state(), "off");
//! assert_eq!(switched_on.load(Ordering::SeqCst), 1);
//! assert!(lamp.fire("@enter").is_err());
//! ```

pub mod builder;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::core::{Action, Hook, Metadata, States, Transitions, ENTER, EXIT};
pub use crate::runtime::{Machine, MachineError, Subscription};
