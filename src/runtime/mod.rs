//! The running machine: dispatch, locking, and subscriptions.
//!
//! This module is the imperative shell around the plain tables in `core`.
//! It owns all shared mutable state and every call into user code.
//!
//! # Key Concepts
//!
//! - **Machine**: cloneable handle over one per-instance reader/writer lock
//! - **Dispatch**: exhaustive match over the closed set of action shapes
//! - **Subscriptions**: callbacks keyed by a per-machine counter
//!
//! No lock on the table is held while actions, hooks or subscribers run.

mod dispatch;
mod error;
mod machine;
mod subscription;

pub use error::MachineError;
pub use machine::Machine;
pub use subscription::{Callback, Subscription};
