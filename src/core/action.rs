//! Action shapes a transition table entry may hold.
//!
//! An [`Action`] is a closed set of callable shapes. Ordinary events accept
//! every shape except [`Action::Hook`]; the `@enter` and `@exit` lifecycle
//! events accept only [`Action::Stay`] and [`Action::Hook`]. A no-argument
//! procedure stored under a lifecycle event is kept as [`Hook::Plain`].
//! A shape in the wrong position is a defect in the table and panics when it
//! is dispatched.

use crate::core::metadata::Metadata;
use crate::runtime::Machine;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Lifecycle event run when a state is entered.
pub const ENTER: &str = "@enter";

/// Lifecycle event run when a state is left.
pub const EXIT: &str = "@exit";

/// Returns `true` for the reserved `@enter` and `@exit` event names.
pub fn is_lifecycle(event: &str) -> bool {
    event == ENTER || event == EXIT
}

/// Side effect with no inputs.
pub type Procedure = Arc<dyn Fn() + Send + Sync>;

/// Side effect receiving the caller's arguments.
pub type ArgsProcedure = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Computes the next state name.
pub type Decision = Arc<dyn Fn() -> String + Send + Sync>;

/// Computes the next state name from the caller's arguments.
pub type ArgsDecision = Arc<dyn Fn(&[Value]) -> String + Send + Sync>;

/// Payload of a single transition table entry.
///
/// # Example
///
/// ```rust
/// use statewise::{Action, Transitions};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let presses = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&presses);
///
/// let transitions = Transitions::new()
///     .on("toggle", "on")
///     .on("push", Action::Stay)
///     .on("press", Action::run(move || {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }))
///     .on("route", Action::decide_with(|args| {
///         args.first()
///             .and_then(|v| v.as_str())
///             .unwrap_or("off")
///             .to_string()
///     }));
///
/// assert_eq!(transitions.len(), 4);
/// ```
#[derive(Clone)]
pub enum Action {
    /// No-op: the machine stays where it is.
    Stay,

    /// Unconditional transition to the named state.
    Goto(String),

    /// Runs a side effect; the state is unchanged. Arguments are discarded.
    Run(Procedure),

    /// Runs a side effect with the caller's arguments; the state is unchanged.
    RunWith(ArgsProcedure),

    /// Runs and transitions to the returned state name.
    Decide(Decision),

    /// Runs with the caller's arguments and transitions to the returned name.
    DecideWith(ArgsDecision),

    /// Lifecycle-only shapes, valid under `@enter` and `@exit`.
    Hook(Hook),
}

impl Action {
    /// Unconditional transition to `state`.
    pub fn goto(state: impl Into<String>) -> Self {
        Action::Goto(state.into())
    }

    /// Side effect that leaves the state unchanged.
    pub fn run<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::Run(Arc::new(f))
    }

    /// Side effect given the caller's arguments; the state is unchanged.
    pub fn run_with<F>(f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Action::RunWith(Arc::new(f))
    }

    /// Transition to whatever state `f` returns.
    pub fn decide<F, S>(f: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        Action::Decide(Arc::new(move || f().into()))
    }

    /// Transition to whatever state `f` returns for the caller's arguments.
    pub fn decide_with<F, S>(f: F) -> Self
    where
        F: Fn(&[Value]) -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        Action::DecideWith(Arc::new(move |args: &[Value]| f(args).into()))
    }

    /// Short name of the shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Action::Stay => "stay",
            Action::Goto(_) => "goto",
            Action::Run(_) => "run",
            Action::RunWith(_) => "run_with",
            Action::Decide(_) => "decide",
            Action::DecideWith(_) => "decide_with",
            Action::Hook(hook) => hook.shape(),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Goto(target) => f.debug_tuple("Goto").field(target).finish(),
            other => write!(f, "Action({})", other.shape()),
        }
    }
}

impl From<&str> for Action {
    fn from(state: &str) -> Self {
        Action::Goto(state.to_string())
    }
}

impl From<String> for Action {
    fn from(state: String) -> Self {
        Action::Goto(state)
    }
}

impl From<Hook> for Action {
    fn from(hook: Hook) -> Self {
        Action::Hook(hook)
    }
}

/// Lifecycle hook shapes.
///
/// Hooks never change state and never see the caller's arguments directly;
/// they receive the synthesized [`Metadata`] and/or a handle to the machine.
///
/// # Example
///
/// ```rust
/// use statewise::{Hook, Machine, States, Transitions};
///
/// let machine = Machine::new(
///     "idle",
///     States::new().state(
///         "idle",
///         Transitions::new().on_enter(Hook::with_metadata(|meta| {
///             assert_eq!(meta.to, "idle");
///             assert!(meta.from.is_none());
///         })),
///     ),
/// );
///
/// assert_eq!(machine.current_state(), "idle");
/// ```
#[derive(Clone)]
pub enum Hook {
    /// No inputs. The only spelling of a no-argument hook.
    Plain(Procedure),
    WithMachine(Arc<dyn Fn(&Machine) + Send + Sync>),
    WithMetadata(Arc<dyn Fn(&Metadata) + Send + Sync>),
    Full(Arc<dyn Fn(&Machine, &Metadata) + Send + Sync>),
}

impl Hook {
    /// Hook with no inputs.
    pub fn plain<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Hook::Plain(Arc::new(f))
    }

    /// Hook receiving a handle to the machine that owns the state.
    ///
    /// The handle is cheap to clone, so the hook may move it into a spawned
    /// thread that drives the machine later.
    pub fn with_machine<F>(f: F) -> Self
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        Hook::WithMachine(Arc::new(f))
    }

    /// Hook receiving the transition [`Metadata`].
    pub fn with_metadata<F>(f: F) -> Self
    where
        F: Fn(&Metadata) + Send + Sync + 'static,
    {
        Hook::WithMetadata(Arc::new(f))
    }

    /// Hook receiving both the machine and the transition [`Metadata`].
    pub fn full<F>(f: F) -> Self
    where
        F: Fn(&Machine, &Metadata) + Send + Sync + 'static,
    {
        Hook::Full(Arc::new(f))
    }

    /// Short name of the shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Hook::Plain(_) => "hook",
            Hook::WithMachine(_) => "hook_with_machine",
            Hook::WithMetadata(_) => "hook_with_metadata",
            Hook::Full(_) => "hook_full",
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.shape())
    }
}
