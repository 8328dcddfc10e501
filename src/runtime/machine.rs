//! The thread-safe state machine.

use crate::builder::BuildError;
use crate::core::{is_lifecycle, Action, Metadata, States, Transitions, ENTER, EXIT};
use crate::runtime::dispatch;
use crate::runtime::error::MachineError;
use crate::runtime::subscription::{Callback, Subscribers, Subscription};
use parking_lot::{ReentrantMutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Everything guarded by the machine's reader/writer lock.
struct Core {
    current: String,
    states: States,
    subscribers: Subscribers,
}

pub(crate) struct Shared {
    id: Uuid,
    core: RwLock<Core>,
    /// Serializes transitions and initial subscriber deliveries. Reentrant so
    /// user code running on the transitioning thread may call back in.
    sequencer: ReentrantMutex<()>,
    last_key: AtomicU64,
}

impl Shared {
    pub(crate) fn unsubscribe(&self, key: u64) {
        if self.core.write().subscribers.remove(key) {
            tracing::trace!(machine = %self.id, key, "subscription cancelled");
        }
    }

    pub(crate) fn is_subscribed(&self, key: u64) -> bool {
        self.core.read().subscribers.contains(key)
    }
}

/// A finite state machine over string-named states and events.
///
/// `Machine` is a handle: cloning it is cheap and every clone drives the same
/// machine. All methods take `&self` and are safe to call from any number of
/// threads at once.
///
/// No lock on the state table is held while user code runs. Actions, hooks
/// and subscriber callbacks may therefore call back into the machine. A whole
/// transition (action, `@exit`, state swap, notifications, `@enter`) is
/// serialized per machine; calls made from inside it on the same thread
/// proceed immediately, calls from other threads wait for it to finish.
/// The relative order of such nested transitions is up to the caller.
///
/// # Example
///
/// ```rust
/// use statewise::{states, Machine};
///
/// let switch = Machine::new("off", states! {
///     "off" => { "toggle" => "on" },
///     "on" => { "toggle" => "off" },
/// });
///
/// assert_eq!(switch.fire("toggle").unwrap(), "on");
/// assert_eq!(switch.fire("toggle").unwrap(), "off");
/// assert!(switch.state_exists("on"));
/// assert!(!switch.state_exists("broken"));
/// ```
#[derive(Clone)]
pub struct Machine {
    shared: Arc<Shared>,
}

impl Machine {
    /// Create a machine in `initial` and run that state's `@enter` hook.
    ///
    /// # Panics
    ///
    /// Panics if `initial` is not a key of `states`. Use
    /// [`Machine::try_new`] or [`MachineBuilder`](crate::MachineBuilder) to
    /// get an error instead.
    pub fn new(initial: impl Into<String>, states: States) -> Self {
        match Self::try_new(initial, states) {
            Ok(machine) => machine,
            Err(err) => {
                tracing::error!(%err, "cannot construct machine");
                panic!("{err}")
            }
        }
    }

    /// Create a machine, reporting a missing initial state as an error.
    pub fn try_new(initial: impl Into<String>, states: States) -> Result<Self, BuildError> {
        let initial = initial.into();
        if !states.contains(&initial) {
            return Err(BuildError::UnknownInitialState { state: initial });
        }

        let enter = states.action(&initial, ENTER).cloned();
        let machine = Machine {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                core: RwLock::new(Core {
                    current: initial.clone(),
                    states,
                    subscribers: Subscribers::default(),
                }),
                sequencer: ReentrantMutex::new(()),
                last_key: AtomicU64::new(0),
            }),
        };
        tracing::debug!(machine = %machine.id(), state = %initial, "machine created");

        {
            let _turn = machine.shared.sequencer.lock();
            let metadata = Metadata::initial(&initial);
            dispatch::run_hook(enter.as_ref(), &machine, &metadata, &initial, ENTER);
        }

        Ok(machine)
    }

    /// Identifier used to tell machines apart in logs.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// The current state name.
    pub fn current_state(&self) -> String {
        self.shared.core.read().current.clone()
    }

    /// Every state name in the table, in no particular order.
    pub fn list_states(&self) -> Vec<String> {
        self.shared
            .core
            .read()
            .states
            .names()
            .map(str::to_string)
            .collect()
    }

    /// Whether `name` is a key of the state table.
    pub fn state_exists(&self, name: &str) -> bool {
        self.shared.core.read().states.contains(name)
    }

    /// Add a state. Fails if a state with the same name exists, leaving the
    /// existing table untouched.
    pub fn add_state(
        &self,
        name: impl Into<String>,
        transitions: Transitions,
    ) -> Result<(), MachineError> {
        let name = name.into();
        let mut core = self.shared.core.write();
        if core.states.contains(&name) {
            return Err(MachineError::DuplicateState { name });
        }
        tracing::trace!(machine = %self.id(), state = %name, "state added");
        core.states.insert(name, transitions);
        Ok(())
    }

    /// Add a state, replacing any previous transitions for it wholesale.
    pub fn set_state(&self, name: impl Into<String>, transitions: Transitions) {
        let name = name.into();
        tracing::trace!(machine = %self.id(), state = %name, "state set");
        self.shared.core.write().states.insert(name, transitions);
    }

    /// Add a state, or merge into an existing one with incoming entries
    /// winning on collision.
    pub fn merge_state(&self, name: impl Into<String>, transitions: Transitions) {
        let name = name.into();
        tracing::trace!(machine = %self.id(), state = %name, "state merged");
        self.shared.core.write().states.merge(name, transitions);
    }

    /// Fire `event` without arguments. See [`Machine::fire_with`].
    pub fn fire(&self, event: &str) -> Result<String, MachineError> {
        self.fire_with(event, &[])
    }

    /// Fire `event` from the current state, passing `args` to the action.
    ///
    /// Returns the state the machine is in when this call finishes, which
    /// includes any transitions fired on the same thread by the action or
    /// hooks.
    ///
    /// If the action leaves the state unchanged no hooks run and no
    /// subscriber is notified. Otherwise the old state's `@exit` runs, the
    /// state is swapped, every subscriber is notified with the new name, and
    /// the new state's `@enter` runs.
    ///
    /// Target states are not validated: an action may move the machine into
    /// a name absent from the table, after which every event reports
    /// [`MachineError::NoSuchAction`].
    ///
    /// # Errors
    ///
    /// [`MachineError::LifecycleInvocation`] for `@enter`/`@exit`, and
    /// [`MachineError::NoSuchAction`] for events the current state does not
    /// define. The machine is unchanged in both cases.
    ///
    /// # Panics
    ///
    /// Panics if the table holds a shape that is illegal in its position.
    /// Panics raised by user code propagate unchanged.
    pub fn fire_with(&self, event: &str, args: &[Value]) -> Result<String, MachineError> {
        let _turn = self.shared.sequencer.lock();

        let (from, action) = self.resolve(event)?;
        let to = dispatch::dispatch(&action, &from, event, args);
        if to == from {
            return Ok(self.current_state());
        }

        let metadata = Metadata::transition(&from, &to, event, args);
        let exit = self.hook(&from, EXIT);
        dispatch::run_hook(exit.as_ref(), self, &metadata, &from, EXIT);

        let (subscribers, enter) = self.commit(&to);
        tracing::debug!(
            machine = %self.id(),
            from = %from,
            to = %to,
            event,
            "state transition committed"
        );

        for callback in &subscribers {
            callback(&to);
        }
        dispatch::run_hook(enter.as_ref(), self, &metadata, &to, ENTER);

        // Read under the sequencer: only same-thread nested fires can have
        // moved the machine since the commit.
        Ok(self.current_state())
    }

    /// Register `callback` and deliver the current state to it once.
    ///
    /// After that, the callback receives the new state name for every
    /// transition that commits later, until the returned
    /// [`Subscription`] is cancelled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewise::{states, Machine};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let turnstile = Machine::new("locked", states! {
    ///     "locked" => { "pay" => "unlocked" },
    ///     "unlocked" => { "push" => "locked" },
    /// });
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    /// let subscription = turnstile.subscribe(move |state| {
    ///     sink.lock().unwrap().push(state.to_string());
    /// });
    ///
    /// turnstile.fire("pay").unwrap();
    /// subscription.cancel();
    /// turnstile.fire("push").unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec!["locked", "unlocked"]);
    /// ```
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let key = self.shared.last_key.fetch_add(1, Ordering::Relaxed) + 1;
        let callback: Callback = Arc::new(callback);

        let _turn = self.shared.sequencer.lock();
        let current = {
            let mut core = self.shared.core.write();
            core.subscribers.insert(key, Arc::clone(&callback));
            core.current.clone()
        };
        tracing::trace!(machine = %self.id(), key, "subscription registered");

        callback(&current);
        Subscription::new(key, Arc::downgrade(&self.shared))
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.core.read().subscribers.len()
    }

    /// Snapshot the current state and the action mapped to `event`.
    fn resolve(&self, event: &str) -> Result<(String, Action), MachineError> {
        let core = self.shared.core.read();

        if is_lifecycle(event) {
            tracing::debug!(machine = %self.id(), event, "lifecycle event fired directly");
            return Err(MachineError::LifecycleInvocation {
                event: event.to_string(),
                state: core.current.clone(),
            });
        }

        match core.states.action(&core.current, event) {
            Some(action) => Ok((core.current.clone(), action.clone())),
            None => {
                tracing::debug!(
                    machine = %self.id(),
                    state = %core.current,
                    event,
                    "no such action for current state"
                );
                Err(MachineError::NoSuchAction {
                    event: event.to_string(),
                    state: core.current.clone(),
                })
            }
        }
    }

    fn hook(&self, state: &str, event: &str) -> Option<Action> {
        self.shared.core.read().states.action(state, event).cloned()
    }

    /// Swap in the new state and snapshot what runs after the swap.
    fn commit(&self, to: &str) -> (Vec<Callback>, Option<Action>) {
        let mut core = self.shared.core.write();
        core.current = to.to_string();
        let enter = core.states.action(to, ENTER).cloned();
        (core.subscribers.snapshot(), enter)
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.shared.core.read();
        f.debug_struct("Machine")
            .field("id", &self.shared.id)
            .field("current", &core.current)
            .field("states", &core.states.len())
            .field("subscribers", &core.subscribers.len())
            .finish()
    }
}
