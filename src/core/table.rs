//! Transition and state tables.

use crate::core::action::{is_lifecycle, Action, Hook, ENTER, EXIT};
use std::collections::hash_map::{self, HashMap};
use std::fmt;

/// Mapping from event name to [`Action`] for a single state.
///
/// Entries may be added or overwritten at any time. The fluent methods
/// consume and return the table so it can be declared inline.
///
/// # Example
///
/// ```rust
/// use statewise::{Hook, Transitions};
///
/// let locked = Transitions::new()
///     .on("pay", "unlocked")
///     .on_enter(Hook::plain(|| println!("locked")));
///
/// assert!(locked.contains("pay"));
/// assert!(locked.contains("@enter"));
/// assert!(!locked.contains("push"));
/// ```
#[derive(Clone, Default)]
pub struct Transitions {
    actions: HashMap<String, Action>,
}

impl Transitions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `event` to `action`, replacing any previous entry.
    pub fn on(mut self, event: impl Into<String>, action: impl Into<Action>) -> Self {
        self.insert(event, action);
        self
    }

    /// Set the `@enter` hook.
    pub fn on_enter(self, hook: Hook) -> Self {
        self.on(ENTER, hook)
    }

    /// Set the `@exit` hook.
    pub fn on_exit(self, hook: Hook) -> Self {
        self.on(EXIT, hook)
    }

    /// Insert an entry, returning the action it replaced.
    ///
    /// An [`Action::Run`] stored under `@enter` or `@exit` is kept as
    /// [`Hook::Plain`], the one spelling of a no-argument hook.
    pub fn insert(&mut self, event: impl Into<String>, action: impl Into<Action>) -> Option<Action> {
        let event = event.into();
        let action = match action.into() {
            Action::Run(f) if is_lifecycle(&event) => Action::Hook(Hook::Plain(f)),
            other => other,
        };
        self.actions.insert(event, action)
    }

    /// The action mapped to `event`, if any.
    pub fn get(&self, event: &str) -> Option<&Action> {
        self.actions.get(event)
    }

    /// Whether `event` has an entry.
    pub fn contains(&self, event: &str) -> bool {
        self.actions.contains_key(event)
    }

    /// Number of entries, lifecycle hooks included.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Event names in this table, in no particular order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Update this table key by key; incoming entries win on collision.
    pub fn merge(&mut self, incoming: Transitions) {
        self.actions.extend(incoming.actions);
    }
}

impl fmt::Debug for Transitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.actions.iter()).finish()
    }
}

impl<K, A> FromIterator<(K, A)> for Transitions
where
    K: Into<String>,
    A: Into<Action>,
{
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut transitions = Transitions::new();
        for (event, action) in iter {
            transitions.insert(event, action);
        }
        transitions
    }
}

impl IntoIterator for Transitions {
    type Item = (String, Action);
    type IntoIter = hash_map::IntoIter<String, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

/// Mapping from state name to its [`Transitions`].
///
/// # Example
///
/// ```rust
/// use statewise::{States, Transitions};
///
/// let states = States::new()
///     .state("off", Transitions::new().on("toggle", "on"))
///     .state("on", Transitions::new().on("toggle", "off"));
///
/// assert_eq!(states.len(), 2);
/// assert!(states.contains("on"));
/// ```
#[derive(Clone, Default)]
pub struct States {
    states: HashMap<String, Transitions>,
}

impl States {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a state, consuming and returning the table.
    pub fn state(mut self, name: impl Into<String>, transitions: Transitions) -> Self {
        self.insert(name, transitions);
        self
    }

    /// Add or replace a state wholesale, returning the table it replaced.
    pub fn insert(&mut self, name: impl Into<String>, transitions: Transitions) -> Option<Transitions> {
        self.states.insert(name.into(), transitions)
    }

    /// Merge `transitions` into an existing state, or insert it if absent.
    pub fn merge(&mut self, name: impl Into<String>, transitions: Transitions) {
        match self.states.entry(name.into()) {
            hash_map::Entry::Occupied(mut entry) => entry.get_mut().merge(transitions),
            hash_map::Entry::Vacant(entry) => {
                entry.insert(transitions);
            }
        }
    }

    /// The transitions of state `name`, if it exists.
    pub fn get(&self, name: &str) -> Option<&Transitions> {
        self.states.get(name)
    }

    /// Whether state `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Look up the action for `event` in state `name`.
    pub fn action(&self, name: &str, event: &str) -> Option<&Action> {
        self.states.get(name).and_then(|t| t.get(event))
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the table has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}

impl fmt::Debug for States {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.states.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Transitions)> for States {
    fn from_iter<I: IntoIterator<Item = (K, Transitions)>>(iter: I) -> Self {
        let mut states = States::new();
        for (name, transitions) in iter {
            states.insert(name, transitions);
        }
        states
    }
}

impl IntoIterator for States {
    type Item = (String, Transitions);
    type IntoIter = hash_map::IntoIter<String, Transitions>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}
