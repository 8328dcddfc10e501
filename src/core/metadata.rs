//! Transition metadata handed to lifecycle hooks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of a single transition.
///
/// A fresh value is built for every transition and shared by the `@exit`
/// hook of the old state and the `@enter` hook of the new one. The initial
/// `@enter` run at construction sees a degenerate record with no `from` and
/// no `event`.
///
/// # Example
///
/// ```rust
/// use statewise::Metadata;
/// use serde_json::json;
///
/// let meta = Metadata {
///     from: Some("off".to_string()),
///     to: "on".to_string(),
///     event: Some("toggle".to_string()),
///     args: vec![json!(42)],
/// };
///
/// assert!(!meta.is_initial());
/// assert_eq!(meta.args[0], json!(42));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// The state the transition started from, `None` for the initial entry
    pub from: Option<String>,
    /// The state the transition ends in
    pub to: String,
    /// The event that caused the transition, `None` for the initial entry
    pub event: Option<String>,
    /// Arguments passed to the triggering action
    pub args: Vec<Value>,
}

impl Metadata {
    /// Metadata for the `@enter` run when a machine is constructed.
    pub(crate) fn initial(state: &str) -> Self {
        Self {
            from: None,
            to: state.to_string(),
            event: None,
            args: Vec::new(),
        }
    }

    pub(crate) fn transition(from: &str, to: &str, event: &str, args: &[Value]) -> Self {
        Self {
            from: Some(from.to_string()),
            to: to.to_string(),
            event: Some(event.to_string()),
            args: args.to_vec(),
        }
    }

    /// True for the record synthesized at construction time.
    pub fn is_initial(&self) -> bool {
        self.from.is_none() && self.event.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_metadata_has_no_origin() {
        let meta = Metadata::initial("off");

        assert_eq!(meta.from, None);
        assert_eq!(meta.to, "off");
        assert_eq!(meta.event, None);
        assert!(meta.args.is_empty());
        assert!(meta.is_initial());
    }

    #[test]
    fn transition_metadata_copies_arguments() {
        let args = vec![json!("a"), json!(1)];
        let meta = Metadata::transition("off", "on", "toggle", &args);

        assert_eq!(meta.from.as_deref(), Some("off"));
        assert_eq!(meta.to, "on");
        assert_eq!(meta.event.as_deref(), Some("toggle"));
        assert_eq!(meta.args, args);
        assert!(!meta.is_initial());
    }

    #[test]
    fn metadata_serializes_correctly() {
        let meta = Metadata::transition("locked", "unlocked", "pay", &[json!({"coins": 1})]);

        let encoded = serde_json::to_string(&meta).unwrap();
        let decoded: Metadata = serde_json::from_str(&encoded).unwrap();

        assert_eq!(meta, decoded);
    }
}
