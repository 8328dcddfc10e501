//! Property-based tests for machine semantics.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated event sequences and tables.

use parking_lot::Mutex;
use proptest::prelude::*;
use statewise::builder::cycle;
use statewise::{Action, Machine, MachineError, States, Transitions};
use std::collections::HashMap;
use std::sync::Arc;

const RING: [&str; 3] = ["a", "b", "c"];

fn ring_machine() -> Machine {
    Machine::new("a", cycle(&RING, "next"))
}

prop_compose! {
    fn arbitrary_event()(variant in 0..4u8) -> &'static str {
        match variant {
            0 | 1 => "next",
            2 => "jump",
            _ => "@enter",
        }
    }
}

prop_compose! {
    fn arbitrary_table()(
        entries in prop::collection::hash_map("[a-e]", "[v-z]", 0..5)
    ) -> HashMap<String, String> {
        entries
    }
}

fn to_transitions(entries: &HashMap<String, String>) -> Transitions {
    entries
        .iter()
        .map(|(event, target)| (event.clone(), target.clone()))
        .collect()
}

proptest! {
    #[test]
    fn current_state_follows_model(events in prop::collection::vec(arbitrary_event(), 0..30)) {
        let machine = ring_machine();
        let mut position = 0usize;

        for event in events {
            let before = machine.current_state();
            let result = machine.fire(event);

            if event == "next" {
                position = (position + 1) % RING.len();
                prop_assert_eq!(result, Ok(RING[position].to_string()));
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(machine.current_state(), before);
            }
            prop_assert_eq!(machine.current_state(), RING[position]);
        }
    }

    #[test]
    fn rejected_events_report_current_state(steps in 0..6usize) {
        let machine = ring_machine();
        for _ in 0..steps {
            machine.fire("next").unwrap();
        }
        let current = machine.current_state();

        for event in ["@enter", "@exit", "undefined"] {
            let err = machine.fire(event).unwrap_err();
            prop_assert_eq!(err.current_state(), Some(current.as_str()));
        }
        prop_assert_eq!(machine.current_state(), current);
    }

    #[test]
    fn merge_state_is_union_with_incoming_winning(
        existing in arbitrary_table(),
        incoming in arbitrary_table(),
    ) {
        let mut expected = existing.clone();
        expected.extend(incoming.clone());

        for (event, target) in &expected {
            let machine = Machine::new("s", States::new().state("s", to_transitions(&existing)));
            machine.merge_state("s", to_transitions(&incoming));
            prop_assert_eq!(machine.fire(event), Ok(target.clone()));
        }

        let machine = Machine::new("s", States::new().state("s", to_transitions(&existing)));
        machine.merge_state("s", to_transitions(&incoming));
        prop_assert!(matches!(
            machine.fire("not-an-event"),
            Err(MachineError::NoSuchAction { .. })
        ), "expected NoSuchAction for unknown event");
    }

    #[test]
    fn add_state_never_overwrites(existing in arbitrary_table(), incoming in arbitrary_table()) {
        let machine = Machine::new("s", States::new().state("s", to_transitions(&existing)));

        let err = machine.add_state("s", to_transitions(&incoming)).unwrap_err();
        prop_assert_eq!(err, MachineError::DuplicateState { name: "s".to_string() });

        for event in incoming.keys().filter(|k| !existing.contains_key(*k)) {
            let rejected = matches!(machine.fire(event), Err(MachineError::NoSuchAction { .. }));
            prop_assert!(rejected);
        }
    }

    #[test]
    fn set_state_replaces_wholesale(existing in arbitrary_table(), incoming in arbitrary_table()) {
        let machine = Machine::new("s", States::new().state("s", to_transitions(&existing)));
        machine.set_state("s", to_transitions(&incoming));

        for event in existing.keys().filter(|k| !incoming.contains_key(*k)) {
            let rejected = matches!(machine.fire(event), Err(MachineError::NoSuchAction { .. }));
            prop_assert!(rejected);
        }
    }

    #[test]
    fn subscriber_sees_exactly_committed_transitions(
        before in 0..5usize,
        during in 0..8usize,
        after in 0..5usize,
    ) {
        let machine = ring_machine();
        for _ in 0..before {
            machine.fire("next").unwrap();
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = machine.subscribe(move |state| sink.lock().push(state.to_string()));

        let mut expected = vec![machine.current_state()];
        for _ in 0..during {
            expected.push(machine.fire("next").unwrap());
        }
        subscription.cancel();
        for _ in 0..after {
            machine.fire("next").unwrap();
        }

        prop_assert_eq!(&*seen.lock(), &expected);
    }

    #[test]
    fn no_op_actions_never_notify(repeats in 1..10usize) {
        let machine = Machine::new(
            "locked",
            States::new().state(
                "locked",
                Transitions::new()
                    .on("push", Action::Stay)
                    .on("rattle", "locked"),
            ),
        );

        let seen = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&seen);
        let _subscription = machine.subscribe(move |_| *sink.lock() += 1);

        for i in 0..repeats {
            let event = if i % 2 == 0 { "push" } else { "rattle" };
            prop_assert_eq!(machine.fire(event), Ok("locked".to_string()));
        }
        prop_assert_eq!(*seen.lock(), 1);
    }
}
