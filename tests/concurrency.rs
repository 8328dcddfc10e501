//! Concurrency tests: many threads and tasks driving one machine.

use parking_lot::Mutex;
use statewise::builder::cycle;
use statewise::{states, Hook, Machine, Transitions};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WORKERS: usize = 8;
const ROUNDS: usize = 200;
const BLINKS: usize = 5;

fn ring() -> Machine {
    Machine::new("a", cycle(&["a", "b", "c"], "next"))
}

fn successor(state: &str) -> &'static str {
    match state {
        "a" => "b",
        "b" => "c",
        "c" => "a",
        other => panic!("unknown state {other}"),
    }
}

#[test]
fn concurrent_fire_commits_every_transition() {
    let machine = ring();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    let _subscription = machine.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    thread::scope(|scope| {
        for _ in 0..WORKERS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    machine.fire("next").unwrap();
                }
            });
        }
    });

    let total = WORKERS * ROUNDS;
    assert_eq!(notified.load(Ordering::SeqCst), total + 1);
    assert_eq!(machine.current_state(), ["a", "b", "c"][total % 3]);
}

#[test]
fn readers_never_observe_unknown_state() {
    let machine = ring();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..WORKERS * ROUNDS {
                machine.fire("next").unwrap();
            }
            done.store(true, Ordering::SeqCst);
        });

        for i in 0..WORKERS {
            let machine = &machine;
            let done = &done;
            scope.spawn(move || {
                loop {
                    let current = machine.current_state();
                    assert!(machine.state_exists(&current), "unknown state {current}");
                    assert!(machine.list_states().len() >= 3);
                    machine.merge_state(format!("extra-{i}"), Transitions::new());
                    let _ = machine.add_state(format!("extra-{i}"), Transitions::new());
                    machine.set_state(format!("spare-{}", i % 2), Transitions::new());
                    if done.load(Ordering::SeqCst) {
                        break;
                    }
                }
            });
        }
    });

    assert!(machine.state_exists("extra-0"));
}

#[test]
fn subscribe_and_cancel_race_with_transitions() {
    let machine = ring();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            while !done.load(Ordering::SeqCst) {
                machine.fire("next").unwrap();
            }
        });

        let mut workers = Vec::new();
        for _ in 0..WORKERS {
            workers.push(scope.spawn(|| {
                for _ in 0..ROUNDS / 4 {
                    let seen = Arc::new(Mutex::new(Vec::new()));
                    let sink = Arc::clone(&seen);
                    let subscription =
                        machine.subscribe(move |state| sink.lock().push(state.to_string()));
                    thread::yield_now();
                    subscription.cancel();

                    let seen = seen.lock();
                    assert!(!seen.is_empty(), "initial state was not delivered");
                    for pair in seen.windows(2) {
                        assert_eq!(pair[1], successor(&pair[0]), "gap or repeat in {seen:?}");
                    }
                }
            }));
        }

        for worker in workers {
            worker.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
    });

    assert_eq!(machine.subscriber_count(), 0);
}

#[test]
fn cancelled_subscriber_receives_nothing_further() {
    let machine = ring();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let subscription = machine.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    subscription.cancel();

    thread::scope(|scope| {
        for _ in 0..WORKERS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    machine.fire("next").unwrap();
                }
            });
        }
    });

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

/// Re-fires `toggle` from a fresh thread on every entry, up to `BLINKS` times.
fn blink(counter: Arc<AtomicUsize>) -> Hook {
    Hook::with_machine(move |machine| {
        if counter.fetch_add(1, Ordering::SeqCst) < BLINKS {
            let machine = machine.clone();
            thread::spawn(move || {
                machine.fire("toggle").unwrap();
            });
        }
    })
}

#[test]
fn hook_may_drive_machine_from_another_thread() {
    let entries = Arc::new(AtomicUsize::new(0));

    let led = Machine::new(
        "off",
        states! {
            "off" => { "toggle" => "on", "@enter" => blink(Arc::clone(&entries)) },
            "on" => { "toggle" => "off", "@enter" => blink(Arc::clone(&entries)) },
        },
    );

    let mut waited = 0;
    while entries.load(Ordering::SeqCst) <= BLINKS && waited < 1000 {
        thread::sleep(Duration::from_millis(5));
        waited += 1;
    }

    assert_eq!(entries.load(Ordering::SeqCst), BLINKS + 1);
    assert_eq!(led.current_state(), if BLINKS % 2 == 1 { "on" } else { "off" });
}

#[test]
fn separate_machines_do_not_share_subscribers() {
    let first = ring();
    let second = ring();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = first.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    second.fire("next").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.subscriber_count(), 0);
    assert_ne!(first.id(), second.id());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn blocking_tasks_share_one_machine() {
    let machine = ring();
    let mut handles = Vec::new();

    for _ in 0..WORKERS {
        let machine = machine.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for _ in 0..ROUNDS {
                machine.fire("next").unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(machine.current_state(), ["a", "b", "c"][(WORKERS * ROUNDS) % 3]);
}
