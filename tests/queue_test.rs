//! Queued command lifecycle integration tests.
//!
//! Exercises the manager directly: supersession, stale timers, and the
//! per-actor single-slot invariant.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tiller::command::QueuedExecution;
use tiller::host::{ActorId, MockScheduler};
use tiller::QueuedCommandManager;

struct Probe {
    confirmed: Arc<AtomicUsize>,
    expired: Arc<AtomicUsize>,
}

impl Probe {
    fn new() -> Self {
        Self {
            confirmed: Arc::new(AtomicUsize::new(0)),
            expired: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn execution(&self, expires_after: Duration) -> QueuedExecution {
        let confirmed = Arc::clone(&self.confirmed);
        let expired = Arc::clone(&self.expired);
        QueuedExecution {
            on_confirm: Box::new(move || {
                confirmed.fetch_add(1, Ordering::SeqCst);
            }),
            on_expire: Box::new(move || {
                expired.fetch_add(1, Ordering::SeqCst);
            }),
            expires_after,
            prompt: None,
        }
    }
}

fn setup() -> (QueuedCommandManager, Arc<MockScheduler>) {
    let scheduler = Arc::new(MockScheduler::new());
    let manager = QueuedCommandManager::new(Arc::clone(&scheduler) as _, "/mv confirm");
    (manager, scheduler)
}

#[test]
fn slot_transitions_empty_to_queued_to_confirmed() {
    let (manager, _scheduler) = setup();
    let probe = Probe::new();
    let actor = ActorId::new("console");

    assert!(!manager.is_queued(&actor));
    manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));
    assert!(manager.is_queued(&actor));

    assert!(manager.confirm(&actor));
    assert!(!manager.is_queued(&actor));
    assert_eq!(probe.confirmed.load(Ordering::SeqCst), 1);
    assert_eq!(probe.expired.load(Ordering::SeqCst), 0);
}

#[test]
fn slot_transitions_queued_to_expired() {
    let (manager, scheduler) = setup();
    let probe = Probe::new();
    let actor = ActorId::new("console");

    manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));
    scheduler.advance(Duration::from_secs(10));

    assert!(!manager.is_queued(&actor));
    assert_eq!(probe.expired.load(Ordering::SeqCst), 1);
    assert!(!manager.confirm(&actor));
}

#[test]
fn supersession_never_runs_the_old_expire_callback() {
    let (manager, scheduler) = setup();
    let first = Probe::new();
    let second = Probe::new();
    let actor = ActorId::new("console");

    manager.enqueue(&actor, first.execution(Duration::from_secs(10)));
    manager.enqueue(&actor, second.execution(Duration::from_secs(60)));

    scheduler.advance(Duration::from_secs(30));
    assert_eq!(first.expired.load(Ordering::SeqCst), 0);
    assert_eq!(first.confirmed.load(Ordering::SeqCst), 0);

    assert!(manager.confirm(&actor));
    assert_eq!(second.confirmed.load(Ordering::SeqCst), 1);
}

#[test]
fn each_actor_gets_an_independent_window() {
    let (manager, scheduler) = setup();
    let fast = Probe::new();
    let slow = Probe::new();
    let hare = ActorId::new("hare");
    let tortoise = ActorId::new("tortoise");

    manager.enqueue(&hare, fast.execution(Duration::from_secs(5)));
    manager.enqueue(&tortoise, slow.execution(Duration::from_secs(50)));

    scheduler.advance(Duration::from_secs(10));
    assert_eq!(fast.expired.load(Ordering::SeqCst), 1);
    assert!(manager.is_queued(&tortoise));

    assert!(manager.confirm(&tortoise));
    assert_eq!(slow.confirmed.load(Ordering::SeqCst), 1);
}

#[test]
fn prompt_reports_the_confirmation_window() {
    let (manager, _scheduler) = setup();
    let probe = Probe::new();
    let prompt = manager.enqueue(&ActorId::new("console"), probe.execution(Duration::from_secs(90)));
    assert!(prompt.contains("/mv confirm"));
    assert!(prompt.contains("1 minute 30 seconds"));
}
