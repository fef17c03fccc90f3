//! Queued command lifecycle.
//!
//! A queueable command does not run its real work when dispatched; it
//! parks a confirm/expire callback pair in a per-actor slot and waits.
//! The actor either confirms within the window (the confirm callback
//! runs) or the scheduler-driven timer fires first (the expire callback
//! runs). Each actor holds at most one slot; queueing a new command
//! silently discards the old one without running its expire callback.

pub mod duration;

pub use duration::humanize;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::command::QueuedExecution;
use crate::host::{ActorId, Scheduler, TaskHandle};

struct QueuedSlot {
    /// Distinguishes this occupancy from earlier ones in the same slot;
    /// the scheduled expiration only acts if the id still matches.
    id: u64,
    on_confirm: Box<dyn FnOnce() + Send>,
    on_expire: Box<dyn FnOnce() + Send>,
    queued_at: DateTime<Utc>,
    /// Set once the expiration timer is armed; the slot is inserted
    /// before the timer exists so a fast timer can never miss it.
    task: Option<TaskHandle>,
}

type SlotMap = Arc<Mutex<HashMap<ActorId, QueuedSlot>>>;

/// Tracks at most one pending confirmable command per actor.
pub struct QueuedCommandManager {
    slots: SlotMap,
    scheduler: Arc<dyn Scheduler>,
    confirm_command: String,
    next_id: AtomicU64,
}

impl QueuedCommandManager {
    /// Create a manager.
    ///
    /// `confirm_command` is the exact text an actor types to confirm
    /// (e.g. `/mv confirm`); it appears in the default prompt.
    pub fn new(scheduler: Arc<dyn Scheduler>, confirm_command: &str) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            scheduler,
            confirm_command: confirm_command.to_string(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Park `execution` in the actor's slot and schedule its expiration.
    ///
    /// Any command already queued for the actor is discarded without
    /// running its expire callback. Returns the prompt to show the
    /// actor.
    pub fn enqueue(&self, actor: &ActorId, execution: QueuedExecution) -> String {
        let QueuedExecution {
            on_confirm,
            on_expire,
            expires_after,
            prompt,
        } = execution;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let slot = QueuedSlot {
            id,
            on_confirm,
            on_expire,
            queued_at: Utc::now(),
            task: None,
        };
        let superseded = self.slots.lock().unwrap().insert(actor.clone(), slot);
        if let Some(old) = superseded {
            debug!(%actor, "superseding queued command");
            if let Some(task) = old.task {
                self.scheduler.cancel(task);
            }
        }

        let slots = Arc::clone(&self.slots);
        let expire_actor = actor.clone();
        let task = self.scheduler.run_after(
            expires_after,
            Box::new(move || Self::expire(&slots, &expire_actor, id)),
        );
        let stale = {
            let mut map = self.slots.lock().unwrap();
            match map.get_mut(actor) {
                Some(slot) if slot.id == id => {
                    slot.task = Some(task);
                    false
                }
                // Confirmed or superseded while the timer was being armed.
                _ => true,
            }
        };
        if stale {
            self.scheduler.cancel(task);
        }
        debug!(%actor, "queued command awaiting confirmation");

        prompt.unwrap_or_else(|| {
            format!(
                "You must confirm the previous command by typing {}.\nYou have {} to comply.",
                self.confirm_command,
                humanize(expires_after)
            )
        })
    }

    /// Confirm the actor's queued command, if one is waiting.
    ///
    /// Runs the confirm callback and clears the slot. Returns false when
    /// nothing was queued (or the slot already expired).
    pub fn confirm(&self, actor: &ActorId) -> bool {
        let slot = self.slots.lock().unwrap().remove(actor);
        match slot {
            Some(slot) => {
                debug!(%actor, "confirming queued command");
                if let Some(task) = slot.task {
                    self.scheduler.cancel(task);
                }
                (slot.on_confirm)();
                true
            }
            None => false,
        }
    }

    /// Whether the actor currently has a queued command.
    pub fn is_queued(&self, actor: &ActorId) -> bool {
        self.slots.lock().unwrap().contains_key(actor)
    }

    /// When the actor's queued command was created, if one is waiting.
    pub fn queued_at(&self, actor: &ActorId) -> Option<DateTime<Utc>> {
        self.slots.lock().unwrap().get(actor).map(|slot| slot.queued_at)
    }

    /// Scheduler callback: clear the slot and run the expire callback,
    /// but only if the slot still holds the occupancy the timer was
    /// armed for. Check and clear happen under one lock acquisition.
    fn expire(slots: &SlotMap, actor: &ActorId, id: u64) {
        let expired = {
            let mut map = slots.lock().unwrap();
            match map.get(actor) {
                Some(slot) if slot.id == id => map.remove(actor),
                _ => None,
            }
        };
        if let Some(slot) = expired {
            debug!(%actor, "expiring queued command");
            (slot.on_expire)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::host::MockScheduler;

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

        fn confirmed(&self) -> usize {
            self.confirmed.load(Ordering::SeqCst)
        }

        fn expired(&self) -> usize {
            self.expired.load(Ordering::SeqCst)
        }
    }

    fn manager() -> (QueuedCommandManager, Arc<MockScheduler>) {
        let scheduler = Arc::new(MockScheduler::new());
        let manager = QueuedCommandManager::new(Arc::clone(&scheduler) as _, "/mv confirm");
        (manager, scheduler)
    }

    #[test]
    fn default_prompt_names_confirm_command_and_window() {
        let (manager, _scheduler) = manager();
        let probe = Probe::new();
        let actor = ActorId::new("alice");
        let prompt = manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));
        assert!(prompt.contains("/mv confirm"));
        assert!(prompt.contains("10 seconds"));
    }

    #[test]
    fn prompt_override_wins() {
        let (manager, _scheduler) = manager();
        let probe = Probe::new();
        let mut execution = probe.execution(Duration::from_secs(10));
        execution.prompt = Some("Are you sure? Type /mv confirm".to_string());
        let prompt = manager.enqueue(&ActorId::new("alice"), execution);
        assert_eq!(prompt, "Are you sure? Type /mv confirm");
    }

    #[test]
    fn confirm_runs_callback_and_clears_slot() {
        let (manager, _scheduler) = manager();
        let probe = Probe::new();
        let actor = ActorId::new("alice");
        manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));
        assert!(manager.is_queued(&actor));
        assert!(manager.queued_at(&actor).is_some());

        assert!(manager.confirm(&actor));
        assert_eq!(probe.confirmed(), 1);
        assert_eq!(probe.expired(), 0);
        assert!(!manager.is_queued(&actor));
        // A second confirm has nothing to act on.
        assert!(!manager.confirm(&actor));
    }

    #[test]
    fn expiry_runs_callback_and_clears_slot() {
        let (manager, scheduler) = manager();
        let probe = Probe::new();
        let actor = ActorId::new("alice");
        manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));

        scheduler.advance(Duration::from_secs(11));
        assert_eq!(probe.expired(), 1);
        assert_eq!(probe.confirmed(), 0);
        assert!(!manager.confirm(&actor));
    }

    #[test]
    fn supersession_discards_without_expire_callback() {
        let (manager, scheduler) = manager();
        let first = Probe::new();
        let second = Probe::new();
        let actor = ActorId::new("alice");

        manager.enqueue(&actor, first.execution(Duration::from_secs(10)));
        manager.enqueue(&actor, second.execution(Duration::from_secs(30)));

        // The first command's window lapsing must not fire anything.
        scheduler.advance(Duration::from_secs(11));
        assert_eq!(first.expired(), 0);
        assert!(manager.is_queued(&actor));

        // The second still expires on its own schedule.
        scheduler.advance(Duration::from_secs(20));
        assert_eq!(second.expired(), 1);
        assert!(!manager.is_queued(&actor));
    }

    #[test]
    fn stale_timer_after_confirm_is_noop() {
        let (manager, scheduler) = manager();
        let probe = Probe::new();
        let actor = ActorId::new("alice");
        manager.enqueue(&actor, probe.execution(Duration::from_secs(10)));
        assert!(manager.confirm(&actor));

        scheduler.advance(Duration::from_secs(11));
        assert_eq!(probe.confirmed(), 1);
        assert_eq!(probe.expired(), 0);
    }

    /// Scheduler that never honors cancellation, so stale timers always
    /// fire and only the slot-id guard stands between them and a
    /// superseded or confirmed slot.
    struct NoCancelScheduler(MockScheduler);

    impl Scheduler for NoCancelScheduler {
        fn run_after(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> crate::host::TaskHandle {
            self.0.run_after(delay, task)
        }

        fn cancel(&self, _handle: crate::host::TaskHandle) {}
    }

    #[test]
    fn identity_guard_stops_stale_timers() {
        let scheduler = Arc::new(NoCancelScheduler(MockScheduler::new()));
        let manager = QueuedCommandManager::new(Arc::clone(&scheduler) as _, "/mv confirm");
        let first = Probe::new();
        let second = Probe::new();
        let actor = ActorId::new("alice");

        manager.enqueue(&actor, first.execution(Duration::from_secs(10)));
        manager.enqueue(&actor, second.execution(Duration::from_secs(30)));

        // The first timer fires but finds a different occupancy.
        scheduler.0.advance(Duration::from_secs(11));
        assert_eq!(first.expired(), 0);
        assert!(manager.is_queued(&actor));

        // Confirm the second; its timer later fires into an empty slot.
        assert!(manager.confirm(&actor));
        scheduler.0.advance(Duration::from_secs(30));
        assert_eq!(second.confirmed(), 1);
        assert_eq!(second.expired(), 0);
    }

    #[test]
    fn actors_hold_independent_slots() {
        let (manager, _scheduler) = manager();
        let alice_probe = Probe::new();
        let bob_probe = Probe::new();
        let alice = ActorId::new("alice");
        let bob = ActorId::new("bob");

        manager.enqueue(&alice, alice_probe.execution(Duration::from_secs(10)));
        manager.enqueue(&bob, bob_probe.execution(Duration::from_secs(10)));

        assert!(manager.confirm(&alice));
        assert_eq!(alice_probe.confirmed(), 1);
        assert_eq!(bob_probe.confirmed(), 0);
        assert!(manager.is_queued(&bob));
    }
}
