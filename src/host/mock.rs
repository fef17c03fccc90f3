//! Mock host collaborators for testing.
//!
//! These implement the [`Messager`], [`Scheduler`], and
//! [`PermissionOracle`] traits in memory and capture interactions for
//! later assertion. `MockScheduler` holds a manual clock: nothing fires
//! until [`MockScheduler::advance`] moves time forward.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tiller::host::{MockScheduler, Scheduler};
//!
//! let scheduler = MockScheduler::new();
//! scheduler.run_after(Duration::from_secs(10), Box::new(|| println!("expired")));
//! assert_eq!(scheduler.pending(), 1);
//!
//! scheduler.advance(Duration::from_secs(11)); // fires the callback
//! assert_eq!(scheduler.pending(), 0);
//! ```

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use super::{ActorId, Messager, PermissionOracle, Scheduler, TaskHandle};

/// Messager that captures everything sent.
#[derive(Debug, Default)]
pub struct MockMessager {
    sent: Mutex<Vec<(ActorId, String)>>,
}

impl MockMessager {
    /// Create an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<(ActorId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Everything sent to one actor, in order.
    pub fn sent_to(&self, actor: &ActorId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a == actor)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, text)| text.clone())
    }

    /// Whether any captured message contains `needle`.
    pub fn any_contains(&self, needle: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|(_, text)| text.contains(needle))
    }

    /// Drop all captured messages.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Messager for MockMessager {
    fn send(&self, actor: &ActorId, text: &str) {
        self.sent.lock().unwrap().push((actor.clone(), text.to_string()));
    }
}

struct ScheduledTask {
    handle: TaskHandle,
    due_at: Duration,
    task: Box<dyn FnOnce() + Send>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

/// Scheduler with a manual clock.
///
/// Tasks fire in due-time order when [`advance`](Self::advance) carries
/// the clock past them. Tasks are run outside the internal lock, so a
/// firing task may schedule further tasks.
#[derive(Default)]
pub struct MockScheduler {
    state: Mutex<SchedulerState>,
}

impl MockScheduler {
    /// Create a scheduler with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().tasks.len()
    }

    /// The current reading of the manual clock.
    pub fn now(&self) -> Duration {
        self.state.lock().unwrap().now
    }

    /// Move the clock forward and fire every task that came due.
    pub fn advance(&self, delta: Duration) {
        {
            let mut state = self.state.lock().unwrap();
            state.now += delta;
        }
        loop {
            let due = {
                let mut state = self.state.lock().unwrap();
                let now = state.now;
                let next = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_at <= now)
                    .min_by_key(|(_, t)| t.due_at)
                    .map(|(i, _)| i);
                match next {
                    Some(i) => state.tasks.remove(i),
                    None => break,
                }
            };
            (due.task)();
        }
    }
}

impl Scheduler for MockScheduler {
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TaskHandle {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let handle = TaskHandle::new(state.next_id);
        let due_at = state.now + delay;
        state.tasks.push(ScheduledTask { handle, due_at, task });
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        let mut state = self.state.lock().unwrap();
        state.tasks.retain(|t| t.handle != handle);
    }
}

/// Permission oracle backed by a static allow-list.
#[derive(Debug, Default)]
pub struct StaticPermissions {
    granted: HashSet<String>,
    operators: HashSet<ActorId>,
    allow_all: bool,
}

impl StaticPermissions {
    /// Create an oracle that denies everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an oracle that grants everything.
    pub fn permissive() -> Self {
        Self {
            allow_all: true,
            ..Default::default()
        }
    }

    /// Grant a permission node to all actors.
    pub fn grant(mut self, node: &str) -> Self {
        self.granted.insert(node.to_string());
        self
    }

    /// Mark an actor as an operator (eligible for the bypass channel).
    pub fn operator(mut self, actor: ActorId) -> Self {
        self.operators.insert(actor);
        self
    }
}

impl PermissionOracle for StaticPermissions {
    fn has_any_permission(&self, actor: &ActorId, nodes: &[String], op_bypass: bool) -> bool {
        if self.allow_all {
            return true;
        }
        if op_bypass && self.operators.contains(actor) {
            return true;
        }
        nodes.iter().any(|node| self.granted.contains(node))
    }
}
