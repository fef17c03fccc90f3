//! Host collaborator interfaces.
//!
//! The dispatch core never talks to the outside world directly. Three
//! traits cover everything it consumes from the hosting application:
//!
//! - [`PermissionOracle`] - "may this actor use any of these permissions"
//! - [`Scheduler`] - "run this callback after a delay"
//! - [`Messager`] - "show this text to this actor"
//!
//! [`mock`] provides in-memory implementations of all three for tests.

pub mod mock;

pub use mock::{MockMessager, MockScheduler, StaticPermissions};

use std::fmt;
use std::time::Duration;

/// Identity of whoever issued a command: a user or an automated console.
///
/// Opaque to this crate; equality and hashing are all that matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(String);

impl ActorId {
    /// Create an actor identity from any string-ish id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Delivers text to an actor.
///
/// Used for confirmation prompts, sub-command listings, the no-queued
/// notice, and command failure reports. Localization is the host's
/// concern; this crate hands over finished text.
pub trait Messager: Send + Sync {
    /// Show `text` to `actor`.
    fn send(&self, actor: &ActorId, text: &str);
}

/// Answers whether an actor holds any of the given permission nodes.
pub trait PermissionOracle: Send + Sync {
    /// Any-of check over `nodes`.
    ///
    /// When `op_bypass` is true, hosts that recognize operators should
    /// let them through regardless of `nodes`.
    fn has_any_permission(&self, actor: &ActorId, nodes: &[String], op_bypass: bool) -> bool;
}

/// Opaque handle for a task scheduled via [`Scheduler::run_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wrap a host-assigned task id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-assigned task id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Runs callbacks after a delay on the host's execution thread.
///
/// The callback must fire exactly once, at or after the requested delay.
pub trait Scheduler: Send + Sync {
    /// Schedule `task` to run after `delay`.
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> TaskHandle;

    /// Cancel a scheduled task. Hosts without cancellation may ignore this.
    fn cancel(&self, _handle: TaskHandle) {}
}
