//! The command execution surface.
//!
//! Implementations of [`Command`] hold the business logic this crate
//! deliberately knows nothing about. The dispatcher instantiates one via
//! the factory supplied at registration, calls [`Command::run`], and
//! acts on the returned [`CommandAction`].

use std::time::Duration;

use crate::dispatch::CommandContext;
use crate::host::ActorId;

/// Produces a fresh command instance per invocation.
pub type CommandFactory = Box<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// A runnable command.
pub trait Command: Send {
    /// Execute the command for `actor` with the parsed `context`.
    ///
    /// Return [`CommandAction::ShowUsage`] when the actor used the
    /// command improperly in a way argument validation could not catch.
    /// Unexpected failures are reported with `anyhow::Error`; the
    /// dispatcher logs them and tells the actor, so implementations
    /// should not message about their own errors.
    fn run(&mut self, actor: &ActorId, context: &CommandContext) -> anyhow::Result<CommandAction>;
}

/// What the dispatcher should do after a command body returns.
pub enum CommandAction {
    /// The command completed.
    Done,
    /// The actor misused the command; show the usage lines.
    ShowUsage,
    /// Defer the real work until the actor confirms.
    ///
    /// The body has already done any pre-confirmation work by the time
    /// it returns this.
    Queue(QueuedExecution),
}

/// Deferred execution awaiting confirmation.
///
/// The callbacks capture whatever state the command needs; exactly one
/// of them will run, or neither if the queued command is superseded.
pub struct QueuedExecution {
    /// Runs when the actor confirms within the window.
    pub on_confirm: Box<dyn FnOnce() + Send>,
    /// Runs when the window lapses with the command still queued.
    pub on_expire: Box<dyn FnOnce() + Send>,
    /// How long the actor has to confirm.
    pub expires_after: Duration,
    /// Confirmation prompt override; `None` uses the default template.
    pub prompt: Option<String>,
}

impl std::fmt::Debug for QueuedExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedExecution")
            .field("expires_after", &self.expires_after)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}
