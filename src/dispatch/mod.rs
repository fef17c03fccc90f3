//! Command dispatching.
//!
//! This module provides the core dispatch pipeline:
//! - [`CommandContext`] with the parsed flags and positional arguments
//! - [`DispatchSettings`] for host-tunable behavior
//! - [`CommandDispatcher`], which ties detection, parsing, validation,
//!   invocation, and queueing together
//!
//! `locate_and_run_command` is the single entry point a host feeds raw
//! input through. It reports `Ok(false)` for input that resolves to no
//! registered command, so the host may fall through to its own routing.

pub mod context;
pub mod settings;
pub mod tokenizer;
mod usage;

pub use context::CommandContext;
pub use settings::DispatchSettings;

use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::command::{CommandAction, CommandFactory};
use crate::error::{RegistrationError, UsageError, UsageErrorKind};
use crate::host::{ActorId, Messager, PermissionOracle, Scheduler};
use crate::queue::QueuedCommandManager;
use crate::registry::{CommandDescriptor, CommandRegistry, RegisteredCommand};

const NO_QUEUED_COMMANDS: &str =
    "Sorry, but you have not used any commands that require confirmation.";

/// Resolves raw actor input to registered commands and runs them.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    queue: QueuedCommandManager,
    settings: DispatchSettings,
    permissions: Arc<dyn PermissionOracle>,
    messager: Arc<dyn Messager>,
}

impl CommandDispatcher {
    /// Create a dispatcher wired to the host's collaborators.
    pub fn new(
        settings: DispatchSettings,
        permissions: Arc<dyn PermissionOracle>,
        scheduler: Arc<dyn Scheduler>,
        messager: Arc<dyn Messager>,
    ) -> Self {
        let registry = CommandRegistry::new(&settings.command_prefix);
        let queue = QueuedCommandManager::new(scheduler, &settings.confirm_command());
        Self {
            registry,
            queue,
            settings,
            permissions,
            messager,
        }
    }

    /// Register a command with the factory that produces its instances.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor,
        factory: CommandFactory,
    ) -> Result<(), RegistrationError> {
        self.registry.register(descriptor, factory)
    }

    /// The registry, for introspection.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Rewrite raw input by substituting the longest recognized command
    /// alias prefix with its canonical form.
    ///
    /// Exposed standalone so hosts can pre-rewrite input before their
    /// own native routing. Unrecognized input passes through unchanged;
    /// the rewrite is idempotent.
    pub fn command_detection(&self, tokens: &[String]) -> Vec<String> {
        match self.registry.detect(tokens) {
            Some(detection) => {
                let mut rewritten = Vec::with_capacity(detection.remainder.len() + 1);
                rewritten.push(detection.alias);
                rewritten.extend(detection.remainder);
                rewritten
            }
            None => tokens.to_vec(),
        }
    }

    /// Confirm the actor's queued command, if any.
    pub fn confirm_command(&self, actor: &ActorId) -> bool {
        self.queue.confirm(actor)
    }

    /// Locate and run the command in `raw_tokens` for `actor`.
    ///
    /// Returns `Ok(false)` when the input is not one of our commands,
    /// `Ok(true)` when it was handled (including silent permission
    /// denial), and `Err` when the actor misused a resolved command.
    pub fn locate_and_run_command(
        &self,
        actor: &ActorId,
        raw_tokens: &[String],
    ) -> Result<bool, UsageError> {
        let tokens = tokenizer::retokenize(raw_tokens);
        if tokens.is_empty() {
            return Ok(false);
        }
        trace!(%actor, ?tokens, "attempting command");

        if self.is_builtin_confirm(&tokens) {
            debug!(%actor, "no confirm command registered, using built in confirm");
            if !self.confirm_command(actor) {
                self.messager.send(actor, NO_QUEUED_COMMANDS);
            }
            return Ok(true);
        }

        let Some(detection) = self.registry.detect(&tokens) else {
            return Ok(false);
        };
        let Some(registered) = self.registry.lookup(&detection.alias) else {
            error!(alias = %detection.alias, "detected alias has no registered command");
            return Ok(false);
        };

        if registered.is_group() {
            self.send_group_listing(actor, &detection.alias);
            return Ok(true);
        }

        let descriptor = Arc::clone(registered.descriptor());
        let usage = || usage::usage_lines(&detection.alias, &descriptor);

        let context =
            CommandContext::parse(&detection.remainder, descriptor.flags(), descriptor.any_flags())
                .map_err(|kind| UsageError::new(kind, usage()))?;

        if context.args_len() < descriptor.min_args() {
            return Err(UsageError::new(UsageErrorKind::TooFewArguments, usage()));
        }
        if let Some(max) = descriptor.max_args() {
            if context.args_len() > max {
                return Err(UsageError::new(UsageErrorKind::TooManyArguments, usage()));
            }
        }

        if !descriptor.permissions().is_empty()
            && !self.permissions.has_any_permission(
                actor,
                descriptor.permissions(),
                descriptor.op_bypass(),
            )
        {
            debug!(%actor, alias = %detection.alias, "permission denied");
            return Ok(true);
        }

        self.invoke(actor, registered, &detection.alias, &context)
    }

    /// Instantiate and run the resolved command, then act on its result.
    fn invoke(
        &self,
        actor: &ActorId,
        registered: &RegisteredCommand,
        alias: &str,
        context: &CommandContext,
    ) -> Result<bool, UsageError> {
        let Some(mut command) = registered.instantiate() else {
            error!(%alias, "registered command produced no instance");
            return Ok(false);
        };
        match command.run(actor, context) {
            Ok(CommandAction::Done) => Ok(true),
            Ok(CommandAction::ShowUsage) => Err(UsageError::new(
                UsageErrorKind::Misuse,
                usage::usage_lines(alias, registered.descriptor()),
            )),
            Ok(CommandAction::Queue(execution)) => {
                if !self.settings.use_queued_commands {
                    warn!(%alias, "queueable command dispatched with queued commands disabled");
                }
                let prompt = self.queue.enqueue(actor, execution);
                self.messager.send(actor, &prompt);
                Ok(true)
            }
            Err(err) => {
                error!(%actor, %alias, error = %format!("{err:#}"), "command failed");
                self.messager
                    .send(actor, &format!("An error occurred while running the command: {err}"));
                Ok(true)
            }
        }
    }

    /// Whether `tokens` invoke the built-in confirm fallback: queued
    /// commands enabled, no real confirm command registered, and input
    /// of exactly `{prefix} confirm`.
    fn is_builtin_confirm(&self, tokens: &[String]) -> bool {
        let prefix = &self.settings.command_prefix;
        self.settings.use_queued_commands
            && !prefix.is_empty()
            && !self.registry.contains(&format!("{prefix} confirm"))
            && !self.registry.contains(&format!("{prefix}confirm"))
            && tokens.len() == 2
            && tokens[0].eq_ignore_ascii_case(prefix)
            && tokens[1].eq_ignore_ascii_case("confirm")
    }

    /// Send the actor the sub-commands available under a group alias.
    fn send_group_listing(&self, actor: &ActorId, alias: &str) {
        let subcommands = self.registry.subcommands_at(alias);
        let mut text = format!("The following is a list of sub-commands for '{alias}':");
        for subcommand in &subcommands {
            text.push_str("\n  /");
            text.push_str(subcommand);
        }
        self.messager.send(actor, &text);
    }
}
