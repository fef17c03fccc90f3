//! Tiller - command resolution and dispatch core.
//!
//! Tiller turns a raw, space-separated token sequence typed by an actor
//! into a resolved registered command with parsed flags and positional
//! arguments, then either runs it or parks it as a queued execution
//! awaiting confirmation. Commands are registered under multi-word
//! aliases; input resolves to the longest registered alias prefix, so
//! nested command families (`mv world` and `mv world create`) coexist.
//!
//! # Modules
//!
//! - [`command`] - The `Command` trait and execution outcomes
//! - [`detection`] - Alias trie and longest-prefix detection
//! - [`dispatch`] - Tokenization, parsing, validation, and dispatch
//! - [`error`] - Registration and usage error types
//! - [`host`] - Collaborator traits (permissions, scheduling, messaging)
//! - [`queue`] - Queued command lifecycle and expiration
//! - [`registry`] - Command descriptors and alias registration
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tiller::command::{CommandAction, CommandFactory};
//! use tiller::dispatch::{CommandDispatcher, DispatchSettings};
//! use tiller::host::{ActorId, MockMessager, MockScheduler, StaticPermissions};
//! use tiller::registry::CommandDescriptor;
//!
//! struct Reload;
//!
//! impl tiller::command::Command for Reload {
//!     fn run(
//!         &mut self,
//!         _actor: &ActorId,
//!         _context: &tiller::dispatch::CommandContext,
//!     ) -> anyhow::Result<CommandAction> {
//!         Ok(CommandAction::Done)
//!     }
//! }
//!
//! let mut dispatcher = CommandDispatcher::new(
//!     DispatchSettings::new("mv"),
//!     Arc::new(StaticPermissions::permissive()),
//!     Arc::new(MockScheduler::new()),
//!     Arc::new(MockMessager::new()),
//! );
//!
//! let descriptor = CommandDescriptor::builder("reload", "Reloads the config.")
//!     .build()
//!     .unwrap();
//! let factory: CommandFactory = Box::new(|| Box::new(Reload));
//! dispatcher.register(descriptor, factory).unwrap();
//!
//! let actor = ActorId::new("console");
//! let raw: Vec<String> = vec!["mv".into(), "reload".into()];
//! assert!(dispatcher.locate_and_run_command(&actor, &raw).unwrap());
//! ```

pub mod command;
pub mod detection;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod queue;
pub mod registry;

pub use command::{Command, CommandAction, CommandFactory, QueuedExecution};
pub use dispatch::{CommandContext, CommandDispatcher, DispatchSettings};
pub use error::{RegistrationError, UsageError, UsageErrorKind};
pub use host::{ActorId, Messager, PermissionOracle, Scheduler, TaskHandle};
pub use queue::QueuedCommandManager;
pub use registry::{CommandDescriptor, CommandRegistry};
