//! Command registration and lookup.
//!
//! This module provides:
//! - [`CommandDescriptor`] and its builder for command metadata
//! - [`FlagSpec`] for parsed flag specifications
//! - [`CommandRegistry`], which owns the alias trie, enforces alias
//!   uniqueness, and stores descriptors with their command factories
//!
//! Registering a multi-token alias also registers each intermediate path
//! as a *group* entry, so that typing a partial path lists the commands
//! underneath it. A later real registration at a group's alias replaces
//! the placeholder.

pub mod descriptor;
pub mod flags;

pub use descriptor::{CommandDescriptor, CommandDescriptorBuilder};
pub use flags::{FlagEntry, FlagSpec};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::{Command, CommandFactory};
use crate::detection::{AliasTrie, Detection};
use crate::error::RegistrationError;

/// How a registered entry produces behavior.
enum CommandKind {
    /// A real command with a factory for fresh instances.
    User(CommandFactory),
    /// An auto-registered intermediate path that lists its sub-commands.
    Group,
}

/// A descriptor paired with the means to run it.
pub struct RegisteredCommand {
    descriptor: Arc<CommandDescriptor>,
    kind: CommandKind,
}

impl RegisteredCommand {
    /// The command's metadata.
    pub fn descriptor(&self) -> &Arc<CommandDescriptor> {
        &self.descriptor
    }

    /// Whether this entry is an auto-registered group placeholder.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, CommandKind::Group)
    }

    /// Produce a fresh instance; `None` for group entries.
    pub fn instantiate(&self) -> Option<Box<dyn Command>> {
        match &self.kind {
            CommandKind::User(factory) => Some(factory()),
            CommandKind::Group => None,
        }
    }
}

const GROUP_DESCRIPTION: &str = "Displays a list of sub-commands.";

/// Owns descriptor registration and alias resolution.
pub struct CommandRegistry {
    prefix: String,
    commands: HashMap<String, RegisteredCommand>,
    trie: AliasTrie,
}

impl CommandRegistry {
    /// Create a registry whose primary aliases carry `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            commands: HashMap::new(),
            trie: AliasTrie::new(),
        }
    }

    /// The registered command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a command.
    ///
    /// Validates every alias variant against the trie before touching any
    /// state, so a failed registration leaves the registry unchanged.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor,
        factory: CommandFactory,
    ) -> Result<(), RegistrationError> {
        let canonical = descriptor.canonical_alias(&self.prefix);
        let variants = descriptor.alias_variants(&self.prefix);

        if let Some(existing) = self.commands.get(&canonical) {
            if !existing.is_group() {
                return Err(RegistrationError::DuplicateAlias {
                    alias: canonical.clone(),
                    existing: canonical,
                });
            }
        }
        for variant in &variants {
            self.trie.check(variant, &canonical)?;
        }

        for variant in &variants {
            self.trie.insert(variant, &canonical)?;
        }
        debug!(command = %canonical, aliases = variants.len(), "registered command");
        self.commands.insert(
            canonical,
            RegisteredCommand {
                descriptor: Arc::new(descriptor),
                kind: CommandKind::User(factory),
            },
        );
        for variant in &variants {
            self.register_groups_along(variant);
        }
        Ok(())
    }

    /// Register group placeholders for every proper prefix of `alias`.
    fn register_groups_along(&mut self, alias: &str) {
        let tokens: Vec<&str> = alias.split_whitespace().collect();
        if tokens.len() < 2 {
            return;
        }
        let mut path = String::new();
        for token in &tokens[..tokens.len() - 1] {
            if !path.is_empty() {
                path.push(' ');
            }
            path.push_str(token);
            if self.commands.contains_key(&path) {
                continue;
            }
            // A conflict here means a real alias already terminates at
            // this path under another canonical id; leave it alone.
            if self.trie.insert(&path, &path).is_err() {
                continue;
            }
            let Ok(descriptor) = CommandDescriptor::builder(&path, GROUP_DESCRIPTION)
                .unprefixed()
                .build()
            else {
                continue;
            };
            debug!(group = %path, "registered group command");
            self.commands.insert(
                path.clone(),
                RegisteredCommand {
                    descriptor: Arc::new(descriptor),
                    kind: CommandKind::Group,
                },
            );
        }
    }

    /// Look up a command by its canonical alias.
    pub fn lookup(&self, canonical: &str) -> Option<&RegisteredCommand> {
        self.commands.get(&canonical.to_lowercase())
    }

    /// Whether any command (or group) is registered at `alias`.
    pub fn contains(&self, alias: &str) -> bool {
        self.commands.contains_key(&alias.to_lowercase())
    }

    /// Run detection over `tokens`.
    pub fn detect(&self, tokens: &[String]) -> Option<Detection> {
        self.trie.detect(tokens)
    }

    /// Direct sub-commands of `alias`, for group listings.
    pub fn subcommands_at(&self, alias: &str) -> Vec<String> {
        self.trie.subcommands_at(alias)
    }
}
