//! Error types for command registration and dispatch.
//!
//! This module defines the two failure surfaces of the crate:
//! [`RegistrationError`] for startup-time registration problems and
//! [`UsageError`] for actor-facing command misuse.
//!
//! # Error Handling Strategy
//!
//! - Use `RegistrationError` at registration time; it is fatal only to
//!   that registration call
//! - Use `UsageError` for misuse by the actor; it carries the rendered
//!   usage lines and is surfaced to the actor, never to the process
//! - Command bodies report unexpected failures with `anyhow::Error`,
//!   which the dispatcher logs and reports without propagating

use std::fmt;

use thiserror::Error;

/// Errors raised while registering a command.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// Another command already owns this alias.
    #[error("Alias '{alias}' is already registered to '{existing}'")]
    DuplicateAlias { alias: String, existing: String },

    /// A flag spec listed the same flag character twice.
    #[error("Duplicate flag '-{flag}' in flag spec '{spec}'")]
    DuplicateFlag { flag: char, spec: String },

    /// The minimum argument count exceeds the maximum.
    #[error("Invalid argument range: minimum {min} exceeds maximum {max}")]
    InvalidArgRange { min: usize, max: usize },

    /// An alias contained no tokens.
    #[error("Command alias must contain at least one token")]
    EmptyAlias,
}

/// What an actor got wrong when invoking a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageErrorKind {
    /// Fewer positional arguments than the command's minimum.
    #[error("Too few arguments.")]
    TooFewArguments,

    /// More positional arguments than the command's maximum.
    #[error("Too many arguments.")]
    TooManyArguments,

    /// A flag character the command does not declare.
    #[error("Unknown flag: -{0}")]
    UnknownFlag(char),

    /// A value flag with no following token to consume.
    #[error("No value specified for the '-{0}' flag.")]
    MissingFlagValue(char),

    /// A value flag supplied more than once.
    #[error("Value flag '-{0}' already given.")]
    DuplicateFlagValue(char),

    /// The command body itself signalled improper usage.
    #[error("Usage error.")]
    Misuse,
}

/// An actor-facing usage failure.
///
/// Carries the rendered usage lines for the command that was misused so
/// the caller can present them without a second lookup.
#[derive(Debug, Clone)]
pub struct UsageError {
    kind: UsageErrorKind,
    usage: Vec<String>,
}

impl UsageError {
    /// Create a usage error with rendered usage lines.
    pub fn new(kind: UsageErrorKind, usage: Vec<String>) -> Self {
        Self { kind, usage }
    }

    /// Which rule the invocation broke.
    pub fn kind(&self) -> UsageErrorKind {
        self.kind
    }

    /// The rendered usage lines for the misused command.
    pub fn usage(&self) -> &[String] {
        &self.usage
    }

    /// All lines to show the actor: the failure first, then the usage.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.usage.len() + 1);
        lines.push(self.kind.to_string());
        lines.extend(self.usage.iter().cloned());
        lines
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for line in &self.usage {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
