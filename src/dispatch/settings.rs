//! Dispatch configuration.

use serde::{Deserialize, Serialize};

fn default_use_queued_commands() -> bool {
    true
}

/// Host-tunable dispatch behavior.
///
/// Hosts typically embed this in their own configuration file; every
/// field has a default so partial config parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Prefix applied to primary aliases, e.g. `"mv"`.
    #[serde(default)]
    pub command_prefix: String,

    /// Whether the built-in confirm fallback is available.
    #[serde(default = "default_use_queued_commands")]
    pub use_queued_commands: bool,
}

impl DispatchSettings {
    /// Settings with the given command prefix and queued commands on.
    pub fn new(command_prefix: &str) -> Self {
        Self {
            command_prefix: command_prefix.to_string(),
            use_queued_commands: true,
        }
    }

    /// The confirm command an actor types, e.g. `/mv confirm`.
    pub fn confirm_command(&self) -> String {
        if self.command_prefix.is_empty() {
            "/confirm".to_string()
        } else {
            format!("/{} confirm", self.command_prefix)
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::new("")
    }
}
