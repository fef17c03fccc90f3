//! Command descriptors.
//!
//! A [`CommandDescriptor`] is the immutable metadata of one registered
//! command: its aliases, usage and description text, argument bounds,
//! flag spec, and permission requirement. Descriptors are constructed
//! through [`CommandDescriptorBuilder`] and validated at build time.

use crate::error::RegistrationError;

use super::flags::FlagSpec;

/// Immutable description of a registered command.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    primary_alias: String,
    prefix_primary: bool,
    directly_prefix_primary: bool,
    aliases: Vec<String>,
    prefixed_aliases: Vec<String>,
    directly_prefixed_aliases: Vec<String>,
    usage: String,
    description: String,
    min_args: usize,
    max_args: Option<usize>,
    flags: FlagSpec,
    any_flags: bool,
    permissions: Vec<String>,
    op_bypass: bool,
}

impl CommandDescriptor {
    /// Start building a descriptor with the two required pieces.
    pub fn builder(primary_alias: &str, description: &str) -> CommandDescriptorBuilder {
        CommandDescriptorBuilder {
            primary_alias: primary_alias.to_string(),
            prefix_primary: true,
            directly_prefix_primary: false,
            aliases: Vec::new(),
            prefixed_aliases: Vec::new(),
            directly_prefixed_aliases: Vec::new(),
            usage: String::new(),
            description: description.to_string(),
            min_args: 0,
            max_args: None,
            flags: String::new(),
            any_flags: false,
            permissions: Vec::new(),
            op_bypass: true,
        }
    }

    /// The canonical alias: the primary alias with the command prefix
    /// applied per the descriptor's prefix bits, lowercased.
    pub fn canonical_alias(&self, prefix: &str) -> String {
        let alias = if self.directly_prefix_primary {
            format!("{prefix}{}", self.primary_alias)
        } else if self.prefix_primary {
            format!("{prefix} {}", self.primary_alias)
        } else {
            self.primary_alias.clone()
        };
        alias.to_lowercase()
    }

    /// Every alias an actor can type to reach this command, canonical
    /// first. Empty alias entries are skipped.
    pub fn alias_variants(&self, prefix: &str) -> Vec<String> {
        let mut variants = vec![self.canonical_alias(prefix)];
        for alias in &self.aliases {
            if !alias.is_empty() {
                variants.push(alias.to_lowercase());
            }
        }
        for alias in &self.prefixed_aliases {
            if !alias.is_empty() {
                variants.push(format!("{prefix} {alias}").to_lowercase());
            }
        }
        for alias in &self.directly_prefixed_aliases {
            if !alias.is_empty() {
                variants.push(format!("{prefix}{alias}").to_lowercase());
            }
        }
        variants
    }

    /// Usage text beyond the alias, e.g. `{world} [reason]`.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Short human description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Minimum positional argument count.
    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// Maximum positional argument count; `None` means unbounded.
    pub fn max_args(&self) -> Option<usize> {
        self.max_args
    }

    /// The parsed flag spec.
    pub fn flags(&self) -> &FlagSpec {
        &self.flags
    }

    /// Whether undeclared flags are tolerated.
    pub fn any_flags(&self) -> bool {
        self.any_flags
    }

    /// Permission nodes checked with any-of semantics; empty means the
    /// command is unrestricted.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Whether operators may bypass the permission check.
    pub fn op_bypass(&self) -> bool {
        self.op_bypass
    }
}

/// Builder for [`CommandDescriptor`].
#[derive(Debug, Clone)]
pub struct CommandDescriptorBuilder {
    primary_alias: String,
    prefix_primary: bool,
    directly_prefix_primary: bool,
    aliases: Vec<String>,
    prefixed_aliases: Vec<String>,
    directly_prefixed_aliases: Vec<String>,
    usage: String,
    description: String,
    min_args: usize,
    max_args: Option<usize>,
    flags: String,
    any_flags: bool,
    permissions: Vec<String>,
    op_bypass: bool,
}

impl CommandDescriptorBuilder {
    /// Do not apply the command prefix to the primary alias.
    pub fn unprefixed(mut self) -> Self {
        self.prefix_primary = false;
        self
    }

    /// Concatenate the command prefix directly to the primary alias
    /// (no separating space).
    pub fn directly_prefixed(mut self) -> Self {
        self.directly_prefix_primary = true;
        self
    }

    /// Add an alternate alias entered exactly as given.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Add an alternate alias entered as `{prefix} {alias}`.
    pub fn prefixed_alias(mut self, alias: &str) -> Self {
        self.prefixed_aliases.push(alias.to_string());
        self
    }

    /// Add an alternate alias entered as `{prefix}{alias}`.
    pub fn directly_prefixed_alias(mut self, alias: &str) -> Self {
        self.directly_prefixed_aliases.push(alias.to_string());
        self
    }

    /// Usage text beyond the alias, e.g. `{world} [reason]`.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Minimum positional argument count.
    pub fn min_args(mut self, min: usize) -> Self {
        self.min_args = min;
        self
    }

    /// Maximum positional argument count. Unset means unbounded.
    pub fn max_args(mut self, max: usize) -> Self {
        self.max_args = Some(max);
        self
    }

    /// Flag spec string, e.g. `"ab:"` for boolean `-a` and value `-b`.
    pub fn flags(mut self, spec: &str) -> Self {
        self.flags = spec.to_string();
        self
    }

    /// Tolerate flags not named in the spec.
    pub fn any_flags(mut self) -> Self {
        self.any_flags = true;
        self
    }

    /// Require a permission node (any-of across repeated calls).
    pub fn permission(mut self, node: &str) -> Self {
        self.permissions.push(node.to_string());
        self
    }

    /// Close the operator-bypass channel for this command.
    pub fn no_op_bypass(mut self) -> Self {
        self.op_bypass = false;
        self
    }

    /// Validate and produce the immutable descriptor.
    pub fn build(self) -> Result<CommandDescriptor, RegistrationError> {
        if self.primary_alias.split_whitespace().next().is_none() {
            return Err(RegistrationError::EmptyAlias);
        }
        if let Some(max) = self.max_args {
            if self.min_args > max {
                return Err(RegistrationError::InvalidArgRange {
                    min: self.min_args,
                    max,
                });
            }
        }
        let flags = FlagSpec::parse(&self.flags)?;
        Ok(CommandDescriptor {
            primary_alias: self.primary_alias,
            prefix_primary: self.prefix_primary,
            directly_prefix_primary: self.directly_prefix_primary,
            aliases: self.aliases,
            prefixed_aliases: self.prefixed_aliases,
            directly_prefixed_aliases: self.directly_prefixed_aliases,
            usage: self.usage,
            description: self.description,
            min_args: self.min_args,
            max_args: self.max_args,
            flags,
            any_flags: self.any_flags,
            permissions: self.permissions,
            op_bypass: self.op_bypass,
        })
    }
}
