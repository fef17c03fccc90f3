//! Prefix tree over alias tokens.

use std::collections::HashMap;

use crate::error::RegistrationError;

/// Outcome of detection: the resolved alias and what was left over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Canonical alias of the matched command.
    pub alias: String,
    /// Tokens following the matched alias, in order.
    pub remainder: Vec<String>,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    /// Canonical alias terminating at this node, if any.
    command: Option<String>,
}

/// Prefix tree over whitespace-separated alias tokens.
///
/// Each node optionally marks "this path is a complete command". A node
/// may be a command while also having descendants that are commands
/// (nested command families), which is what makes longest-prefix
/// detection meaningful.
///
/// Tokens are matched case-insensitively; aliases are stored lowercased.
#[derive(Debug, Default)]
pub struct AliasTrie {
    root: TrieNode,
}

impl AliasTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as resolving to `canonical`.
    ///
    /// Re-registering the same alias to the same canonical id is a no-op.
    /// Registering it to a different canonical id is a duplicate-alias
    /// error.
    pub fn insert(&mut self, alias: &str, canonical: &str) -> Result<(), RegistrationError> {
        let tokens: Vec<String> = alias.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return Err(RegistrationError::EmptyAlias);
        }
        let canonical = canonical.to_lowercase();

        let mut node = &mut self.root;
        for token in tokens {
            node = node.children.entry(token).or_default();
        }
        match &node.command {
            Some(existing) if *existing != canonical => Err(RegistrationError::DuplicateAlias {
                alias: alias.to_lowercase(),
                existing: existing.clone(),
            }),
            _ => {
                node.command = Some(canonical);
                Ok(())
            }
        }
    }

    /// Whether `alias` could be inserted for `canonical` without conflict.
    pub fn check(&self, alias: &str, canonical: &str) -> Result<(), RegistrationError> {
        let mut node = &self.root;
        for token in alias.split_whitespace() {
            match node.children.get(&token.to_lowercase()) {
                Some(child) => node = child,
                None => return Ok(()),
            }
        }
        match &node.command {
            Some(existing) if !existing.eq_ignore_ascii_case(canonical) => {
                Err(RegistrationError::DuplicateAlias {
                    alias: alias.to_lowercase(),
                    existing: existing.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve `tokens` to the longest registered alias prefix that is
    /// itself a command.
    ///
    /// Walks the trie following `tokens` in order, remembering the
    /// deepest command node passed through. Returns `None` when no prefix
    /// of the input is a registered command.
    pub fn detect(&self, tokens: &[String]) -> Option<Detection> {
        let mut node = &self.root;
        let mut best: Option<(&String, usize)> = None;
        let mut depth = 0;

        for token in tokens {
            if let Some(alias) = &node.command {
                best = Some((alias, depth));
            }
            match node.children.get(&token.to_lowercase()) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        if depth == tokens.len() {
            if let Some(alias) = &node.command {
                best = Some((alias, depth));
            }
        }

        best.map(|(alias, consumed)| Detection {
            alias: alias.clone(),
            remainder: tokens[consumed..].to_vec(),
        })
    }

    /// Direct sub-commands of the node at `alias`, sorted.
    ///
    /// Children that are commands are listed by their canonical alias;
    /// children that are only intermediate paths are listed as
    /// `"{alias} {token}"`.
    pub fn subcommands_at(&self, alias: &str) -> Vec<String> {
        let mut node = &self.root;
        for token in alias.split_whitespace() {
            match node.children.get(&token.to_lowercase()) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let alias = alias.to_lowercase();
        let mut subcommands: Vec<String> = node
            .children
            .iter()
            .map(|(token, child)| match &child.command {
                Some(canonical) => canonical.clone(),
                None => format!("{alias} {token}"),
            })
            .collect();
        subcommands.sort();
        subcommands
    }
}
