//! Parsed command invocation context.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::UsageErrorKind;
use crate::registry::FlagSpec;

/// A token is a flag token iff it is a dash followed only by letters.
/// Anything else (`-5`, `--`, `-a=b`) is positional or the terminator.
fn is_flag_token(token: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^-[a-zA-Z]+$").expect("flag token pattern is valid")
    });
    pattern.is_match(token)
}

/// What an actor supplied to a command: positional arguments, boolean
/// flags, and value-flag assignments.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    args: Vec<String>,
    boolean_flags: HashSet<char>,
    value_flags: HashMap<char, String>,
}

impl CommandContext {
    /// Parse the remainder tokens of a detected command.
    ///
    /// A `--` token ends flag parsing; everything after it is
    /// positional. Value flags consume the next remaining token whatever
    /// it looks like. With `any_flags` false, a flag character missing
    /// from `spec` is a usage error.
    pub(crate) fn parse(
        tokens: &[String],
        spec: &FlagSpec,
        any_flags: bool,
    ) -> Result<Self, UsageErrorKind> {
        let mut context = Self::default();
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            if token == "--" {
                context.args.extend(iter.map(String::clone));
                break;
            }
            if !is_flag_token(token) {
                context.args.push(token.clone());
                continue;
            }
            for ch in token.chars().skip(1) {
                if spec.is_value_flag(ch) {
                    if context.value_flags.contains_key(&ch) {
                        return Err(UsageErrorKind::DuplicateFlagValue(ch));
                    }
                    let value = iter.next().ok_or(UsageErrorKind::MissingFlagValue(ch))?;
                    context.value_flags.insert(ch, value.clone());
                } else if any_flags || spec.contains(ch) {
                    context.boolean_flags.insert(ch);
                } else {
                    return Err(UsageErrorKind::UnknownFlag(ch));
                }
            }
        }
        Ok(context)
    }

    /// Positional arguments in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of positional arguments.
    pub fn args_len(&self) -> usize {
        self.args.len()
    }

    /// The positional argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Whether `flag` was given, as either kind.
    pub fn has_flag(&self, flag: char) -> bool {
        self.boolean_flags.contains(&flag) || self.value_flags.contains_key(&flag)
    }

    /// The boolean flags that were given.
    pub fn flags(&self) -> impl Iterator<Item = char> + '_ {
        self.boolean_flags.iter().copied()
    }

    /// The value supplied for a value flag, if it was given.
    pub fn flag_value(&self, flag: char) -> Option<&str> {
        self.value_flags.get(&flag).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    fn spec(s: &str) -> FlagSpec {
        FlagSpec::parse(s).unwrap()
    }

    #[test]
    fn value_flag_consumes_next_token() {
        let context =
            CommandContext::parse(&tokens(&["-b", "5", "-a"]), &spec("ab:"), false).unwrap();
        assert!(context.has_flag('a'));
        assert_eq!(context.flag_value('b'), Some("5"));
        assert_eq!(context.args_len(), 0);
    }

    #[test]
    fn positionals_keep_their_order() {
        let context =
            CommandContext::parse(&tokens(&["one", "-a", "two"]), &spec("a"), false).unwrap();
        assert_eq!(context.args(), &["one".to_string(), "two".to_string()]);
        assert_eq!(context.arg(0), Some("one"));
        assert_eq!(context.arg(2), None);
    }

    #[test]
    fn bundled_flags_split_into_characters() {
        let context = CommandContext::parse(&tokens(&["-ab"]), &spec("ab"), false).unwrap();
        assert!(context.has_flag('a'));
        assert!(context.has_flag('b'));
    }

    #[test]
    fn unknown_flag_is_rejected_without_any_flags() {
        let err = CommandContext::parse(&tokens(&["-x"]), &spec("a"), false).unwrap_err();
        assert_eq!(err, UsageErrorKind::UnknownFlag('x'));
    }

    #[test]
    fn unknown_flag_is_tolerated_with_any_flags() {
        let context = CommandContext::parse(&tokens(&["-x"]), &spec("a"), true).unwrap();
        assert!(context.has_flag('x'));
    }

    #[test]
    fn missing_value_is_rejected() {
        let err = CommandContext::parse(&tokens(&["-b"]), &spec("b:"), false).unwrap_err();
        assert_eq!(err, UsageErrorKind::MissingFlagValue('b'));
    }

    #[test]
    fn duplicate_value_flag_is_rejected() {
        let err =
            CommandContext::parse(&tokens(&["-b", "1", "-b", "2"]), &spec("b:"), false).unwrap_err();
        assert_eq!(err, UsageErrorKind::DuplicateFlagValue('b'));
    }

    #[test]
    fn double_dash_ends_flag_parsing() {
        let context =
            CommandContext::parse(&tokens(&["--", "-a", "plain"]), &spec("a"), false).unwrap();
        assert!(!context.has_flag('a'));
        assert_eq!(context.args(), &["-a".to_string(), "plain".to_string()]);
    }

    #[test]
    fn negative_numbers_are_positional() {
        let context = CommandContext::parse(&tokens(&["-5", "-a"]), &spec("a"), false).unwrap();
        assert_eq!(context.args(), &["-5".to_string()]);
        assert!(context.has_flag('a'));
    }

    #[test]
    fn value_flag_consumes_even_a_flag_shaped_token() {
        let context =
            CommandContext::parse(&tokens(&["-b", "-a"]), &spec("ab:"), false).unwrap();
        assert_eq!(context.flag_value('b'), Some("-a"));
        assert!(!context.has_flag('a'));
    }
}
