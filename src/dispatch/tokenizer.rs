//! Quote-aware re-tokenization.
//!
//! Raw input arrives pre-split on spaces. Before detection, the tokens
//! are rejoined and re-split so that single- or double-quoted spans
//! survive as one token. Malformed quoting degrades to an empty token
//! list rather than an error; the dispatcher treats that as input it
//! does not handle.

use tracing::debug;

/// Rejoin `tokens` with single spaces and re-split honoring quotes.
pub fn retokenize(tokens: &[String]) -> Vec<String> {
    tokenize(&tokens.join(" "))
}

/// Split `input` into tokens, treating quoted spans as single tokens.
///
/// Quote characters are stripped; empty tokens are dropped. An
/// unterminated quote yields an empty list.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }

    if quote.is_some() {
        debug!(input, "unterminated quote in command input");
        return Vec::new();
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
