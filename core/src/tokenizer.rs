//! Raw argument tokenizing.
//!
//! Turns a flat sequence of argv strings into named option values plus a
//! bucket of positional values. Classification is regex-driven and tried in
//! a fixed priority order:
//!
//! 1. `--name` / `--name=value` — long flag. The name grammar pins the first
//!    and last characters separately, so long names are always at least two
//!    characters; `--x` falls through to the positional bucket.
//! 2. `-x` / `-x=value` — single short flag.
//! 3. `-xyz` / `-xyz=value` — grouped short flags. Every character but the
//!    last binds as a bare `true`; the last character is the active name
//!    that receives the inline or lookahead value.
//! 4. Anything else — positional.
//!
//! A flag without an inline `=value` consumes the *next* token as its value
//! unless that token is absent or itself starts with `-`. The stream is
//! driven by an explicit cursor so a peeked token can be left unconsumed.
//!
//! There are no parse errors at this layer: malformed tokens silently land
//! in the positional bucket, and disallowed *values* are handled later by
//! [`OptionDef::set_value`](crate::OptionDef::set_value).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Regex patterns for argument token classification.
static PATTERNS: LazyLock<TokenPatterns> = LazyLock::new(TokenPatterns::new);

struct TokenPatterns {
    long_flag: Regex,
    short_flag: Regex,
    grouped_short_flags: Regex,
}

impl TokenPatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure
        // indicates a programmer error in the pattern, not a runtime condition.
        Self {
            // --verbose, --log-level=debug
            long_flag: Regex::new(r"^--([A-Za-z][-A-Za-z0-9]*[A-Za-z0-9])(?:=(.+))?$")
                .expect("static regex must compile"),
            // -v, -v=no
            short_flag: Regex::new(r"^-([A-Za-z0-9])(?:=(.+))?$")
                .expect("static regex must compile"),
            // -abc, -abc=value
            grouped_short_flags: Regex::new(r"^-([A-Za-z0-9]{2,})(?:=(.+))?$")
                .expect("static regex must compile"),
        }
    }
}

/// Classified shape of a single raw argv string.
///
/// # Examples
///
/// ```
/// use argot_core::{TokenKind, classify_token};
///
/// assert_eq!(
///     classify_token("--output=a.txt"),
///     TokenKind::LongFlag { name: "output".into(), value: Some("a.txt".into()) },
/// );
/// assert_eq!(classify_token("a.txt"), TokenKind::Positional("a.txt".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// `--name` or `--name=value`.
    LongFlag {
        name: String,
        value: Option<String>,
    },
    /// `-x` or `-x=value`.
    ShortFlag {
        name: char,
        value: Option<String>,
    },
    /// `-xyz` or `-xyz=value`; the last character is the active name.
    GroupedShortFlags {
        names: Vec<char>,
        value: Option<String>,
    },
    /// A value bound by position rather than by name.
    Positional(String),
}

/// One bound occurrence of an option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawValue {
    /// The option appeared as a bare flag with no value attached.
    Flag,
    /// A literal text value.
    Text(String),
}

impl RawValue {
    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            RawValue::Flag => None,
        }
    }
}

/// Result of tokenizing one argv sequence.
///
/// Named sequences keep their first-seen-to-last-seen order, and a name
/// appears at most once as a key. The positional bucket is always
/// sequence-shaped, even with a single element; scalar collapse for named
/// values happens only when a sequence is handed to
/// [`OptionDef::set_value`](crate::OptionDef::set_value).
///
/// # Examples
///
/// ```
/// use argot_core::{RawValue, parse_arguments};
///
/// let parsed = parse_arguments(&["--tag", "a", "--tag", "b", "in.txt"]);
/// assert_eq!(
///     parsed.values("tag"),
///     Some(&[RawValue::Text("a".into()), RawValue::Text("b".into())][..]),
/// );
/// assert_eq!(parsed.positional(), &["in.txt".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArguments {
    named: Vec<(String, Vec<RawValue>)>,
    positional: Vec<String>,
}

impl ParsedArguments {
    /// Returns the value sequence bound to a name.
    pub fn values(&self, name: &str) -> Option<&[RawValue]> {
        self.named
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Whether any value was bound to the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.named.iter().any(|(key, _)| key == name)
    }

    /// Positional values in their original relative order.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// All bound names, in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.iter().map(|(key, _)| key.as_str())
    }

    /// Whether the parse produced no named and no positional values.
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }

    fn push_named(&mut self, name: String, value: RawValue) {
        match self.named.iter_mut().find(|(key, _)| *key == name) {
            Some((_, values)) => values.push(value),
            None => self.named.push((name, vec![value])),
        }
    }
}

/// Classifies a single raw token against the flag grammar.
///
/// Patterns are tried in priority order; anything unmatched is positional.
pub fn classify_token(token: &str) -> TokenKind {
    if let Some(caps) = PATTERNS.long_flag.captures(token) {
        return TokenKind::LongFlag {
            name: caps[1].to_string(),
            value: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }
    if let Some(caps) = PATTERNS.short_flag.captures(token) {
        return TokenKind::ShortFlag {
            name: caps[1].chars().next().expect("short flag capture is one character"),
            value: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }
    if let Some(caps) = PATTERNS.grouped_short_flags.captures(token) {
        return TokenKind::GroupedShortFlags {
            names: caps[1].chars().collect(),
            value: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }
    TokenKind::Positional(token.to_string())
}

/// Tokenizes a raw argument sequence into named and positional values.
///
/// The caller is expected to have stripped the program and command names
/// already; every token here is either an option or a positional value.
pub fn parse_arguments<S: AsRef<str>>(args: &[S]) -> ParsedArguments {
    let mut parsed = ParsedArguments::default();
    let mut cursor = 0;

    while cursor < args.len() {
        let token = args[cursor].as_ref();
        let kind = classify_token(token);
        debug!(token, kind = ?kind, "classified argument token");
        match kind {
            TokenKind::Positional(value) => parsed.positional.push(value),
            TokenKind::LongFlag { name, value } => {
                let value = resolve_value(value, args, &mut cursor);
                parsed.push_named(name, value);
            }
            TokenKind::ShortFlag { name, value } => {
                let value = resolve_value(value, args, &mut cursor);
                parsed.push_named(name.to_string(), value);
            }
            TokenKind::GroupedShortFlags { names, value } => {
                let (active, leading) = names.split_last().expect("grouped cluster has two or more characters");
                for name in leading {
                    parsed.push_named(name.to_string(), RawValue::Flag);
                }
                let value = resolve_value(value, args, &mut cursor);
                parsed.push_named(active.to_string(), value);
            }
        }
        cursor += 1;
    }

    parsed
}

/// Resolves the value for a flag token at `cursor`.
///
/// Without an inline `=value`, the next token is consumed as the value
/// unless it is absent or looks like another flag; in that case the flag
/// binds bare `true` and the lookahead token is left for the next
/// iteration.
fn resolve_value<S: AsRef<str>>(inline: Option<String>, args: &[S], cursor: &mut usize) -> RawValue {
    if let Some(value) = inline {
        return RawValue::Text(value);
    }
    match args.get(*cursor + 1).map(AsRef::as_ref) {
        Some(next) if !next.starts_with('-') => {
            *cursor += 1;
            RawValue::Text(next.to_string())
        }
        _ => RawValue::Flag,
    }
}
