//! Option declarations and value binding.
//!
//! An [`OptionDef`] carries a declared option's identity (long and/or short
//! name), its arity (flag / scalar / multi-value), an optional allow-list,
//! a default, and the value bound during the current parse pass.
//!
//! Disallowed values never raise: [`OptionDef::set_value`] degrades them to
//! an unbound state so [`OptionDef::value`] falls back to the default. Call
//! sites rely on that default-fallback behavior.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::RawValue;

/// Text values a flag coerces to `false`. Everything else is truthy.
const FALSY_VALUES: &[&str] = &["", "0", "false", "no", "off"];

/// A bound or default option value.
///
/// # Examples
///
/// ```
/// use argot_core::OptionValue;
///
/// let value = OptionValue::Text("debug".into());
/// assert_eq!(value.as_str(), Some("debug"));
/// assert_eq!(value.as_bool(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionValue {
    /// A flag state.
    Bool(bool),
    /// A single text value.
    Text(String),
    /// An ordered sequence of text values.
    List(Vec<String>),
}

impl OptionValue {
    /// Returns the flag state, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(state) => Some(*state),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a scalar value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the sequence payload, if this is a multi-value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(state) => write!(f, "{state}"),
            OptionValue::Text(text) => f.write_str(text),
            OptionValue::List(values) => f.write_str(&values.join(" ")),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(text: &str) -> Self {
        OptionValue::Text(text.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(text: String) -> Self {
        OptionValue::Text(text)
    }
}

impl From<bool> for OptionValue {
    fn from(state: bool) -> Self {
        OptionValue::Bool(state)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        OptionValue::List(values)
    }
}

/// A single declared option.
///
/// Identity is a long name (two or more characters) and/or a short name
/// (exactly one character); at least one must be set for the option to be
/// accepted by [`OptionSet::declare`](crate::OptionSet::declare).
/// Positional options bind from the positional bucket instead of by flag
/// name and are registered under their long name.
///
/// Use the constructors [`flag`](OptionDef::flag), [`scalar`](OptionDef::scalar),
/// [`multi`](OptionDef::multi), and [`positional`](OptionDef::positional),
/// then chain builder methods.
///
/// # Examples
///
/// ```
/// use argot_core::{OptionDef, OptionValue, RawValue};
///
/// let mut style = OptionDef::scalar(Some('s'), Some("style"))
///     .allow(["plain", "loud", "quiet"])
///     .with_default("plain");
/// assert!(!style.is_required());
///
/// // A disallowed value degrades silently; reads fall back to the default.
/// style.set_value(&[RawValue::Text("fancy".into())]);
/// assert_eq!(style.value(), Some(&OptionValue::Text("plain".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    long: Option<String>,
    short: Option<char>,
    flag: bool,
    positional: bool,
    multi_value: bool,
    description: Option<String>,
    placeholder: Option<String>,
    allowed: Vec<String>,
    default: Option<OptionValue>,
    value: Option<OptionValue>,
}

impl OptionDef {
    fn new(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            long: long.map(String::from),
            short,
            flag: false,
            positional: false,
            multi_value: false,
            description: None,
            placeholder: None,
            allowed: Vec::new(),
            default: None,
            value: None,
        }
    }

    /// Creates a boolean flag option.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::OptionDef;
    ///
    /// let verbose = OptionDef::flag(Some('v'), Some("verbose"));
    /// assert!(verbose.is_flag());
    /// assert_eq!(verbose.name(), "verbose");
    /// ```
    pub fn flag(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            flag: true,
            ..Self::new(short, long)
        }
    }

    /// Creates a single-value named option.
    pub fn scalar(short: Option<char>, long: Option<&str>) -> Self {
        Self::new(short, long)
    }

    /// Creates a multi-value named option.
    pub fn multi(short: Option<char>, long: Option<&str>) -> Self {
        Self {
            multi_value: true,
            ..Self::new(short, long)
        }
    }

    /// Creates a positional option bound from the positional bucket.
    ///
    /// A multi-value positional greedily consumes the entire remaining
    /// positional sequence during binding.
    pub fn positional(name: &str, multiple: bool) -> Self {
        Self {
            positional: true,
            multi_value: multiple,
            ..Self::new(None, Some(name))
        }
    }

    /// Adds a description, shown by help/display layers.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the value placeholder used by display layers.
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Sets the default value, making the option optional.
    pub fn with_default(mut self, default: impl Into<OptionValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts the accepted values. An empty allow-list is unrestricted.
    pub fn allow<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }

    /// Long name, if declared.
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Short name, if declared.
    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    /// Display name: the long name, falling back to the short name.
    pub fn name(&self) -> String {
        self.long
            .clone()
            .or_else(|| self.short.map(|c| c.to_string()))
            .unwrap_or_default()
    }

    pub fn has_long_name(&self) -> bool {
        self.long.is_some()
    }

    pub fn has_short_name(&self) -> bool {
        self.short.is_some()
    }

    /// Whether this option is boolean-only.
    pub fn is_flag(&self) -> bool {
        self.flag
    }

    /// Whether this option binds from the positional bucket.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Whether this option binds a sequence rather than a scalar.
    pub fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    /// Whether this option is required: exactly the absence of a default.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Whether a value was bound during the current parse pass.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared allow-list; empty means unrestricted.
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed
    }

    pub fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    /// Value placeholder for display layers: the declared placeholder,
    /// else the upper-cased long name, else `VALUE`.
    pub fn placeholder(&self) -> String {
        match &self.placeholder {
            Some(placeholder) => placeholder.clone(),
            None => self.long.as_deref().unwrap_or("value").to_ascii_uppercase(),
        }
    }

    /// The bound value, falling back to the default.
    pub fn value(&self) -> Option<&OptionValue> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// Binds a raw value sequence produced by the tokenizer.
    ///
    /// A length-1 sequence is treated as a scalar. Coercion rules:
    ///
    /// - flags coerce to `Bool` — `true` unless the single occurrence is a
    ///   recognized falsy text (`""`, `"0"`, `"false"`, `"no"`, `"off"`,
    ///   case-insensitive);
    /// - a restricted multi-value keeps only allowed members, in their
    ///   original order, silently dropping the rest;
    /// - a restricted single-value accepts only an allowed scalar text and
    ///   otherwise stores nothing, reverting reads to the default;
    /// - unrestricted values are stored verbatim.
    pub fn set_value(&mut self, values: &[RawValue]) {
        if values.is_empty() {
            return;
        }
        if self.flag {
            self.value = Some(OptionValue::Bool(coerce_flag(values)));
        } else if !self.allowed.is_empty() {
            if self.multi_value {
                let kept = values
                    .iter()
                    .filter_map(RawValue::as_text)
                    .filter(|text| self.allowed.iter().any(|allowed| allowed == text))
                    .map(str::to_string)
                    .collect();
                self.value = Some(OptionValue::List(kept));
            } else {
                self.value = match values {
                    [RawValue::Text(text)] if self.allowed.iter().any(|allowed| allowed == text) => {
                        Some(OptionValue::Text(text.clone()))
                    }
                    _ => None,
                };
            }
        } else {
            self.value = Some(match values {
                [RawValue::Flag] => OptionValue::Bool(true),
                [RawValue::Text(text)] => OptionValue::Text(text.clone()),
                _ => OptionValue::List(
                    values
                        .iter()
                        .map(|value| match value {
                            RawValue::Text(text) => text.clone(),
                            RawValue::Flag => "true".to_string(),
                        })
                        .collect(),
                ),
            });
        }
    }
}

fn coerce_flag(values: &[RawValue]) -> bool {
    match values {
        [RawValue::Text(text)] => !FALSY_VALUES
            .iter()
            .any(|falsy| text.eq_ignore_ascii_case(falsy)),
        // A bare occurrence, or several occurrences, is truthy.
        _ => true,
    }
}
