//! Option container with dual name indices.
//!
//! An [`OptionSet`] owns every declared [`OptionDef`] exactly once, in an
//! arena kept in declaration order. The long- and short-name indices hold
//! stable [`OptionId`]s into that arena, so an option reachable by both
//! names is two index entries over one object, never a copy.

use crate::error::ConfigurationError;
use crate::option::OptionDef;

/// Stable handle to an option inside its [`OptionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionId(pub(crate) usize);

/// A collection of declared options, indexed by long and short name.
///
/// # Examples
///
/// ```
/// use argot_core::{OptionDef, OptionSet};
///
/// let mut options = OptionSet::new();
/// options.declare(OptionDef::flag(Some('v'), Some("verbose"))).unwrap();
/// options.declare(OptionDef::scalar(Some('o'), Some("output"))).unwrap();
///
/// // Lookup works through either index; both resolve to the same object.
/// assert!(options.get("verbose").unwrap().is_flag());
/// assert!(options.get("v").unwrap().is_flag());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    options: Vec<OptionDef>,
    long: Vec<(String, OptionId)>,
    short: Vec<(String, OptionId)>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an option, registering it under each of its names.
    ///
    /// Fails when the option has no name at all, or when a long or short
    /// name is already taken in this set.
    ///
    /// # Examples
    ///
    /// ```
    /// use argot_core::{ConfigurationError, OptionDef, OptionSet};
    ///
    /// let mut options = OptionSet::new();
    /// options.declare(OptionDef::flag(Some('v'), Some("verbose"))).unwrap();
    ///
    /// let err = options.declare(OptionDef::scalar(Some('v'), None)).unwrap_err();
    /// assert_eq!(err, ConfigurationError::DuplicateShortName('v'));
    /// ```
    pub fn declare(&mut self, option: OptionDef) -> Result<OptionId, ConfigurationError> {
        let long = option.long_name().map(str::to_string);
        let short = option.short_name();
        if long.is_none() && short.is_none() {
            return Err(ConfigurationError::MissingOptionName);
        }
        if let Some(name) = &long {
            if self.long.iter().any(|(key, _)| key == name) {
                return Err(ConfigurationError::DuplicateLongName(name.clone()));
            }
        }
        if let Some(name) = short {
            if self.short.iter().any(|(key, _)| *key == name.to_string()) {
                return Err(ConfigurationError::DuplicateShortName(name));
            }
        }

        let id = OptionId(self.options.len());
        self.options.push(option);
        if let Some(name) = long {
            self.long.push((name, id));
        }
        if let Some(name) = short {
            self.short.push((name.to_string(), id));
        }
        Ok(id)
    }

    /// Returns an option by name, checking the long index first.
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.lookup(name).map(|id| &self.options[id.0])
    }

    /// Mutable access to an option by name, checking the long index first.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut OptionDef> {
        self.lookup(name).map(|id| &mut self.options[id.0])
    }

    /// Whether an option with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of distinct declared options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<OptionId> {
        self.long
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| self.short.iter().find(|(key, _)| key == name))
            .map(|(_, id)| *id)
    }

    pub(crate) fn by_id(&self, id: OptionId) -> &OptionDef {
        &self.options[id.0]
    }

    pub(crate) fn by_id_mut(&mut self, id: OptionId) -> &mut OptionDef {
        &mut self.options[id.0]
    }

    /// Ids of positional options, in declaration order.
    pub(crate) fn positional_ids(&self) -> Vec<OptionId> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.is_positional())
            .map(|(index, _)| OptionId(index))
            .collect()
    }

    /// Index entries as `(name, id)` pairs, long index first.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, OptionId)> {
        self.long
            .iter()
            .chain(self.short.iter())
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// Iterates the union of both name indices.
    ///
    /// An option registered under both a long and a short name is visited
    /// once per index entry. Callers that bind values while iterating must
    /// deduplicate by identity rather than apply side effects twice;
    /// [`bind_options`](crate::bind_options) does exactly that.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDef)> {
        self.entries().map(|(name, id)| (name, &self.options[id.0]))
    }

    /// Flag options only.
    pub fn flags(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.is_flag())
    }

    /// Options without a default value.
    pub fn required(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.is_required())
    }

    /// Options with a default value.
    pub fn optional(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| !option.is_required())
    }

    /// Options bound from the positional bucket.
    pub fn positional(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.is_positional())
    }

    /// Options bound by flag name (the opposite of positional).
    pub fn named(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| !option.is_positional())
    }

    /// Options that bind a sequence of values.
    pub fn multi_value(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.is_multi_value())
    }

    /// Options that carry a long name.
    pub fn with_long_name(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.has_long_name())
    }

    /// Options that carry a short name.
    pub fn with_short_name(&self) -> impl Iterator<Item = &OptionDef> {
        self.iter().map(|(_, option)| option).filter(|option| option.has_short_name())
    }
}
