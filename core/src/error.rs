//! Error types for option declaration, command registration, and dispatch.

use thiserror::Error;

/// Declaration-time errors.
///
/// Raised while a command declares its options or registers sub-commands.
/// These are fail-fast programming errors, never recoverable at runtime.
///
/// # Examples
///
/// ```
/// use argot_core::{ConfigurationError, OptionDef, OptionSet};
///
/// let mut options = OptionSet::new();
/// let err = options.declare(OptionDef::scalar(None, None)).unwrap_err();
/// assert_eq!(err, ConfigurationError::MissingOptionName);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// An option was declared with neither a long nor a short name.
    #[error("option must define a long or short name")]
    MissingOptionName,
    /// Two options in the same set share a long name.
    #[error("duplicate long option name: {0}")]
    DuplicateLongName(String),
    /// Two options in the same set share a short name.
    #[error("duplicate short option name: {0}")]
    DuplicateShortName(char),
    /// A command name was registered twice under the same parent.
    #[error("command '{0}' already registered")]
    DuplicateCommand(String),
    /// The main command refers to a name that was never registered.
    #[error("cannot set '{0}' as the main command, no such command registered")]
    UnknownMainCommand(String),
}

/// Errors surfaced while resolving and running the command tree.
///
/// Configuration faults can appear here too: child commands are
/// instantiated lazily, so their option declarations only run once the
/// dispatcher first reaches them.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The first positional token matched no registered command while
    /// sub-commands exist.
    #[error("command '{0}' does not exist")]
    UnknownCommand(String),
    /// A lazily instantiated command declared invalid options or children.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The invoked command itself reported a failure.
    #[error("{0}")]
    Failed(String),
}
