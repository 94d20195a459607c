//! Argument tokenizing, option binding, and command-tree dispatch.
//!
//! This crate is the engine behind a command-line program: it turns raw
//! process arguments into named and positional values, binds them to
//! declared options with type/arity rules, and dispatches execution across
//! a tree of sub-commands.
//!
//! - [`parse_arguments`] / [`TokenKind`] — regex-driven token
//!   classification with two-token lookahead, producing
//!   [`ParsedArguments`].
//! - [`OptionDef`] / [`OptionValue`] — a declared option's identity,
//!   arity, allow-list, default, and bound value.
//! - [`OptionSet`] — an arena of options indexed by long and short name,
//!   with filtered views for display layers.
//! - [`Command`] / [`CommandTree`] — the executable unit contract and the
//!   lazily instantiated, memoized command tree.
//! - [`Application`] — the runner: resolve, bind, invoke.
//!
//! Rendering, help text, prompting, and other display concerns are
//! consumers of the parsed state, never dependencies of it: they read
//! bound values through [`OptionSet::get`] and [`OptionDef::value`].
//!
//! # Example
//!
//! ```
//! use argot_core::*;
//!
//! struct Greet;
//!
//! impl Command for Greet {
//!     fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
//!         options.declare(OptionDef::positional("name", false).with_default("world"))?;
//!         options.declare(OptionDef::flag(Some('l'), Some("loud")))?;
//!         Ok(())
//!     }
//!
//!     fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError> {
//!         let name = options
//!             .get("name")
//!             .and_then(|option| option.value())
//!             .and_then(|value| value.as_str())
//!             .unwrap_or_default()
//!             .to_string();
//!         assert_eq!(name, "crew");
//!         Ok(())
//!     }
//! }
//!
//! struct Root;
//!
//! impl Command for Root {
//!     fn invoke(&mut self, _options: &OptionSet) -> Result<(), DispatchError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut app = Application::new(Box::new(Root)).unwrap();
//! app.register("greet", || Box::new(Greet)).unwrap();
//! app.run(&["prog", "greet", "crew"]).unwrap();
//! assert_eq!(app.active_command(), Some("greet"));
//! ```

mod command;
mod dispatch;
mod error;
mod option;
mod set;
mod tokenizer;

pub use command::{Command, CommandFactory, CommandId, CommandTree};
pub use dispatch::{Application, bind_options};
pub use error::{ConfigurationError, DispatchError};
pub use option::{OptionDef, OptionValue};
pub use set::{OptionId, OptionSet};
pub use tokenizer::{ParsedArguments, RawValue, TokenKind, classify_token, parse_arguments};
