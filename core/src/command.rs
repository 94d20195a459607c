//! Command tree with lazy, memoized child instantiation.
//!
//! A [`Command`] declares its options, optionally names child commands, and
//! exposes an `invoke` contract. The [`CommandTree`] owns every instantiated
//! command in an arena; children are registered as factories and built on
//! first access, at most once per run, with a non-owning parent id pointing
//! back up the tree.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigurationError, DispatchError};
use crate::set::OptionSet;

/// A unit of executable behavior in the command tree.
///
/// Implementations declare options in [`configure`](Command::configure),
/// optionally return child factories from
/// [`subcommands`](Command::subcommands), and do their work in
/// [`invoke`](Command::invoke) once the dispatcher has bound the options.
pub trait Command {
    /// Human-readable description for display layers.
    fn description(&self) -> &str {
        ""
    }

    /// Declares the options this command accepts.
    fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
        let _ = options;
        Ok(())
    }

    /// Named child commands, as lazily invoked factories.
    fn subcommands(&self) -> Vec<(String, CommandFactory)> {
        Vec::new()
    }

    /// Runs the command with its options fully bound.
    fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError>;
}

/// Builds a command instance on first access.
pub type CommandFactory = Box<dyn Fn() -> Box<dyn Command>>;

/// Stable handle to an instantiated command inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandId(pub(crate) usize);

struct CommandNode {
    name: String,
    command: Box<dyn Command>,
    options: OptionSet,
    /// Declared children, in registration order; factories are consulted
    /// only until the child lands in the `children` cache.
    registered: Vec<(String, CommandFactory)>,
    children: HashMap<String, CommandId>,
    parent: Option<CommandId>,
}

/// Arena of instantiated commands forming the dispatch tree.
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Builds a tree around a root command, running its configuration.
    pub fn new(command: Box<dyn Command>) -> Result<Self, ConfigurationError> {
        let mut tree = Self { nodes: Vec::new() };
        tree.build_node(String::new(), command, None)?;
        Ok(tree)
    }

    /// The root command's id.
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Registers a child command factory under a parent node.
    pub fn register(
        &mut self,
        parent: CommandId,
        name: &str,
        factory: CommandFactory,
    ) -> Result<(), ConfigurationError> {
        let node = &mut self.nodes[parent.0];
        if node.registered.iter().any(|(key, _)| key == name) {
            return Err(ConfigurationError::DuplicateCommand(name.to_string()));
        }
        node.registered.push((name.to_string(), factory));
        Ok(())
    }

    /// Resolves a child by name, instantiating and caching it on first
    /// access. Returns `None` when no such child is registered.
    pub fn child(
        &mut self,
        parent: CommandId,
        name: &str,
    ) -> Result<Option<CommandId>, ConfigurationError> {
        if let Some(child) = self.nodes[parent.0].children.get(name) {
            return Ok(Some(*child));
        }
        let Some(index) = self.nodes[parent.0]
            .registered
            .iter()
            .position(|(key, _)| key == name)
        else {
            return Ok(None);
        };

        let command = (self.nodes[parent.0].registered[index].1)();
        let child = self.build_node(name.to_string(), command, Some(parent))?;
        self.nodes[parent.0].children.insert(name.to_string(), child);
        debug!(command = name, "instantiated subcommand");
        Ok(Some(child))
    }

    /// Whether any child command is registered under this node.
    pub fn has_children(&self, id: CommandId) -> bool {
        !self.nodes[id.0].registered.is_empty()
    }

    /// Whether a child with the given name is registered under this node.
    pub fn is_registered(&self, id: CommandId, name: &str) -> bool {
        self.nodes[id.0].registered.iter().any(|(key, _)| key == name)
    }

    /// Registered child names, in registration order.
    pub fn child_names(&self, id: CommandId) -> Vec<&str> {
        self.nodes[id.0]
            .registered
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Non-owning reference to the parent node; `None` at the root.
    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.nodes[id.0].parent
    }

    /// The node's command name; empty at the root.
    pub fn name(&self, id: CommandId) -> &str {
        &self.nodes[id.0].name
    }

    /// The node's description, as reported by its command.
    pub fn description(&self, id: CommandId) -> &str {
        self.nodes[id.0].command.description()
    }

    /// The node's declared options.
    pub fn options(&self, id: CommandId) -> &OptionSet {
        &self.nodes[id.0].options
    }

    pub(crate) fn options_mut(&mut self, id: CommandId) -> &mut OptionSet {
        &mut self.nodes[id.0].options
    }

    pub(crate) fn invoke(&mut self, id: CommandId) -> Result<(), DispatchError> {
        let CommandNode { command, options, .. } = &mut self.nodes[id.0];
        command.invoke(options)
    }

    fn build_node(
        &mut self,
        name: String,
        command: Box<dyn Command>,
        parent: Option<CommandId>,
    ) -> Result<CommandId, ConfigurationError> {
        let mut options = OptionSet::new();
        command.configure(&mut options)?;

        let mut registered: Vec<(String, CommandFactory)> = Vec::new();
        for (child_name, factory) in command.subcommands() {
            if registered.iter().any(|(key, _)| *key == child_name) {
                return Err(ConfigurationError::DuplicateCommand(child_name));
            }
            registered.push((child_name, factory));
        }

        let id = CommandId(self.nodes.len());
        self.nodes.push(CommandNode {
            name,
            command,
            options,
            registered,
            children: HashMap::new(),
            parent,
        });
        Ok(id)
    }
}
