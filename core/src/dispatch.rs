//! Command resolution, option binding, and invocation.
//!
//! [`Application`] walks raw process arguments against the command tree,
//! tokenizes whatever remains after command names are consumed, binds the
//! result into the resolved command's [`OptionSet`], and invokes it exactly
//! once. There is no partial-failure recovery: a resolution or
//! configuration error aborts before `invoke` is ever reached.

use tracing::debug;

use crate::command::{Command, CommandId, CommandTree};
use crate::error::{ConfigurationError, DispatchError};
use crate::set::OptionSet;
use crate::tokenizer::{ParsedArguments, RawValue, parse_arguments};

/// Binds tokenized arguments into an option set.
///
/// Named results are matched through both name indices; an option reachable
/// under two names is bound at most once, on its first matching index
/// entry. Positional results are then distributed in declaration order: a
/// single-value positional consumes one element and advances, a multi-value
/// positional greedily consumes the entire remaining sequence and halts
/// distribution.
pub fn bind_options(options: &mut OptionSet, parsed: &ParsedArguments) {
    let mut bound = vec![false; options.len()];
    let entries: Vec<(String, _)> = options
        .entries()
        .map(|(name, id)| (name.to_string(), id))
        .collect();
    for (name, id) in entries {
        if bound[id.0] {
            continue;
        }
        if let Some(values) = parsed.values(&name) {
            options.by_id_mut(id).set_value(values);
            bound[id.0] = true;
        }
    }

    let positional = parsed.positional();
    let mut cursor = 0;
    for id in options.positional_ids() {
        if cursor >= positional.len() {
            break;
        }
        if options.by_id(id).is_multi_value() {
            let rest: Vec<RawValue> = positional[cursor..]
                .iter()
                .cloned()
                .map(RawValue::Text)
                .collect();
            options.by_id_mut(id).set_value(&rest);
            break;
        }
        options
            .by_id_mut(id)
            .set_value(&[RawValue::Text(positional[cursor].clone())]);
        cursor += 1;
    }
}

/// Command-tree runner.
///
/// Owns the tree built around a root command, plus the optional main
/// command used when argv names no sub-command at all.
///
/// # Examples
///
/// ```
/// use argot_core::{Application, Command, DispatchError, OptionSet};
///
/// struct Root;
///
/// impl Command for Root {
///     fn invoke(&mut self, _options: &OptionSet) -> Result<(), DispatchError> {
///         Ok(())
///     }
/// }
///
/// let mut app = Application::new(Box::new(Root)).unwrap();
/// app.run(&["prog"]).unwrap();
/// assert_eq!(app.program_name(), Some("prog"));
/// ```
pub struct Application {
    tree: CommandTree,
    main_command: Option<String>,
    program_name: Option<String>,
    active: Option<CommandId>,
}

impl Application {
    /// Builds an application around a root command.
    pub fn new(root: Box<dyn Command>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            tree: CommandTree::new(root)?,
            main_command: None,
            program_name: None,
            active: None,
        })
    }

    /// Registers a root-level command under the given name.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn() -> Box<dyn Command> + 'static,
    {
        let root = self.tree.root();
        self.tree.register(root, name, Box::new(factory))?;
        Ok(self)
    }

    /// Marks a registered command as the one to run when argv names no
    /// command at all.
    pub fn set_main(&mut self, name: &str) -> Result<&mut Self, ConfigurationError> {
        if !self.tree.is_registered(self.tree.root(), name) {
            return Err(ConfigurationError::UnknownMainCommand(name.to_string()));
        }
        self.main_command = Some(name.to_string());
        Ok(self)
    }

    /// Registers a command and marks it as the main command.
    pub fn register_main<F>(
        &mut self,
        name: &str,
        factory: F,
    ) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn() -> Box<dyn Command> + 'static,
    {
        self.register(name, factory)?;
        self.set_main(name)
    }

    /// Runs the application against raw process arguments.
    ///
    /// The first entry is recorded as the program name. Resolution then
    /// descends the tree while the active node has children: an absent
    /// first token falls back to the main command (at the root only), a
    /// `-`-prefixed token stops resolution (flags belong to the active
    /// command), a matching child name is consumed, and any other token is
    /// a [`DispatchError::UnknownCommand`] failure. The remaining
    /// arguments are tokenized and bound into the resolved command before
    /// its single `invoke` call.
    pub fn run<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<(), DispatchError> {
        let mut args: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        if !args.is_empty() {
            self.program_name = Some(args.remove(0).to_string());
        }

        let root = self.tree.root();
        let mut active = root;
        let mut cursor = 0;
        while self.tree.has_children(active) {
            match args.get(cursor).copied() {
                None => {
                    if active == root {
                        if let Some(main) = self.main_command.clone() {
                            if let Some(child) = self.tree.child(root, &main)? {
                                debug!(command = main.as_str(), "falling back to main command");
                                active = child;
                                continue;
                            }
                        }
                    }
                    break;
                }
                Some(token) if token.starts_with('-') => break,
                Some(token) => match self.tree.child(active, token)? {
                    Some(child) => {
                        debug!(command = token, "resolved subcommand");
                        cursor += 1;
                        active = child;
                    }
                    None => return Err(DispatchError::UnknownCommand(token.to_string())),
                },
            }
        }

        let parsed = parse_arguments(&args[cursor..]);
        bind_options(self.tree.options_mut(active), &parsed);
        self.active = Some(active);
        self.tree.invoke(active)
    }

    /// The program name recorded from argv, once `run` has been called.
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    /// Name of the resolved sub-command; `None` before `run` and when the
    /// root command itself was invoked.
    pub fn active_command(&self) -> Option<&str> {
        self.active.and_then(|id| {
            if id == self.tree.root() {
                None
            } else {
                Some(self.tree.name(id))
            }
        })
    }

    /// Bound options of the resolved command, for display layers.
    pub fn active_options(&self) -> Option<&OptionSet> {
        self.active.map(|id| self.tree.options(id))
    }

    /// The underlying command tree.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::option::{OptionDef, OptionValue};

    struct NoopRoot;

    impl Command for NoopRoot {
        fn invoke(&mut self, _options: &OptionSet) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    /// Records the values this command saw at invocation time.
    struct Probe {
        names: Vec<&'static str>,
        declare: fn(&mut OptionSet) -> Result<(), ConfigurationError>,
        seen: Rc<RefCell<Vec<(String, Option<OptionValue>)>>>,
    }

    impl Command for Probe {
        fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
            (self.declare)(options)
        }

        fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError> {
            let mut seen = self.seen.borrow_mut();
            for &name in &self.names {
                seen.push((
                    name.to_string(),
                    options.get(name).and_then(|option| option.value()).cloned(),
                ));
            }
            Ok(())
        }
    }

    fn probe_factory(
        names: Vec<&'static str>,
        declare: fn(&mut OptionSet) -> Result<(), ConfigurationError>,
        seen: &Rc<RefCell<Vec<(String, Option<OptionValue>)>>>,
    ) -> impl Fn() -> Box<dyn Command> + 'static {
        let seen = seen.clone();
        move || {
            Box::new(Probe {
                names: names.clone(),
                declare,
                seen: seen.clone(),
            }) as Box<dyn Command>
        }
    }

    fn declare_verbose_and_file(options: &mut OptionSet) -> Result<(), ConfigurationError> {
        options.declare(OptionDef::flag(Some('v'), Some("verbose")))?;
        options.declare(OptionDef::positional("file", false))?;
        Ok(())
    }

    #[test]
    fn test_dispatch_resolves_command_and_binds_its_options() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register("build", || Box::new(NoopRoot)).unwrap();
        app.register(
            "test",
            probe_factory(vec!["verbose", "file"], declare_verbose_and_file, &seen),
        )
        .unwrap();

        app.run(&["prog", "test", "--verbose=true", "file.txt"]).unwrap();

        assert_eq!(app.active_command(), Some("test"));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("verbose".to_string(), Some(OptionValue::Bool(true))),
                ("file".to_string(), Some(OptionValue::Text("file.txt".into()))),
            ]
        );
    }

    #[test]
    fn test_trailing_flag_binds_without_consuming_positionals() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register(
            "test",
            probe_factory(vec!["verbose", "file"], declare_verbose_and_file, &seen),
        )
        .unwrap();

        // A bare flag in front of a value would consume it as the flag's
        // lookahead value, so the flag goes last.
        app.run(&["prog", "test", "file.txt", "--verbose"]).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                ("verbose".to_string(), Some(OptionValue::Bool(true))),
                ("file".to_string(), Some(OptionValue::Text("file.txt".into()))),
            ]
        );
    }

    #[test]
    fn test_root_without_children_binds_directly() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let declare: fn(&mut OptionSet) -> Result<(), ConfigurationError> = |options| {
            options.declare(OptionDef::scalar(Some('x'), None))?;
            options.declare(OptionDef::positional("inputs", true))?;
            Ok(())
        };
        let mut app = Application::new(Box::new(Probe {
            names: vec!["x", "inputs"],
            declare,
            seen: seen.clone(),
        }))
        .unwrap();

        app.run(&["prog", "-x=1", "pos1", "pos2"]).unwrap();

        assert_eq!(app.active_command(), None);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("x".to_string(), Some(OptionValue::Text("1".into()))),
                (
                    "inputs".to_string(),
                    Some(OptionValue::List(vec!["pos1".into(), "pos2".into()])),
                ),
            ]
        );
    }

    #[test]
    fn test_unknown_command_fails_resolution() {
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register("build", || Box::new(NoopRoot)).unwrap();

        let err = app.run(&["prog", "deploy"]).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(name) if name == "deploy"));
    }

    #[test]
    fn test_unknown_token_fails_even_with_a_main_command() {
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register_main("build", || Box::new(NoopRoot)).unwrap();

        assert!(matches!(
            app.run(&["prog", "deploy"]),
            Err(DispatchError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_flag_token_keeps_root_active() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let declare: fn(&mut OptionSet) -> Result<(), ConfigurationError> =
            |options| options.declare(OptionDef::flag(Some('v'), Some("verbose"))).map(|_| ());
        let mut app = Application::new(Box::new(Probe {
            names: vec!["verbose"],
            declare,
            seen: seen.clone(),
        }))
        .unwrap();
        app.register("build", || Box::new(NoopRoot)).unwrap();

        app.run(&["prog", "--verbose"]).unwrap();

        assert_eq!(app.active_command(), None);
        assert_eq!(
            *seen.borrow(),
            vec![("verbose".to_string(), Some(OptionValue::Bool(true)))]
        );
    }

    #[test]
    fn test_main_command_runs_when_no_command_named() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register_main(
            "greet",
            probe_factory(vec!["file"], |options| {
                options.declare(OptionDef::positional("file", false)).map(|_| ())
            }, &seen),
        )
        .unwrap();

        app.run(&["prog"]).unwrap();

        assert_eq!(app.active_command(), Some("greet"));
        assert_eq!(*seen.borrow(), vec![("file".to_string(), None)]);
    }

    #[test]
    fn test_set_main_requires_registered_name() {
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        assert_eq!(
            app.set_main("ghost").map(|_| ()).unwrap_err(),
            ConfigurationError::UnknownMainCommand("ghost".to_string())
        );
    }

    #[test]
    fn test_nested_subcommands_resolve_recursively() {
        struct Remote {
            seen: Rc<RefCell<Vec<(String, Option<OptionValue>)>>>,
        }

        impl Command for Remote {
            fn subcommands(&self) -> Vec<(String, crate::command::CommandFactory)> {
                let seen = self.seen.clone();
                vec![(
                    "add".to_string(),
                    Box::new(move || {
                        Box::new(Probe {
                            names: vec!["name"],
                            declare: |options| {
                                options.declare(OptionDef::positional("name", false)).map(|_| ())
                            },
                            seen: seen.clone(),
                        }) as Box<dyn Command>
                    }) as crate::command::CommandFactory,
                )]
            }

            fn invoke(&mut self, _options: &OptionSet) -> Result<(), DispatchError> {
                Ok(())
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let remote_seen = seen.clone();
        let mut app = Application::new(Box::new(NoopRoot)).unwrap();
        app.register("remote", move || {
            Box::new(Remote {
                seen: remote_seen.clone(),
            })
        })
        .unwrap();

        app.run(&["prog", "remote", "add", "origin"]).unwrap();

        assert_eq!(app.active_command(), Some("add"));
        assert_eq!(
            *seen.borrow(),
            vec![("name".to_string(), Some(OptionValue::Text("origin".into())))]
        );
    }

    #[test]
    fn test_bind_deduplicates_dual_named_options() {
        let mut options = OptionSet::new();
        options.declare(OptionDef::flag(Some('v'), Some("verbose"))).unwrap();

        // Both names appear in argv; only the first index entry may apply.
        let parsed = parse_arguments(&["--verbose=no", "-v"]);
        bind_options(&mut options, &parsed);

        assert_eq!(
            options.get("verbose").unwrap().value(),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_bind_ignores_undeclared_names() {
        let mut options = OptionSet::new();
        options.declare(OptionDef::flag(Some('v'), Some("verbose"))).unwrap();

        let parsed = parse_arguments(&["--unknown=1", "-v"]);
        bind_options(&mut options, &parsed);

        assert_eq!(
            options.get("verbose").unwrap().value(),
            Some(&OptionValue::Bool(true))
        );
    }

    #[test]
    fn test_multi_value_positional_consumes_remaining_sequence() {
        let mut options = OptionSet::new();
        options.declare(OptionDef::positional("first", false)).unwrap();
        options.declare(OptionDef::positional("rest", true)).unwrap();
        options.declare(OptionDef::positional("never", false)).unwrap();

        let parsed = parse_arguments(&["one", "two", "three"]);
        bind_options(&mut options, &parsed);

        assert_eq!(
            options.get("first").unwrap().value(),
            Some(&OptionValue::Text("one".into()))
        );
        assert_eq!(
            options.get("rest").unwrap().value(),
            Some(&OptionValue::List(vec!["two".into(), "three".into()]))
        );
        // Distribution halts at the greedy multi-value option.
        assert_eq!(options.get("never").unwrap().value(), None);
    }

    #[test]
    fn test_positional_distribution_stops_when_bucket_is_exhausted() {
        let mut options = OptionSet::new();
        options.declare(OptionDef::positional("first", false)).unwrap();
        options
            .declare(OptionDef::positional("second", false).with_default("-"))
            .unwrap();

        let parsed = parse_arguments(&["only"]);
        bind_options(&mut options, &parsed);

        assert_eq!(
            options.get("first").unwrap().value(),
            Some(&OptionValue::Text("only".into()))
        );
        assert!(!options.get("second").unwrap().has_value());
        assert_eq!(
            options.get("second").unwrap().value(),
            Some(&OptionValue::Text("-".into()))
        );
    }

    #[test]
    fn test_fresh_instances_bind_identically() {
        let argv = ["--tag", "a", "-xy=7", "one", "two"];
        let declare = |options: &mut OptionSet| -> Result<(), ConfigurationError> {
            options.declare(OptionDef::multi(Some('t'), Some("tag")))?;
            options.declare(OptionDef::flag(Some('x'), None))?;
            options.declare(OptionDef::scalar(Some('y'), None))?;
            options.declare(OptionDef::positional("inputs", true))?;
            Ok(())
        };

        let mut first = OptionSet::new();
        declare(&mut first).unwrap();
        let mut second = OptionSet::new();
        declare(&mut second).unwrap();

        bind_options(&mut first, &parse_arguments(&argv));
        bind_options(&mut second, &parse_arguments(&argv));

        for (name, option) in first.iter() {
            assert_eq!(option.value(), second.get(name).unwrap().value(), "{name}");
        }
    }
}
