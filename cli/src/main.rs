//! Demonstration CLI built on the `argot-core` dispatcher.
//!
//! A small text-utility front end: `greet` prints a configurable greeting
//! and `count` reports line/word/character counts for files. Its purpose
//! is to exercise the full dispatch path (command resolution, option
//! binding, positional distribution, error surfacing) from a real process
//! boundary.

use std::fs;
use std::process::ExitCode;

use argot_core::{
    Application, Command, ConfigurationError, DispatchError, OptionDef, OptionSet,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Root command: owns the global `--version` flag and prints usage when
/// invoked without a matching sub-command.
struct Root;

impl Command for Root {
    fn description(&self) -> &str {
        "Text utilities demonstrating the argot dispatcher"
    }

    fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
        options.declare(
            OptionDef::flag(Some('V'), Some("version"))
                .with_description("Print the version and exit"),
        )?;
        Ok(())
    }

    fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError> {
        if flag_enabled(options, "version") {
            println!("argot {VERSION}");
            return Ok(());
        }
        println!("usage: argot <command> [options]");
        println!("commands: greet, count");
        Ok(())
    }
}

/// Prints a greeting for a name, in one of a few fixed styles.
struct Greet;

impl Command for Greet {
    fn description(&self) -> &str {
        "Print a greeting"
    }

    fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
        options.declare(
            OptionDef::positional("name", false)
                .with_default("world")
                .with_description("Name to greet"),
        )?;
        options.declare(
            OptionDef::scalar(Some('s'), Some("style"))
                .allow(["plain", "loud", "quiet"])
                .with_default("plain")
                .with_placeholder("STYLE")
                .with_description("Greeting style"),
        )?;
        Ok(())
    }

    fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError> {
        let name = scalar_or(options, "name", "world");
        let style = scalar_or(options, "style", "plain");
        let line = match style.as_str() {
            "loud" => format!("Hello, {name}!").to_uppercase(),
            "quiet" => format!("hello, {}.", name.to_lowercase()),
            _ => format!("Hello, {name}!"),
        };
        println!("{line}");
        Ok(())
    }
}

/// Reports line, word, and character counts for one or more files.
struct Count;

impl Command for Count {
    fn description(&self) -> &str {
        "Count lines, words, and characters in files"
    }

    fn configure(&self, options: &mut OptionSet) -> Result<(), ConfigurationError> {
        options.declare(
            OptionDef::positional("files", true).with_description("Files to inspect"),
        )?;
        options.declare(
            OptionDef::flag(Some('l'), Some("lines")).with_description("Show line counts"),
        )?;
        options.declare(
            OptionDef::flag(Some('w'), Some("words")).with_description("Show word counts"),
        )?;
        options.declare(
            OptionDef::flag(Some('c'), Some("chars")).with_description("Show character counts"),
        )?;
        Ok(())
    }

    fn invoke(&mut self, options: &OptionSet) -> Result<(), DispatchError> {
        let files: Vec<String> = match options
            .get("files")
            .and_then(|option| option.value())
            .and_then(|value| value.as_list())
        {
            Some(files) if !files.is_empty() => files.to_vec(),
            _ => return Err(DispatchError::Failed("no input files given".to_string())),
        };

        let mut show_lines = flag_enabled(options, "lines");
        let mut show_words = flag_enabled(options, "words");
        let mut show_chars = flag_enabled(options, "chars");
        if !(show_lines || show_words || show_chars) {
            show_lines = true;
            show_words = true;
            show_chars = true;
        }

        for file in &files {
            let text = fs::read_to_string(file)
                .map_err(|err| DispatchError::Failed(format!("{file}: {err}")))?;
            let mut columns = Vec::new();
            if show_lines {
                columns.push(text.lines().count().to_string());
            }
            if show_words {
                columns.push(text.split_whitespace().count().to_string());
            }
            if show_chars {
                columns.push(text.chars().count().to_string());
            }
            columns.push(file.clone());
            println!("{}", columns.join("\t"));
        }
        Ok(())
    }
}

fn flag_enabled(options: &OptionSet, name: &str) -> bool {
    options
        .get(name)
        .and_then(|option| option.value())
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn scalar_or(options: &OptionSet, name: &str, fallback: &str) -> String {
    options
        .get(name)
        .and_then(|option| option.value())
        .and_then(|value| value.as_str())
        .unwrap_or(fallback)
        .to_string()
}

fn build() -> Result<Application, ConfigurationError> {
    let mut app = Application::new(Box::new(Root))?;
    app.register("count", || Box::new(Count))?;
    app.register_main("greet", || Box::new(Greet))?;
    Ok(app)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    debug!(version = VERSION, "starting argot");

    let mut app = match build() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("argot: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = app.run(&argv) {
        eprintln!("argot: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
