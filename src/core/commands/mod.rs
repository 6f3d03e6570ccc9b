use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

mod cd;
mod echo;
mod exit;
mod history;
mod pwd;
mod type_cmd;

pub use cd::CdCommand;
pub use echo::EchoCommand;
pub use exit::ExitCommand;
pub use history::HistoryCommand;
pub use pwd::PwdCommand;
pub use type_cmd::TypeCommand;

use crate::input::history::{History, HistoryError};
use crate::path::{PathError, PathExpander, PathResolver};

/// Names of every builtin, in registration order.
pub const BUILTIN_NAMES: [&str; 6] = ["echo", "type", "pwd", "cd", "exit", "history"];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),
    #[error("cd: {path}: {source}")]
    ChangeDirectory { path: String, source: io::Error },
    #[error("cd: {0}")]
    Path(#[from] PathError),
    #[error("pwd: {0}")]
    CurrentDir(io::Error),
    #[error("{command}: {message}")]
    InvalidArguments {
        command: &'static str,
        message: String,
    },
    #[error("history: {0}")]
    History(#[from] HistoryError),
    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    pub(crate) fn invalid(command: &'static str, message: impl Into<String>) -> Self {
        CommandError::InvalidArguments {
            command,
            message: message.into(),
        }
    }
}

/// How the dispatcher should carry on after a builtin ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
    /// The builtin already put its own line into history.
    Recorded,
}

/// Everything a builtin may touch while it runs.
pub struct Context<'a> {
    pub history: &'a mut History,
    pub resolver: &'a PathResolver,
    pub builtins: &'a BuiltinRegistry,
    pub history_file: Option<&'a Path>,
    /// The trimmed input line that invoked the builtin.
    pub line: &'a str,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

pub trait Builtin {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError>;
}

#[derive(Debug, Clone)]
pub enum CommandType {
    Echo(EchoCommand),
    Type(TypeCommand),
    Pwd(PwdCommand),
    Cd(CdCommand),
    Exit(ExitCommand),
    History(HistoryCommand),
}

impl Builtin for CommandType {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        match self {
            CommandType::Echo(cmd) => cmd.execute(args, ctx),
            CommandType::Type(cmd) => cmd.execute(args, ctx),
            CommandType::Pwd(cmd) => cmd.execute(args, ctx),
            CommandType::Cd(cmd) => cmd.execute(args, ctx),
            CommandType::Exit(cmd) => cmd.execute(args, ctx),
            CommandType::History(cmd) => cmd.execute(args, ctx),
        }
    }
}

/// The fixed builtin table. Built once and never modified afterwards.
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    commands: BTreeMap<&'static str, CommandType>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::with_expander(PathExpander::new())
    }

    pub fn with_expander(expander: PathExpander) -> Self {
        let commands = [
            ("echo", CommandType::Echo(EchoCommand)),
            ("type", CommandType::Type(TypeCommand)),
            ("pwd", CommandType::Pwd(PwdCommand)),
            ("cd", CommandType::Cd(CdCommand::new(expander))),
            ("exit", CommandType::Exit(ExitCommand)),
            ("history", CommandType::History(HistoryCommand)),
        ]
        .into_iter()
        .collect();

        Self { commands }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandType> {
        self.commands.get(name)
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}
