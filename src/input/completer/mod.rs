mod command;
mod shell;

pub use command::{CompletionEngine, CompletionState};
pub use shell::ShellCompleter;
