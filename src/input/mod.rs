pub mod completer;
pub mod history;

pub use completer::{CompletionEngine, CompletionState, ShellCompleter};
pub use history::{History, HistoryEntry, HistoryError, LoadOutcome};
