use std::{io, path::Path};

use thiserror::Error;

pub mod executor;
pub mod signal;

pub use executor::ProcessExecutor;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{command}: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("{command}: {source}")]
    Wait { command: String, source: io::Error },
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// The process-launch service the dispatcher hands external work to.
///
/// Both calls block until the child exits and report its exit code, or
/// `None` when it was ended by a signal.
pub trait Launcher {
    /// Runs `program` with `args`; the child sees `name` as its argv[0].
    fn launch(&self, program: &Path, name: &str, args: &[String]) -> Result<Option<i32>, ProcessError>;

    /// Hands `line` verbatim to the host command interpreter.
    fn passthrough(&self, line: &str) -> Result<Option<i32>, ProcessError>;
}
