use thiserror::Error;

use crate::process::ProcessError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
    #[error("Flag error: {0}")]
    FlagError(String),
}
