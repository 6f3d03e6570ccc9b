mod expander;
mod resolver;

pub use expander::PathExpander;
pub use resolver::{is_executable, PathResolver};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("HOME not set")]
    HomeDirNotFound,
}
