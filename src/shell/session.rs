use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::ShellConfig;
use crate::core::commands::BuiltinRegistry;
use crate::input::history::{History, HistoryError, LoadOutcome};
use crate::input::CompletionEngine;
use crate::path::PathResolver;

/// State that lives for the whole session and is shared between the line
/// editor and the dispatcher.
///
/// The session owns the history log and the completion snapshot. The line
/// editor only ever gets a read-only handle to completion; history is mutated
/// by the dispatcher alone.
pub struct Session {
    pub(crate) history: History,
    pub(crate) resolver: PathResolver,
    completion: Arc<CompletionEngine>,
    history_file: Option<PathBuf>,
}

impl Session {
    pub fn new(config: &ShellConfig, builtins: &BuiltinRegistry) -> Self {
        let resolver = PathResolver::new(config.search_path.iter().cloned());
        let completion = Arc::new(CompletionEngine::new(builtins.names(), &resolver));

        Self {
            history: History::new(),
            resolver,
            completion,
            history_file: config.history_file.clone(),
        }
    }

    /// Loads the configured history file, if any. A file that does not exist
    /// yet is not an error.
    pub fn load_history(&mut self) -> Result<LoadOutcome, HistoryError> {
        match &self.history_file {
            Some(path) => self.history.load_from_file(path, None),
            None => Ok(LoadOutcome::Missing),
        }
    }

    /// Writes the whole log back to the configured history file.
    pub fn persist_history(&self) -> Result<(), HistoryError> {
        if let Some(path) = &self.history_file {
            self.history.save_to_file(path)?;
            debug!(path = %path.display(), entries = self.history.len(), "saved history");
        }
        Ok(())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn completion(&self) -> Arc<CompletionEngine> {
        Arc::clone(&self.completion)
    }

    pub fn history_file(&self) -> Option<&Path> {
        self.history_file.as_deref()
    }
}
