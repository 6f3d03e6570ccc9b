mod file_ops;
pub mod types;

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};

use self::file_ops::FileOps;
pub use self::types::{HistoryEntry, LoadOutcome};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Append-only command log for the session, synchronised with a plain-text
/// history file.
///
/// `last_flushed` counts the entries already written by [`History::append_to_file`];
/// it never exceeds `entries.len()` and only goes back to zero when the log is
/// replaced by a load. `generation` counts those replacements.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    last_flushed: usize,
    generation: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `line` with the next index and returns that index.
    pub fn record(&mut self, line: &str) -> usize {
        let index = self.entries.len() + 1;
        self.entries.push(HistoryEntry::new(index, line));
        index
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The last `count` entries, keeping their original indices.
    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_flushed(&self) -> usize {
        self.last_flushed
    }

    /// Bumped every time a load replaces the log.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the log with the lines of `path`, renumbering from 1.
    ///
    /// When `action` is given it becomes entry 1, ahead of the file's lines,
    /// so the load itself shows up in the log. A file that does not exist
    /// leaves the log untouched and yields [`LoadOutcome::Missing`].
    pub fn load_from_file(
        &mut self,
        path: &Path,
        action: Option<&str>,
    ) -> Result<LoadOutcome, HistoryError> {
        let lines = match FileOps::new(path).load_lines() {
            Ok(lines) => lines,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "history file not found, keeping history");
                return Ok(LoadOutcome::Missing);
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let loaded = lines.len();
        self.entries.clear();
        self.last_flushed = 0;
        self.generation += 1;
        if let Some(action) = action {
            self.record(action);
        }
        for line in &lines {
            self.record(line);
        }

        debug!(path = %path.display(), loaded, "loaded history file");
        Ok(LoadOutcome::Loaded(loaded))
    }

    /// Overwrites `path` with every entry, in index order.
    pub fn save_to_file(&self, path: &Path) -> Result<(), HistoryError> {
        FileOps::new(path)
            .write_lines(self.entries.iter().map(|entry| entry.text.as_str()))
            .map_err(|source| {
                warn!(path = %path.display(), error = %source, "failed to write history file");
                HistoryError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }

    /// Appends the entries recorded since the previous append and returns how
    /// many were written.
    pub fn append_to_file(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let pending = &self.entries[self.last_flushed..];
        if pending.is_empty() {
            return Ok(0);
        }

        FileOps::new(path)
            .append_lines(pending.iter().map(|entry| entry.text.as_str()))
            .map_err(|source| HistoryError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        let written = pending.len();
        self.last_flushed = self.entries.len();
        debug!(path = %path.display(), written, "appended history");
        Ok(written)
    }
}
