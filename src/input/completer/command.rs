use std::{collections::BTreeSet, fs, path::Path};

use tracing::debug;

use crate::path::{is_executable, PathResolver};

/// Snapshot of every completable command name: the builtins plus each
/// executable found on the search path when the session started.
#[derive(Debug, Clone, Default)]
pub struct CompletionEngine {
    commands: BTreeSet<String>,
}

impl CompletionEngine {
    pub fn new<'a>(builtins: impl IntoIterator<Item = &'a str>, resolver: &PathResolver) -> Self {
        let mut commands: BTreeSet<String> = builtins.into_iter().map(String::from).collect();
        for dir in resolver.dirs() {
            add_path_commands(dir, &mut commands);
        }

        debug!(commands = commands.len(), "built completion snapshot");
        Self { commands }
    }

    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            commands: names.into_iter().collect(),
        }
    }

    /// Every known command starting with `prefix`, sorted. An empty prefix
    /// returns the whole snapshot.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.commands
            .range(prefix.to_string()..)
            .take_while(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn state(&self, prefix: &str) -> CompletionState {
        CompletionState {
            prefix: prefix.to_string(),
            candidates: self.complete(prefix),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn add_path_commands(dir: &Path, commands: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        if let Some(name) = entry.file_name().to_str() {
            if !commands.contains(name) && is_executable(&entry.path()) {
                commands.insert(name.to_string());
            }
        }
    }
}

/// Candidates for one prefix, sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    pub prefix: String,
    pub candidates: Vec<String>,
}

impl CompletionState {
    /// The single match, if there is exactly one.
    pub fn unique(&self) -> Option<&str> {
        match self.candidates.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Text to insert for a unique match: the name plus a separating space.
    pub fn replacement(&self) -> Option<String> {
        self.unique().map(|name| format!("{} ", name))
    }
}
