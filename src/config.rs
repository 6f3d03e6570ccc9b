use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::flags::Flags;

/// Environment variable naming the history file loaded at startup.
pub const HISTORY_FILE_VAR: &str = "HISTFILE";
/// Environment variable holding the command search path.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// Settings for one shell session, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    pub history_file: Option<PathBuf>,
    pub search_path: Vec<PathBuf>,
    pub quiet: bool,
    pub debug: bool,
}

impl ShellConfig {
    pub fn from_env(flags: &Flags) -> Self {
        Self::resolve(
            flags,
            env::var_os(HISTORY_FILE_VAR).as_deref(),
            env::var_os(SEARCH_PATH_VAR).as_deref(),
        )
    }

    /// `--histfile` wins over `HISTFILE`; empty values count as unset.
    pub fn resolve(flags: &Flags, history_var: Option<&OsStr>, path_var: Option<&OsStr>) -> Self {
        let history_file = flags
            .get_value("histfile")
            .map(PathBuf::from)
            .or_else(|| history_var.map(PathBuf::from))
            .filter(|path| !path.as_os_str().is_empty());

        let search_path = path_var
            .map(|value| {
                env::split_paths(value)
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            history_file,
            search_path,
            quiet: flags.is_set("quiet"),
            debug: flags.is_set("debug"),
        }
    }
}
