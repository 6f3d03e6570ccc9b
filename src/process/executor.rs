use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Launcher, ProcessError};

#[cfg(unix)]
const HOST_SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const HOST_SHELL: (&str, &str) = ("cmd", "/C");

/// Runs children in the foreground with the shell's own standard streams.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, mut command: Command, label: &str) -> Result<Option<i32>, ProcessError> {
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
            command: label.to_string(),
            source,
        })?;

        let status = child.wait().map_err(|source| ProcessError::Wait {
            command: label.to_string(),
            source,
        })?;

        if !status.success() {
            debug!(command = label, %status, "process exited unsuccessfully");
        }
        Ok(status.code())
    }
}

impl Launcher for ProcessExecutor {
    fn launch(&self, program: &Path, name: &str, args: &[String]) -> Result<Option<i32>, ProcessError> {
        let mut command = Command::new(program);
        command.args(args);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(name);
        }
        self.run(command, name)
    }

    fn passthrough(&self, line: &str) -> Result<Option<i32>, ProcessError> {
        let (shell, flag) = HOST_SHELL;
        let mut command = Command::new(shell);
        command.arg(flag).arg(line);
        self.run(command, shell)
    }
}
