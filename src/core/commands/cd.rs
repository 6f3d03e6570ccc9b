use std::{env, io};

use tracing::debug;

use super::{Builtin, CommandError, Context, Flow};
use crate::path::PathExpander;

#[derive(Debug, Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new(PathExpander::new())
    }
}

impl CdCommand {
    pub fn new(path_expander: PathExpander) -> Self {
        Self { path_expander }
    }
}

impl Builtin for CdCommand {
    fn execute(&self, args: &[String], _ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let target = match args {
            [] => "~",
            [target] => target.as_str(),
            _ => return Err(CommandError::invalid("cd", "too many arguments")),
        };
        let path = self.path_expander.expand(target)?;

        env::set_current_dir(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => CommandError::NoSuchDirectory(target.to_string()),
            _ => CommandError::ChangeDirectory {
                path: target.to_string(),
                source,
            },
        })?;

        debug!(path = %path.display(), "changed directory");
        Ok(Flow::Continue)
    }
}
