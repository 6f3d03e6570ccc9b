use std::env;
use std::io::Write;

use super::{Builtin, CommandError, Context, Flow};

#[derive(Debug, Clone, Copy)]
pub struct PwdCommand;

impl Builtin for PwdCommand {
    fn execute(&self, _args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let cwd = env::current_dir().map_err(CommandError::CurrentDir)?;
        writeln!(ctx.out, "{}", cwd.display())?;
        Ok(Flow::Continue)
    }
}
