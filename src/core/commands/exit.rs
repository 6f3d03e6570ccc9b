use super::{Builtin, CommandError, Context, Flow};

/// Ends the session. Any status argument is accepted and ignored.
#[derive(Debug, Clone, Copy)]
pub struct ExitCommand;

impl Builtin for ExitCommand {
    fn execute(&self, _args: &[String], _ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}
