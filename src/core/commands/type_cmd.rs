use std::io::Write;

use super::{Builtin, CommandError, Context, Flow};

/// Reports how each name would be run: as a builtin, as a program on the
/// search path, or not at all.
#[derive(Debug, Clone, Copy)]
pub struct TypeCommand;

impl Builtin for TypeCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        for name in args {
            if ctx.builtins.is_builtin(name) {
                writeln!(ctx.out, "{} is a shell builtin", name)?;
            } else if let Some(path) = ctx.resolver.resolve(name) {
                writeln!(ctx.out, "{} is {}", name, path.display())?;
            } else {
                writeln!(ctx.err, "{}: not found", name)?;
            }
        }
        Ok(Flow::Continue)
    }
}
