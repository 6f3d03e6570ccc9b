use std::io::Write;

use super::{Builtin, CommandError, Context, Flow};

#[derive(Debug, Clone, Copy)]
pub struct EchoCommand;

impl Builtin for EchoCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        writeln!(ctx.out, "{}", args.join(" "))?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;

    #[test]
    fn test_echo_joins_with_single_spaces() {
        let mut harness = Harness::new();
        assert_eq!(harness.run("echo a   b c").ok(), Some(Flow::Continue));
        assert_eq!(harness.stdout(), "a b c\n");
    }

    #[test]
    fn test_echo_keeps_quoted_whitespace() {
        let mut harness = Harness::new();
        harness.run("echo 'a   b'").expect("echo");
        harness.run(r#"echo "a\"b""#).expect("echo");
        assert_eq!(harness.stdout(), "a   b\na\"b\n");
    }

    #[test]
    fn test_echo_without_arguments() {
        let mut harness = Harness::new();
        harness.run("echo").expect("echo");
        assert_eq!(harness.stdout(), "\n");
    }
}
