use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::session::Session;
use crate::core::commands::{Builtin, BuiltinRegistry, CommandType, Context, Flow};
use crate::core::parser::{self, Command, ParseError};
use crate::process::{Launcher, ProcessExecutor};

/// Markers that send a line to the host interpreter untouched.
const PASSTHROUGH_MARKERS: [&str; 3] = [">", "1>", "|"];

/// Whether the read loop should keep going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Terminate,
}

/// What a line turns out to be, decided once before anything runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Empty,
    Passthrough(String),
    Builtin(Command),
    External { path: PathBuf, command: Command },
    NotFound(Command),
}

pub fn is_passthrough(line: &str) -> bool {
    PASSTHROUGH_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Routes each input line to a builtin, an external program or the host
/// interpreter, and records it in history.
pub struct Dispatcher {
    builtins: BuiltinRegistry,
    launcher: Box<dyn Launcher>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(BuiltinRegistry::new(), Box::new(ProcessExecutor::new()))
    }
}

impl Dispatcher {
    pub fn new(builtins: BuiltinRegistry, launcher: Box<dyn Launcher>) -> Self {
        Self { builtins, launcher }
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn classify(&self, line: &str, session: &Session) -> Result<CommandKind, ParseError> {
        if is_passthrough(line) {
            return Ok(CommandKind::Passthrough(line.to_string()));
        }

        let command = parser::tokenize(line)?;
        if command.is_empty() {
            return Ok(CommandKind::Empty);
        }
        if self.builtins.is_builtin(&command.name) {
            return Ok(CommandKind::Builtin(command));
        }

        Ok(match session.resolver.resolve(&command.name) {
            Some(path) => CommandKind::External { path, command },
            None => CommandKind::NotFound(command),
        })
    }

    /// Runs one raw input line.
    ///
    /// Every non-empty line that parses is recorded in history once, after it
    /// has run, unless the builtin already recorded it itself. Lines that fail
    /// to parse are reported and dropped.
    pub fn dispatch(
        &self,
        session: &mut Session,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Outcome {
        let kind = match self.classify(line, session) {
            Ok(kind) => kind,
            Err(e) => {
                report(err, format_args!("syntax error: {}", e));
                return Outcome::Continue;
            }
        };
        debug!(kind = ?kind, "dispatching line");

        let trimmed = line.trim();
        let (outcome, record) = match kind {
            CommandKind::Empty => return Outcome::Continue,
            CommandKind::Passthrough(raw) => {
                if let Err(e) = self.launcher.passthrough(&raw) {
                    report(err, e);
                }
                (Outcome::Continue, true)
            }
            CommandKind::Builtin(command) => match self.builtins.lookup(&command.name) {
                Some(builtin) => self.run_builtin(builtin, &command, trimmed, session, out, err),
                None => (Outcome::Continue, true),
            },
            CommandKind::External { path, command } => {
                match self.launcher.launch(&path, &command.name, &command.args) {
                    Ok(code) => debug!(command = %command.name, ?code, "external command finished"),
                    Err(e) => report(err, e),
                }
                (Outcome::Continue, true)
            }
            CommandKind::NotFound(command) => {
                report(err, format_args!("{}: command not found", command.name));
                (Outcome::Continue, true)
            }
        };

        if record {
            session.history.record(trimmed);
        }
        outcome
    }

    fn run_builtin(
        &self,
        builtin: &CommandType,
        command: &Command,
        line: &str,
        session: &mut Session,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> (Outcome, bool) {
        let history_file = session.history_file().map(PathBuf::from);
        let result = {
            let mut ctx = Context {
                history: &mut session.history,
                resolver: &session.resolver,
                builtins: &self.builtins,
                history_file: history_file.as_deref(),
                line,
                out: &mut *out,
                err: &mut *err,
            };
            builtin.execute(&command.args, &mut ctx)
        };

        if let Err(e) = out.flush() {
            warn!(error = %e, "failed to flush output");
        }

        match result {
            Ok(Flow::Continue) => (Outcome::Continue, true),
            Ok(Flow::Exit) => (Outcome::Terminate, true),
            Ok(Flow::Recorded) => (Outcome::Continue, false),
            Err(e) => {
                report(err, e);
                (Outcome::Continue, true)
            }
        }
    }
}

fn report(err: &mut dyn Write, message: impl Display) {
    if let Err(e) = writeln!(err, "{}", message).and_then(|_| err.flush()) {
        warn!(error = %e, "failed to write error message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::path::PathExpander;
    use crate::process::ProcessError;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Launch(PathBuf, String, Vec<String>),
        Passthrough(String),
    }

    #[derive(Clone, Default)]
    struct RecordingLauncher {
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, program: &Path, name: &str, args: &[String]) -> Result<Option<i32>, ProcessError> {
            self.calls.borrow_mut().push(Call::Launch(
                program.to_path_buf(),
                name.to_string(),
                args.to_vec(),
            ));
            Ok(Some(0))
        }

        fn passthrough(&self, line: &str) -> Result<Option<i32>, ProcessError> {
            self.calls.borrow_mut().push(Call::Passthrough(line.to_string()));
            Ok(Some(0))
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        session: Session,
        calls: Rc<RefCell<Vec<Call>>>,
        out: Vec<u8>,
        err: Vec<u8>,
    }

    impl Fixture {
        fn new(search_path: Vec<PathBuf>) -> Self {
            let launcher = RecordingLauncher::default();
            let calls = Rc::clone(&launcher.calls);
            let dispatcher = Dispatcher::new(
                BuiltinRegistry::with_expander(PathExpander::with_home("/")),
                Box::new(launcher),
            );
            let config = ShellConfig {
                search_path,
                ..ShellConfig::default()
            };
            let session = Session::new(&config, dispatcher.builtins());
            Self {
                dispatcher,
                session,
                calls,
                out: Vec::new(),
                err: Vec::new(),
            }
        }

        fn run(&mut self, line: &str) -> Outcome {
            self.dispatcher
                .dispatch(&mut self.session, line, &mut self.out, &mut self.err)
        }

        fn stdout(&self) -> String {
            String::from_utf8_lossy(&self.out).into_owned()
        }

        fn stderr(&self) -> String {
            String::from_utf8_lossy(&self.err).into_owned()
        }

        fn history(&self) -> Vec<String> {
            self.session
                .history()
                .entries()
                .iter()
                .map(|e| e.text.clone())
                .collect()
        }
    }

    #[test]
    fn test_passthrough_detection() {
        assert!(is_passthrough("echo hi > out.txt"));
        assert!(is_passthrough("echo hi 1> out.txt"));
        assert!(is_passthrough("ls | wc -l"));
        assert!(is_passthrough("echo 'a>b'"));
        assert!(!is_passthrough("echo hi"));
    }

    #[test]
    fn test_classify_routes() {
        let fixture = Fixture::new(Vec::new());
        let classify = |line: &str| fixture.dispatcher.classify(line, &fixture.session);

        assert_eq!(classify("   "), Ok(CommandKind::Empty));
        assert_eq!(
            classify("cat a | sort"),
            Ok(CommandKind::Passthrough("cat a | sort".to_string()))
        );
        assert!(matches!(classify("echo hi"), Ok(CommandKind::Builtin(c)) if c.name == "echo"));
        assert!(matches!(classify("nope x"), Ok(CommandKind::NotFound(c)) if c.args == ["x"]));
        assert_eq!(classify("echo 'open"), Err(ParseError::UnterminatedQuote('\'')));
    }

    #[test]
    fn test_echo_prints_and_records() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run("echo a b c"), Outcome::Continue);
        assert_eq!(fixture.stdout(), "a b c\n");
        assert_eq!(fixture.history(), vec!["echo a b c"]);
    }

    #[test]
    fn test_empty_line_is_a_no_op() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run(""), Outcome::Continue);
        assert_eq!(fixture.run("   "), Outcome::Continue);
        assert!(fixture.stdout().is_empty());
        assert!(fixture.stderr().is_empty());
        assert!(fixture.history().is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run("nonexistent_cmd_xyz --flag"), Outcome::Continue);
        assert_eq!(fixture.stderr(), "nonexistent_cmd_xyz: command not found\n");
        assert_eq!(fixture.history(), vec!["nonexistent_cmd_xyz --flag"]);
        assert!(fixture.calls.borrow().is_empty());
    }

    #[test]
    fn test_parse_error_is_reported_not_recorded() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run("echo \"unclosed"), Outcome::Continue);
        assert!(fixture.stdout().is_empty());
        assert!(fixture.stderr().starts_with("syntax error: "));
        assert!(fixture.history().is_empty());
    }

    #[test]
    fn test_exit_terminates_and_records() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run("exit 3"), Outcome::Terminate);
        assert_eq!(fixture.history(), vec!["exit 3"]);
    }

    #[test]
    fn test_passthrough_goes_to_launcher_verbatim() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.run("echo 'a  b' > out.txt");
        fixture.run("exit | cat");
        assert_eq!(
            *fixture.calls.borrow(),
            vec![
                Call::Passthrough("echo 'a  b' > out.txt".to_string()),
                Call::Passthrough("exit | cat".to_string()),
            ]
        );
        assert_eq!(fixture.history(), vec!["echo 'a  b' > out.txt", "exit | cat"]);
    }

    #[test]
    fn test_builtin_error_is_reported() {
        let mut fixture = Fixture::new(Vec::new());
        assert_eq!(fixture.run("cd /nonexistent/dir/xyz"), Outcome::Continue);
        assert_eq!(
            fixture.stderr(),
            "cd: /nonexistent/dir/xyz: No such file or directory\n"
        );
        assert_eq!(fixture.history(), vec!["cd /nonexistent/dir/xyz"]);
    }

    #[test]
    fn test_type_for_builtins_and_missing() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.run("type echo");
        fixture.run("type nonexistent_cmd_xyz");
        assert_eq!(fixture.stdout(), "echo is a shell builtin\n");
        assert_eq!(fixture.stderr(), "nonexistent_cmd_xyz: not found\n");
    }

    #[test]
    fn test_history_shows_earlier_lines() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.run("echo hello");
        fixture.run("pwd");
        fixture.out.clear();
        fixture.run("history");
        assert_eq!(fixture.stdout(), "    1  echo hello\n    2  pwd\n");
        fixture.out.clear();
        fixture.run("history 1");
        assert_eq!(fixture.stdout(), "    3  history\n");
    }

    #[test]
    fn test_history_read_is_recorded_once() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("hist");
        std::fs::write(&file, "echo one\necho two\n")?;

        let mut fixture = Fixture::new(Vec::new());
        fixture.run("echo before");
        let line = format!("history -r {}", file.display());
        fixture.run(&line);
        assert_eq!(fixture.history(), vec![line.clone(), "echo one".into(), "echo two".into()]);
        Ok(())
    }

    #[test]
    fn test_history_append_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("hist");
        let append = format!("history -a {}", file.display());

        let mut fixture = Fixture::new(Vec::new());
        fixture.run("echo one");
        fixture.run(&append);
        fixture.run(&append);
        assert_eq!(
            std::fs::read_to_string(&file)?,
            format!("echo one\n{}\n", append)
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_external_command_is_launched() -> Result<(), Box<dyn std::error::Error>> {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let tool = dir.path().join("custom_exe");
        fs::write(&tool, "#!/bin/sh\n")?;
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755))?;

        let mut fixture = Fixture::new(vec![dir.path().to_path_buf()]);
        assert_eq!(fixture.run("custom_exe 'a b' c"), Outcome::Continue);
        assert_eq!(
            *fixture.calls.borrow(),
            vec![Call::Launch(
                tool,
                "custom_exe".to_string(),
                vec!["a b".to_string(), "c".to_string()],
            )]
        );
        assert_eq!(fixture.history(), vec!["custom_exe 'a b' c"]);
        assert!(fixture.stderr().is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_builtin_wins_over_path_executable() -> Result<(), Box<dyn std::error::Error>> {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let shadow = dir.path().join("echo");
        fs::write(&shadow, "#!/bin/sh\n")?;
        fs::set_permissions(&shadow, fs::Permissions::from_mode(0o755))?;

        let mut fixture = Fixture::new(vec![dir.path().to_path_buf()]);
        fixture.run("echo builtin");
        assert_eq!(fixture.stdout(), "builtin\n");
        assert!(fixture.calls.borrow().is_empty());
        Ok(())
    }
}
