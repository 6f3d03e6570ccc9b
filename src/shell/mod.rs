use std::io;

use rustyline::{
    config::Configurer,
    error::ReadlineError,
    history::{DefaultHistory, History as EditorHistory},
    CompletionType, Editor,
};
use tracing::{debug, warn};

pub mod dispatcher;
pub mod session;

pub use dispatcher::{CommandKind, Dispatcher, Outcome};
pub use session::Session;

use crate::{
    config::ShellConfig,
    error::ShellError,
    input::{History, LoadOutcome, ShellCompleter},
    process::signal,
};

const PROMPT: &str = "$ ";

pub struct Shell {
    editor: Editor<ShellCompleter, DefaultHistory>,
    session: Session,
    dispatcher: Dispatcher,
    config: ShellConfig,
    seen_generation: u64,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        let dispatcher = Dispatcher::default();
        let mut session = Session::new(&config, dispatcher.builtins());

        match session.load_history() {
            Ok(LoadOutcome::Loaded(count)) => debug!(count, "restored history"),
            Ok(LoadOutcome::Missing) => {}
            Err(e) => {
                warn!(error = %e, "could not load history file");
                if !config.quiet {
                    eprintln!("history: {}", e);
                }
            }
        }

        let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
        editor.set_completion_type(CompletionType::List);
        editor.set_auto_add_history(false);
        editor.set_helper(Some(ShellCompleter::new(session.completion())));
        seed_editor_history(editor.history_mut(), session.history())?;

        // Ctrl-C at the prompt is handled by the editor; this keeps the shell
        // alive while a child owns the terminal.
        signal::install_interrupt_guard()?;

        let seen_generation = session.history().generation();
        Ok(Shell {
            editor,
            session,
            dispatcher,
            config,
            seen_generation,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        let stdout = io::stdout();
        let stderr = io::stderr();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                            debug!(error = %e, "editor history rejected line");
                        }
                    }

                    let outcome = self.dispatcher.dispatch(
                        &mut self.session,
                        &line,
                        &mut stdout.lock(),
                        &mut stderr.lock(),
                    );
                    self.resync_editor_history()?;
                    if outcome == Outcome::Terminate {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    warn!(error = %e, "readline failed");
                    return Err(e.into());
                }
            }
        }

        self.shutdown()
    }

    /// After `history -r` replaced the log, recall must offer the new entries.
    fn resync_editor_history(&mut self) -> Result<(), ShellError> {
        let generation = self.session.history().generation();
        if generation != self.seen_generation {
            seed_editor_history(self.editor.history_mut(), self.session.history())?;
            self.seen_generation = generation;
        }
        Ok(())
    }

    fn shutdown(&self) -> Result<(), ShellError> {
        if let Err(e) = self.session.persist_history() {
            warn!(error = %e, "could not save history file");
            if !self.config.quiet {
                eprintln!("history: {}", e);
            }
        }
        Ok(())
    }
}

/// Replaces the editor's recall list with the session log, oldest first.
fn seed_editor_history<H: EditorHistory>(recall: &mut H, log: &History) -> Result<(), ShellError> {
    recall.clear()?;
    for entry in log.entries() {
        recall.add(&entry.text)?;
    }
    debug!(entries = recall.len(), "seeded editor history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::SearchDirection;

    fn recalled<H: EditorHistory>(recall: &H) -> Vec<String> {
        (0..recall.len())
            .filter_map(|i| recall.get(i, SearchDirection::Forward).ok().flatten())
            .map(|result| result.entry.into_owned())
            .collect()
    }

    #[test]
    fn test_seed_copies_loaded_history() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("hist");
        std::fs::write(&file, "echo one\npwd\n")?;

        let mut log = History::new();
        log.load_from_file(&file, None)?;

        let mut recall = DefaultHistory::new();
        seed_editor_history(&mut recall, &log)?;
        assert_eq!(recalled(&recall), vec!["echo one", "pwd"]);
        Ok(())
    }

    #[test]
    fn test_seed_replaces_previous_recall() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("hist");
        std::fs::write(&file, "ls\n")?;

        let mut recall = DefaultHistory::new();
        recall.add("typed earlier")?;

        let mut log = History::new();
        log.record("typed earlier");
        let line = format!("history -r {}", file.display());
        log.load_from_file(&file, Some(&line))?;

        seed_editor_history(&mut recall, &log)?;
        assert_eq!(recalled(&recall), vec![line, "ls".to_string()]);
        Ok(())
    }
}
