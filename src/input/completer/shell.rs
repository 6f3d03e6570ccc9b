use std::{borrow::Cow, sync::Arc};

use rustyline::{
    completion::{Completer, FilenameCompleter, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use super::command::CompletionEngine;
use crate::highlight::SyntaxHighlighter;

/// Line-editor helper: completes the command word from the session's
/// completion snapshot and later words as file names.
pub struct ShellCompleter {
    engine: Arc<CompletionEngine>,
    file_completer: FilenameCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellCompleter {
    pub fn new(engine: Arc<CompletionEngine>) -> Self {
        Self {
            engine,
            file_completer: FilenameCompleter::new(),
            highlighter: SyntaxHighlighter::new(),
        }
    }

    /// Completes the first word of `line` up to `pos`. Returns `None` when
    /// the cursor sits in an argument position.
    pub fn complete_command(&self, line: &str, pos: usize) -> Option<(usize, Vec<Pair>)> {
        let before_cursor = &line[..pos];
        let start = before_cursor
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        if !before_cursor[..start].trim().is_empty() {
            return None;
        }

        let state = self.engine.state(&before_cursor[start..]);
        let pairs = match state.replacement() {
            Some(replacement) => vec![Pair {
                display: state.candidates[0].clone(),
                replacement,
            }],
            None => state
                .candidates
                .iter()
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: name.clone(),
                })
                .collect(),
        };
        Some((start, pairs))
    }
}

impl Helper for ShellCompleter {}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let engine = &self.engine;
        Cow::Owned(
            self.highlighter
                .highlight_command(line, |word| engine.contains(word)),
        )
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.complete_command(line, pos) {
            Some(result) => Ok(result),
            None => self.file_completer.complete(line, pos, ctx),
        }
    }
}
