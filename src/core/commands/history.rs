use std::io::Write;
use std::path::PathBuf;

use super::{Builtin, CommandError, Context, Flow};
use crate::input::history::{HistoryEntry, LoadOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileAction {
    Read,
    Write,
    Append,
}

impl FileAction {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-r" => Some(FileAction::Read),
            "-w" => Some(FileAction::Write),
            "-a" => Some(FileAction::Append),
            _ => None,
        }
    }
}

/// `history [N]` lists the log; `history -r|-w|-a [FILE]` syncs it with a
/// file, defaulting to the configured history file.
#[derive(Debug, Clone, Copy)]
pub struct HistoryCommand;

impl HistoryCommand {
    fn show(&self, entries: &[HistoryEntry], out: &mut dyn Write) -> Result<Flow, CommandError> {
        for entry in entries {
            writeln!(out, "{}", entry)?;
        }
        Ok(Flow::Continue)
    }

    fn show_recent(&self, count: &str, ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        let count = count.parse::<usize>().map_err(|_| {
            CommandError::invalid("history", format!("{}: numeric argument required", count))
        })?;
        self.show(ctx.history.recent(count), ctx.out)
    }

    fn sync_file(
        &self,
        flag: &str,
        rest: &[String],
        ctx: &mut Context<'_>,
    ) -> Result<Flow, CommandError> {
        let action = FileAction::from_flag(flag)
            .ok_or_else(|| CommandError::invalid("history", format!("{}: invalid option", flag)))?;

        let path = match rest {
            [file] => PathBuf::from(file),
            [] => ctx.history_file.map(PathBuf::from).ok_or_else(|| {
                CommandError::invalid("history", format!("{}: option requires an argument", flag))
            })?,
            _ => return Err(CommandError::invalid("history", "too many arguments")),
        };

        match action {
            FileAction::Read => match ctx.history.load_from_file(&path, Some(ctx.line))? {
                LoadOutcome::Loaded(_) => Ok(Flow::Recorded),
                LoadOutcome::Missing => Ok(Flow::Continue),
            },
            FileAction::Write => {
                ctx.history.save_to_file(&path)?;
                Ok(Flow::Continue)
            }
            FileAction::Append => {
                ctx.history.append_to_file(&path)?;
                Ok(Flow::Continue)
            }
        }
    }
}

impl Builtin for HistoryCommand {
    fn execute(&self, args: &[String], ctx: &mut Context<'_>) -> Result<Flow, CommandError> {
        match args {
            [] => self.show(ctx.history.entries(), ctx.out),
            [flag, rest @ ..] if flag.starts_with('-') => self.sync_file(flag, rest, ctx),
            [count] => self.show_recent(count, ctx),
            _ => Err(CommandError::invalid("history", "too many arguments")),
        }
    }
}
