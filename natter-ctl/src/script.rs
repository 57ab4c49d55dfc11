use std::io::{BufRead, Write};

use anyhow::Context;
use natter_client::{
    api::{self, CommentId},
    CommentNode, CommentWidget,
};

use crate::display;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command {0:?}")]
    UnknownCommand(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Invalid comment id {0:?}")]
    InvalidId(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Post(String),
    Reply(CommentId, String),
    Edit(CommentId, String),
    Delete(CommentId),
    Toggle(CommentId),
    List,
}

fn parse_id(s: &str) -> Result<CommentId, ParseError> {
    s.parse().map_err(|_| ParseError::InvalidId(String::from(s)))
}

/// Splits `<id> <text>`, the text being everything after the first whitespace
fn id_and_text(args: Option<&str>) -> Result<(CommentId, String), ParseError> {
    let args = args.ok_or(ParseError::MissingArgument("comment id"))?;
    let (id, text) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    Ok((parse_id(id)?, String::from(text)))
}

impl Command {
    /// Returns `None` for blank lines and `#` comments
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return Ok(None);
        }
        let line = line.trim_start();
        let (cmd, args) = match line.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, Some(args)),
            None => (line, None),
        };
        let id = || -> Result<CommentId, ParseError> {
            parse_id(args.ok_or(ParseError::MissingArgument("comment id"))?.trim())
        };
        Ok(Some(match cmd {
            "post" => Command::Post(String::from(args.unwrap_or(""))),
            "reply" => {
                let (id, text) = id_and_text(args)?;
                Command::Reply(id, text)
            }
            "edit" => {
                let (id, text) = id_and_text(args)?;
                Command::Edit(id, text)
            }
            "delete" => Command::Delete(id()?),
            "toggle" => Command::Toggle(id()?),
            "list" => Command::List,
            _ => return Err(ParseError::UnknownCommand(String::from(cmd))),
        }))
    }
}

/// Opens the reply box of `parent`, types `text` and submits it
///
/// A rejected reply is abandoned: the draft is cleared and the box put back
/// the way it was.
fn reply(
    w: &mut CommentWidget,
    parent: &CommentId,
    text: &str,
) -> Result<CommentNode, api::Error> {
    let was_open = w.is_reply_open(parent);
    if !was_open {
        w.toggle_reply(parent)?;
    }
    w.set_reply_draft(parent, text)?;
    let res = w.submit_reply(parent);
    if res.is_err() {
        w.set_reply_draft(parent, "")?;
        if !was_open {
            w.toggle_reply(parent)?;
        }
    }
    res
}

/// Edits `id` to `text`, abandoning the edit if it gets rejected
fn edit(w: &mut CommentWidget, id: &CommentId, text: &str) -> Result<(), api::Error> {
    w.begin_edit(id)?;
    w.set_edit_draft(id, text)?;
    let res = w.save_edit(id);
    if res.is_err() {
        w.cancel_edit(id);
    }
    res
}

/// Drives a widget the way a user clicking around would
pub struct Runner<'a, W> {
    widget: &'a mut CommentWidget,
    out: W,
    json: bool,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(widget: &'a mut CommentWidget, out: W, json: bool) -> Runner<'a, W> {
        Runner { widget, out, json }
    }

    /// Runs every line of `input`, returning the number of lines that failed
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<usize> {
        let mut failures = 0;
        for (i, line) in input.lines().enumerate() {
            let line = line.context("reading script")?;
            let lineno = i + 1;
            let cmd = match Command::parse(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(e) => {
                    failures += 1;
                    tracing::warn!(line = lineno, error = %e, "invalid command");
                    writeln!(self.out, "line {lineno}: {e}").context("writing output")?;
                    continue;
                }
            };
            if let Err(e) = self.execute(cmd)? {
                failures += 1;
                tracing::warn!(line = lineno, error = %e, "command failed");
                writeln!(self.out, "line {lineno}: {e}").context("writing output")?;
            }
        }
        Ok(failures)
    }

    /// The outer error is an I/O failure, the inner one a rejected command
    fn execute(&mut self, cmd: Command) -> anyhow::Result<Result<(), api::Error>> {
        let w = &mut *self.widget;
        let res = match cmd {
            Command::Post(text) => w.post(&text).map(|c| format!("posted {}", c.id)),
            Command::Reply(parent, text) => {
                reply(w, &parent, &text).map(|c| format!("replied {} to {}", c.id, parent))
            }
            Command::Edit(id, text) => edit(w, &id, &text).map(|()| format!("edited {}", id)),
            Command::Delete(id) => w.delete(&id).map(|()| format!("deleted {}", id)),
            Command::Toggle(id) => w.toggle_reply(&id).map(|open| match open {
                true => format!("opened reply box of {}", id),
                false => format!("closed reply box of {}", id),
            }),
            Command::List => {
                let rendered = match self.json {
                    true => serde_json::to_string_pretty(&w.store().list_ordered())
                        .context("serializing comments")?,
                    false => display::render(w, chrono::Utc::now()),
                };
                Ok(rendered)
            }
        };
        Ok(match res {
            Ok(msg) => {
                writeln!(self.out, "{}", msg.trim_end()).context("writing output")?;
                Ok(())
            }
            Err(e) => Err(e),
        })
    }
}
