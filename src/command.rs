//! Interactive commands read from stdin while watching.

use std::io::{self, Write};
use std::str::FromStr;

use paramscope_core::{BodyTicket, Details, SessionStore};
use thiserror::Error;

use crate::render::{NO_SELECTION, Presenter, copy_text, render_list};

pub(crate) const HELP: &str = "\
Commands:
  list            show the filtered request list
  search <term>   filter by URL substring (no term clears the filter)
  select <n>      show details of row n
  params          print the selected request's parameters as key:value lines
  clear           drop every captured request
  help            show this help
  quit            stop watching
";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputCommand {
    List,
    Search(String),
    /// 0-based row index.
    Select(usize),
    Params,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid row '{0}', rows are numbered from 1")]
    InvalidRow(String),
}

impl FromStr for InputCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(InputCommand::List),
            "search" | "s" => Ok(InputCommand::Search(rest.to_string())),
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err(InputError::MissingArgument("select"));
                }
                match rest.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(InputCommand::Select(n - 1)),
                    _ => Err(InputError::InvalidRow(rest.to_string())),
                }
            }
            "params" | "copy" => Ok(InputCommand::Params),
            "clear" => Ok(InputCommand::Clear),
            "help" | "?" => Ok(InputCommand::Help),
            "quit" | "exit" | "q" => Ok(InputCommand::Quit),
            other => Err(InputError::Unknown(other.to_string())),
        }
    }
}

/// What the control loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Continue,
    /// Resolve the selected body under this ticket.
    Resolve(BodyTicket),
    Quit,
}

/// Apply a command to the store. Replies that are not driven by session
/// notifications are written straight to the presenter's output.
pub(crate) fn apply<W: Write>(
    command: InputCommand,
    store: &mut SessionStore,
    presenter: &mut Presenter<W>,
) -> io::Result<Outcome> {
    match command {
        InputCommand::List => presenter.out().write_all(render_list(store).as_bytes())?,
        InputCommand::Search(term) => store.set_search_term(term),
        InputCommand::Select(index) => match store.select(index) {
            Some(ticket) => return Ok(Outcome::Resolve(ticket)),
            None => writeln!(
                presenter.out(),
                "No row {} ({} shown)",
                index + 1,
                store.filtered_len()
            )?,
        },
        InputCommand::Params => match store.details() {
            Details::Selected(details) => {
                let text = copy_text(&details.request);
                if text.is_empty() {
                    writeln!(presenter.out(), "(no parameters)")?;
                } else {
                    writeln!(presenter.out(), "{}", text)?;
                }
            }
            Details::NoneSelected => writeln!(presenter.out(), "{}", NO_SELECTION)?,
        },
        InputCommand::Clear => store.clear(),
        InputCommand::Help => presenter.out().write_all(HELP.as_bytes())?,
        InputCommand::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
