//! `:` commands.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `filter <name>` | Decisions filter (`all`, `viranomais`, `paatokset`, `esitykset`, `passed`, `meeting`) |
//! | `agenda <name>` | Agenda filter (`tulevat`, `menneet`, `kh`, `kaikki`) |
//! | `topic <name>` | Show a news topic |
//! | `more`, `less` | Paging in the focused pane |
//! | `clear` | Clear the focused pane's search |
//! | `reload` | Reload every region |

use crate::app::{AppState, Effect};
use crate::event::AppEvent;
use crate::theme::Theme;
use kdash_core::filter::agenda::AgendaFilter;
use kdash_core::filter::DecisionFilter;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    Filter(DecisionFilter),
    Agenda(AgendaFilter),
    Topic(String),
    More,
    Less,
    Clear,
    Reload,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "more" => Ok(Command::More),
            "less" => Ok(Command::Less),
            "clear" => Ok(Command::Clear),
            "reload" => Ok(Command::Reload),
            "theme" if rest.is_empty() => Err("usage: theme <default|gruvbox>".to_string()),
            "theme" => Ok(Command::Theme(rest.to_string())),
            "filter" if rest.is_empty() => {
                Err("usage: filter <all|viranomais|paatokset|esitykset>".to_string())
            }
            "filter" => rest.parse().map(Command::Filter),
            "agenda" if rest.is_empty() => {
                Err("usage: agenda <tulevat|menneet|kh|kaikki>".to_string())
            }
            "agenda" => rest.parse().map(Command::Agenda),
            "topic" if rest.is_empty() => Err("usage: topic <name>".to_string()),
            "topic" => Ok(Command::Topic(rest.to_lowercase())),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Option<Effect> {
    match cmd {
        Command::Quit => {
            s.quit = true;
            None
        }
        Command::Help => {
            s.show_help = !s.show_help;
            None
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
            None
        }
        Command::Filter(filter) => {
            s.set_decision_filter(filter);
            None
        }
        Command::Agenda(filter) => {
            s.agenda.filter = filter;
            s.agenda_cursor.reset();
            None
        }
        Command::Topic(topic) => {
            if let Err(msg) = s.select_topic(&topic) {
                s.command_bar.error = Some(msg);
            }
            None
        }
        Command::More => s.handle(AppEvent::ShowMore),
        Command::Less => s.handle(AppEvent::ShowLess),
        Command::Clear => {
            s.clear_query();
            None
        }
        Command::Reload => s.handle(AppEvent::Reload),
    }
}
