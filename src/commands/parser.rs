//! Command parsing
//!
//! Parses user input into structured Command enums.
//! Commands use `/` prefix (e.g., `/refresh`, `/connection`).

use crate::error::{CommandError, CommandResult};

/// Commands the host can invoke on behalf of the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reload tables and foreign keys from the database
    Refresh,

    /// Show the current connection
    ShowConnection,

    /// Show help
    Help,

    /// Quit the application
    Quit,
}

/// Parse a command string into a Command enum
pub fn parse_command(input: &str) -> CommandResult<Command> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input);
    let Some(name) = input.split_whitespace().next() else {
        return Err(CommandError::Empty);
    };

    match name {
        "refresh" | "r" => Ok(Command::Refresh),
        "connection" | "conn" => Ok(Command::ShowConnection),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        unknown => Err(CommandError::Unknown(unknown.to_string())),
    }
}

/// One line per command, for `/help`
pub fn help_text() -> &'static str {
    "/refresh     reload tables and foreign keys\n\
     /connection  show the current connection\n\
     /help        show this help\n\
     /quit        exit"
}
