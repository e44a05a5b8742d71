//! Module `commands`
//!
//! Defines the upload endpoint's line commands, their parsing, and the
//! result structure handlers return.

/// A command parsed from a client line.
#[derive(Debug, PartialEq)]
pub enum Command {
    QUIT,
    /// Original file name and payload size. The payload follows the line.
    UPLOAD(String, u64),
    DELETE(String),
    EXISTS(String),
    UNKNOWN,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: String,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: message.into(),
        }
    }
}

/// Parses a raw command line into a `Command`.
///
/// `UPLOAD` without a valid size parses with size 0, which the handler
/// reports as a missing file.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "QUIT" | "Q" => Command::QUIT,
        "UPLOAD" => parse_upload(arg),
        "DELETE" | "DEL" => Command::DELETE(arg.to_string()),
        "EXISTS" if !arg.is_empty() => Command::EXISTS(arg.to_string()),
        _ => Command::UNKNOWN,
    }
}

fn parse_upload(arg: &str) -> Command {
    match arg.rsplit_once(char::is_whitespace) {
        Some((name, size)) => match size.parse::<u64>() {
            Ok(size) => Command::UPLOAD(name.trim().to_string(), size),
            Err(_) => Command::UPLOAD(arg.to_string(), 0),
        },
        None => Command::UPLOAD(arg.to_string(), 0),
    }
}
