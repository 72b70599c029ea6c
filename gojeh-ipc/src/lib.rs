//! Inter-process communication between gojeh and gojehctl
//!
//! The protocol is a single newline-terminated text line per connection.
//! The daemon answers only when it does not understand the line, then
//! closes the connection.

use std::fmt;
use thiserror::Error;

pub mod client;

pub const SOCKET_PATH: &str = "/tmp/gojeh.sock";

/// How much of a request line the daemon keeps. Longer lines are still read
/// up to their newline, but the excess is discarded and the line is never a
/// valid command.
pub const MAX_LINE_BYTES: usize = 1024;

/// Reply written for any line that is not a known command.
///
/// NOTE: the verbs named here are not the ones the daemon accepts
/// (`toggle` and `next`). Existing clients match on this exact text, so it
/// stays as is.
pub const UNKNOWN_COMMAND_RESPONSE: &str = "Unknown command. Please use 'start' or 'stop'.\n";

/// Commands that gojehctl can send to gojeh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the countdown if paused, pause it if running.
    Toggle,
    /// Switch to the next phase and pause.
    Advance,
    /// Anything else, kept so the daemon can log what it got.
    Unrecognized(String),
}

impl Command {
    /// Decode one request line. Surrounding whitespace (including the
    /// trailing newline) is ignored; matching is exact and case-sensitive.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "toggle" => Command::Toggle,
            "next" => Command::Advance,
            other => Command::Unrecognized(other.to_string()),
        }
    }

    /// The word sent over the socket, without the newline.
    pub fn as_str(&self) -> &str {
        match self {
            Command::Toggle => "toggle",
            Command::Advance => "next",
            Command::Unrecognized(text) => text,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection refused - is gojeh running?")]
    ConnectionRefused,

    #[error("Connection closed before a full line was received")]
    Incomplete,
}
