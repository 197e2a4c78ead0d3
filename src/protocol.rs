//! Host protocol
//!
//! The editor side talks to joinwise with newline-delimited JSON: one
//! request object per input line, one message object per output line.
//!
//! ```text
//! > {"method":"complete","id":1,"text":"SELECT * FROM dbo.Customer c JOIN ","position":{"line":0,"character":34}}
//! < {"type":"completions","id":1,"items":[{"label":"dbo.Order O ON c.Id = O.CustomerId","kind":"join"}]}
//! > {"method":"command","id":2,"input":"/refresh"}
//! < {"type":"reply","id":2,"message":"Refreshing schema"}
//! < {"type":"notification","level":"success","message":"Schema loaded: 42 tables, 17 joinable"}
//! ```

use crate::app::{StatusLevel, StatusMessage};
use crate::completer::{Completion, Position};
use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};

/// A request from the host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    /// Completion items for `position` in the document `text`
    Complete {
        id: u64,
        text: String,
        position: Position,
    },
    /// A user command such as `/refresh`
    Command { id: u64, input: String },
}

/// A message to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Completions { id: u64, items: Vec<Completion> },
    Reply { id: u64, message: String },
    Error { id: Option<u64>, error: String },
    Notification { level: StatusLevel, message: String },
}

impl Message {
    pub fn notification(status: StatusMessage) -> Self {
        Message::Notification {
            level: status.level,
            message: status.message,
        }
    }

    /// Serialize as a single output line (without the newline)
    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse one input line
pub fn parse_request(line: &str) -> Result<Request, ProtocolError> {
    Ok(serde_json::from_str(line)?)
}
