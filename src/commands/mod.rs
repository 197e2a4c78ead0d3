//! Command parsing
//!
//! Handles the named actions the host exposes to the user (`/refresh`,
//! `/connection`, ...). Execution lives on `App`.

pub mod parser;

pub use parser::{Command, help_text, parse_command};
