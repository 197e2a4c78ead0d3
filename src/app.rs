//! Application state and event handling
//!
//! Central state machine: events come in, state updates, actions go out.
//! The schema snapshot is immutable once built and shared behind an `Arc`,
//! so a refresh swaps it wholesale and in-flight completions keep the one
//! they started with.

use crate::commands::{Command, help_text, parse_command};
use crate::completer::{Completion, Position, SuggestionEngine};
use crate::config::{ConnectionConfig, Settings};
use crate::db::QueryProvider;
use crate::error::Result;
use crate::protocol::{Message, Request};
use crate::schema::{SchemaSnapshot, load_snapshot};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main application state
pub struct App {
    /// Active connection, if any
    connection: Option<ConnectionConfig>,

    /// Last successfully loaded schema
    snapshot: Arc<SchemaSnapshot>,

    engine: SuggestionEngine,

    /// Status message to surface to the host
    pub status_message: Option<StatusMessage>,

    /// Whether the application should keep serving requests
    pub running: bool,
}

/// Status message with severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Application events from the event loop
#[derive(Debug)]
pub enum AppEvent {
    /// A well-formed request from the host
    Request(Request),
    /// An input line that could not be parsed
    Malformed(String),
    /// Schema loaded successfully
    SchemaLoaded(SchemaSnapshot),
    /// Schema loading failed
    SchemaFailed(String),
    /// Background database connection lost
    ConnectionLost(String),
    /// The host closed its end of the stream
    InputClosed,
}

/// Actions returned by event handlers for the main loop to execute
#[derive(Debug)]
pub enum Action {
    /// Write a message back to the host
    Respond(Message),
    /// Start a background schema load, acknowledging request `id`
    LoadSchema { id: u64 },
    Quit,
    None,
}

impl App {
    pub fn new() -> Self {
        Self::new_with_settings(&Settings::default())
    }

    pub fn new_with_settings(settings: &Settings) -> Self {
        Self {
            connection: None,
            snapshot: Arc::new(SchemaSnapshot::empty()),
            engine: SuggestionEngine::new(&settings.completion),
            status_message: None,
            running: true,
        }
    }

    /// Create an app bound to a connection with an empty schema
    pub fn with_connection(connection: ConnectionConfig, settings: &Settings) -> Self {
        let mut app = Self::new_with_settings(settings);
        app.connection = Some(connection);
        app
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// The snapshot completions currently run against
    pub fn snapshot(&self) -> Arc<SchemaSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Completions for `position` in `text` against the current snapshot
    pub fn complete(&self, text: &str, position: Position) -> Vec<Completion> {
        let snapshot = self.snapshot();
        self.engine.complete(&snapshot, text, position)
    }

    /// Handle an application event and return resulting action
    pub fn handle_event(&mut self, event: AppEvent) -> Result<Action> {
        match event {
            AppEvent::Request(Request::Complete { id, text, position }) => {
                let items = self.complete(&text, position);
                Ok(Action::Respond(Message::Completions { id, items }))
            }
            AppEvent::Request(Request::Command { id, input }) => Ok(self.handle_command(id, &input)),
            AppEvent::Malformed(error) => {
                tracing::warn!(%error, "malformed request");
                Ok(Action::Respond(Message::Error { id: None, error }))
            }
            AppEvent::SchemaLoaded(snapshot) => {
                let tables = snapshot.tables.len();
                let joinable = snapshot.graph.len();
                let foreign_keys = snapshot.graph.edge_count() / 2;
                tracing::info!(tables, joinable, foreign_keys, "schema snapshot replaced");
                self.snapshot = Arc::new(snapshot);
                self.set_status(
                    format!("Schema loaded: {} tables, {} joinable", tables, joinable),
                    StatusLevel::Success,
                );
                Ok(Action::None)
            }
            AppEvent::SchemaFailed(err) => {
                tracing::warn!(error = %err, "schema refresh failed");
                self.set_status(
                    format!("Schema refresh failed: {}", err),
                    StatusLevel::Error,
                );
                Ok(Action::None)
            }
            AppEvent::ConnectionLost(msg) => {
                tracing::error!(%msg, "connection lost");
                self.set_status(msg, StatusLevel::Error);
                Ok(Action::None)
            }
            AppEvent::InputClosed => {
                self.running = false;
                Ok(Action::Quit)
            }
        }
    }

    fn handle_command(&mut self, id: u64, input: &str) -> Action {
        let command = match parse_command(input) {
            Ok(command) => command,
            Err(e) => {
                return Action::Respond(Message::Error {
                    id: Some(id),
                    error: e.to_string(),
                });
            }
        };

        match command {
            Command::Refresh => {
                if !self.is_connected() {
                    self.set_status("No active connection".to_string(), StatusLevel::Error);
                    return Action::Respond(Message::Error {
                        id: Some(id),
                        error: "No active connection".to_string(),
                    });
                }
                self.set_status("Refreshing schema...".to_string(), StatusLevel::Info);
                Action::LoadSchema { id }
            }
            Command::ShowConnection => {
                let message = match &self.connection {
                    Some(config) => config.display_name(),
                    None => "No connection found!".to_string(),
                };
                Action::Respond(Message::Reply { id, message })
            }
            Command::Help => Action::Respond(Message::Reply {
                id,
                message: help_text().to_string(),
            }),
            Command::Quit => {
                self.running = false;
                Action::Quit
            }
        }
    }

    pub fn set_status(&mut self, message: String, level: StatusLevel) {
        self.status_message = Some(StatusMessage { message, level });
    }

    /// Take the pending status message, leaving none behind
    pub fn take_status(&mut self) -> Option<StatusMessage> {
        self.status_message.take()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the schema in the background and post the outcome as an event
pub fn spawn_refresh<P>(provider: Arc<P>, events: mpsc::UnboundedSender<AppEvent>)
where
    P: QueryProvider + 'static,
{
    tokio::spawn(async move {
        let event = match load_snapshot(provider.as_ref()).await {
            Ok(snapshot) => AppEvent::SchemaLoaded(snapshot),
            Err(e) => AppEvent::SchemaFailed(e.to_string()),
        };
        // Receiver gone means the loop already shut down
        let _ = events.send(event);
    });
}
