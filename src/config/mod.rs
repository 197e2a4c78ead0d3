//! Configuration management
//!
//! Handles loading connection profiles and user settings.

pub mod connections;
pub mod settings;

pub use connections::{ConnectionConfig, SslMode, find_connection};
pub use settings::{CompletionSettings, Settings, load_settings, load_settings_from};
