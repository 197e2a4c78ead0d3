//! Connection configuration
//!
//! Named PostgreSQL profiles stored in ~/.joinwise/connections.toml, or a
//! single connection given as a `postgres://` URL on the command line.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tokio_postgres::Config as PgConfig;
use tokio_postgres::config::{Host, SslMode as PgSslMode};

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection profile name
    pub name: String,

    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name
    pub database: String,

    /// Username
    pub username: String,

    /// Password
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// SSL mode
    #[serde(default)]
    pub ssl_mode: SslMode,
}

/// SSL connection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConnectionsFile {
    #[serde(default)]
    connections: Vec<ConnectionConfig>,
}

fn default_port() -> u16 {
    5432
}

impl ConnectionConfig {
    /// Parse a `postgres://` URL. Credentials and names are
    /// percent-decoded; the port defaults to 5432 and `sslmode` to prefer.
    pub fn from_url(url: &str) -> ConfigResult<Self> {
        let url = url.trim();
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(ConfigError::Invalid("URL must start with postgres://".into()));
        }
        let parsed = PgConfig::from_str(url)
            .map_err(|e| ConfigError::Invalid(format!("Invalid connection URL: {}", e)))?;

        let host = match parsed.get_hosts().first() {
            Some(Host::Tcp(host)) => host.clone(),
            Some(_) => return Err(ConfigError::Invalid("Socket hosts are not supported".into())),
            None => "localhost".to_string(),
        };
        let database = parsed
            .get_dbname()
            .ok_or_else(|| ConfigError::Invalid("URL must contain /dbname".into()))?
            .to_string();
        let username = parsed
            .get_user()
            .ok_or_else(|| ConfigError::Invalid("URL must contain a user".into()))?
            .to_string();
        let password = parsed
            .get_password()
            .map(|pw| String::from_utf8(pw.to_vec()))
            .transpose()
            .map_err(|_| ConfigError::Invalid("Password is not valid UTF-8".into()))?;

        Ok(Self {
            name: format!("{}@{}", database, host),
            host,
            port: parsed.get_ports().first().copied().unwrap_or_else(default_port),
            database,
            username,
            password,
            ssl_mode: parsed.get_ssl_mode().into(),
        })
    }

    /// Driver configuration for this profile
    pub fn pg_config(&self) -> PgConfig {
        let mut config = PgConfig::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.username)
            .ssl_mode(self.ssl_mode.into());
        if let Some(password) = &self.password {
            config.password(password);
        }
        config
    }

    /// Get the config directory path (~/.joinwise/)
    pub fn config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".joinwise"))
    }

    /// Name shown to the user for the `/connection` command
    pub fn display_name(&self) -> String {
        format!(
            "{} ({}@{}:{}/{})",
            self.name, self.username, self.host, self.port, self.database
        )
    }

    /// Get the connections file path
    pub fn connections_file() -> ConfigResult<PathBuf> {
        Ok(Self::config_dir()?.join("connections.toml"))
    }
}

impl From<PgSslMode> for SslMode {
    fn from(mode: PgSslMode) -> Self {
        match mode {
            PgSslMode::Disable => SslMode::Disable,
            PgSslMode::Require => SslMode::Require,
            _ => SslMode::Prefer,
        }
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        }
    }
}

/// Load all connection profiles from config file
pub fn load_connections() -> ConfigResult<Vec<ConnectionConfig>> {
    let path = ConnectionConfig::connections_file()?;
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| ConfigError::NotFound(format!("Failed to read connections file: {}", e)))?;
    parse_connections(&content)
}

/// Parse the contents of a connections file
fn parse_connections(content: &str) -> ConfigResult<Vec<ConnectionConfig>> {
    let file: ConnectionsFile = toml::from_str(content)?;
    Ok(file.connections)
}

/// Find a connection by name
pub fn find_connection(name: &str) -> ConfigResult<ConnectionConfig> {
    let connections = load_connections()?;
    connections
        .into_iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
}
