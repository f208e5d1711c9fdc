//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `gymdesk.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use gymdesk_domain::attendance::{
    AttendancePolicy, DEFAULT_GRACE_MINUTES, DEFAULT_UTC_OFFSET_MINUTES,
};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Attendance policy settings.
    pub attendance: AttendanceConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// When staff may mark attendance.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Offset of the centre's local time east of UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// Minutes after shift start during which attendance is accepted.
    pub grace_minutes: u32,
}

impl Config {
    /// Load configuration from `gymdesk.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("gymdesk.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides read through `lookup` (the process environment in
    /// production). Unparsable numbers are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GYMDESK_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("GYMDESK_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = lookup("GYMDESK_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("GYMDESK_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("GYMDESK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(offset) = lookup("GYMDESK_UTC_OFFSET_MINUTES").and_then(|val| val.parse().ok())
        {
            self.attendance.utc_offset_minutes = offset;
        }
        if let Some(grace) = lookup("GYMDESK_GRACE_MINUTES").and_then(|val| val.parse().ok()) {
            self.attendance.grace_minutes = grace;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.attendance_policy()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Build the attendance policy from the `[attendance]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the offset exceeds ±18 hours
    /// or the grace window is zero.
    pub fn attendance_policy(&self) -> Result<AttendancePolicy, ConfigError> {
        AttendancePolicy::new(
            self.attendance.utc_offset_minutes,
            self.attendance.grace_minutes,
        )
        .map_err(|err| ConfigError::Validation(err.to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:gymdesk.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gymdeskd=info,gymdesk=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
