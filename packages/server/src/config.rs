//! Server configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `127.0.0.1` |
//! | `PORT` | `3000` |
//! | `SITREP_DB_PATH` | `data/disaster_reports.db` |
//! | `SITREP_STATIC_DIR` | `public` |
//! | `SITREP_EXPOSE_ERRORS` | `false` |
//! | `SITREP_BRIEFING_SALUTATION` | template default |
//! | `SITREP_BRIEFING_PREAMBLE` | template default |

use std::path::PathBuf;

use sitrep_consolidate::BriefingTemplate;
use sitrep_database::paths::default_db_path;
use thiserror::Error;

/// Default port, matching the address the report pages call.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number.
    #[error("Invalid PORT value '{value}'")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },

    /// A boolean variable has an unrecognized value.
    #[error("Invalid boolean for {name}: '{value}' (expected true/false)")]
    InvalidFlag {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
    /// Location of the `SQLite` report database.
    pub db_path: PathBuf,
    /// Directory of the static report pages, served at `/` when it exists.
    pub static_dir: PathBuf,
    /// Include underlying error detail in 500 responses.
    pub expose_errors: bool,
    /// Opening lines of the consolidated briefing.
    pub briefing: BriefingTemplate,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            db_path: default_db_path(),
            static_dir: PathBuf::from("public"),
            expose_errors: false,
            briefing: BriefingTemplate::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: port })?;
        }
        if let Some(path) = lookup("SITREP_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("SITREP_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("SITREP_EXPOSE_ERRORS") {
            config.expose_errors = parse_flag("SITREP_EXPOSE_ERRORS", flag)?;
        }
        if let Some(salutation) = lookup("SITREP_BRIEFING_SALUTATION") {
            config.briefing.salutation = salutation;
        }
        if let Some(preamble) = lookup("SITREP_BRIEFING_PREAMBLE") {
            config.briefing.preamble = preamble;
        }

        Ok(config)
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}
