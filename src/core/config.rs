//! Component 6 — configuration (§4.6): layered defaults → TOML file →
//! environment variables → CLI flag, validated before the server starts.
//!
//! Adapted from this codebase's usual configuration shape (see
//! `Config::load`/`from_file`/`apply_env_overrides`/`validate`), trimmed to
//! the fields this server actually needs.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::sweeper::DEFAULT_SWEEP_INTERVAL;

/// Top-level configuration for the remote memory manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC transport configuration.
    pub server: ServerConfig,
    /// Arena and dump configuration.
    pub arena: ArenaConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// RPC transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the RPC transport listens on (§6's `port` startup parameter).
    pub port: u16,
}

/// Arena and dump configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena size in megabytes (§6's `memsize_mb`); arena byte size is
    /// `memsize_mb * 1_048_576`.
    pub memsize_mb: u32,
    /// Directory the diagnostic dump writer writes into (§6's
    /// `dump_folder`), created if missing.
    pub dump_folder: PathBuf,
    /// Sweep interval in seconds. Defaults to the spec's fixed 2-second
    /// interval; exposed so tests and local runs can shrink it.
    pub sweep_interval_secs: u64,
}

impl ArenaConfig {
    /// Arena size in bytes.
    pub fn arena_size_bytes(&self) -> usize {
        self.memsize_mb as usize * 1_048_576
    }

    /// The sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (pretty, json).
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            arena: ArenaConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            memsize_mb: 64,
            dump_folder: PathBuf::from("./dumps"),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, an optional TOML file at
    /// `config_path` (falling back to `remote-memory-manager.toml` in the
    /// working directory), and `RMM_`-prefixed environment variable
    /// overrides, then validates the result.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Config::default();

        let file_path = config_path.unwrap_or("remote-memory-manager.toml");
        if let Ok(file_config) = Self::from_file(file_path) {
            config = file_config;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::config(format!("failed to parse config file: {e}")))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(port) = env::var("RMM_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config("invalid RMM_PORT"))?;
        }

        if let Ok(memsize) = env::var("RMM_MEMSIZE_MB") {
            self.arena.memsize_mb = memsize
                .parse()
                .map_err(|_| Error::config("invalid RMM_MEMSIZE_MB"))?;
        }

        if let Ok(dump_folder) = env::var("RMM_DUMP_FOLDER") {
            self.arena.dump_folder = PathBuf::from(dump_folder);
        }

        if let Ok(level) = env::var("RMM_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = env::var("RMM_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("port must not be 0"));
        }

        if self.arena.memsize_mb == 0 {
            return Err(Error::config("memsize_mb must be greater than 0"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("invalid log level")),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => return Err(Error::config("invalid log format")),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_memsize_rejected() {
        let mut config = Config::default();
        config.arena.memsize_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn arena_size_bytes_matches_megabyte_multiple() {
        let mut config = Config::default();
        config.arena.memsize_mb = 1;
        assert_eq!(config.arena.arena_size_bytes(), 1_048_576);
    }
}
