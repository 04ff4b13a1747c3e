//! Configuration management for dbchat.
//!
//! Loads configuration from ${DBCHAT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Client configuration.
///
/// Every field has a default so a missing config file just means
/// "talk to a local backend at the stock speed".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for the streaming ask endpoint (`{api_base}/ask_stream`).
    pub api_base: String,

    /// Base URL for the thread endpoints (`{site_base}/dbchat/...`).
    pub site_base: String,

    /// Characters per second released by the paced output writer.
    pub stream_cps: u32,

    /// Writer tick interval in milliseconds.
    pub tick_ms: u64,

    /// Name of the anti-forgery cookie issued by the backend.
    pub csrf_cookie: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8080/api".to_string(),
            site_base: "http://127.0.0.1:8080".to_string(),
            stream_cps: 18,
            tick_ms: 50,
            csrf_cookie: "csrftoken".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Characters the writer may release per tick. Always at least 1 so a
    /// low rate cannot stall the drain.
    pub fn chars_per_tick(&self) -> usize {
        ((u64::from(self.stream_cps) * self.tick_ms) / 1000).max(1) as usize
    }
}

pub mod paths {
    //! Path resolution for dbchat configuration and data directories.
    //!
    //! DBCHAT_HOME resolution order:
    //! 1. DBCHAT_HOME environment variable (if set)
    //! 2. ~/.config/dbchat (default)

    use std::path::PathBuf;

    /// Returns the dbchat home directory.
    ///
    /// Checks DBCHAT_HOME env var first, falls back to ~/.config/dbchat
    pub fn dbchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("DBCHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("dbchat"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        dbchat_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        dbchat_home().join("logs")
    }
}
