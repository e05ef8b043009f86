// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Project configuration.
//!
//! Configuration is loaded from `flute.toml` at the project root. The
//! `[server]` table belongs to the CLI; every other table is handed to the
//! framework as [`flute::FluteConfig`].
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8090
//! public_dir = "public"
//! session_idle_minutes = 30
//! max_sessions = 10000
//!
//! [mapping]
//! action_suffix = "Action"
//!
//! [error]
//! error_page = "error/message.html"
//! login_action = "signinAction"
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use flute::FluteConfig;
use serde::Deserialize;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "flute.toml";

/// Main configuration structure loaded from `flute.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Development server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Framework settings (`[mapping]`, `[error]`, `[token]`).
    #[serde(flatten)]
    pub flute: FluteConfig,
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 8090).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public assets directory (default: "public").
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Minutes a session may stay idle before it is dropped (default: 30).
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
    /// Live sessions kept before the least recently used is evicted
    /// (default: 10000).
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_session_idle_minutes() -> u64 {
    30
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            session_idle_minutes: default_session_idle_minutes(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Config {
    /// Loads configuration from `flute.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from the given file, defaulting when it is absent.
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            tracing::debug!("No {} found, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.flute.mapping.root_action, "rootAction");
        assert_eq!(config.flute.error.login_action, "signinAction");
    }

    #[test]
    fn test_partial_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[server]
port = 9000
max_sessions = 50

[mapping]
root_action = "topAction"

[token]
parameter = "_token"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_dir, "public");
        assert_eq!(config.server.max_sessions, 50);
        assert_eq!(config.server.session_idle_minutes, 30);
        assert_eq!(config.flute.mapping.root_action, "topAction");
        assert_eq!(config.flute.mapping.action_suffix, "Action");
        assert_eq!(config.flute.token.parameter, "_token");
        assert_eq!(config.flute.error.error_page, "error/message.html");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
