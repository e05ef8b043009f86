// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Framework configuration.
//!
//! These sections are usually read from the `[mapping]`, `[error]` and
//! `[token]` tables of `flute.toml` by the CLI; every field has a default so
//! an empty table (or none at all) is valid.
//!
//! ```toml
//! [mapping]
//! action_suffix = "Action"
//! root_action = "rootAction"
//! package_delimiter = "_"
//!
//! [error]
//! error_page = "error/message.html"
//! login_action = "signinAction"
//!
//! [token]
//! parameter = "flute.token"
//! ```

use serde::Deserialize;

/// Framework settings consumed by the resolver and the typical hooks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FluteConfig {
    /// Action naming convention.
    #[serde(default)]
    pub mapping: MappingConfig,
    /// Error page and login redirect targets.
    #[serde(default)]
    pub error: ErrorConfig,
    /// Double-submit token settings.
    #[serde(default)]
    pub token: TokenConfig,
}

/// Naming convention for registry keys.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    /// Suffix of every action registry key (default: "Action").
    #[serde(default = "default_action_suffix")]
    pub action_suffix: String,

    /// Registry key of the root action (default: "rootAction").
    #[serde(default = "default_root_action")]
    pub root_action: String,

    /// Separator between package and class parts of a key (default: "_").
    #[serde(default = "default_package_delimiter")]
    pub package_delimiter: String,
}

/// Targets used when an application error is translated to a response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorConfig {
    /// HTML path forwarded to for translated application errors.
    #[serde(default = "default_error_page")]
    pub error_page: String,

    /// Registry key of the action users are redirected to for login.
    #[serde(default = "default_login_action")]
    pub login_action: String,
}

/// Double-submit token settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Request parameter carrying the submitted token.
    #[serde(default = "default_token_parameter")]
    pub parameter: String,
}

fn default_action_suffix() -> String {
    "Action".to_string()
}

fn default_root_action() -> String {
    "rootAction".to_string()
}

fn default_package_delimiter() -> String {
    "_".to_string()
}

fn default_error_page() -> String {
    "error/message.html".to_string()
}

fn default_login_action() -> String {
    "signinAction".to_string()
}

fn default_token_parameter() -> String {
    "flute.token".to_string()
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            action_suffix: default_action_suffix(),
            root_action: default_root_action(),
            package_delimiter: default_package_delimiter(),
        }
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            error_page: default_error_page(),
            login_action: default_login_action(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            parameter: default_token_parameter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FluteConfig::default();
        assert_eq!(config.mapping.action_suffix, "Action");
        assert_eq!(config.mapping.root_action, "rootAction");
        assert_eq!(config.mapping.package_delimiter, "_");
        assert_eq!(config.error.error_page, "error/message.html");
        assert_eq!(config.token.parameter, "flute.token");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: FluteConfig =
            serde_json::from_str(r#"{ "mapping": { "root_action": "homeAction" } }"#).unwrap();
        assert_eq!(config.mapping.root_action, "homeAction");
        assert_eq!(config.mapping.action_suffix, "Action");
        assert_eq!(config.error.login_action, "signinAction");
    }
}
