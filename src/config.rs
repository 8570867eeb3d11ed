//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.pg-analyse.toml` in current directory
//! 4. `~/.config/pg-analyse/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! dsn = "host=localhost user=postgres"
//!
//! [output]
//! fmt = "table"          # table, json, yaml
//! human = false
//!
//! [templates]
//! dir = "/etc/pg-analyse/sql"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `PG_ANALYSE_DSN` | DSN used to connect to PostgreSQL |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Name of environment variable to search the PostgreSQL DSN in
pub const ENV_DSN: &str = "PG_ANALYSE_DSN";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// DSN used to connect to PostgreSQL
    pub dsn:       Option<String>,
    #[serde(default)]
    pub output:    OutputConfig,
    #[serde(default)]
    pub templates: TemplatesConfig
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    /// Default formatter alias
    pub fmt:   Option<String>,
    /// Use human friendly values formatting by default
    #[serde(default)]
    pub human: bool
}

/// Template resource configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TemplatesConfig {
    /// Directory with SQL templates overriding the built-in ones
    pub dir: Option<PathBuf>
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.pg-analyse.toml)
    /// 3. Config file in home directory (~/.config/pg-analyse/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // Try to load from home directory config
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("pg-analyse")
                .join("config.toml");

            if home_config.exists() {
                let content = fs::read_to_string(&home_config)
                    .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
                config = toml::from_str(&content)
                    .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
            }
        }

        // Try to load from current directory config (overrides home config)
        let local_config = PathBuf::from(".pg-analyse.toml");
        if local_config.exists() {
            let content = fs::read_to_string(&local_config)
                .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
            config = toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
        }

        // Override with environment variables
        if let Ok(dsn) = env::var(ENV_DSN) {
            config.dsn = Some(dsn);
        }

        Ok(config)
    }
}
