//! Configuration management for the vertical-lift engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with VLIFT_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use shared::models::{DEFAULT_X_PREFIX, DEFAULT_XY_PADDING, DEFAULT_Y_PREFIX};

/// Main engine configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Cell naming defaults applied to new locations
    pub naming: NamingConfig,
}

/// Defaults for the cell-naming fields of new locations
#[derive(Debug, Deserialize, Clone)]
pub struct NamingConfig {
    pub x_prefix: String,
    pub y_prefix: String,
    pub xy_padding: usize,
    pub y_first: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment =
            std::env::var("VLIFT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("naming.x_prefix", DEFAULT_X_PREFIX)?
            .set_default("naming.y_prefix", DEFAULT_Y_PREFIX)?
            .set_default("naming.xy_padding", DEFAULT_XY_PADDING as i64)?
            .set_default("naming.y_first", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (VLIFT_ prefix)
            .add_source(
                Environment::with_prefix("VLIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            x_prefix: DEFAULT_X_PREFIX.to_string(),
            y_prefix: DEFAULT_Y_PREFIX.to_string(),
            xy_padding: DEFAULT_XY_PADDING,
            y_first: false,
        }
    }
}
