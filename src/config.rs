use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Query builder configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Maximum nesting of CALL { } subqueries, UNION branches and FOREACH blocks
    #[validate(range(
        min = 1,
        max = 64,
        message = "Max nesting depth must be between 1 and 64"
    ))]
    pub max_nesting_depth: u32,

    /// Log every compiled statement at info level
    pub log_compiled_queries: bool,

    /// Optional YAML type catalog loaded by `TypeCatalog::from_config`
    pub catalog_path: Option<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 16,
            log_compiled_queries: false,
            catalog_path: None,
        }
    }
}

impl BuilderConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            max_nesting_depth: parse_env_var("CYPHERCRAFT_MAX_NESTING_DEPTH", "16")?,
            log_compiled_queries: parse_env_var("CYPHERCRAFT_LOG_QUERIES", "false")?,
            catalog_path: env::var("CYPHERCRAFT_CATALOG").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
