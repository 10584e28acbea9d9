pub mod app_config;
pub mod config;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, CrawlSettings, ProxyConfig};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with_overrides};
pub use records::{Field, ProfileRecord, UNAVAILABLE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
