//! Shared domain types and configuration for the hot-search aggregator.

pub mod app_config;
pub mod category;
pub mod config;
pub mod item;
pub mod platform;

pub use app_config::{AppConfig, Environment, PoolSizing};
pub use category::Category;
pub use config::{load_app_config, load_app_config_from_env};
pub use item::{HotSearchItem, DEGRADED_TITLE_PREFIX};
pub use platform::Platform;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
