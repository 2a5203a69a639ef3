//! Error types for tilenav

use thiserror::Error;

/// Tilenav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Degenerate speed {0}: must be greater than zero")]
    DegenerateSpeed(f32),

    #[error("Planner pool is shut down")]
    PoolShutDown,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
