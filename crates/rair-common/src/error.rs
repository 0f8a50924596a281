//! Error types shared across the Rair workspace.

use thiserror::Error;

/// Top-level error type for loading and parsing outside the crafting core.
#[derive(Debug, Error)]
pub enum RairError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A parsed configuration holds values outside their valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for workspace-level operations.
pub type RairResult<T> = Result<T, RairError>;
