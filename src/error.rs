//! Error types for the omnibox engine.
//!
//! Provider-level failures never cross the controller boundary: providers
//! catch their adapters' `anyhow` errors and degrade to empty result sets.
//! These errors surface only from the facade and configuration layer.

use thiserror::Error;

/// Errors that can occur in the omnibox engine.
#[derive(Debug, Error)]
pub enum OmniboxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A selected match could not be turned into a navigation action
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for omnibox operations
pub type OmniboxResult<T> = Result<T, OmniboxError>;
