//! Error types for tagscore_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur while handling label data.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Label configuration could not be parsed from TOML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Label configuration could not be rendered as TOML.
    #[error("Config render error: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
