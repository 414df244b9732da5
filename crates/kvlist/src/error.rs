//! Error types for configuration loading.
//!
//! Only settings parsing and validation can fail. Classification, extraction,
//! segmentation and the render scheduler are infallible: a bad configuration
//! that still reaches a [`Grammar`](crate::Grammar) degrades to "nothing is a
//! key-value list" instead of surfacing an error to the host.

use thiserror::Error;

/// Errors that can occur when loading or validating [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML source could not be parsed into settings.
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON source could not be parsed into settings.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// `max_key_width` must be a percentage in `0..=99`.
    #[error("max_key_width must be between 0 and 99, got {0}")]
    MaxKeyWidthOutOfRange(u8),

    /// The bullet marker cannot be empty.
    #[error("bullet_marker cannot be empty")]
    EmptyBulletMarker,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
