//! Error taxonomy for review-gate.

/// Errors produced while reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required_approvals must be at least 1")]
    ZeroThreshold,

    #[error("protected_prefix must not be empty")]
    EmptyPrefix,

    #[error("comment_marker must not be empty")]
    EmptyMarker,

    #[error("invalid team identifier {0:?}: expected org/slug")]
    InvalidTeam(String),

    #[error("invalid repository {0:?}: expected owner/repo")]
    InvalidRepository(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// review-gate errors.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: &'static str, reason: String },

    #[error("platform error during {operation}: {message}")]
    Platform { operation: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    pub fn platform(operation: impl Into<String>, message: impl Into<String>) -> Self {
        GateError::Platform {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for review-gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
