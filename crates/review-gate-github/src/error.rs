//! Error types for review-gate-github

use review_gate_core::GateError;
use thiserror::Error;

/// Errors that can occur talking to the GitHub REST API
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Non-success HTTP status
    #[error("GitHub API error during {operation}: {status} - {body}")]
    Api {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP request failed during {operation}: {message}")]
    Http {
        operation: &'static str,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("unexpected response during {operation}: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// A record failed validation at the boundary
    #[error(transparent)]
    Record(#[from] GateError),
}

impl GitHubError {
    pub(crate) fn http(operation: &'static str, err: reqwest::Error) -> Self {
        GitHubError::Http {
            operation,
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(operation: &'static str, err: reqwest::Error) -> Self {
        GitHubError::Decode {
            operation,
            message: err.to_string(),
        }
    }

    /// The API operation that failed, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            GitHubError::Api { operation, .. }
            | GitHubError::Http { operation, .. }
            | GitHubError::Decode { operation, .. } => Some(*operation),
            GitHubError::Client(_) | GitHubError::Record(_) => None,
        }
    }
}

impl From<GitHubError> for GateError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Record(inner) => inner,
            other => GateError::platform(
                other.operation().unwrap_or("client setup"),
                other.to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_platform_error() {
        let err = GitHubError::Api {
            operation: "list reviews",
            status: 404,
            body: "Not Found".to_string(),
        };
        let gate: GateError = err.into();
        match gate {
            GateError::Platform { operation, message } => {
                assert_eq!(operation, "list reviews");
                assert!(message.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_error_passes_through() {
        let inner = GateError::InvalidRecord {
            kind: "review",
            reason: "bad".to_string(),
        };
        let gate: GateError = GitHubError::Record(inner).into();
        assert!(matches!(gate, GateError::InvalidRecord { .. }));
    }
}
