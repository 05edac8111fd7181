use thiserror::Error;

/// Errors that can occur when talking to an external AI service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to configure {service} client: {reason}")]
    Config {
        service: &'static str,
        reason: String,
    },

    #[error("Request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl ClientError {
    pub(crate) fn invalid(service: &'static str, reason: impl Into<String>) -> Self {
        ClientError::InvalidResponse {
            service,
            reason: reason.into(),
        }
    }

    /// True when the failure was the per-call timeout elapsing
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Http { source, .. } if source.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
