//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// No usable credentials in the environment, or bad client settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response.
    #[error("request failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status. The body is kept
    /// verbatim; OpenAI puts the useful detail there, not in the status
    /// line.
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected completion shape.
    #[error("unexpected response shape: {0}")]
    Parse(String),

    /// A success response carried no choices to read a message from.
    #[error("completion contained no choices")]
    EmptyCompletion,
}

impl OpenAIError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Network failures and rate limits are transient; everything else is
    /// the caller's request or configuration.
    pub fn is_retryable(&self) -> bool {
        match self {
            OpenAIError::Network { .. } => true,
            OpenAIError::Api { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}
