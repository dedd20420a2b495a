//! Error types for GitLab client operations

use compact_str::CompactString;
use thiserror::Error;

use crate::result::ErrorKind;

/// Structured error types for GitLab client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error with endpoint context
    #[error("Failed to parse JSON response from {endpoint}: {message}")]
    JsonParse {
        endpoint: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// GitLab API returned an error response
    #[error("GitLab API error: {message}")]
    GitlabApi { message: CompactString },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or rejected credentials (401/403)
    #[error("Authentication failed (HTTP {status}), check GITLAB_TOKEN")]
    Authentication { status: u16 },

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL format
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimit { retry_after: Option<std::time::Duration> },
}

impl ClientError {
    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a GitLab API error
    pub fn gitlab_api(message: impl Into<CompactString>) -> Self {
        Self::GitlabApi { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a rate limit error
    pub fn rate_limit(retry_after: Option<std::time::Duration>) -> Self {
        Self::RateLimit { retry_after }
    }

    /// Map transport errors, singling out timeouts
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Category reported to the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Authentication { .. } => ErrorKind::AuthError,
            ClientError::RateLimit { .. } => ErrorKind::RateLimited,
            ClientError::Config(_) => ErrorKind::Config,
            ClientError::Http(_)
            | ClientError::JsonParse { .. }
            | ClientError::GitlabApi { .. }
            | ClientError::Timeout
            | ClientError::InvalidUrl { .. } => ErrorKind::UpstreamError,
        }
    }

    /// Check if this error indicates a temporary network issue
    pub fn is_network_error(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Timeout => true,
            _ => false,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
