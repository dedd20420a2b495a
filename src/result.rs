use confy::ConfyError;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, FragmentError>;

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("Invalid GitLab identifier {input:?}: {reason}")]
    InvalidIdentifier { input: String, reason: &'static str },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Failure reading configuration file.")]
    ConfigError(#[source] ConfyError),
}

/// Failure categories surfaced to the end user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIdentifier,
    NotFound,
    AuthError,
    RateLimited,
    UpstreamError,
    Config,
}

impl FragmentError {
    pub fn invalid_identifier(input: impl Into<String>, reason: &'static str) -> Self {
        FragmentError::InvalidIdentifier { input: input.into(), reason }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FragmentError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            FragmentError::Client(e) => e.kind(),
            FragmentError::ConfigError(_) => ErrorKind::Config,
        }
    }
}
