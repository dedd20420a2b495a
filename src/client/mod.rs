//! GitLab client modules
//!
//! A small, request-scoped client for the GitLab REST v4 API, split into
//! configuration, error translation, raw HTTP access and pagination.

pub mod api;
pub mod config;
pub mod error;
pub mod pagination;

#[cfg(test)]
pub(crate) mod tests;

// Re-export main types for convenience
pub use api::GitlabApi;
pub use config::{ClientConfig, RequestConfig};
pub use error::ClientError;
pub use pagination::Paginated;

pub type Result<T> = std::result::Result<T, ClientError>;
