//! Configuration management for GitLab client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;
use directories::ProjectDirs;

use super::error::{ClientError, Result};

/// Main configuration for GitLab client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Private access token; requests are unauthenticated without one
    pub private_token: Option<CompactString>,
    /// URL scheme of the GitLab instance
    pub scheme: CompactString,
    /// Branch, tag or commit to load instead of the default branch
    pub git_ref: Option<CompactString>,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Number of items per page for paginated requests
    pub per_page: u32,
    /// Request timeout
    pub timeout: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Enable debug logging of HTTP responses
    pub log_responses: bool,
    /// Directory for storing debug logs
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            per_page: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        let log_directory = ProjectDirs::from("", "", "gitlab-fragments")
            .map(|dirs| dirs.cache_dir().join("responses"))
            .unwrap_or_else(|| PathBuf::from("gitlab-fragments-logs"));

        Self { log_responses: false, log_directory: Some(log_directory) }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            private_token: None,
            scheme: "https".into(),
            git_ref: None,
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(private_token: Option<CompactString>) -> Self {
        Self { private_token, ..Self::default() }
    }

    /// Configuration with the token taken from `GITLAB_TOKEN`
    ///
    /// The environment is read once, here; the client never consults it.
    pub fn from_env() -> Self {
        let private_token = std::env::var("GITLAB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(CompactString::from);

        Self::new(private_token)
            .with_debug_logging(std::env::var("GITLAB_FRAGMENTS_DEBUG").is_ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scheme != "https" && self.scheme != "http" {
            return Err(ClientError::config("Scheme must be http or https"));
        }

        if self
            .private_token
            .as_ref()
            .is_some_and(|token| token.trim().is_empty())
        {
            return Err(ClientError::config("Private token cannot be blank"));
        }

        if self.request.per_page == 0 || self.request.per_page > 100 {
            return Err(ClientError::config("per_page must be between 1 and 100"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Base URL of the REST v4 API on `host`
    pub fn api_base_url(&self, host: &str) -> CompactString {
        compact_str::format_compact!("{}://{}/api/v4", self.scheme, host)
    }

    /// Base URL of the web UI on `host`
    pub fn web_base_url(&self, host: &str) -> CompactString {
        compact_str::format_compact!("{}://{}", self.scheme, host)
    }
}

impl ClientConfig {
    /// Set URL scheme
    pub fn with_scheme(mut self, scheme: impl Into<CompactString>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set ref override
    pub fn with_git_ref(mut self, git_ref: Option<CompactString>) -> Self {
        self.git_ref = git_ref;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set items per page
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.request.per_page = per_page;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = timeout;
        self
    }

    /// Enable debug logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}
