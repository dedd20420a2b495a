use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::{ClientConfig, RequestConfig},
    result::{FragmentError, Result},
};

/// Contents of `gitlab-fragments.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    /// Personal access token; `GITLAB_TOKEN` takes precedence
    pub gitlab_token: Option<String>,
    /// Timeout of every API request, in seconds
    pub timeout_secs: u64,
    /// Page size for tree and note listings
    pub per_page: u32,
    /// Ref to load instead of the default branch
    pub git_ref: Option<String>,
    /// Log level (`Off` disables file logging)
    pub log_level: Option<String>,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        let request = RequestConfig::default();
        Self {
            gitlab_token: None,
            timeout_secs: request.timeout.as_secs(),
            per_page: request.per_page,
            git_ref: None,
            log_level: None,
        }
    }
}

impl FragmentsConfig {
    /// Overlay the file settings on `base`
    ///
    /// A token already present in `base` (from `GITLAB_TOKEN`) wins over the
    /// one stored in the file.
    pub fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let file_token = self
            .gitlab_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .map(CompactString::from);

        let mut config = base.with_request(RequestConfig {
            per_page: self.per_page,
            timeout: Duration::from_secs(self.timeout_secs),
        });
        config.private_token = config.private_token.or(file_token);
        config.with_git_ref(self.git_ref.as_deref().map(CompactString::from))
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("gitlab-fragments.toml")
    } else {
        PathBuf::from("gitlab-fragments.toml")
    }
}

pub fn load_config(config_file: &PathBuf) -> Result<FragmentsConfig> {
    if !config_file.exists() {
        return Ok(FragmentsConfig::default());
    }

    confy::load_path(config_file).map_err(FragmentError::ConfigError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_client_defaults() {
        let config = FragmentsConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn test_client_config_token_precedence() {
        let config = FragmentsConfig {
            gitlab_token: Some("from-file".into()),
            per_page: 20,
            timeout_secs: 5,
            git_ref: Some("develop".into()),
            ..Default::default()
        };

        let client = config.client_config(ClientConfig::new(Some("from-env".into())));
        assert_eq!(client.private_token.as_deref(), Some("from-env"));
        assert_eq!(client.request.per_page, 20);
        assert_eq!(client.request.timeout, Duration::from_secs(5));
        assert_eq!(client.git_ref.as_deref(), Some("develop"));

        let client = config.client_config(ClientConfig::new(None));
        assert_eq!(client.private_token.as_deref(), Some("from-file"));

        let blank = FragmentsConfig { gitlab_token: Some(" ".into()), ..Default::default() };
        assert!(blank.client_config(ClientConfig::new(None)).private_token.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FragmentsConfig = load_from_str("per_page = 50");
        assert_eq!(config.per_page, 50);
        assert_eq!(config.timeout_secs, 30);
    }

    fn load_from_str(contents: &str) -> FragmentsConfig {
        let dir = std::env::temp_dir().join(format!("gitlab-fragments-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.toml");
        std::fs::write(&path, contents).unwrap();
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        config
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = PathBuf::from("/nonexistent/gitlab-fragments.toml");
        assert_eq!(load_config(&path).unwrap(), FragmentsConfig::default());
    }
}
