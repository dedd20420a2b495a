//! Core HTTP client for GitLab API

use chrono::Local;
use compact_str::{format_compact, CompactString};
use reqwest::{
    header::{HeaderMap, ACCEPT, LINK, RETRY_AFTER},
    redirect, Client, RequestBuilder, Response, Url,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ClientError, Result},
    pagination::{Page, Paginated},
};
use crate::{
    domain::{IssueDto, NoteDto, ProjectDto, TreeEntryDto},
    identifier::Identifier,
};

const MAX_REDIRECTS: usize = 10;

/// HTTP client for the REST v4 API of a single GitLab host
#[derive(Debug, Clone)]
pub struct GitlabApi {
    client: Client,
    config: ClientConfig,
    host: CompactString,
    base_url: CompactString,
}

/// GitLab API error response formats
#[derive(Debug, Deserialize)]
struct GitlabApiError {
    error: CompactString,
    error_description: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
struct GitlabApiError2 {
    message: serde_json::Value,
}

impl GitlabApi {
    /// Create a new GitLab API client bound to `host`
    pub fn new(host: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;

        if host.trim().is_empty() {
            return Err(ClientError::config("Host cannot be empty"));
        }

        let client = Client::builder()
            .timeout(config.request.timeout)
            .redirect(same_origin_redirects())
            .build()
            .map_err(ClientError::Http)?;

        let base_url = config.api_base_url(host);

        Ok(Self { client, config, host: host.into(), base_url })
    }

    /// GET `path` and deserialize the JSON body
    #[instrument(skip(self, query), fields(host = %self.host))]
    pub async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path, query)?;
        let response = self.send(url).await?;
        self.handle_response(response).await
    }

    /// GET `path` and return the undecoded body
    #[instrument(skip(self, query), fields(host = %self.host))]
    pub async fn get_raw(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = self.build_url(path, query)?;
        let response = self.send(url).await?;
        let response = self.check_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(ClientError::from_transport)?;
        Ok(body.to_vec())
    }

    /// Lazily follow all pages of a list endpoint
    pub fn get_paginated<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Paginated<'_, T>>
    where
        T: DeserializeOwned,
    {
        let url = self.build_url(path, query)?;
        Ok(Paginated::new(self, url))
    }

    /// Get a project, used to resolve its default branch
    #[instrument(skip(self, project), fields(project = %project.project_path))]
    pub async fn get_project(&self, project: &Identifier) -> Result<ProjectDto> {
        self.get(&project_endpoint(project), &[]).await
    }

    /// Recursive listing of the repository tree at `git_ref`
    pub fn repository_tree(
        &self,
        project: &Identifier,
        git_ref: &str,
    ) -> Result<Paginated<'_, TreeEntryDto>> {
        let per_page = self.config.request.per_page.to_string();
        self.get_paginated(
            &format_compact!("{}/repository/tree", project_endpoint(project)),
            &[("recursive", "true"), ("ref", git_ref), ("per_page", &per_page)],
        )
    }

    /// Raw content of a single file at `git_ref`
    #[instrument(skip(self, project), fields(project = %project.project_path))]
    pub async fn get_file_raw(
        &self,
        project: &Identifier,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>> {
        let path = format_compact!(
            "{}/repository/files/{}/raw",
            project_endpoint(project),
            urlencoding::encode(file_path)
        );
        self.get_raw(&path, &[("ref", git_ref)]).await
    }

    /// Get a single issue by its project-scoped number
    #[instrument(skip(self, project), fields(project = %project.project_path))]
    pub async fn get_issue(&self, project: &Identifier, issue_number: u64) -> Result<IssueDto> {
        let path = format_compact!("{}/issues/{}", project_endpoint(project), issue_number);
        self.get(&path, &[]).await
    }

    /// All notes of an issue, oldest first
    pub fn issue_notes(
        &self,
        project: &Identifier,
        issue_number: u64,
    ) -> Result<Paginated<'_, NoteDto>> {
        let per_page = self.config.request.per_page.to_string();
        self.get_paginated(
            &format_compact!("{}/issues/{}/notes", project_endpoint(project), issue_number),
            &[("sort", "asc"), ("order_by", "created_at"), ("per_page", &per_page)],
        )
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page and locate the page after it
    pub(super) async fn get_page<T>(&self, url: Url) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send(url.clone()).await?;
        let next = next_page_url(&url, response.headers())?;
        let items = self.handle_response(response).await?;
        Ok(Page { items, next })
    }

    // Private helper methods

    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format_compact!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|_| ClientError::invalid_url(raw.as_str()))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    async fn send(&self, url: Url) -> Result<Response> {
        debug!(url = %url, "GET");

        self.authenticated_request(url)
            .send()
            .await
            .map_err(|e| {
                let err = ClientError::from_transport(e);
                warn!(error = %err, network = err.is_network_error(), "Request failed");
                err
            })
    }

    /// Create request builder, attaching the token when one is configured
    fn authenticated_request(&self, url: Url) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json");

        match &self.config.private_token {
            Some(token) => request.header("PRIVATE-TOKEN", token.as_str()),
            None => request,
        }
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.check_status(response).await?;
        let url_path = response.url().path().to_string();
        let body = response
            .text()
            .await
            .map_err(ClientError::from_transport)?;

        // Log response if debug is enabled
        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        serde_json::from_str(&body).map_err(|e| {
            ClientError::json_parse(
                url_path.clone(),
                format!("Failed to parse response from {url_path}"),
                e,
            )
        })
    }

    /// Pass successful responses through, translate everything else
    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(std::time::Duration::from_secs);
        let url_path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();

        debug!(status = status.as_u16(), path = %url_path, "GitLab returned an error status");
        Err(self.handle_error_response(status.as_u16(), &url_path, retry_after, &body))
    }

    /// Handle error responses from GitLab API
    fn handle_error_response(
        &self,
        status: u16,
        url_path: &str,
        retry_after: Option<std::time::Duration>,
        body: &str,
    ) -> ClientError {
        match status {
            401 | 403 => ClientError::Authentication { status },
            404 => ClientError::not_found(
                urlencoding::decode(url_path)
                    .map(|p| p.into_owned())
                    .unwrap_or_else(|_| url_path.to_string()),
            ),
            429 => ClientError::rate_limit(retry_after),
            _ => {
                // Try to parse GitLab API error formats
                if let Ok(api_error) = serde_json::from_str::<GitlabApiError>(body) {
                    ClientError::gitlab_api(format_compact!(
                        "HTTP {}: {} {}",
                        status,
                        api_error.error,
                        api_error.error_description.unwrap_or_default()
                    ))
                } else if let Ok(api_error2) = serde_json::from_str::<GitlabApiError2>(body) {
                    let message = match api_error2.message {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    ClientError::gitlab_api(format_compact!("HTTP {}: {}", status, message))
                } else {
                    ClientError::gitlab_api(format_compact!("HTTP {}: {}", status, body))
                }
            },
        }
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace(['/', '%'], "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

/// `projects/{id}` with the project path as one encoded segment
fn project_endpoint(project: &Identifier) -> CompactString {
    format_compact!("projects/{}", project.encoded_project())
}

/// Follow redirects only while they stay on the origin of the request.
///
/// The token travels in `PRIVATE-TOKEN`, which reqwest does not strip on
/// cross-host redirects. A redirect elsewhere is returned as-is and surfaces
/// as an upstream error.
fn same_origin_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let same_origin = attempt
            .previous()
            .last()
            .is_some_and(|previous| previous.origin() == attempt.url().origin());
        if same_origin {
            attempt.follow()
        } else {
            warn!(location = %attempt.url(), "Not following redirect to another origin");
            attempt.stop()
        }
    })
}

/// Next page from the `Link` header, falling back to `X-Next-Page`
///
/// A `Link` target on another origin (an instance reached through an alias
/// hostname) is replaced by `X-Next-Page` on the current origin. Without that
/// header the listing fails rather than send the token elsewhere.
fn next_page_url(current: &Url, headers: &HeaderMap) -> Result<Option<Url>> {
    let from_link = headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_next_link)
        .and_then(|link| Url::parse(link).ok());

    let from_header = headers
        .get("x-next-page")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|page| page.parse::<u32>().is_ok())
        .map(|page| with_page(current, page));

    match from_link {
        Some(link) if link.origin() == current.origin() => Ok(Some(link)),
        Some(link) => match from_header {
            Some(next) => {
                debug!(link = %link, "Link header points to another origin, using X-Next-Page");
                Ok(Some(next))
            },
            None => Err(ClientError::gitlab_api(format_compact!(
                "Refusing to follow pagination link to another origin: {}",
                link
            ))),
        },
        None => Ok(from_header),
    }
}

fn parse_next_link(header: &str) -> Option<&str> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        params
            .split(';')
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| target.trim().trim_start_matches('<').trim_end_matches('>'))
    })
}

fn with_page(url: &Url, page: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut next = url.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("page", page);
    next
}
