//! Test utilities and common test fixtures for client modules


use serde_json::json;

use crate::{client::config::ClientConfig, identifier::Identifier};

pub const PROJECT_API_PATH: &str = "/api/v4/projects/group%2Fproject";

/// JSON representation of a project
pub fn project_json(default_branch: Option<&str>) -> serde_json::Value {
    json!({
        "id": 123,
        "path_with_namespace": "group/project",
        "default_branch": default_branch,
        "web_url": "https://gitlab.example.com/group/project"
    })
}

/// JSON representation of a repository tree entry
pub fn tree_entry_json(path: &str, kind: &str) -> serde_json::Value {
    let name = path.rsplit('/').next().unwrap_or(path);
    json!({
        "id": format!("{:040x}", path.len()),
        "name": name,
        "type": kind,
        "path": path,
        "mode": if kind == "tree" { "040000" } else { "100644" }
    })
}

/// JSON representation of an issue
pub fn issue_json(iid: u64, description: Option<&str>) -> serde_json::Value {
    json!({
        "id": 9000 + iid,
        "iid": iid,
        "project_id": 123,
        "title": "Crash on startup",
        "description": description,
        "state": "opened",
        "created_at": "2024-03-01T10:00:00.000Z",
        "author": { "id": 1, "username": "alice", "name": "Alice" },
        "web_url": format!("https://gitlab.example.com/group/project/-/issues/{iid}")
    })
}

/// JSON representation of an issue note
pub fn note_json(id: u64, username: &str, created_at: &str, body: &str, system: bool) -> serde_json::Value {
    json!({
        "id": id,
        "body": body,
        "author": { "id": id, "username": username, "name": "" },
        "created_at": created_at,
        "system": system,
        "noteable_type": "Issue"
    })
}

/// Create GitLab API error response
pub fn gitlab_error_response(error: &str, description: Option<&str>) -> serde_json::Value {
    let mut json = json!({
        "error": error
    });

    if let Some(desc) = description {
        json["error_description"] = json!(desc);
    }

    json
}

/// Create GitLab API error response (format 2)
pub fn gitlab_error_response_2(message: &str) -> serde_json::Value {
    json!({
        "message": message
    })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// `host:port` of the mock server, usable as an identifier host
    pub fn host(&self) -> String {
        self.server.address().to_string()
    }

    /// Identifier of `group/project` on this server
    pub fn repository(&self) -> Identifier {
        Identifier::repository(self.host(), "group/project")
    }

    /// Identifier of issue `number` of `group/project` on this server
    pub fn issue(&self, number: u64) -> Identifier {
        Identifier::issue(self.host(), "group/project", number)
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(Some("test-token".into())).with_scheme("http")
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shapes() {
        assert_eq!(project_json(Some("main"))["default_branch"], "main");
        assert!(project_json(None)["default_branch"].is_null());
        assert_eq!(tree_entry_json("src/lib.rs", "blob")["name"], "lib.rs");
        assert_eq!(issue_json(7, None)["iid"], 7);
    }

    #[test]
    fn test_error_responses() {
        let error1 = gitlab_error_response("invalid_token", Some("Token is invalid"));
        assert_eq!(error1["error"], "invalid_token");
        assert_eq!(error1["error_description"], "Token is invalid");

        let error2 = gitlab_error_response_2("404 Project Not Found");
        assert_eq!(error2["message"], "404 Project Not Found");
    }
}
