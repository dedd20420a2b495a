// GitLab API Documentation: https://docs.gitlab.com/ee/api/api_resources.html
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A labeled unit of text destined for a generated prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub content: String,
    pub source: String,
}

impl Fragment {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self { content: content.into(), source: source.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDto {
    pub path_with_namespace: CompactString,
    /// Absent for repositories without any commits
    pub default_branch: Option<CompactString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    /// Submodule
    Commit,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntryDto {
    pub path: CompactString,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

impl TreeEntryDto {
    pub fn is_blob(&self) -> bool {
        self.kind == TreeEntryKind::Blob
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorDto {
    pub username: CompactString,
    #[serde(default)]
    pub name: CompactString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueDto {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
    pub state: CompactString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteDto {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub author: Option<AuthorDto>,
    pub created_at: DateTime<Utc>,
    /// Administrative event (label change, assignment, ...)
    #[serde(default)]
    pub system: bool,
}

impl NoteDto {
    /// Notes that belong in a rendered discussion
    pub fn is_conversational(&self) -> bool {
        !self.system && !self.body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tree_entry_kinds() {
        let entries: Vec<TreeEntryDto> = serde_json::from_value(json!([
            { "id": "a1", "name": "src", "type": "tree", "path": "src", "mode": "040000" },
            { "id": "b2", "name": "main.rs", "type": "blob", "path": "src/main.rs", "mode": "100644" },
            { "id": "c3", "name": "vendor", "type": "commit", "path": "vendor", "mode": "160000" },
        ]))
        .unwrap();

        assert_eq!(entries[0].kind, TreeEntryKind::Tree);
        assert!(entries[1].is_blob());
        assert_eq!(entries[1].path, "src/main.rs");
        assert_eq!(entries[2].kind, TreeEntryKind::Commit);
    }

    #[test]
    fn test_project_without_default_branch() {
        let project: ProjectDto = serde_json::from_value(json!({
            "id": 7,
            "path_with_namespace": "group/empty",
            "default_branch": null,
            "web_url": "https://gitlab.example.com/group/empty"
        }))
        .unwrap();

        assert!(project.default_branch.is_none());
    }

    #[test]
    fn test_note_is_conversational() {
        let note: NoteDto = serde_json::from_value(json!({
            "id": 1,
            "body": "added ~bug label",
            "author": { "username": "alice", "name": "Alice" },
            "created_at": "2024-01-01T00:00:00Z",
            "system": true
        }))
        .unwrap();
        assert!(!note.is_conversational());

        let note: NoteDto = serde_json::from_value(json!({
            "id": 2,
            "body": "   ",
            "author": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!note.is_conversational());
    }
}
