//! Parsing of compact GitLab identifiers
//!
//! The parser consumes whatever remains after the loader prefix
//! (`gitlab:` / `gitlab-issue:`) has been stripped, e.g.
//! `gitlab.example.com:group/project` or
//! `gitlab.example.com:group/project/issue/42`.

use std::fmt;

use compact_str::{CompactString, ToCompactString};

use crate::result::{FragmentError, Result};

/// Parsed request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// GitLab server hostname, without scheme
    pub host: CompactString,
    /// `namespace/project`, subgroups allowed
    pub project_path: CompactString,
    /// Issue number; `None` selects repository mode
    pub issue_number: Option<u64>,
}

impl Identifier {
    /// Identifier selecting a repository
    pub fn repository(host: impl Into<CompactString>, project_path: impl Into<CompactString>) -> Self {
        Self {
            host: host.into(),
            project_path: project_path.into(),
            issue_number: None,
        }
    }

    /// Identifier selecting a single issue
    pub fn issue(
        host: impl Into<CompactString>,
        project_path: impl Into<CompactString>,
        issue_number: u64,
    ) -> Self {
        Self {
            host: host.into(),
            project_path: project_path.into(),
            issue_number: Some(issue_number),
        }
    }

    pub fn is_issue(&self) -> bool {
        self.issue_number.is_some()
    }

    /// Project path encoded as a single opaque API path segment
    pub fn encoded_project(&self) -> CompactString {
        urlencoding::encode(&self.project_path).to_compact_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.project_path)?;
        if let Some(number) = self.issue_number {
            write!(f, "/issue/{number}")?;
        }
        Ok(())
    }
}

/// Parse a compact identifier into host, project path and optional issue number
pub fn parse(text: &str) -> Result<Identifier> {
    let invalid = |reason: &'static str| FragmentError::invalid_identifier(text, reason);

    let trimmed = text.trim().trim_end_matches('/');
    let web_url = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));

    // a web URL keeps `host:port` together
    let split_at = match web_url {
        Some(url) => url.find('/'),
        None => trimmed.find([':', '/']),
    }
    .ok_or_else(|| invalid("expected host and project path"))?;
    let trimmed = web_url.unwrap_or(trimmed);
    let (host, rest) = (&trimmed[..split_at], &trimmed[split_at + 1..]);

    if host.is_empty() {
        return Err(invalid("host is empty"));
    }

    let segments: Vec<&str> = rest.trim_matches('/').split('/').collect();
    let (project_segments, issue_number) = split_issue_suffix(&segments).map_err(invalid)?;

    if project_segments.len() < 2 {
        return Err(invalid("project path must be namespace/project"));
    }
    if project_segments.iter().any(|s| s.is_empty()) {
        return Err(invalid("project path contains an empty component"));
    }

    let mut project_path = project_segments.join("/");
    if issue_number.is_none() {
        if let Some(stripped) = project_path.strip_suffix(".git") {
            project_path = stripped.to_string();
        }
    }

    Ok(Identifier {
        host: host.into(),
        project_path: project_path.into(),
        issue_number,
    })
}

/// Separate a trailing `issue/N` (or `issues/N`, optionally after `-`) from
/// the project segments.
fn split_issue_suffix<'a>(
    segments: &'a [&'a str],
) -> std::result::Result<(&'a [&'a str], Option<u64>), &'static str> {
    let n = segments.len();
    if n < 4 || !matches!(segments[n - 2], "issue" | "issues") {
        return Ok((segments, None));
    }

    let number = segments[n - 1]
        .parse::<u64>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or("issue number must be a positive integer")?;

    let mut project = &segments[..n - 2];
    if project.last() == Some(&"-") {
        project = &project[..project.len() - 1];
    }

    Ok((project, Some(number)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;

    fn assert_invalid(text: &str) {
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier, "{text:?} should be rejected");
    }

    #[test]
    fn test_parse_repository() {
        let id = parse("gitlab.example.com:group/project").unwrap();
        assert_eq!(id.host, "gitlab.example.com");
        assert_eq!(id.project_path, "group/project");
        assert_eq!(id.issue_number, None);
    }

    #[test]
    fn test_parse_issue() {
        let id = parse("gitlab.example.com:group/project/issue/42").unwrap();
        assert_eq!(id.project_path, "group/project");
        assert_eq!(id.issue_number, Some(42));
        assert!(id.is_issue());
    }

    #[test]
    fn test_parse_slash_separator_and_trailing_slash() {
        let id = parse("gitlab.example.com/group/project/").unwrap();
        assert_eq!(id.host, "gitlab.example.com");
        assert_eq!(id.project_path, "group/project");

        let id = parse("gitlab.example.com/group/project/issues/7/").unwrap();
        assert_eq!(id.issue_number, Some(7));
    }

    #[test]
    fn test_parse_subgroups() {
        let id = parse("gitlab.com:org/team/service/issue/3").unwrap();
        assert_eq!(id.project_path, "org/team/service");
        assert_eq!(id.issue_number, Some(3));
    }

    #[test]
    fn test_parse_web_urls() {
        let id = parse("https://gitlab.com/group/project.git").unwrap();
        assert_eq!(id.host, "gitlab.com");
        assert_eq!(id.project_path, "group/project");

        let id = parse("https://gitlab.com/group/project/-/issues/12").unwrap();
        assert_eq!(id.project_path, "group/project");
        assert_eq!(id.issue_number, Some(12));

        let id = parse("https://gitlab.example.com:8443/group/project").unwrap();
        assert_eq!(id.host, "gitlab.example.com:8443");
        assert_eq!(id.project_path, "group/project");

        let id = parse("http://localhost:8080/group/sub/project/-/issues/5").unwrap();
        assert_eq!(id.host, "localhost:8080");
        assert_eq!(id.project_path, "group/sub/project");
        assert_eq!(id.issue_number, Some(5));
    }

    #[test]
    fn test_parse_invalid() {
        assert_invalid("");
        assert_invalid("host");
        assert_invalid("host:");
        assert_invalid(":group/project");
        assert_invalid("host:project");
        assert_invalid("host:group//project");
        assert_invalid("host:ns/proj/issue/abc");
        assert_invalid("host:ns/proj/issue/0");
        assert_invalid("host:ns/proj/issue/-1");
    }

    #[test]
    fn test_encoded_project() {
        let id = Identifier::repository("gitlab.com", "group/sub.group/my project");
        assert_eq!(id.encoded_project(), "group%2Fsub.group%2Fmy%20project");
    }

    #[test]
    fn test_display() {
        assert_eq!(Identifier::issue("h", "a/b", 5).to_string(), "h:a/b/issue/5");
        assert_eq!(Identifier::repository("h", "a/b").to_string(), "h:a/b");
    }
}
