//! Issue and its discussion to a single fragment

use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::{
    client::{ClientError, GitlabApi},
    domain::{AuthorDto, Fragment, IssueDto, NoteDto},
    identifier::Identifier,
};

/// Load an issue with its notes as one markdown fragment
#[instrument(skip(api, identifier), fields(project = %identifier.project_path, issue = ?identifier.issue_number))]
pub async fn build(api: &GitlabApi, identifier: &Identifier) -> crate::client::Result<Vec<Fragment>> {
    let issue_number = identifier
        .issue_number
        .ok_or_else(|| ClientError::config(format!("{identifier} does not name an issue")))?;

    let issue = api.get_issue(identifier, issue_number).await?;

    let notes = api.issue_notes(identifier, issue_number)?;
    let notes = notes.collect_all().await?;
    debug!(notes = notes.len(), "Fetched issue notes");

    let source = format!(
        "{}/{}/-/issues/{}",
        api.config().web_base_url(&identifier.host),
        identifier.project_path,
        issue_number
    );

    Ok(vec![Fragment::new(render(&issue, notes), source)])
}

/// Render the issue header, description and conversational notes, oldest first
pub fn render(issue: &IssueDto, notes: Vec<NoteDto>) -> String {
    let mut md: Vec<String> = Vec::new();

    md.push(format!("# {}", issue.title.trim()));
    md.push(
        [
            format!("Author: {}", author_label(issue.author.as_ref())),
            format!("Created: {}", timestamp(&issue.created_at)),
            format!("State: {}", issue.state),
        ]
        .join("\n"),
    );

    if let Some(description) = issue.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            md.push(description.to_string());
        }
    }

    let comments = notes
        .into_iter()
        .filter(NoteDto::is_conversational)
        .sorted_by(|a, b| a.created_at.cmp(&b.created_at))
        .map(|note| {
            format!(
                "comment by {} at {}: {}",
                author_label(note.author.as_ref()),
                timestamp(&note.created_at),
                note.body.trim()
            )
        })
        .collect_vec();

    if !comments.is_empty() {
        md.push("---".to_string());
        md.extend(comments);
    }

    md.join("\n\n") + "\n"
}

fn author_label(author: Option<&AuthorDto>) -> String {
    match author {
        Some(author) if author.name.is_empty() => format!("@{}", author.username),
        Some(author) => format!("{} (@{})", author.name, author.username),
        None => "unknown".to_string(),
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
