//! Repository tree to fragments

use compact_str::{format_compact, CompactString};
use tracing::{debug, info, instrument};

use crate::{
    client::{ClientError, GitlabApi},
    domain::Fragment,
    identifier::Identifier,
};

/// Load every text file of the repository as one fragment each
///
/// All-or-nothing: the first failing request aborts the build.
#[instrument(skip(api, identifier), fields(project = %identifier.project_path))]
pub async fn build(api: &GitlabApi, identifier: &Identifier) -> crate::client::Result<Vec<Fragment>> {
    let git_ref = resolve_ref(api, identifier).await?;

    let mut tree = api.repository_tree(identifier, &git_ref)?;
    let mut blobs = Vec::new();
    while let Some(entry) = tree.next_item().await {
        let entry = entry?;
        if entry.is_blob() {
            blobs.push(entry.path);
        }
    }
    debug!(blobs = blobs.len(), pages = tree.pages_fetched(), git_ref = %git_ref, "Listed repository tree");

    let web_base = api.config().web_base_url(&identifier.host);
    let mut fragments = Vec::with_capacity(blobs.len());
    for path in blobs {
        let bytes = api.get_file_raw(identifier, &path, &git_ref).await?;

        match decode_text(bytes) {
            Some(content) => {
                let source = format!(
                    "{}/{}/-/blob/{}/{}",
                    web_base, identifier.project_path, git_ref, path
                );
                fragments.push(Fragment::new(content, source));
            },
            None => debug!(path = %path, "Skipping binary file"),
        }
    }

    info!(fragments = fragments.len(), git_ref = %git_ref, "Loaded repository");
    Ok(fragments)
}

/// Configured ref, or the project's default branch
async fn resolve_ref(api: &GitlabApi, identifier: &Identifier) -> crate::client::Result<CompactString> {
    if let Some(git_ref) = &api.config().git_ref {
        return Ok(git_ref.clone());
    }

    let project = api.get_project(identifier).await?;
    project.default_branch.ok_or_else(|| {
        ClientError::not_found(format_compact!(
            "default branch of {} (empty repository)",
            project.path_with_namespace
        ))
    })
}

/// UTF-8 without NUL bytes counts as text; everything else is binary
pub fn decode_text(bytes: Vec<u8>) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }

    String::from_utf8(bytes).ok()
}
