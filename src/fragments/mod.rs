//! Fragment builders
//!
//! Each call constructs its own [`GitlabApi`] for the identifier's host,
//! performs every request sequentially and drops the client on return.

pub mod issue;
pub mod repository;


use crate::{
    client::{ClientConfig, GitlabApi},
    domain::Fragment,
    identifier::Identifier,
    result::{FragmentError, Result},
};

/// One fragment per text file of the repository named by `identifier`
pub async fn build_repository_fragments(
    identifier: &Identifier,
    config: &ClientConfig,
) -> Result<Vec<Fragment>> {
    if identifier.is_issue() {
        return Err(FragmentError::invalid_identifier(
            identifier.to_string(),
            "expected a repository, not an issue",
        ));
    }

    let api = GitlabApi::new(&identifier.host, config.clone())?;
    Ok(repository::build(&api, identifier).await?)
}

/// A single fragment holding the issue named by `identifier` and its notes
pub async fn build_issue_fragments(
    identifier: &Identifier,
    config: &ClientConfig,
) -> Result<Vec<Fragment>> {
    if !identifier.is_issue() {
        return Err(FragmentError::invalid_identifier(
            identifier.to_string(),
            "expected an issue number",
        ));
    }

    let api = GitlabApi::new(&identifier.host, config.clone())?;
    Ok(issue::build(&api, identifier).await?)
}
