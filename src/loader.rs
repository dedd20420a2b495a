//! Named loaders, as registered with a fragment host
//!
//! References look like `gitlab:host:group/project` or
//! `gitlab-issue:host:group/project/issue/7`. The loader prefix is stripped
//! here and the remainder handed to [`identifier::parse`].

use std::{fmt, str::FromStr};

use crate::{
    client::ClientConfig,
    domain::Fragment,
    fragments::{build_issue_fragments, build_repository_fragments},
    identifier,
    result::{FragmentError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    /// Every text file of a repository
    Repository,
    /// One issue with its discussion
    Issue,
}

impl Loader {
    pub const ALL: [Loader; 2] = [Loader::Repository, Loader::Issue];

    pub fn name(self) -> &'static str {
        match self {
            Loader::Repository => "gitlab",
            Loader::Issue => "gitlab-issue",
        }
    }

    /// Run this loader against an identifier without loader prefix
    pub async fn load(self, argument: &str, config: &ClientConfig) -> Result<Vec<Fragment>> {
        let identifier = identifier::parse(argument)?;

        match self {
            Loader::Repository => build_repository_fragments(&identifier, config).await,
            Loader::Issue => build_issue_fragments(&identifier, config).await,
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Loader {
    type Err = FragmentError;

    fn from_str(s: &str) -> Result<Self> {
        Loader::ALL
            .into_iter()
            .find(|loader| loader.name() == s)
            .ok_or_else(|| FragmentError::invalid_identifier(s, "unknown loader"))
    }
}

/// Split `loader:argument`
///
/// Without a known prefix the loader is chosen from the argument itself:
/// identifiers naming an issue go to the issue loader.
pub fn split_reference(reference: &str) -> Result<(Loader, &str)> {
    if let Some((prefix, argument)) = reference.split_once(':') {
        if let Ok(loader) = prefix.parse::<Loader>() {
            return Ok((loader, argument));
        }
    }

    let identifier = identifier::parse(reference)?;
    let loader = if identifier.is_issue() { Loader::Issue } else { Loader::Repository };
    Ok((loader, reference))
}
