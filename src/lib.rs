//! Load GitLab repositories and issues as prompt fragments.
//!
//! ```no_run
//! # async fn run() -> gitlab_fragments::result::Result<()> {
//! use gitlab_fragments::{build_repository_fragments, identifier, ClientConfig};
//!
//! let id = identifier::parse("gitlab.com:group/project")?;
//! let fragments = build_repository_fragments(&id, &ClientConfig::from_env()).await?;
//! for fragment in fragments {
//!     println!("{}: {} bytes", fragment.source, fragment.content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod fragments;
pub mod identifier;
pub mod loader;
pub mod logging;
pub mod result;

pub use client::{ClientConfig, ClientError};
pub use domain::Fragment;
pub use fragments::{build_issue_fragments, build_repository_fragments};
pub use identifier::Identifier;
pub use loader::Loader;
