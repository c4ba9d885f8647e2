//! Repository metadata lookup
//!
//! The formatter never talks to a hosting service directly. It asks a
//! [`RepoInfoLookup`] for the links belonging to a commit or a pull request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::types::LinkSet;

/// Lookup keyed by commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitInfoRequest {
    /// Repository in `owner/name` form
    pub repo: String,
    /// Commit SHA (full or abbreviated)
    pub commit: String,
}

impl CommitInfoRequest {
    /// Create a new commit request
    pub fn new(repo: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            commit: commit.into(),
        }
    }
}

/// Lookup keyed by pull request number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestInfoRequest {
    /// Repository in `owner/name` form
    pub repo: String,
    /// Pull request number
    pub pull: u64,
}

impl PullRequestInfoRequest {
    /// Create a new pull request request
    pub fn new(repo: impl Into<String>, pull: u64) -> Self {
        Self {
            repo: repo.into(),
            pull,
        }
    }
}

/// Metadata resolved for a commit or pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    /// Login of the author, if known
    pub user: Option<String>,
    /// Associated pull request number, if any
    pub pull: Option<u64>,
    /// Associated commit SHA, if any
    pub commit: Option<String>,
    /// Ready-to-embed Markdown links
    pub links: LinkSet,
}

/// Capability for resolving changelog links from a hosting service
#[async_trait]
pub trait RepoInfoLookup: Send + Sync {
    /// Resolve links for a commit
    async fn get_info(&self, request: CommitInfoRequest) -> Result<RepoInfo, LookupError>;

    /// Resolve links for a pull request
    async fn get_info_from_pull_request(
        &self,
        request: PullRequestInfoRequest,
    ) -> Result<RepoInfo, LookupError>;
}

/// Split an `owner/name` repository identifier
///
/// Returns `None` unless there is exactly one `/` with non-empty parts on
/// both sides.
pub fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}
