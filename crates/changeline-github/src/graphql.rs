//! GraphQL queries and response shapes

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Query resolving a commit and the pull requests that contain it
pub const COMMIT_QUERY: &str = r#"query($owner: String!, $name: String!, $expression: String!) {
  repository(owner: $owner, name: $name) {
    object(expression: $expression) {
      ... on Commit {
        commitUrl
        associatedPullRequests(first: 50) {
          nodes {
            number
            url
            mergedAt
            author {
              login
              url
            }
          }
        }
        author {
          user {
            login
            url
          }
        }
      }
    }
  }
}"#;

/// Query resolving a pull request and its merge commit
pub const PULL_REQUEST_QUERY: &str = r#"query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      author {
        login
        url
      }
      mergeCommit {
        commitUrl
        abbreviatedOid
      }
    }
  }
}"#;

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single GraphQL error
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl GraphQlError {
    /// Check whether the error reports a missing object
    pub fn is_not_found(&self) -> bool {
        self.kind.as_deref() == Some("NOT_FOUND")
    }
}

/// `{ repository: ... }`
#[derive(Debug, Deserialize)]
pub struct RepositoryData<T> {
    pub repository: Option<T>,
}

/// Repository node for [`COMMIT_QUERY`]
#[derive(Debug, Deserialize)]
pub struct CommitRepository {
    pub object: Option<CommitObject>,
}

/// Commit object; all fields are absent when the expression names a non-commit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitObject {
    pub commit_url: Option<String>,
    pub associated_pull_requests: Option<Connection<AssociatedPullRequest>>,
    pub author: Option<GitActor>,
}

/// GraphQL connection with nodes only
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

/// Pull request associated with a commit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedPullRequest {
    pub number: u64,
    pub url: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub author: Option<Actor>,
}

/// Git author of a commit, linked to a user when GitHub can match it
#[derive(Debug, Deserialize)]
pub struct GitActor {
    pub user: Option<Actor>,
}

/// A GitHub account
#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
    pub url: String,
}

/// Repository node for [`PULL_REQUEST_QUERY`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRepository {
    pub pull_request: Option<PullRequestObject>,
}

/// Pull request with its merge commit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestObject {
    pub author: Option<Actor>,
    pub merge_commit: Option<MergeCommit>,
}

/// Merge commit of a pull request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCommit {
    pub commit_url: String,
    pub abbreviated_oid: String,
}

/// Pick the pull request that merged first
///
/// Unmerged pull requests sort after merged ones; ties keep query order.
pub fn earliest_merged(nodes: &[AssociatedPullRequest]) -> Option<&AssociatedPullRequest> {
    nodes
        .iter()
        .enumerate()
        .min_by_key(|(index, pr)| (pr.merged_at.is_none(), pr.merged_at, *index))
        .map(|(_, pr)| pr)
}
