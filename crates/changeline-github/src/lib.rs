//! Changeline GitHub - Repository metadata lookup backed by GitHub
//!
//! Provides [`GitHubInfo`], a [`RepoInfoLookup`](changeline_core::RepoInfoLookup)
//! that resolves pull request, commit and author links through the GitHub
//! GraphQL API.
//!
//! ## Authentication
//!
//! Uses the `GITHUB_TOKEN` environment variable. The token needs `read:user`
//! and `repo:status` permissions.
//!
//! ## Usage
//!
//! ```ignore
//! use changeline_core::{CommitInfoRequest, RepoInfoLookup};
//! use changeline_github::GitHubInfo;
//!
//! let github = GitHubInfo::from_env();
//! let info = github.get_info(CommitInfoRequest::new("org/repo", "4f1c2d9")).await?;
//! println!("{:?}", info.links.pull);
//! ```

mod client;
pub mod graphql;

pub use client::{GitHubInfo, DEFAULT_GRAPHQL_URL, DEFAULT_SERVER_URL};
