//! Changeline Core - Shared types for changelog line formatting
//!
//! This crate provides the foundational types, error handling, configuration
//! and the repository metadata lookup capability used by the formatter.

pub mod config;
pub mod error;
pub mod lookup;
pub mod types;

pub use config::FormatterOptions;
pub use error::{ChangelineError, ConfigError, LookupError, Result};
pub use lookup::{CommitInfoRequest, PullRequestInfoRequest, RepoInfo, RepoInfoLookup};
pub use types::{Changeset, DependencyUpdate, LinkSet, ReleaseType};
