//! Changelog line formatters

mod markdown;

pub use markdown::{commit_link, MarkdownFormatter};

use async_trait::async_trait;
use changeline_core::{Changeset, DependencyUpdate, FormatterOptions, ReleaseType, Result};

/// Trait for changelog line formatters
///
/// The host release tool calls one of these per changeset, and once per
/// package whose dependencies were bumped.
#[async_trait]
pub trait ChangelogFormatter: Send + Sync {
    /// Format the changelog line for a single changeset
    async fn get_release_line(
        &self,
        changeset: &Changeset,
        release_type: ReleaseType,
        options: &FormatterOptions,
    ) -> Result<String>;

    /// Format the "Updated dependencies" line for a package
    async fn get_dependency_release_line(
        &self,
        changesets: &[Changeset],
        dependencies_updated: &[DependencyUpdate],
        options: &FormatterOptions,
    ) -> Result<String>;
}
