//! Markdown changelog line formatter

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

use changeline_core::{
    Changeset, CommitInfoRequest, DependencyUpdate, FormatterOptions, LinkSet,
    PullRequestInfoRequest, ReleaseType, RepoInfoLookup, Result,
};

use super::ChangelogFormatter;
use crate::directives::{parse_summary, ParsedSummary};

/// Base URL for hand-built commit links
const GITHUB_WEB_BASE: &str = "https://github.com";

/// Markdown changelog line formatter
///
/// Resolves pull request and commit links through a [`RepoInfoLookup`] and
/// renders them in front of the changeset summary.
pub struct MarkdownFormatter<L> {
    lookup: L,
}

impl<L: RepoInfoLookup> MarkdownFormatter<L> {
    /// Create a formatter backed by a lookup
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Access the underlying lookup
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve links for a changeset.
    ///
    /// A `pr:` directive wins; a `commit:` directive alongside it replaces the
    /// commit link with one pointing at the given hash. Otherwise the directive
    /// commit, then the changeset's own commit, is looked up.
    async fn resolve_links(
        &self,
        repo: &str,
        summary: &ParsedSummary,
        changeset_commit: Option<&str>,
    ) -> Result<LinkSet> {
        if let Some(pull) = summary.pull {
            debug!(pull, "resolving links from pull request");
            let info = self
                .lookup
                .get_info_from_pull_request(PullRequestInfoRequest::new(repo, pull))
                .await?;
            let mut links = info.links;
            if let Some(commit) = &summary.commit {
                links.commit = Some(commit_link(repo, commit));
            }
            return Ok(links);
        }

        let commit = summary
            .commit
            .as_deref()
            .or(changeset_commit)
            .filter(|c| !c.is_empty());

        match commit {
            Some(commit) => {
                debug!(commit, "resolving links from commit");
                let info = self
                    .lookup
                    .get_info(CommitInfoRequest::new(repo, commit))
                    .await?;
                Ok(info.links)
            }
            None => Ok(LinkSet::empty()),
        }
    }
}

#[async_trait]
impl<L: RepoInfoLookup> ChangelogFormatter for MarkdownFormatter<L> {
    #[instrument(skip_all, fields(changeset = ?changeset.id, release_type = %_release_type))]
    async fn get_release_line(
        &self,
        changeset: &Changeset,
        _release_type: ReleaseType,
        options: &FormatterOptions,
    ) -> Result<String> {
        let repo = options.require_repo()?;

        let summary = parse_summary(&changeset.summary);
        let links = self
            .resolve_links(repo, &summary, changeset.commit.as_deref())
            .await?;

        let line = render_release_line(&summary, &links);
        debug!(output_len = line.len(), "release line formatted");
        Ok(line)
    }

    #[instrument(skip_all, fields(changesets = changesets.len(), dependencies = dependencies_updated.len()))]
    async fn get_dependency_release_line(
        &self,
        changesets: &[Changeset],
        dependencies_updated: &[DependencyUpdate],
        options: &FormatterOptions,
    ) -> Result<String> {
        if dependencies_updated.is_empty() {
            return Ok(String::new());
        }
        let repo = options.require_repo()?;

        let lookups = changesets
            .iter()
            .filter_map(|cs| cs.commit.as_deref().filter(|c| !c.is_empty()))
            .map(|commit| self.lookup.get_info(CommitInfoRequest::new(repo, commit)));
        let infos = try_join_all(lookups).await?;

        let commit_links: Vec<String> = infos
            .into_iter()
            .filter_map(|info| info.links.commit)
            .filter(|link| !link.is_empty())
            .collect();
        debug!(links = commit_links.len(), "resolved dependency commit links");

        let mut lines = Vec::with_capacity(dependencies_updated.len() + 1);
        lines.push(format!(
            "- Updated dependencies [{}]:",
            commit_links.join(", ")
        ));
        lines.extend(
            dependencies_updated
                .iter()
                .map(|dep| format!("  - {}@{}", dep.name, dep.new_version)),
        );

        Ok(lines.join("\n"))
    }
}

/// Build a commit link pointing at a literal hash
pub fn commit_link(repo: &str, commit: &str) -> String {
    let short: String = commit.chars().take(7).collect();
    format!("[`{}`]({}/{}/commit/{})", short, GITHUB_WEB_BASE, repo, commit)
}

/// Render a release line from a parsed summary and its links
fn render_release_line(summary: &ParsedSummary, links: &LinkSet) -> String {
    let mut prefix = String::new();
    for link in [&links.pull, &links.commit].into_iter().flatten() {
        prefix.push(' ');
        prefix.push_str(link);
    }

    let mut output = String::from("\n\n-");
    if !prefix.is_empty() {
        output.push_str(&prefix);
        output.push_str(" -");
    }
    output.push(' ');
    output.push_str(summary.first_line());
    output.push('\n');

    let continuation: Vec<String> = summary
        .continuation_lines()
        .map(|line| format!("  {}", line))
        .collect();
    output.push_str(&continuation.join("\n"));

    output
}
