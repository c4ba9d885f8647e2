//! Changeline Changelog - Changelog line generation for changesets
//!
//! This crate turns changeset summaries into Markdown changelog lines,
//! annotated with pull request and commit links.

pub mod directives;
pub mod formatter;

pub use directives::{parse_summary, ParsedSummary};
pub use formatter::{ChangelogFormatter, MarkdownFormatter};
