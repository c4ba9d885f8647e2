//! Summary directive parsing
//!
//! A changeset summary may carry lines overriding link resolution:
//!
//! ```text
//! Fix race in the job spawner
//! pr: #1234
//! commit: 4f1c2d9e0a
//! ```
//!
//! `pr:`, `pull:` and `pull request:` name a pull request; `commit:` names a
//! commit. Matching is case-insensitive and only the first occurrence of each
//! directive counts. Both directives are located on the original summary, so
//! stripping one never changes whether the other is found.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Regex for the pull request directive
static PULL_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:pr|pull|pull\s+request):\s*#?([0-9]+)").expect("Invalid regex")
});

/// Regex for the commit directive
static COMMIT_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*commit:\s*(\S+)").expect("Invalid regex"));

/// A changeset summary with its directives extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Pull request number from a `pr:` directive
    pub pull: Option<u64>,
    /// Commit from a `commit:` directive
    pub commit: Option<String>,
    /// Summary text with directive lines removed and trimmed
    pub body: String,
}

impl ParsedSummary {
    /// First line of the remaining text
    pub fn first_line(&self) -> &str {
        self.lines().next().unwrap_or_default()
    }

    /// Lines after the first
    pub fn continuation_lines(&self) -> impl Iterator<Item = &str> {
        self.lines().skip(1)
    }

    /// All lines of the remaining text, trailing whitespace removed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.split('\n').map(str::trim_end)
    }
}

/// Extract `pr:` and `commit:` directives from a summary
///
/// A pull request number too large for `u64` is dropped silently; its line is
/// still removed from the text.
pub fn parse_summary(summary: &str) -> ParsedSummary {
    let mut stripped: Vec<Range<usize>> = Vec::with_capacity(2);

    let pull = PULL_DIRECTIVE.captures(summary).and_then(|caps| {
        stripped.push(caps.get(0)?.range());
        caps.get(1)?.as_str().parse::<u64>().ok()
    });

    let commit = COMMIT_DIRECTIVE.captures(summary).and_then(|caps| {
        stripped.push(caps.get(0)?.range());
        Some(caps.get(1)?.as_str().to_string())
    });

    let body = remove_ranges(summary, stripped).trim().to_string();

    ParsedSummary { pull, commit, body }
}

/// Remove byte ranges from text, merging any that overlap
fn remove_ranges(text: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            output.push_str(&text[cursor..range.start]);
        }
        cursor = cursor.max(range.end);
    }
    output.push_str(&text[cursor..]);
    output
}
