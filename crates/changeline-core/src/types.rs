//! Core types for Changeline

use serde::{Deserialize, Serialize};

/// Type of version bump a changeset requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Major version bump (breaking changes)
    Major,
    /// Minor version bump (new features)
    Minor,
    /// Patch version bump (bug fixes)
    #[default]
    Patch,
    /// No version bump
    None,
}

impl ReleaseType {
    /// Returns the string representation of the release type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "none" => Ok(Self::None),
            _ => Err(format!("Unknown release type: {}", s)),
        }
    }
}

/// A pending change awaiting inclusion in a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Identifier assigned by the host tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-text summary, possibly containing `pr:` / `commit:` directives
    pub summary: String,
    /// Commit that introduced the changeset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl Changeset {
    /// Create a changeset with a summary and no commit
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            id: None,
            summary: summary.into(),
            commit: None,
        }
    }

    /// Set the commit
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }
}

/// A dependency whose version was bumped as part of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyUpdate {
    /// Package name
    pub name: String,
    /// Version the dependency was bumped to
    pub new_version: String,
}

impl DependencyUpdate {
    /// Create a new dependency update
    pub fn new(name: impl Into<String>, new_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            new_version: new_version.into(),
        }
    }
}

/// Markdown links resolved for a change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    /// Link to the pull request, e.g. `[#42](https://github.com/o/r/pull/42)`
    pub pull: Option<String>,
    /// Link to the commit, e.g. ``[`abc1234`](https://github.com/o/r/commit/abc1234...)``
    pub commit: Option<String>,
    /// Link to the author, e.g. `[@octocat](https://github.com/octocat)`
    pub user: Option<String>,
}

impl LinkSet {
    /// A link set with nothing resolved
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_type_from_str() {
        assert_eq!("major".parse::<ReleaseType>().unwrap(), ReleaseType::Major);
        assert_eq!("PATCH".parse::<ReleaseType>().unwrap(), ReleaseType::Patch);
        assert_eq!("none".parse::<ReleaseType>().unwrap(), ReleaseType::None);
        assert!("prerelease".parse::<ReleaseType>().is_err());
    }

    #[test]
    fn test_changeset_deserialize_without_commit() {
        let cs: Changeset = serde_json::from_str(r#"{"summary": "Fix bug"}"#).unwrap();
        assert_eq!(cs.summary, "Fix bug");
        assert!(cs.commit.is_none());
        assert!(cs.id.is_none());
    }

    #[test]
    fn test_dependency_update_uses_camel_case() {
        let dep: DependencyUpdate =
            serde_json::from_str(r#"{"name": "pkg-a", "newVersion": "1.2.0"}"#).unwrap();
        assert_eq!(dep, DependencyUpdate::new("pkg-a", "1.2.0"));
    }

    #[test]
    fn test_link_set_empty() {
        let links = LinkSet::empty();
        assert!(links.pull.is_none());
        assert!(links.commit.is_none());
        assert!(links.user.is_none());
    }
}
