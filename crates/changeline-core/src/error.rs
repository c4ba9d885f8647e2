//! Error types for Changeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ChangelineError
pub type Result<T> = std::result::Result<T, ChangelineError>;

/// Usage hint shown when the formatter is configured without a repository
pub const MISSING_REPO_HINT: &str = "Please provide a repo to this changelog generator like this:\n\"changelog\": [\"@changesets/changelog-github\", { \"repo\": \"org/repo\" }]";

/// Main error type for Changeline operations
#[derive(Debug, Error)]
pub enum ChangelineError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Repository metadata lookup errors
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No repository was configured for the formatter
    #[error("{}", MISSING_REPO_HINT)]
    MissingRepo,

    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a repository metadata lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// Repository identifier is not in `owner/name` form
    #[error("Please pass a valid GitHub repository in the form of userOrOrg/repoName to getInfo (got '{0}')")]
    InvalidRepo(String),

    /// Commit lookup requested without a commit
    #[error("Please pass a commit SHA to getInfo")]
    MissingCommit,

    /// No API token available
    #[error("Please create a GitHub personal access token at https://github.com/settings/tokens/new with `read:user` and `repo:status` permissions and add it as the GITHUB_TOKEN environment variable")]
    MissingToken,

    /// Authentication or authorization failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Requested commit or pull request does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the hosting service
    #[error("Rate limited by the hosting service")]
    RateLimited,

    /// API error from the hosting service
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),
}

impl ChangelineError {
    /// Check whether this error originates from configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check whether this error originates from a metadata lookup
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }
}
