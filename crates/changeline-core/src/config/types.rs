//! Configuration types

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options recognised by the changelog formatter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    /// Hosting repository in `owner/name` form
    pub repo: Option<String>,
}

impl FormatterOptions {
    /// Create options for a repository
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: Some(repo.into()),
        }
    }

    /// Get the configured repository or fail with the usage hint
    pub fn require_repo(&self) -> Result<&str, ConfigError> {
        match self.repo.as_deref() {
            Some(repo) if !repo.is_empty() => Ok(repo),
            _ => Err(ConfigError::MissingRepo),
        }
    }
}
