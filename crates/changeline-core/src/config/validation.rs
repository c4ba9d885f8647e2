//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::lookup::split_repo;

use super::types::FormatterOptions;

/// Validate formatter options
///
/// A missing repository is accepted here; the formatter reports it when an
/// operation actually needs one.
pub fn validate_options(options: &FormatterOptions) -> Result<()> {
    debug!("validating formatter options");
    if let Some(repo) = &options.repo {
        if split_repo(repo).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "repo".to_string(),
                message: format!("'{}' must be in the form owner/name", repo),
            }
            .into());
        }
    }
    debug!("formatter options validation passed");
    Ok(())
}
