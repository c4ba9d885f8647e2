//! Configuration loading

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ChangelineError, ConfigError, Result};

use super::defaults::config_file_names;
use super::types::FormatterOptions;
use super::validation::validate_options;

/// Load formatter options from a file
///
/// `.json` files are read as a changesets `config.json`, where the options
/// are the second element of the `changelog` tuple. Anything else is TOML.
pub fn load_config(path: &Path) -> Result<FormatterOptions> {
    let format = if path.extension().is_some_and(|e| e == "json") {
        "JSON"
    } else {
        "TOML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let options = if format == "JSON" {
        let value: Value = serde_json::from_str(&content).map_err(ConfigError::JsonError)?;
        options_from_changeset_config(&value)?
    } else {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    };

    validate_options(&options)?;
    debug!(path = %path.display(), repo = ?options.repo, "config loaded and validated");
    Ok(options)
}

/// Extract formatter options from a parsed changesets `config.json`
///
/// Expects `"changelog": ["<generator>", { "repo": "org/repo" }]`. A bare
/// generator string or `false` yields options without a repository.
pub fn options_from_changeset_config(value: &Value) -> Result<FormatterOptions> {
    let Some(entry) = value.get("changelog") else {
        return Ok(FormatterOptions::default());
    };

    match entry {
        Value::Array(items) => match items.get(1) {
            Some(opts @ Value::Object(_)) => {
                serde_json::from_value(opts.clone()).map_err(|e| {
                    ConfigError::ParseError(format!("invalid changelog options: {}", e)).into()
                })
            }
            Some(Value::Null) | None => Ok(FormatterOptions::default()),
            Some(other) => Err(ConfigError::InvalidValue {
                field: "changelog[1]".to_string(),
                message: format!("expected an options object, got {}", other),
            }
            .into()),
        },
        Value::String(_) | Value::Bool(false) | Value::Null => Ok(FormatterOptions::default()),
        other => Err(ConfigError::InvalidValue {
            field: "changelog".to_string(),
            message: format!("expected a generator tuple, got {}", other),
        }
        .into()),
    }
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the candidates of [`config_file_names`] are
/// checked in order. The first match wins. Parents are walked until the
/// filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(FormatterOptions, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let options = load_config(&config_path)?;
    Ok((options, config_path))
}

/// Load configuration or use defaults when no config file exists
///
/// A config file that exists but fails to load is an error.
pub fn load_config_or_default(dir: &Path) -> Result<(FormatterOptions, Option<PathBuf>)> {
    match load_config_from_dir(dir) {
        Ok((options, path)) => Ok((options, Some(path))),
        Err(ChangelineError::Config(ConfigError::NotFound(_))) => {
            warn!(dir = %dir.display(), "no config file found, using defaults");
            Ok((FormatterOptions::default(), None))
        }
        Err(e) => Err(e),
    }
}
