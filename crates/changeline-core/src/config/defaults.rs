//! Default configuration values

/// Default configuration file name
pub const DEFAULT_CONFIG_TOML: &str = "changeline.toml";

/// Alternative (hidden) configuration file name
pub const ALT_CONFIG_TOML: &str = ".changeline.toml";

/// Changesets configuration file, relative to the project root
pub const CHANGESET_CONFIG_JSON: &str = ".changeset/config.json";

/// Get list of config file names to search for, in priority order
pub fn config_file_names() -> Vec<&'static str> {
    vec![DEFAULT_CONFIG_TOML, ALT_CONFIG_TOML, CHANGESET_CONFIG_JSON]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Changeline Configuration

# Repository used to resolve pull request, commit and author links
repo = "org/repo"
"#;
