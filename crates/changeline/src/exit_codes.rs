//! Exit codes for the CLI

use changeline_core::ChangelineError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Repository metadata lookup error
pub const LOOKUP_ERROR: i32 = 3;

/// Pick the exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ChangelineError>() {
        Some(e) if e.is_config() => CONFIG_ERROR,
        Some(e) if e.is_lookup() => LOOKUP_ERROR,
        _ => ERROR,
    }
}
