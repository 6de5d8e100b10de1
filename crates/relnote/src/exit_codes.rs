//! Exit codes for the CLI

use relnote_core::error::{ConfigError, GitError, RangeError, TrackerError};
use relnote_core::RelnoteError;

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Git or tracker error
pub const SOURCE_ERROR: u8 = 3;

/// Version or range error
pub const VERSION_ERROR: u8 = 4;

/// Pick the exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<RelnoteError>() {
        return match err {
            RelnoteError::Config(_) => CONFIG_ERROR,
            RelnoteError::Git(_) | RelnoteError::Tracker(_) => SOURCE_ERROR,
            RelnoteError::Range(_) => VERSION_ERROR,
            RelnoteError::Changelog(_) | RelnoteError::Io(_) | RelnoteError::Other(_) => ERROR,
        };
    }

    if err.downcast_ref::<ConfigError>().is_some() {
        CONFIG_ERROR
    } else if err.downcast_ref::<GitError>().is_some() || err.downcast_ref::<TrackerError>().is_some()
    {
        SOURCE_ERROR
    } else if err.downcast_ref::<RangeError>().is_some() {
        VERSION_ERROR
    } else {
        ERROR
    }
}
