//! Error types for the few fallible engine entry points.
//!
//! Editing itself never fails (bad keys and unmatched objects are silent
//! no-ops). Only loading [`Options`](crate::options::Options) can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate engine options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Options`](crate::options::Options).
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but its value is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
