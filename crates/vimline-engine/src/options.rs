//! Engine options.
//!
//! A small, fixed set of knobs, loadable from TOML. Every key is optional
//! and falls back to the Vim-like default:
//!
//! | Key                   | Type    | Default | Effect                                |
//! |-----------------------|---------|---------|---------------------------------------|
//! | `history_capacity`    | integer | 100     | Undo entries kept (oldest dropped)    |
//! | `ignore_case`         | bool    | true    | Case-insensitive `/`, `?`, `*`, `#`   |
//! | `wrap_scan`           | bool    | true    | Searches wrap around the buffer end   |
//! | `normal_cursor_width` | integer | 1       | Block cursor width factor (cells)     |
//! | `insert_cursor_width` | integer | 0       | Insert cursor width (0 = thin bar)    |

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default number of undo entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Engine options. See the module docs for the TOML keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub history_capacity: usize,
    pub ignore_case: bool,
    pub wrap_scan: bool,
    pub normal_cursor_width: u16,
    pub insert_cursor_width: u16,
}

impl Options {
    /// The defaults listed in the module docs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            ignore_case: true,
            wrap_scan: true,
            normal_cursor_width: 1,
            insert_cursor_width: 0,
        }
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// and [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(src)?;
        options.validate()?;
        Ok(options)
    }

    /// Read and parse a TOML options file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history_capacity",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.history_capacity, 100);
        assert!(o.ignore_case);
        assert!(o.wrap_scan);
        assert_eq!(o.normal_cursor_width, 1);
        assert_eq!(o.insert_cursor_width, 0);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Options::from_toml_str("").unwrap(), Options::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let o = Options::from_toml_str("ignore_case = false\nhistory_capacity = 5\n").unwrap();
        assert!(!o.ignore_case);
        assert_eq!(o.history_capacity, 5);
        assert!(o.wrap_scan);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Options::from_toml_str("tabstop = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = Options::from_toml_str("history_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "history_capacity",
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "invalid value for `history_capacity`: must be at least 1"
        );
    }

    #[test]
    fn missing_file() {
        let err = Options::load(Path::new("/nonexistent/vimline.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
