//! Path management for threadline configuration files.
//!
//! ```text
//! ~/.config/threadline/        # Config directory (platform default)
//! └── config.toml              # Timeline configuration
//! ```

use std::path::PathBuf;
use threadline_core::error::{Result, ThreadlineError};

const APP_DIR: &str = "threadline";
const CONFIG_FILE: &str = "config.toml";

pub struct ThreadlinePaths;

impl ThreadlinePaths {
    /// Returns the threadline configuration directory (e.g. `~/.config/threadline/`).
    ///
    /// # Errors
    ///
    /// Returns `ThreadlineError::Config` when the platform has no config directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ThreadlineError::config("Cannot find config directory"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        if let (Ok(dir), Ok(file)) = (ThreadlinePaths::config_dir(), ThreadlinePaths::config_file()) {
            assert!(dir.ends_with("threadline"));
            assert_eq!(file.parent(), Some(dir.as_path()));
            assert!(file.ends_with("config.toml"));
        }
    }
}
