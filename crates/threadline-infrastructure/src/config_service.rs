//! Configuration service implementation.
//!
//! Loads the timeline configuration from `config.toml`, by default
//! `~/.config/threadline/config.toml`.

use crate::paths::ThreadlinePaths;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use threadline_core::config::TimelineConfig;
use threadline_core::error::{Result, ThreadlineError};

/// Configuration service that loads and caches the timeline configuration.
///
/// A missing or empty file yields the defaults. The loaded value is cached
/// until `invalidate_cache` is called.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; `None` means the platform default location.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<TimelineConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform default config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the default location.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// The file this service reads from and writes to.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => ThreadlinePaths::config_file(),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Returns `ThreadlineError::Io` if the file exists but cannot be read and
    /// `ThreadlineError::Serialization` if it is not valid TOML.
    pub fn get_config(&self) -> Result<TimelineConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = Self::load_config(&self.config_path()?)?;

        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }

    /// Writes `config` to the config file, creating its directory if needed.
    pub fn save_config(&self, config: &TimelineConfig) -> Result<PathBuf> {
        let path = self.config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ThreadlineError::Io {
                message: format!("Failed to create config directory at {:?}: {}", parent, e),
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&path, content).map_err(|e| ThreadlineError::Io {
            message: format!("Failed to write config file at {:?}: {}", path, e),
        })?;

        tracing::info!("[ConfigService] Saved config to {:?}", path);
        self.invalidate_cache();
        Ok(path)
    }

    fn load_config(path: &Path) -> Result<TimelineConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] No config at {:?}, using defaults", path);
            return Ok(TimelineConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ThreadlineError::Io {
            message: format!("Failed to read config file at {:?}: {}", path, e),
        })?;

        if content.trim().is_empty() {
            return Ok(TimelineConfig::default());
        }

        let config = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {:?}", path);
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        assert_eq!(service.get_config().unwrap(), TimelineConfig::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "  \n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap(), TimelineConfig::default());
    }

    #[test]
    fn test_loads_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "show_system_messages = true\n\n[diff]\nmax_length_ratio = 5\n",
        )
        .unwrap();

        let config = ConfigService::with_path(&path).get_config().unwrap();

        assert!(config.show_system_messages);
        assert_eq!(config.context_tokens, None);
        assert_eq!(config.diff.min_chars, 80);
        assert_eq!(config.diff.max_length_ratio, 5);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "show_system_messages = [").unwrap();

        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);

        assert!(!service.get_config().unwrap().show_system_messages);

        fs::write(&path, "show_system_messages = true\n").unwrap();
        assert!(!service.get_config().unwrap().show_system_messages);

        service.invalidate_cache();
        assert!(service.get_config().unwrap().show_system_messages);
    }

    #[test]
    fn test_save_creates_directory_and_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap().context_tokens, None);

        let config = TimelineConfig {
            context_tokens: Some(200_000),
            ..Default::default()
        };
        let written = service.save_config(&config).unwrap();

        assert_eq!(written, path);
        assert_eq!(service.get_config().unwrap(), config);
    }
}
