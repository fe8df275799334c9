use anyhow::Result;
use std::path::Path;
use threadline_core::config::TimelineConfig;
use threadline_infrastructure::ConfigService;

fn service(config_path: Option<&Path>) -> ConfigService {
    match config_path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    }
}

/// Prints the effective configuration as TOML.
pub fn show(config_path: Option<&Path>) -> Result<()> {
    let service = service(config_path);
    let config = service.get_config()?;

    println!("# {}", service.config_path()?.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Writes a config file with default values unless one already exists.
pub fn init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let service = service(config_path);
    let path = service.config_path()?;

    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    let written = service.save_config(&TimelineConfig::default())?;
    println!("Wrote default config to {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_keeps_existing_file_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "context_tokens = 4096\n").unwrap();

        init(Some(&path), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "context_tokens = 4096\n");

        init(Some(&path), true).unwrap();
        let config = ConfigService::with_path(&path).get_config().unwrap();
        assert_eq!(config, TimelineConfig::default());
    }

    #[test]
    fn test_show_reads_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "show_system_messages = true\n").unwrap();

        show(Some(&path)).unwrap();
    }
}
