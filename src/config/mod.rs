mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Get the config directory path (~/.config/pr-pulse/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("pr-pulse")
}

/// Get the default config file path (~/.config/pr-pulse/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file.
///
/// A missing file is not an error: every setting has a CLI flag, so the
/// tool works with no config at all.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Parse the configured cache TTL, defaulting to 5 minutes.
pub fn cache_ttl(config: &Config) -> Result<Duration> {
    match &config.cache_ttl {
        Some(s) => humantime::parse_duration(s)
            .with_context(|| format!("Invalid cache_ttl '{}' (try e.g. \"5m\" or \"90s\")", s)),
        None => Ok(Duration::from_secs(300)),
    }
}
