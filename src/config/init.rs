use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config};
use crate::github::StateFilter;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!("pr-pulse configuration");
    println!();

    // 1. Subject user (required)
    let username = loop {
        let u = prompt("GitHub username to aggregate pull requests for: ")?;
        if !u.is_empty() {
            break u;
        }
        println!("  A username is required.");
    };

    // 2. Optional repository scope
    let repo = {
        let r = prompt("Limit to one repository, as owner/repo (leave empty for all): ")?;
        if r.is_empty() {
            None
        } else if r.split('/').filter(|s| !s.is_empty()).count() == 2 {
            Some(r)
        } else {
            println!("  '{}' is not owner/repo; skipping the repository scope.", r);
            None
        }
    };

    // 3. Default state filter for listings
    let state = loop {
        let s = prompt_with_default("Default state filter (all/open/closed)", "all")?;
        match s.parse::<StateFilter>() {
            Ok(state) => break state,
            Err(e) => println!("  {}", e),
        }
    };

    // 4. Cache TTL
    let cache_ttl = loop {
        let ttl = prompt_with_default("Response cache TTL", "5m")?;
        match humantime::parse_duration(&ttl) {
            Ok(_) => break ttl,
            Err(_) => println!("  '{}' is not a duration (try \"5m\" or \"90s\").", ttl),
        }
    };

    // 5. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 6. Write config
    let config = Config {
        username: Some(username),
        repo,
        state: Some(state),
        cache_ttl: Some(cache_ttl),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open config file at {}", config_path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `pr-pulse stats` to get started.");

    Ok(())
}
