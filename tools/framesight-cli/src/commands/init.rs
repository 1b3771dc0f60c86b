//! Write a default configuration file.

use std::path::PathBuf;

use framesight_common::config::{config_file_path, AppConfig};

pub fn run(output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(config_file_path);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default()
        .save_to(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Wrote default configuration to {}", path.display());
    println!("  Edit analysis thresholds under \"analysis\"");
    println!("  Switch cache keys with \"cache.key_mode\" (content | content_and_timestamp)");

    Ok(())
}
