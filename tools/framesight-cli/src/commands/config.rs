//! Show the effective configuration.

use std::path::Path;

use framesight_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, explicit: Option<&Path>) -> anyhow::Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => {
            let path = config_file_path();
            if path.exists() {
                path.display().to_string()
            } else {
                format!("defaults ({} not found)", path.display())
            }
        }
    };

    println!("# source: {source}");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
