pub mod analyze;
pub mod config;
pub mod init;

use std::path::Path;

use framesight_common::config::AppConfig;

/// Explicit `--config` files must load; otherwise fall back to the
/// environment or standard location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}
