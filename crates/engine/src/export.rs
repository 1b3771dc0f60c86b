//! JSON export of analysis results and cache snapshots.

use std::path::Path;

use framesight_common::error::{FramesightError, FramesightResult};
use framesight_frame_model::AnalysisResult;

use crate::cache::CacheEntry;

/// Pretty JSON for one result.
pub fn to_json(result: &AnalysisResult) -> FramesightResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write one result as pretty JSON, creating parent directories.
pub fn export_result(result: &AnalysisResult, path: &Path) -> FramesightResult<()> {
    write_json(path, &to_json(result)?)?;
    tracing::info!(path = %path.display(), key = %result.cache_key, "Exported analysis result");
    Ok(())
}

/// Write every cache entry, oldest first, as a pretty JSON array.
pub fn export_cache(entries: &[CacheEntry], path: &Path) -> FramesightResult<()> {
    let json = serde_json::to_string_pretty(entries)?;
    write_json(path, &json)?;
    tracing::info!(path = %path.display(), entries = entries.len(), "Exported result cache");
    Ok(())
}

/// `analysis-<key>-<timestamp>.json`, safe to use as a file name.
pub fn default_export_file_name(result: &AnalysisResult) -> String {
    let key: String = result
        .cache_key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!(
        "analysis-{}-{}.json",
        key,
        result.timestamp.format("%Y%m%dT%H%M%S%.3fZ")
    )
}

fn write_json(path: &Path, json: &str) -> FramesightResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            FramesightError::export(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, json)
        .map_err(|e| FramesightError::export(format!("cannot write {}: {e}", path.display())))
}
