//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FramesightError, FramesightResult};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FRAMESIGHT_CONFIG";

/// Largest accepted composition grid (G×G cells).
pub const MAX_GRID_SIZE: usize = 64;

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Analyzer parameters and detection thresholds.
    pub analysis: AnalysisConfig,

    /// Result cache behavior.
    pub cache: CacheConfig,

    /// Optional insight generation.
    pub insight: InsightConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Analyzer parameters.
///
/// Thresholds follow the scales the analyzers work in: luminance-based
/// thresholds are on a 0–255 scale, densities are fractions unless the
/// field name says percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Composition grid size (G×G cells).
    pub grid_size: usize,

    /// Sample every Kth pixel when counting colors.
    pub color_sample_stride: usize,

    /// Frames with fewer than `stride * min_color_samples` pixels are
    /// sampled more densely so tiny images still yield a palette.
    pub min_color_samples: usize,

    /// Pixels with alpha at or below this value are ignored by the palette.
    pub alpha_threshold: u8,

    /// Number of palette entries reported.
    pub palette_size: usize,

    /// Sobel magnitude above which a pixel counts as an edge.
    pub edge_magnitude_threshold: f64,

    /// Edge density (percent) above which shapes are reported.
    pub shape_density_threshold_pct: f64,

    /// Local contrast above which a pixel counts as high contrast.
    pub text_contrast_threshold: f64,

    /// Fraction of high-contrast pixels above which text is reported.
    pub text_density_threshold: f64,

    /// Divisor applied to the mean local variance before clamping.
    pub blur_normalizer: f64,

    pub blur_threshold: f64,
    pub noise_threshold: f64,
    pub vignette_threshold: f64,

    /// Run the analyzer families on separate blocking tasks.
    pub parallel: bool,
}

/// How cache keys are derived from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// Hash of the whole buffer and its dimensions. Identical frames share a key.
    #[default]
    Content,
    /// Hash of the first bytes combined with the frame timestamp. Every
    /// capture gets its own key, which forces fresh insights per frame.
    ContentAndTimestamp,
}

/// Result cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub key_mode: CacheKeyMode,
}

/// Insight generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Whether a configured generator is consulted at all.
    pub enabled: bool,

    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,

    /// Retries after the first attempt. Values above 1 are treated as 1.
    pub max_retries: u32,

    /// Delay before the retry, in milliseconds.
    pub retry_backoff_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "framesight_engine=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            color_sample_stride: 10,
            min_color_samples: 256,
            alpha_threshold: 128,
            palette_size: 8,
            edge_magnitude_threshold: 100.0,
            shape_density_threshold_pct: 30.0,
            text_contrast_threshold: 100.0,
            text_density_threshold: 0.05,
            blur_normalizer: 1000.0,
            blur_threshold: 0.7,
            noise_threshold: 0.1,
            vignette_threshold: 0.3,
            parallel: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_mode: CacheKeyMode::Content,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 8_000,
            max_retries: 1,
            retry_backoff_ms: 250,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl InsightConfig {
    /// Retries actually performed; the insight call is retried at most once.
    pub fn effective_retries(&self) -> u32 {
        self.max_retries.min(1)
    }
}

impl AnalysisConfig {
    /// Reject parameters that would make an analyzer meaningless.
    pub fn validate(&self) -> FramesightResult<()> {
        if self.grid_size == 0 {
            return Err(FramesightError::config("grid_size must be at least 1"));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(FramesightError::config(format!(
                "grid_size must be at most {MAX_GRID_SIZE} (got {})",
                self.grid_size
            )));
        }
        if self.color_sample_stride == 0 {
            return Err(FramesightError::config(
                "color_sample_stride must be at least 1",
            ));
        }
        if self.palette_size == 0 {
            return Err(FramesightError::config("palette_size must be at least 1"));
        }

        let thresholds = [
            ("edge_magnitude_threshold", self.edge_magnitude_threshold),
            ("shape_density_threshold_pct", self.shape_density_threshold_pct),
            ("text_contrast_threshold", self.text_contrast_threshold),
            ("text_density_threshold", self.text_density_threshold),
            ("blur_threshold", self.blur_threshold),
            ("noise_threshold", self.noise_threshold),
            ("vignette_threshold", self.vignette_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(FramesightError::config(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !self.blur_normalizer.is_finite() || self.blur_normalizer <= 0.0 {
            return Err(FramesightError::config("blur_normalizer must be positive"));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load config from `$FRAMESIGHT_CONFIG` or the standard location,
    /// falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], a
    /// missing or unparsable file is an error.
    pub fn load_from(path: impl AsRef<Path>) -> FramesightResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FramesightError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> FramesightResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FramesightResult<()> {
        self.save_to(config_file_path())
    }

    pub fn validate(&self) -> FramesightResult<()> {
        self.analysis.validate()
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("framesight").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.grid_size, 3);
        assert_eq!(config.analysis.color_sample_stride, 10);
        assert_eq!(config.analysis.alpha_threshold, 128);
        assert_eq!(config.analysis.palette_size, 8);
        assert_eq!(config.cache.key_mode, CacheKeyMode::Content);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let raw = r#"{ "analysis": { "grid_size": 5 }, "cache": { "key_mode": "content_and_timestamp" } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.analysis.grid_size, 5);
        assert_eq!(config.analysis.color_sample_stride, 10);
        assert_eq!(config.cache.key_mode, CacheKeyMode::ContentAndTimestamp);
        assert!(config.cache.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn validation_rejects_degenerate_parameters() {
        let mut config = AppConfig::default();
        config.analysis.grid_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.noise_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.blur_normalizer = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn grid_size_is_bounded_above() {
        let mut config = AppConfig::default();
        config.analysis.grid_size = MAX_GRID_SIZE;
        assert!(config.validate().is_ok());

        config.analysis.grid_size = MAX_GRID_SIZE + 1;
        assert!(matches!(config.validate(), Err(FramesightError::Config { .. })));

        config.analysis.grid_size = 1 << 33;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("grid_size must be at most 64"));
    }

    #[test]
    fn insight_retries_are_capped_at_one() {
        let config = InsightConfig {
            max_retries: 5,
            ..Default::default()
        };
        assert_eq!(config.effective_retries(), 1);

        let config = InsightConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_retries(), 0);
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("framesight-config-{}", std::process::id()));
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.analysis.grid_size = 4;
        config.insight.enabled = false;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_from_missing_file_is_an_error() {
        let err = AppConfig::load_from("/nonexistent/framesight/config.json").unwrap_err();
        assert!(matches!(err, FramesightError::FileNotFound { .. }));
    }
}
