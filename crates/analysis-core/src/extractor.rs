//! Feature extraction entry point.

use framesight_common::config::AnalysisConfig;
use framesight_common::error::FramesightResult;
use framesight_frame_model::{
    ColorFeatures, CompositionFeatures, EffectFeatures, ElementFeatures, FeatureSet, PixelBuffer,
};

use crate::{color, composition, effects, structure};

/// Runs the four analyzer families with one validated configuration.
///
/// Each family is exposed on its own so callers can schedule them
/// concurrently; [`FeatureExtractor::extract`] runs them in sequence.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: AnalysisConfig,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> FramesightResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn composition(&self, buffer: &PixelBuffer) -> CompositionFeatures {
        composition::analyze(buffer, self.config.grid_size)
    }

    pub fn colors(&self, buffer: &PixelBuffer) -> ColorFeatures {
        color::analyze(buffer, &self.config)
    }

    pub fn elements(&self, buffer: &PixelBuffer) -> ElementFeatures {
        structure::analyze(buffer, &self.config)
    }

    pub fn effects(&self, buffer: &PixelBuffer) -> EffectFeatures {
        effects::analyze(buffer, &self.config)
    }

    /// Compute every feature family sequentially.
    pub fn extract(&self, buffer: &PixelBuffer) -> FeatureSet {
        let features = FeatureSet {
            composition: self.composition(buffer),
            colors: self.colors(buffer),
            elements: self.elements(buffer),
            effects: self.effects(buffer),
        };

        tracing::trace!(
            width = buffer.width(),
            height = buffer.height(),
            edge_density = features.elements.edge_density,
            contrast = features.colors.contrast,
            "Extracted features"
        );

        features
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalysisConfig {
            grid_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(FeatureExtractor::new(config).is_err());

        let config = AnalysisConfig {
            grid_size: 1 << 33,
            ..AnalysisConfig::default()
        };
        assert!(FeatureExtractor::new(config).is_err());
    }

    #[test]
    fn grid_size_flows_into_composition() {
        let config = AnalysisConfig {
            grid_size: 6,
            ..AnalysisConfig::default()
        };
        let extractor = FeatureExtractor::new(config).unwrap();
        let features = extractor.extract(&PixelBuffer::filled(12, 12, [10, 10, 10, 255]));
        assert_eq!(features.composition.grid_size, 6);
        assert_eq!(features.composition.brightness_grid.len(), 36);
    }

    #[test]
    fn extraction_is_deterministic() {
        let buffer = PixelBuffer::from_fn(20, 14, |x, y| {
            [(x * 13) as u8, (y * 17) as u8, ((x + y) * 7) as u8, 255]
        });
        let extractor = FeatureExtractor::default();
        assert_eq!(extractor.extract(&buffer), extractor.extract(&buffer));
    }
}
