//! Computed visual features for a single frame.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rec. 709 relative luminance with channels normalized to `[0, 1]`.
    pub fn relative_luminance(&self) -> f64 {
        0.2126 * (self.r as f64 / 255.0)
            + 0.7152 * (self.g as f64 / 255.0)
            + 0.0722 * (self.b as f64 / 255.0)
    }

    /// `#rrggbb` representation.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One palette color and its share of the opaque samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub rgb: Rgb,
    /// Fraction of counted samples, `[0, 1]`.
    pub percentage: f64,
}

/// Grid-based brightness composition scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionFeatures {
    /// Mean brightness of the cells on the thirds lines, `[0, 1]`.
    pub rule_of_thirds_score: f64,
    /// Brightness difference between left and right thirds, `[0, 1]`.
    pub balance_horizontal: f64,
    /// Cells per axis.
    pub grid_size: usize,
    /// Per-cell mean brightness in row-major order, each `[0, 1]`.
    pub brightness_grid: Vec<f64>,
}

/// Palette, contrast, and saturation statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorFeatures {
    pub dominant: Rgb,
    /// Most frequent colors first.
    pub palette: Vec<PaletteEntry>,
    /// Luminance spread between the two most frequent colors, `[0, 1]`.
    pub contrast: f64,
    /// Mean HSV saturation over every pixel, `[0, 1]`.
    pub saturation: f64,
    /// Opaque samples counted for the palette.
    pub samples: usize,
}

/// Shape and text likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementFeatures {
    pub shapes_detected: bool,
    pub shape_confidence: f64,
    /// Share of interior pixels classified as edges, in percent `[0, 100]`.
    pub edge_density: f64,
    pub text_detected: bool,
    pub text_confidence: f64,
    /// Share of pixels with high local contrast, `[0, 1]`.
    pub text_density: f64,
}

/// Blur, noise, and vignette estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectFeatures {
    pub blur_detected: bool,
    pub blur_strength: f64,
    pub noise_detected: bool,
    pub noise_strength: f64,
    pub vignette_detected: bool,
    pub vignette_strength: f64,
}

/// All features computed for one frame. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub composition: CompositionFeatures,
    pub colors: ColorFeatures,
    pub elements: ElementFeatures,
    pub effects: EffectFeatures,
}

impl FeatureSet {
    /// Every documented score paired with its name and inclusive upper bound.
    pub fn scores(&self) -> Vec<(&'static str, f64, f64)> {
        let mut scores = vec![
            (
                "composition.rule_of_thirds_score",
                self.composition.rule_of_thirds_score,
                1.0,
            ),
            (
                "composition.balance_horizontal",
                self.composition.balance_horizontal,
                1.0,
            ),
            ("colors.contrast", self.colors.contrast, 1.0),
            ("colors.saturation", self.colors.saturation, 1.0),
            (
                "elements.shape_confidence",
                self.elements.shape_confidence,
                1.0,
            ),
            ("elements.edge_density", self.elements.edge_density, 100.0),
            ("elements.text_confidence", self.elements.text_confidence, 1.0),
            ("elements.text_density", self.elements.text_density, 1.0),
            ("effects.blur_strength", self.effects.blur_strength, 1.0),
            ("effects.noise_strength", self.effects.noise_strength, 1.0),
            (
                "effects.vignette_strength",
                self.effects.vignette_strength,
                1.0,
            ),
        ];
        scores.extend(
            self.colors
                .palette
                .iter()
                .map(|entry| ("colors.palette.percentage", entry.percentage, 1.0)),
        );
        scores.extend(
            self.composition
                .brightness_grid
                .iter()
                .map(|cell| ("composition.brightness_grid", *cell, 1.0)),
        );
        scores
    }

    /// Names of scores that are NaN or outside their documented range.
    pub fn out_of_range_scores(&self) -> Vec<&'static str> {
        self.scores()
            .into_iter()
            .filter(|(_, value, max)| !(value.is_finite() && *value >= 0.0 && value <= max))
            .map(|(name, _, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_luminance_spans_unit_range() {
        assert_eq!(Rgb::BLACK.relative_luminance(), 0.0);
        assert!((Rgb::WHITE.relative_luminance() - 1.0).abs() < 1e-12);
        let green = Rgb::new(0, 255, 0).relative_luminance();
        assert!((green - 0.7152).abs() < 1e-12);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(1, 171, 255).hex(), "#01abff");
    }

    #[test]
    fn rgb_ordering_is_lexicographic() {
        assert!(Rgb::new(0, 0, 1) < Rgb::new(0, 1, 0));
        assert!(Rgb::new(1, 0, 0) > Rgb::new(0, 255, 255));
    }
}
