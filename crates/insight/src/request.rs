//! Prompt construction.

use std::fmt::Write as _;

use framesight_frame_model::{FeatureSet, FrameInfo};
use serde::Serialize;

const SYSTEM_INSTRUCTION: &str = "You are a motion-graphics art director. \
Given measured visual features of a single frame, give two or three short, \
concrete suggestions to improve it. Refer to the measurements; do not invent \
content you cannot see.";

/// Everything a generator needs to describe one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub frame: Option<FrameInfo>,
    pub features: FeatureSet,
}

impl InsightRequest {
    /// Build a request whose user prompt lists the measured features.
    pub fn from_features(features: &FeatureSet) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt: summarize(features, None),
            frame: None,
            features: features.clone(),
        }
    }

    /// Like [`InsightRequest::from_features`], with frame dimensions in the prompt.
    pub fn for_frame(frame: FrameInfo, features: &FeatureSet) -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt: summarize(features, Some(&frame)),
            frame: Some(frame),
            features: features.clone(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn summarize(features: &FeatureSet, frame: Option<&FrameInfo>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    if let Some(frame) = frame {
        let _ = writeln!(out, "Frame: {}x{}", frame.width, frame.height);
    }

    let composition = &features.composition;
    let _ = writeln!(out, "Composition:");
    let _ = writeln!(
        out,
        "- rule of thirds score: {:.2}",
        composition.rule_of_thirds_score
    );
    let _ = writeln!(
        out,
        "- horizontal imbalance: {:.2}",
        composition.balance_horizontal
    );

    let colors = &features.colors;
    let palette = colors
        .palette
        .iter()
        .take(5)
        .map(|entry| format!("{} ({:.0}%)", entry.rgb.hex(), entry.percentage * 100.0))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Color:");
    let _ = writeln!(out, "- dominant: {}", colors.dominant.hex());
    let _ = writeln!(out, "- palette: {}", if palette.is_empty() { "none" } else { palette.as_str() });
    let _ = writeln!(out, "- contrast: {:.2}", colors.contrast);
    let _ = writeln!(out, "- saturation: {:.2}", colors.saturation);

    let elements = &features.elements;
    let _ = writeln!(out, "Elements:");
    let _ = writeln!(
        out,
        "- shapes: {} (edge density {:.1}%)",
        yes_no(elements.shapes_detected),
        elements.edge_density
    );
    let _ = writeln!(
        out,
        "- text-like detail: {} (confidence {:.2})",
        yes_no(elements.text_detected),
        elements.text_confidence
    );

    let effects = &features.effects;
    let _ = writeln!(out, "Effects:");
    let _ = writeln!(out, "- blur: {:.2}", effects.blur_strength);
    let _ = writeln!(out, "- noise: {:.2}", effects.noise_strength);
    let _ = write!(out, "- vignette: {:.2}", effects.vignette_strength);

    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use framesight_frame_model::{
        ColorFeatures, CompositionFeatures, EffectFeatures, ElementFeatures, PaletteEntry, Rgb,
        SourceTag,
    };

    pub(crate) fn sample_features() -> FeatureSet {
        FeatureSet {
            composition: CompositionFeatures {
                rule_of_thirds_score: 0.21,
                balance_horizontal: 0.5,
                grid_size: 3,
                brightness_grid: vec![0.3; 9],
            },
            colors: ColorFeatures {
                dominant: Rgb::new(18, 52, 86),
                palette: vec![
                    PaletteEntry {
                        rgb: Rgb::new(18, 52, 86),
                        percentage: 0.6,
                    },
                    PaletteEntry {
                        rgb: Rgb::WHITE,
                        percentage: 0.4,
                    },
                ],
                contrast: 0.31,
                saturation: 0.42,
                samples: 100,
            },
            elements: ElementFeatures {
                shapes_detected: true,
                shape_confidence: 0.8,
                edge_density: 40.0,
                text_detected: true,
                text_confidence: 0.9,
                text_density: 0.045,
            },
            effects: EffectFeatures {
                blur_detected: false,
                blur_strength: 0.01,
                noise_detected: true,
                noise_strength: 0.35,
                vignette_detected: false,
                vignette_strength: 0.1,
            },
        }
    }

    #[test]
    fn prompt_lists_measurements() {
        let request = InsightRequest::from_features(&sample_features());
        assert!(request.user_prompt.contains("rule of thirds score: 0.21"));
        assert!(request.user_prompt.contains("#123456 (60%)"));
        assert!(request.user_prompt.contains("text-like detail: yes"));
        assert!(!request.user_prompt.contains("Frame:"));
        assert!(request.system_instruction.contains("suggestions"));
    }

    #[test]
    fn frame_dimensions_are_included_when_known() {
        let frame = FrameInfo {
            width: 1920,
            height: 1080,
            source: SourceTag::Upload,
            timestamp: None,
        };
        let request = InsightRequest::for_frame(frame, &sample_features());
        assert!(request.user_prompt.starts_with("Frame: 1920x1080"));
    }
}
