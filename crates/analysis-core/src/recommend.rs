//! Rule-based recommendations.
//!
//! Rules are evaluated in declaration order and every rule that fires adds
//! one recommendation. Rules are independent: a frame with low contrast
//! and detected text gets both the contrast and the readability entry.

use framesight_frame_model::{FeatureSet, Priority, Recommendation, RecommendationKind};

pub const RULE_OF_THIRDS_MIN: f64 = 0.3;
pub const BALANCE_MAX: f64 = 0.4;
pub const CONTRAST_MIN: f64 = 0.5;
pub const SATURATION_MIN: f64 = 0.15;
pub const SATURATION_MAX: f64 = 0.85;
pub const BLUR_STRENGTH_MAX: f64 = 0.8;
pub const NOISE_STRENGTH_MAX: f64 = 0.3;

/// Derive recommendations from a feature set and optional insight text.
pub fn recommend(features: &FeatureSet, insight: Option<&str>) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let contrast = features.colors.contrast;
    let saturation = features.colors.saturation;

    if features.composition.rule_of_thirds_score < RULE_OF_THIRDS_MIN {
        recs.push(Recommendation::new(
            RecommendationKind::Composition,
            Priority::Medium,
            "Little visual weight sits on the rule-of-thirds intersections",
            "Move the subject toward a thirds line or intersection",
        ));
    }

    if features.composition.balance_horizontal > BALANCE_MAX {
        recs.push(Recommendation::new(
            RecommendationKind::Balance,
            Priority::Low,
            "One side of the frame is much brighter than the other",
            "Add a secondary element or light to the darker side",
        ));
    }

    if contrast < CONTRAST_MIN {
        recs.push(Recommendation::new(
            RecommendationKind::Contrast,
            Priority::High,
            "The main colors are close in luminance",
            "Increase contrast between foreground and background",
        ));
    }

    if saturation < SATURATION_MIN {
        recs.push(Recommendation::new(
            RecommendationKind::Color,
            Priority::Low,
            "Colors are muted",
            "Boost saturation or introduce an accent color",
        ));
    } else if saturation > SATURATION_MAX {
        recs.push(Recommendation::new(
            RecommendationKind::Color,
            Priority::Low,
            "Colors are heavily saturated",
            "Pull back saturation to avoid clipping and eye fatigue",
        ));
    }

    if features.elements.text_detected && contrast < CONTRAST_MIN {
        recs.push(Recommendation::new(
            RecommendationKind::Readability,
            Priority::High,
            "Text-like detail sits on a low-contrast background",
            "Add a backing plate, stroke, or shadow behind text",
        ));
    }

    if features.effects.blur_strength > BLUR_STRENGTH_MAX {
        recs.push(Recommendation::new(
            RecommendationKind::Sharpness,
            Priority::Medium,
            "The frame looks soft",
            "Reduce blur or apply a sharpen pass",
        ));
    }

    if features.effects.noise_detected && features.effects.noise_strength > NOISE_STRENGTH_MAX {
        recs.push(Recommendation::new(
            RecommendationKind::Noise,
            Priority::Medium,
            "Visible noise or grain",
            "Apply noise reduction or lower the grain amount",
        ));
    }

    if features.effects.vignette_detected {
        recs.push(Recommendation::new(
            RecommendationKind::Vignette,
            Priority::Low,
            "Corners are noticeably darker than the center",
            "Check that the vignette is intentional and not hiding content",
        ));
    }

    if let Some(text) = insight.map(str::trim).filter(|text| !text.is_empty()) {
        recs.push(Recommendation::new(
            RecommendationKind::Insight,
            Priority::Low,
            text,
            "Review the generated insight",
        ));
    }

    recs
}
