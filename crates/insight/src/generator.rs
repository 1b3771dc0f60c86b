//! The insight capability and the built-in offline generator.

use async_trait::async_trait;

use crate::error::InsightError;
use crate::request::InsightRequest;

/// Anything that can turn an [`InsightRequest`] into prose.
///
/// Remote text services implement this at the application edge. The
/// engine only ever calls it through [`crate::InsightClient`], which
/// bounds every call with a timeout.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: &InsightRequest) -> Result<String, InsightError>;
}

/// Deterministic generator that phrases the measured features directly.
///
/// Useful offline and in tests: the same features always give the same
/// text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummaryInsight;

impl LocalSummaryInsight {
    pub fn new() -> Self {
        Self
    }

    /// Compose the summary without going through the async trait.
    pub fn summarize(&self, request: &InsightRequest) -> String {
        let f = &request.features;
        let mut sentences = Vec::new();

        let contrast = match f.colors.contrast {
            c if c < 0.3 => "low",
            c if c < 0.6 => "moderate",
            _ => "strong",
        };
        let share = f
            .colors
            .palette
            .first()
            .map(|entry| entry.percentage * 100.0)
            .unwrap_or(0.0);
        sentences.push(format!(
            "The frame is led by {} ({:.0}% of sampled pixels) with {} contrast between its main colors.",
            f.colors.dominant.hex(),
            share,
            contrast
        ));

        if f.composition.rule_of_thirds_score < 0.3 {
            sentences.push(
                "Little brightness lands on the thirds intersections; consider shifting the subject."
                    .to_string(),
            );
        }
        if f.composition.balance_horizontal > 0.4 {
            sentences.push("The left and right sides carry very different weight.".to_string());
        }

        match (f.elements.shapes_detected, f.elements.text_detected) {
            (true, true) => sentences.push(
                "It is busy with both hard-edged shapes and text-like detail.".to_string(),
            ),
            (true, false) => sentences.push("Hard-edged shapes dominate the layout.".to_string()),
            (false, true) => sentences.push("Text-like detail is present.".to_string()),
            (false, false) => {}
        }

        if f.effects.noise_detected {
            sentences.push("Visible noise may distract from the subject.".to_string());
        }
        if f.effects.vignette_detected {
            sentences.push("A vignette pulls attention to the center.".to_string());
        }

        sentences.join(" ")
    }
}

#[async_trait]
impl InsightGenerator for LocalSummaryInsight {
    fn name(&self) -> &str {
        "local-summary"
    }

    async fn generate(&self, request: &InsightRequest) -> Result<String, InsightError> {
        Ok(self.summarize(request))
    }
}
