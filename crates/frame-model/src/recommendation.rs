//! Editing recommendations derived from a feature set.

use serde::{Deserialize, Serialize};

/// How urgently a recommendation should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// The aspect of the frame a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Composition,
    Balance,
    Contrast,
    Color,
    Readability,
    Sharpness,
    Noise,
    Vignette,
    /// Free-text guidance from the insight generator.
    Insight,
}

/// A single prioritized suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
    pub suggested_action: String,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationKind,
        priority: Priority,
        message: impl Into<String>,
        suggested_action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            message: message.into(),
            suggested_action: suggested_action.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_type_and_lowercase_priority() {
        let rec = Recommendation::new(
            RecommendationKind::Contrast,
            Priority::High,
            "Low contrast",
            "Increase contrast",
        );
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"type\":\"contrast\""));
        assert!(json.contains("\"priority\":\"high\""));
        assert!(json.contains("\"suggested_action\":\"Increase contrast\""));
    }

    #[test]
    fn priorities_order_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }
}
