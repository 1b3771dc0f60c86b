//! Insight generation errors.

use framesight_common::error::FramesightError;

/// Why an insight could not be produced.
///
/// None of these fail an analysis: the client downgrades every variant to
/// an absent insight.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsightError {
    /// No generator is configured, or insight is disabled.
    #[error("no insight generator configured")]
    Unavailable,

    #[error("insight generation timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("insight generation failed: {message}")]
    Failed { message: String },

    /// The generator answered with blank text.
    #[error("insight generator returned an empty response")]
    Empty,
}

impl InsightError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl From<InsightError> for FramesightError {
    fn from(err: InsightError) -> Self {
        FramesightError::insight_unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_insight_unavailable() {
        let err: FramesightError = InsightError::Timeout { after_ms: 50 }.into();
        assert!(matches!(err, FramesightError::InsightUnavailable { .. }));
        assert!(err.to_string().contains("50 ms"));
    }

    #[test]
    fn missing_generator_is_not_retried() {
        assert!(!InsightError::Unavailable.is_retryable());
        assert!(InsightError::Empty.is_retryable());
        assert!(InsightError::failed("503").is_retryable());
    }
}
