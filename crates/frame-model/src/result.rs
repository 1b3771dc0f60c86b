//! The aggregate handed back to callers after one analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::buffer::FrameInfo;
use crate::features::FeatureSet;
use crate::recommendation::{Priority, Recommendation};

/// Outcome of analyzing one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Dimensions and origin of the frame this result answers (no pixel
    /// data). On a cache hit this is the current request's frame.
    pub frame: FrameInfo,

    pub features: FeatureSet,

    /// Generated prose, absent when no generator answered.
    pub insight: Option<String>,

    pub recommendations: Vec<Recommendation>,

    /// When the analysis was produced.
    pub timestamp: DateTime<Utc>,

    pub cache_key: String,

    /// Whether the features were served from the result cache.
    #[serde(default)]
    pub cache_hit: bool,
}

impl AnalysisResult {
    /// Recommendations at or above the given priority, in rule order.
    pub fn recommendations_at_least(
        &self,
        priority: Priority,
    ) -> impl Iterator<Item = &Recommendation> + '_ {
        self.recommendations
            .iter()
            .filter(move |rec| rec.priority >= priority)
    }
}
