//! The analysis engine: the public entry point for one frame at a time.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use framesight_analysis_core::{recommend, FeatureExtractor};
use framesight_common::config::{AppConfig, CacheConfig};
use framesight_common::error::{FramesightError, FramesightResult};
use framesight_frame_model::{AnalysisResult, FeatureSet, PixelBuffer};
use framesight_insight::{InsightClient, InsightGenerator, InsightRequest};

use crate::cache::{CacheEntry, ResultCache};
use crate::key::derive_key;
use crate::source::FrameSource;

/// Runs feature extraction, caching, insight, and recommendations for
/// each submitted frame.
///
/// The engine is `Send + Sync`; share it behind an `Arc` to analyze from
/// several tasks. Concurrent requests for the same key may both compute;
/// the later insertion wins.
#[derive(Debug)]
pub struct AnalysisEngine {
    extractor: Arc<FeatureExtractor>,
    cache: ResultCache,
    cache_config: CacheConfig,
    parallel: bool,
    insight: InsightClient,
}

impl AnalysisEngine {
    /// Build an engine from validated configuration. No insight generator
    /// is attached until [`AnalysisEngine::with_insight_generator`].
    pub fn new(config: &AppConfig) -> FramesightResult<Self> {
        config.validate()?;
        Ok(Self {
            extractor: Arc::new(FeatureExtractor::new(config.analysis.clone())?),
            cache: ResultCache::new(),
            cache_config: config.cache.clone(),
            parallel: config.analysis.parallel,
            insight: InsightClient::new(config.insight.clone()),
        })
    }

    pub fn with_insight_generator(mut self, generator: Arc<dyn InsightGenerator>) -> Self {
        self.insight.set_generator(generator);
        self
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn insight_client(&self) -> &InsightClient {
        &self.insight
    }

    /// Compute features only, bypassing the cache and insight.
    pub async fn extract_features(&self, buffer: PixelBuffer) -> FramesightResult<FeatureSet> {
        self.extract_shared(Arc::new(buffer)).await
    }

    async fn extract_shared(&self, buffer: Arc<PixelBuffer>) -> FramesightResult<FeatureSet> {
        if !self.parallel {
            return run_blocking(&self.extractor, &buffer, FeatureExtractor::extract).await;
        }

        let (composition, colors, elements, effects) = tokio::try_join!(
            run_blocking(&self.extractor, &buffer, FeatureExtractor::composition),
            run_blocking(&self.extractor, &buffer, FeatureExtractor::colors),
            run_blocking(&self.extractor, &buffer, FeatureExtractor::elements),
            run_blocking(&self.extractor, &buffer, FeatureExtractor::effects),
        )?;

        Ok(FeatureSet {
            composition,
            colors,
            elements,
            effects,
        })
    }

    /// Analyze one frame.
    ///
    /// A cached result for the frame's key is returned with `cache_hit`
    /// set and `frame` replaced by this request's frame info. Otherwise features are computed, the result is
    /// cached, and insight text is attached when a generator answers in
    /// time.
    pub async fn analyze(&self, buffer: PixelBuffer) -> FramesightResult<AnalysisResult> {
        let started = Instant::now();
        let frame = buffer.info();
        let buffer = Arc::new(buffer);
        let key = {
            let buffer = Arc::clone(&buffer);
            let mode = self.cache_config.key_mode;
            tokio::task::spawn_blocking(move || derive_key(&buffer, mode))
                .await
                .map_err(|e| FramesightError::analysis(format!("cache key task failed: {e}")))?
        };

        if self.cache_config.enabled {
            if let Some(mut cached) = self.cache.get(&key) {
                tracing::debug!(key = %key, "Cache hit");
                cached.frame = frame;
                cached.cache_hit = true;
                return Ok(cached);
            }
        }

        let features = self.extract_shared(buffer).await?;
        let extract_ms = started.elapsed().as_millis() as u64;

        let mut result = AnalysisResult {
            frame,
            recommendations: recommend(&features, None),
            features,
            insight: None,
            timestamp: Utc::now(),
            cache_key: key.clone(),
            cache_hit: false,
        };

        if self.cache_config.enabled {
            self.cache.insert(key.clone(), result.clone());
        }

        if self.insight.is_available() {
            let request = InsightRequest::for_frame(frame, &result.features);
            if let Some(text) = self.insight.generate(&request).await.into_text() {
                result.recommendations = recommend(&result.features, Some(&text));
                result.insight = Some(text);
                if self.cache_config.enabled {
                    self.cache.attach_insight(
                        &key,
                        result.insight.clone(),
                        result.recommendations.clone(),
                    );
                }
            }
        }

        tracing::info!(
            key = %key,
            width = frame.width,
            height = frame.height,
            extract_ms,
            total_ms = started.elapsed().as_millis() as u64,
            recommendations = result.recommendations.len(),
            insight = result.insight.is_some(),
            "Analyzed frame"
        );

        Ok(result)
    }

    /// Capture a frame from `source` and analyze it.
    pub async fn analyze_from(&self, source: &dyn FrameSource) -> FramesightResult<AnalysisResult> {
        let buffer = source.capture().await?;
        tracing::debug!(source = source.name(), "Captured frame");
        self.analyze(buffer).await
    }

    /// Snapshot of cached results, oldest first.
    pub fn cached_entries(&self) -> Vec<CacheEntry> {
        self.cache.entries()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Cleared result cache");
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }
}

async fn run_blocking<T, F>(
    extractor: &Arc<FeatureExtractor>,
    buffer: &Arc<PixelBuffer>,
    analyze: F,
) -> FramesightResult<T>
where
    T: Send + 'static,
    F: FnOnce(&FeatureExtractor, &PixelBuffer) -> T + Send + 'static,
{
    let extractor = Arc::clone(extractor);
    let buffer = Arc::clone(buffer);
    tokio::task::spawn_blocking(move || analyze(&extractor, &buffer))
        .await
        .map_err(|e| FramesightError::analysis(format!("analyzer task failed: {e}")))
}
