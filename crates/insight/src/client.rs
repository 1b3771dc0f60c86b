//! Bounded access to an optional insight generator.

use std::sync::Arc;
use std::time::Duration;

use framesight_common::config::InsightConfig;

use crate::error::InsightError;
use crate::generator::InsightGenerator;
use crate::request::InsightRequest;

/// Result of asking for an insight. Never an error from the caller's
/// point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    Generated { text: String, attempts: u32 },
    Unavailable { reason: InsightError, attempts: u32 },
}

impl InsightOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated { text, .. } => Some(text),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Generated { text, .. } => Some(text),
            Self::Unavailable { .. } => None,
        }
    }

    /// Generator calls made, including the retry.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Generated { attempts, .. } | Self::Unavailable { attempts, .. } => *attempts,
        }
    }
}

/// Wraps an optional generator with a per-attempt timeout and at most one
/// retry.
#[derive(Clone)]
pub struct InsightClient {
    generator: Option<Arc<dyn InsightGenerator>>,
    config: InsightConfig,
}

impl std::fmt::Debug for InsightClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightClient")
            .field("generator", &self.generator_name())
            .field("config", &self.config)
            .finish()
    }
}

impl InsightClient {
    /// A client with no generator. Every request is unavailable.
    pub fn new(config: InsightConfig) -> Self {
        Self {
            generator: None,
            config,
        }
    }

    pub fn with_generator(config: InsightConfig, generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            generator: Some(generator),
            config,
        }
    }

    pub fn set_generator(&mut self, generator: Arc<dyn InsightGenerator>) {
        self.generator = Some(generator);
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Whether a request could produce text at all.
    pub fn is_available(&self) -> bool {
        self.config.enabled && self.generator.is_some()
    }

    /// Ask the generator for an insight.
    ///
    /// Each attempt is bounded by `timeout_ms`. A failed, timed-out, or
    /// blank attempt is retried once after `retry_backoff_ms` when
    /// `max_retries` allows it.
    pub async fn generate(&self, request: &InsightRequest) -> InsightOutcome {
        let generator = match (&self.generator, self.config.enabled) {
            (Some(generator), true) => generator,
            _ => {
                return InsightOutcome::Unavailable {
                    reason: InsightError::Unavailable,
                    attempts: 0,
                }
            }
        };

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let max_attempts = 1 + self.config.effective_retries();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = match tokio::time::timeout(timeout, generator.generate(request)).await {
                Ok(Ok(text)) if text.trim().is_empty() => Err(InsightError::Empty),
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(InsightError::Timeout {
                    after_ms: self.config.timeout_ms,
                }),
            };

            match result {
                Ok(text) => {
                    tracing::debug!(
                        generator = generator.name(),
                        attempts,
                        chars = text.len(),
                        "Insight generated"
                    );
                    return InsightOutcome::Generated { text, attempts };
                }
                Err(reason) if reason.is_retryable() && attempts < max_attempts => {
                    tracing::debug!(
                        generator = generator.name(),
                        attempt = attempts,
                        error = %reason,
                        "Insight attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_backoff_ms)).await;
                }
                Err(reason) => {
                    tracing::warn!(
                        generator = generator.name(),
                        attempts,
                        error = %reason,
                        "Insight unavailable, continuing without it"
                    );
                    return InsightOutcome::Unavailable { reason, attempts };
                }
            }
        }
    }
}
