use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use framesight_common::config::InsightConfig;
use framesight_frame_model::PixelBuffer;
use framesight_insight::{
    InsightClient, InsightError, InsightGenerator, InsightOutcome, InsightRequest,
    LocalSummaryInsight,
};

/// Fails the first `failures` calls, then answers.
struct Flaky {
    failures: u32,
    calls: AtomicU32,
}

impl Flaky {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl InsightGenerator for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            Err(InsightError::failed(format!("call {call} rejected")))
        } else {
            Ok("Tighten the crop.".to_string())
        }
    }
}

struct Slow {
    delay: Duration,
    calls: AtomicU32,
}

#[async_trait]
impl InsightGenerator for Slow {
    fn name(&self) -> &str {
        "slow"
    }

    async fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }
}

struct Blank;

#[async_trait]
impl InsightGenerator for Blank {
    fn name(&self) -> &str {
        "blank"
    }

    async fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        Ok("  \n".to_string())
    }
}

fn fast_config() -> InsightConfig {
    InsightConfig {
        enabled: true,
        timeout_ms: 50,
        max_retries: 1,
        retry_backoff_ms: 1,
    }
}

fn request() -> InsightRequest {
    let features = framesight_analysis_core::FeatureExtractor::with_defaults()
        .extract(&PixelBuffer::filled(8, 8, [120, 60, 30, 255]));
    InsightRequest::from_features(&features)
}

#[tokio::test]
async fn no_generator_is_unavailable_without_calls() {
    let client = InsightClient::new(fast_config());
    let outcome = client.generate(&request()).await;
    assert_eq!(
        outcome,
        InsightOutcome::Unavailable {
            reason: InsightError::Unavailable,
            attempts: 0
        }
    );
    assert!(!client.is_available());
}

#[tokio::test]
async fn disabled_config_skips_generator() {
    let flaky = Flaky::new(0);
    let config = InsightConfig {
        enabled: false,
        ..fast_config()
    };
    let client = InsightClient::with_generator(config, flaky.clone());
    assert!(client.generate(&request()).await.text().is_none());
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_failure_is_retried_once() {
    let flaky = Flaky::new(1);
    let client = InsightClient::with_generator(fast_config(), flaky.clone());
    let outcome = client.generate(&request()).await;
    assert_eq!(outcome.text(), Some("Tighten the crop."));
    assert_eq!(outcome.attempts(), 2);
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn persistent_failure_stops_after_retry() {
    let flaky = Flaky::new(u32::MAX);
    let config = InsightConfig {
        max_retries: 5,
        ..fast_config()
    };
    let client = InsightClient::with_generator(config, flaky.clone());
    let outcome = client.generate(&request()).await;
    assert!(matches!(
        outcome,
        InsightOutcome::Unavailable {
            reason: InsightError::Failed { .. },
            attempts: 2
        }
    ));
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let flaky = Flaky::new(1);
    let config = InsightConfig {
        max_retries: 0,
        ..fast_config()
    };
    let client = InsightClient::with_generator(config, flaky.clone());
    assert!(client.generate(&request()).await.into_text().is_none());
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_generator_times_out() {
    let slow = Arc::new(Slow {
        delay: Duration::from_secs(5),
        calls: AtomicU32::new(0),
    });
    let client = InsightClient::with_generator(fast_config(), slow.clone());

    let started = std::time::Instant::now();
    let outcome = client.generate(&request()).await;
    assert!(started.elapsed() < Duration::from_secs(2));

    assert!(matches!(
        outcome,
        InsightOutcome::Unavailable {
            reason: InsightError::Timeout { after_ms: 50 },
            ..
        }
    ));
    assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn blank_text_counts_as_failure() {
    let client = InsightClient::with_generator(fast_config(), Arc::new(Blank));
    let outcome = client.generate(&request()).await;
    assert!(matches!(
        outcome,
        InsightOutcome::Unavailable {
            reason: InsightError::Empty,
            attempts: 2
        }
    ));
}

#[tokio::test]
async fn local_summary_answers_through_client() {
    let client = InsightClient::with_generator(fast_config(), Arc::new(LocalSummaryInsight));
    assert_eq!(client.generator_name(), Some("local-summary"));
    let outcome = client.generate(&request()).await;
    assert_eq!(outcome.attempts(), 1);
    assert!(outcome.text().is_some_and(|t| t.contains("#783c1e")));
}
