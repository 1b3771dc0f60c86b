//! Framesight Insight
//!
//! Optional free-text commentary on an analyzed frame:
//! - **Generator:** The [`InsightGenerator`] capability implemented by
//!   remote text services or by the offline [`LocalSummaryInsight`]
//! - **Request:** Prompt construction from a computed feature set
//! - **Client:** Timeout, a single retry, and degradation to "no insight"
//!
//! Insight is never required. A missing, slow, or failing generator yields
//! [`InsightOutcome::Unavailable`] and the analysis result carries no text.

pub mod client;
pub mod error;
pub mod generator;
pub mod request;

pub use client::{InsightClient, InsightOutcome};
pub use error::InsightError;
pub use generator::{InsightGenerator, LocalSummaryInsight};
pub use request::InsightRequest;
