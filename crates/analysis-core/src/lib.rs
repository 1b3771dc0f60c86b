//! Framesight Analysis Core
//!
//! Computes deterministic visual features from a validated pixel buffer:
//! - **Composition:** Brightness grid, rule-of-thirds and left/right balance
//! - **Color:** Sampled palette, dominant color, contrast, full-pass saturation
//! - **Structure:** Sobel edge density (shapes) and local contrast (text)
//! - **Effects:** Blur, noise, and vignette estimates
//! - **Recommendations:** Rule-based suggestions from a feature set
//!
//! This crate is pure computation with no I/O and no shared state.
//! Every analyzer takes the buffer explicitly and returns plain data, so
//! the four families can run concurrently over the same frame.

pub mod color;
pub mod composition;
pub mod effects;
pub mod extractor;
pub mod luminance;
pub mod recommend;
pub mod structure;

pub use extractor::FeatureExtractor;
pub use recommend::recommend;
