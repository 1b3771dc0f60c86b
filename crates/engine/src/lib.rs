//! Framesight Engine
//!
//! Orchestrates one analysis request end to end:
//! - **Source:** Acquire a validated frame from the host bridge or a user image
//! - **Extraction:** Run the four analyzer families concurrently on blocking tasks
//! - **Cache:** Bounded FIFO of recent results, keyed per frame
//! - **Insight:** Optional, bounded call to a text generator
//! - **Export:** Pretty JSON for results and cache snapshots
//!
//! The cache is the only shared mutable state. Insight generation is the
//! only suspension point that can fail, and it degrades to no insight.

pub mod cache;
pub mod engine;
pub mod export;
pub mod key;
pub mod source;

pub use cache::{CacheEntry, ResultCache};
pub use engine::AnalysisEngine;
pub use source::{FrameSource, ImageFileSource, QueuedFrameSource};
