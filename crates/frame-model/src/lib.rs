//! Framesight Frame Model
//!
//! Defines the core data contracts of the analysis engine:
//! - **Buffer:** Validated RGBA8 pixel buffers handed in by a frame source
//! - **Features:** The deterministic visual scores computed for one frame
//! - **Recommendation:** Prioritized editing suggestions derived from features
//! - **Result:** The aggregate returned to display and export layers
//!
//! Scores are normalized to `[0.0, 1.0]` unless a field says otherwise
//! (edge density is a percentage).

pub mod buffer;
pub mod features;
pub mod recommendation;
pub mod result;

pub use buffer::*;
pub use features::*;
pub use recommendation::*;
pub use result::*;
