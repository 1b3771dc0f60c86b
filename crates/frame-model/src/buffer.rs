//! Validated RGBA8 pixel buffers.
//!
//! A [`PixelBuffer`] can only be built through constructors that check
//! `data.len() == width * height * 4`, so analyzers never re-validate the
//! size and never read past the logical image bounds.

use chrono::{DateTime, Utc};
use framesight_common::error::{FramesightError, FramesightResult};
use serde::{Deserialize, Serialize};

/// Where a frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Live capture from the editing host's composition.
    #[default]
    HostCapture,
    /// A user-supplied image decoded to RGBA.
    Upload,
}

/// An immutable RGBA8 frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
    source: SourceTag,
    timestamp: Option<DateTime<Utc>>,
}

/// Pixel-free description of a frame, carried in results and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub source: SourceTag,
    pub timestamp: Option<DateTime<Utc>>,
}

impl PixelBuffer {
    /// Bytes per pixel (R, G, B, A).
    pub const CHANNELS: usize = 4;

    /// Create a buffer, failing with `MalformedBuffer` when the data length
    /// does not match the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        source: SourceTag,
        timestamp: Option<DateTime<Utc>>,
    ) -> FramesightResult<Self> {
        let expected = Self::expected_len(width, height).ok_or_else(|| {
            FramesightError::malformed_buffer(width, height, usize::MAX, data.len())
        })?;

        if data.len() != expected {
            return Err(FramesightError::malformed_buffer(
                width,
                height,
                expected,
                data.len(),
            ));
        }

        Ok(Self {
            width,
            height,
            data,
            source,
            timestamp,
        })
    }

    /// A buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in raster order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * Self::CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
            source: SourceTag::HostCapture,
            timestamp: None,
        }
    }

    /// Number of bytes a `width × height` RGBA frame occupies, if it fits in memory.
    pub fn expected_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_source(mut self, source: SourceTag) -> Self {
        self.source = source;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGBA value at `(x, y)`. Callers must stay within the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }

    /// Iterate over pixels in raster order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(Self::CHANNELS)
    }

    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            width: self.width,
            height: self.height,
            source: self.source,
            timestamp: self.timestamp,
        }
    }
}
