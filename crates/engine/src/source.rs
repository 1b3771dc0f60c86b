//! Frame sources.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use framesight_common::error::{FramesightError, FramesightResult};
use framesight_frame_model::{PixelBuffer, SourceTag};

/// Anything that can hand the engine one validated frame.
#[async_trait::async_trait]
pub trait FrameSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Produce the next frame.
    async fn capture(&self) -> FramesightResult<PixelBuffer>;
}

/// Decodes a user-supplied image file into an RGBA frame.
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode synchronously. Prefer [`FrameSource::capture`] from async code.
    pub fn decode(path: &Path) -> FramesightResult<PixelBuffer> {
        if !path.exists() {
            return Err(FramesightError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let image = image::open(path)
            .map_err(|e| FramesightError::frame_source(format!("{}: {e}", path.display())))?
            .into_rgba8();
        let (width, height) = image.dimensions();

        PixelBuffer::new(
            width,
            height,
            image.into_raw(),
            SourceTag::Upload,
            Some(Utc::now()),
        )
    }
}

#[async_trait::async_trait]
impl FrameSource for ImageFileSource {
    fn name(&self) -> &str {
        "image-file"
    }

    async fn capture(&self) -> FramesightResult<PixelBuffer> {
        let path = self.path.clone();
        let buffer = tokio::task::spawn_blocking(move || Self::decode(&path))
            .await
            .map_err(|e| FramesightError::Other(anyhow::Error::new(e)))??;

        tracing::debug!(
            path = %self.path.display(),
            width = buffer.width(),
            height = buffer.height(),
            "Decoded image frame"
        );
        Ok(buffer)
    }
}

/// In-memory FIFO of frames pushed by a host bridge.
#[derive(Debug, Default)]
pub struct QueuedFrameSource {
    frames: Mutex<VecDeque<PixelBuffer>>,
}

impl QueuedFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, frame: PixelBuffer) {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(frame);
    }

    /// Validate raw RGBA bytes from the host and queue them.
    pub fn push_raw(&self, width: u32, height: u32, data: Vec<u8>) -> FramesightResult<()> {
        let frame = PixelBuffer::new(
            width,
            height,
            data,
            SourceTag::HostCapture,
            Some(Utc::now()),
        )?;
        self.push(frame);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl FrameSource for QueuedFrameSource {
    fn name(&self) -> &str {
        "queue"
    }

    async fn capture(&self) -> FramesightResult<PixelBuffer> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .ok_or_else(|| FramesightError::frame_source("no frame queued"))
    }
}
