//! Cache key derivation.

use chrono::Utc;
use framesight_common::config::CacheKeyMode;
use framesight_frame_model::PixelBuffer;

/// Bytes hashed by the timestamped key.
pub const TIMESTAMP_KEY_PREFIX_BYTES: usize = 1000;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a_64(hash: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(hash, |hash, byte| {
        (hash ^ *byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Content key: FNV-1a over the dimensions and every pixel byte.
///
/// Identical frames always share a key.
pub fn content_key(buffer: &PixelBuffer) -> String {
    let mut hash = fnv1a_64(FNV_OFFSET_BASIS, &buffer.width().to_le_bytes());
    hash = fnv1a_64(hash, &buffer.height().to_le_bytes());
    hash = fnv1a_64(hash, buffer.data());
    format!("{}x{}-{:016x}", buffer.width(), buffer.height(), hash)
}

/// 32-bit rolling hash `h = h * 31 + byte` over at most the first
/// [`TIMESTAMP_KEY_PREFIX_BYTES`] bytes, with wrapping arithmetic.
pub fn prefix_hash(data: &[u8]) -> i32 {
    data.iter()
        .take(TIMESTAMP_KEY_PREFIX_BYTES)
        .fold(0i32, |h, byte| h.wrapping_mul(31).wrapping_add(*byte as i32))
}

/// Timestamped key: prefix hash plus capture time in epoch milliseconds.
///
/// Frames without a timestamp use the current wall clock, so two calls on
/// the same untimestamped frame almost never collide.
pub fn timestamped_key(buffer: &PixelBuffer) -> String {
    let millis = buffer
        .timestamp()
        .unwrap_or_else(Utc::now)
        .timestamp_millis();
    format!("frame_{}_{}", prefix_hash(buffer.data()), millis)
}

pub fn derive_key(buffer: &PixelBuffer, mode: CacheKeyMode) -> String {
    match mode {
        CacheKeyMode::Content => content_key(buffer),
        CacheKeyMode::ContentAndTimestamp => timestamped_key(buffer),
    }
}
