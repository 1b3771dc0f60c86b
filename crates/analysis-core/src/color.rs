//! Palette, contrast, and saturation analysis.
//!
//! The palette is approximate: only every Kth pixel is counted, and only
//! if it is mostly opaque. Saturation is exact: it is averaged over every
//! pixel of the frame.

use std::collections::HashMap;

use framesight_common::config::AnalysisConfig;
use framesight_frame_model::{ColorFeatures, PaletteEntry, PixelBuffer, Rgb};

/// Stride actually used for a frame of `pixel_count` pixels.
///
/// Large frames use the configured stride. Small frames are sampled more
/// densely so that at least `min_color_samples` pixels are visited when
/// the frame has that many.
pub fn effective_stride(pixel_count: usize, config: &AnalysisConfig) -> usize {
    let stride = config.color_sample_stride.max(1);
    let min_samples = config.min_color_samples.max(1);
    (pixel_count / min_samples).clamp(1, stride)
}

/// Count exact colors of sampled opaque pixels.
///
/// Returns the color counts and the number of samples counted.
pub fn sample_colors(
    buffer: &PixelBuffer,
    stride: usize,
    alpha_threshold: u8,
) -> (HashMap<Rgb, usize>, usize) {
    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    let mut samples = 0usize;

    for px in buffer.pixels().step_by(stride.max(1)) {
        if px[3] > alpha_threshold {
            *counts.entry(Rgb::new(px[0], px[1], px[2])).or_insert(0) += 1;
            samples += 1;
        }
    }

    (counts, samples)
}

/// Colors ordered by count, most frequent first. Equal counts are ordered
/// by ascending RGB so the ranking is deterministic.
pub fn rank_colors(counts: HashMap<Rgb, usize>) -> Vec<(Rgb, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(rgb_a, count_a), (rgb_b, count_b)| {
        count_b.cmp(count_a).then_with(|| rgb_a.cmp(rgb_b))
    });
    ranked
}

/// Mean HSV saturation `(max - min) / max` over every pixel.
pub fn mean_saturation(buffer: &PixelBuffer) -> f64 {
    let count = buffer.pixel_count();
    if count == 0 {
        return 0.0;
    }

    let total: f64 = buffer
        .pixels()
        .map(|px| {
            let max = px[0].max(px[1]).max(px[2]);
            let min = px[0].min(px[1]).min(px[2]);
            if max == 0 {
                0.0
            } else {
                (max - min) as f64 / max as f64
            }
        })
        .sum();

    total / count as f64
}

/// Compute color features for a frame.
pub fn analyze(buffer: &PixelBuffer, config: &AnalysisConfig) -> ColorFeatures {
    let stride = effective_stride(buffer.pixel_count(), config);
    let (counts, samples) = sample_colors(buffer, stride, config.alpha_threshold);
    let ranked = rank_colors(counts);

    let contrast = match ranked.as_slice() {
        [(first, _), (second, _), ..] => {
            (first.relative_luminance() - second.relative_luminance()).abs()
        }
        _ => 0.0,
    };

    let palette: Vec<PaletteEntry> = ranked
        .iter()
        .take(config.palette_size)
        .map(|(rgb, count)| PaletteEntry {
            rgb: *rgb,
            percentage: *count as f64 / samples as f64,
        })
        .collect();

    ColorFeatures {
        dominant: palette.first().map(|entry| entry.rgb).unwrap_or(Rgb::BLACK),
        palette,
        contrast: contrast.clamp(0.0, 1.0),
        saturation: mean_saturation(buffer),
        samples,
    }
}
