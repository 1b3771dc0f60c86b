//! Blur, noise, and vignette estimates.

use framesight_common::config::AnalysisConfig;
use framesight_frame_model::{EffectFeatures, PixelBuffer};

use crate::luminance::LumaPlane;

/// Mean 3×3 local variance of normalized brightness over interior pixels,
/// divided by `normalizer` and clamped to `[0, 1]`.
///
/// Zero when the frame has no interior pixels. The window variance of
/// normalized brightness is at most 0.25, so with the default normalizer
/// of 1000 the score stays below 0.00025 and `blur_threshold` is only
/// reachable with a normalizer below `0.25 / blur_threshold`.
pub fn blur_score(plane: &LumaPlane, normalizer: f64) -> f64 {
    let interior = plane.interior_len();
    if interior == 0 || normalizer <= 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    for y in 1..plane.height() - 1 {
        for x in 1..plane.width() - 1 {
            let mut window = [0.0f64; 9];
            let mut i = 0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    window[i] = plane.at(nx, ny) / 255.0;
                    i += 1;
                }
            }
            let mean = window.iter().sum::<f64>() / 9.0;
            total += window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 9.0;
        }
    }

    (total / interior as f64 / normalizer).clamp(0.0, 1.0)
}

/// Mean absolute brightness step between consecutive pixels in raster
/// order, on a `[0, 1]` scale.
pub fn noise_score(plane: &LumaPlane) -> f64 {
    let values = plane.values();
    if values.len() < 2 {
        return 0.0;
    }

    let steps: f64 = values.windows(2).map(|pair| (pair[1] - pair[0]).abs()).sum();
    (steps / (values.len() - 1) as f64 / 255.0).clamp(0.0, 1.0)
}

/// Relative excess of the center-weighted brightness over the plain mean.
///
/// Each pixel is weighted by `1 - d / d_max`, where `d` is the distance of
/// the pixel center from the frame center and `d_max` the center-to-corner
/// distance. Frames that darken toward the corners score above zero; flat
/// frames and frames brighter at the edges score zero.
pub fn vignette_score(plane: &LumaPlane) -> f64 {
    let (width, height) = (plane.width(), plane.height());
    if width == 0 || height == 0 {
        return 0.0;
    }

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let max_distance = cx.hypot(cy);

    let mut sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for y in 0..height {
        for x in 0..width {
            let value = plane.at(x, y);
            let distance = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy);
            let weight = (1.0 - distance / max_distance).max(0.0);
            sum += value;
            weighted_sum += weight * value;
            weight_total += weight;
        }
    }

    let mean = sum / (width * height) as f64;
    if mean <= 0.0 || weight_total <= 0.0 {
        return 0.0;
    }

    let weighted_mean = weighted_sum / weight_total;
    ((weighted_mean - mean) / mean).clamp(0.0, 1.0)
}

/// Compute effect features for a frame.
pub fn analyze(buffer: &PixelBuffer, config: &AnalysisConfig) -> EffectFeatures {
    let plane = LumaPlane::from_buffer(buffer);

    let blur_strength = blur_score(&plane, config.blur_normalizer);
    let noise_strength = noise_score(&plane);
    let vignette_strength = vignette_score(&plane);

    EffectFeatures {
        blur_detected: blur_strength > config.blur_threshold,
        blur_strength,
        noise_detected: noise_strength > config.noise_threshold,
        noise_strength,
        vignette_detected: vignette_strength > config.vignette_threshold,
        vignette_strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn plane(buffer: &PixelBuffer) -> LumaPlane {
        LumaPlane::from_buffer(buffer)
    }

    fn radial(width: u32, height: u32, power: i32) -> PixelBuffer {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let max_distance = cx.hypot(cy);
        PixelBuffer::from_fn(width, height, |x, y| {
            let r = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy) / max_distance;
            let v = (255.0 * (1.0 - r).max(0.0).powi(power)).round() as u8;
            [v, v, v, 255]
        })
    }

    #[test]
    fn uniform_frame_is_clean() {
        let buffer = PixelBuffer::filled(16, 16, [200, 200, 200, 255]);
        let features = analyze(&buffer, &AnalysisConfig::default());
        assert!(features.blur_strength < 1e-12);
        assert_eq!(features.noise_strength, 0.0);
        assert!(features.vignette_strength < 1e-12);
        assert!(!features.blur_detected);
        assert!(!features.noise_detected);
        assert!(!features.vignette_detected);
    }

    #[test]
    fn checkerboard_window_variance() {
        // Every 3x3 window holds 5 of one color and 4 of the other.
        let buffer = PixelBuffer::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { WHITE } else { BLACK });
        let expected = (5.0 / 9.0) * (4.0 / 9.0) / 1000.0;
        assert!((blur_score(&plane(&buffer), 1000.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn small_normalizer_enables_blur_detection() {
        let buffer = PixelBuffer::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { WHITE } else { BLACK });

        let default = analyze(&buffer, &AnalysisConfig::default());
        assert!(default.blur_strength < 0.00025);
        assert!(!default.blur_detected);

        let config = AnalysisConfig {
            blur_normalizer: 1e-4,
            ..AnalysisConfig::default()
        };
        let features = analyze(&buffer, &config);
        assert_eq!(features.blur_strength, 1.0);
        assert!(features.blur_detected);

        // 0.2469 / 0.3 ≈ 0.82: above the threshold without clamping.
        let config = AnalysisConfig {
            blur_normalizer: 0.3,
            ..AnalysisConfig::default()
        };
        let features = analyze(&buffer, &config);
        assert!(features.blur_strength > 0.8 && features.blur_strength < 0.83);
        assert!(features.blur_detected);
    }

    #[test]
    fn alternating_rows_noise() {
        // Row-wise checkerboard: every step is a full swing, including the
        // step that wraps to the next row.
        let buffer = PixelBuffer::from_fn(5, 4, |x, y| if (x + y) % 2 == 0 { WHITE } else { BLACK });
        assert!((noise_score(&plane(&buffer)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn noise_needs_two_pixels() {
        assert_eq!(noise_score(&plane(&PixelBuffer::filled(1, 1, WHITE))), 0.0);
        assert_eq!(noise_score(&plane(&PixelBuffer::filled(0, 0, WHITE))), 0.0);
    }

    #[test]
    fn radial_falloff_is_detected_as_vignette() {
        let features = analyze(&radial(64, 64, 3), &AnalysisConfig::default());
        assert!(features.vignette_strength > 0.4);
        assert!(features.vignette_detected);
    }

    #[test]
    fn gentle_falloff_stays_below_threshold() {
        let features = analyze(&radial(64, 64, 1), &AnalysisConfig::default());
        assert!(features.vignette_strength > 0.0);
        assert!(!features.vignette_detected);
    }

    #[test]
    fn bright_corners_are_not_a_vignette() {
        let cx = 16.0;
        let buffer = PixelBuffer::from_fn(32, 32, |x, y| {
            let d = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cx);
            let v = (d / cx.hypot(cx) * 255.0).round() as u8;
            [v, v, v, 255]
        });
        assert_eq!(vignette_score(&plane(&buffer)), 0.0);
    }

    #[test]
    fn black_frame_has_no_vignette() {
        let buffer = PixelBuffer::filled(10, 10, BLACK);
        assert_eq!(vignette_score(&plane(&buffer)), 0.0);
    }

    #[test]
    fn tiny_frames_are_defined() {
        for (w, h) in [(1, 1), (2, 2), (1, 5)] {
            let features = analyze(&PixelBuffer::filled(w, h, WHITE), &AnalysisConfig::default());
            assert!(features.blur_strength.is_finite());
            assert!(features.vignette_strength.is_finite());
            assert_eq!(features.blur_strength, 0.0);
        }
    }
}
