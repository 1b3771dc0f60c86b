//! Shape and text likelihood from edge and local-contrast maps.

use framesight_common::config::AnalysisConfig;
use framesight_frame_model::{ElementFeatures, PixelBuffer};

use crate::luminance::LumaPlane;

/// Fixed divisor of the local-contrast sum. Border pixels have fewer than
/// four neighbors but are still divided by four.
pub const LOCAL_CONTRAST_DIVISOR: f64 = 4.0;

/// Sobel gradient magnitude at an interior pixel.
pub fn sobel_magnitude(plane: &LumaPlane, x: usize, y: usize) -> f64 {
    let p = |dx: isize, dy: isize| {
        plane.at(
            (x as isize + dx) as usize,
            (y as isize + dy) as usize,
        )
    };

    let gx = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
    let gy = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));

    (gx * gx + gy * gy).sqrt()
}

/// Percentage of interior pixels whose Sobel magnitude exceeds `threshold`.
///
/// The one-pixel border is never classified. Frames without interior
/// pixels have zero edge density.
pub fn edge_density(plane: &LumaPlane, threshold: f64) -> f64 {
    let interior = plane.interior_len();
    if interior == 0 {
        return 0.0;
    }

    let mut edges = 0usize;
    for y in 1..plane.height() - 1 {
        for x in 1..plane.width() - 1 {
            if sobel_magnitude(plane, x, y) > threshold {
                edges += 1;
            }
        }
    }

    edges as f64 / interior as f64 * 100.0
}

/// Local contrast of one pixel: summed per-channel absolute difference to
/// its in-bounds axis neighbors, over [`LOCAL_CONTRAST_DIVISOR`].
pub fn local_contrast(buffer: &PixelBuffer, x: u32, y: u32) -> f64 {
    let center = buffer.pixel(x, y);
    let (w, h) = (buffer.width(), buffer.height());

    let neighbors = [
        (x.checked_sub(1), Some(y)),
        (x.checked_add(1).filter(|nx| *nx < w), Some(y)),
        (Some(x), y.checked_sub(1)),
        (Some(x), y.checked_add(1).filter(|ny| *ny < h)),
    ];

    let mut sum = 0u32;
    for (nx, ny) in neighbors {
        if let (Some(nx), Some(ny)) = (nx, ny) {
            let other = buffer.pixel(nx, ny);
            sum += (0..3)
                .map(|c| center[c].abs_diff(other[c]) as u32)
                .sum::<u32>();
        }
    }

    sum as f64 / LOCAL_CONTRAST_DIVISOR
}

/// Fraction of pixels whose local contrast exceeds `threshold`.
pub fn high_contrast_fraction(buffer: &PixelBuffer, threshold: f64) -> f64 {
    let total = buffer.pixel_count();
    if total == 0 {
        return 0.0;
    }

    let mut high = 0usize;
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if local_contrast(buffer, x, y) > threshold {
                high += 1;
            }
        }
    }

    high as f64 / total as f64
}

/// Compute element features for a frame.
pub fn analyze(buffer: &PixelBuffer, config: &AnalysisConfig) -> ElementFeatures {
    let plane = LumaPlane::from_buffer(buffer);

    let density = edge_density(&plane, config.edge_magnitude_threshold);
    let shapes_detected = density > config.shape_density_threshold_pct;

    let text_density = high_contrast_fraction(buffer, config.text_contrast_threshold);
    let text_detected = text_density > config.text_density_threshold;

    ElementFeatures {
        shapes_detected,
        shape_confidence: (density / 50.0).min(1.0),
        edge_density: density,
        text_detected,
        text_confidence: (text_density * 20.0).min(1.0),
        text_density,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn vertical_step_has_strong_horizontal_gradient() {
        let buffer = PixelBuffer::from_fn(3, 3, |x, _| if x == 2 { WHITE } else { BLACK });
        let plane = LumaPlane::from_buffer(&buffer);
        // gx = (255 + 510 + 255) - 0
        assert!((sobel_magnitude(&plane, 1, 1) - 1020.0).abs() < 1e-9);
    }

    #[test]
    fn one_pixel_checkerboard_cancels_in_sobel() {
        let buffer = PixelBuffer::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { WHITE } else { BLACK });
        let plane = LumaPlane::from_buffer(&buffer);
        assert_eq!(edge_density(&plane, 100.0), 0.0);
    }

    #[test]
    fn two_pixel_checkerboard_is_all_edges() {
        let buffer = PixelBuffer::from_fn(16, 16, |x, y| {
            if ((x / 2) + (y / 2)) % 2 == 0 {
                WHITE
            } else {
                BLACK
            }
        });
        let features = analyze(&buffer, &AnalysisConfig::default());
        assert!((features.edge_density - 100.0).abs() < 1e-9);
        assert!(features.shapes_detected);
        assert_eq!(features.shape_confidence, 1.0);
    }

    #[test]
    fn border_contrast_uses_fixed_divisor() {
        // Corner pixel of a 2x1 black/white frame has one neighbor.
        let buffer = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { WHITE } else { BLACK });
        assert!((local_contrast(&buffer, 0, 0) - 765.0 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn lone_edge_between_similar_pixels_stays_below_threshold() {
        // Each neighbor differs by 30 per channel: two neighbors give 180 / 4 = 45.
        let buffer = PixelBuffer::from_fn(3, 1, |x, _| {
            if x == 1 {
                [130, 130, 130, 255]
            } else {
                [100, 100, 100, 255]
            }
        });
        assert!((local_contrast(&buffer, 1, 0) - 45.0).abs() < 1e-9);
        assert_eq!(high_contrast_fraction(&buffer, 100.0), 0.0);
    }

    #[test]
    fn sparse_high_contrast_marks_text() {
        // A single bright pixel in a dark 6x6 frame: itself plus four neighbors.
        let buffer = PixelBuffer::from_fn(6, 6, |x, y| if x == 2 && y == 2 { WHITE } else { BLACK });
        let features = analyze(&buffer, &AnalysisConfig::default());
        assert!((features.text_density - 5.0 / 36.0).abs() < 1e-12);
        assert!(features.text_detected);
        assert_eq!(features.text_confidence, 1.0);
    }

    #[test]
    fn uniform_frame_has_no_elements() {
        let buffer = PixelBuffer::filled(12, 9, [40, 80, 120, 255]);
        let features = analyze(&buffer, &AnalysisConfig::default());
        assert_eq!(features.edge_density, 0.0);
        assert_eq!(features.text_density, 0.0);
        assert!(!features.shapes_detected);
        assert!(!features.text_detected);
    }

    #[test]
    fn tiny_frames_have_no_interior() {
        let buffer = PixelBuffer::filled(2, 2, WHITE);
        let features = analyze(&buffer, &AnalysisConfig::default());
        assert_eq!(features.edge_density, 0.0);
        assert!(!features.shapes_detected);
    }
}
