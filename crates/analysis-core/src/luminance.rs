//! Brightness helpers shared by the analyzers.
//!
//! Brightness here is the plain channel mean `(r + g + b) / 3` on a
//! 0–255 scale. Color contrast uses Rec. 709 weights instead; see
//! [`framesight_frame_model::Rgb::relative_luminance`].

use framesight_frame_model::PixelBuffer;

/// Channel-mean brightness of one RGBA pixel, `[0, 255]`.
#[inline]
pub fn pixel_brightness(px: &[u8]) -> f64 {
    (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0
}

/// A dense brightness plane computed once per analyzer family.
#[derive(Debug, Clone)]
pub struct LumaPlane {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl LumaPlane {
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        Self {
            width: buffer.width() as usize,
            height: buffer.height() as usize,
            values: buffer.pixels().map(pixel_brightness).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Brightness at `(x, y)`; callers stay in bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Values in raster order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of pixels that have all 8 neighbors.
    pub fn interior_len(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_is_channel_mean() {
        assert_eq!(pixel_brightness(&[30, 60, 90, 255]), 60.0);
        assert_eq!(pixel_brightness(&[255, 255, 255, 0]), 255.0);
    }

    #[test]
    fn plane_indexes_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| {
            let v = (y * 3 + x) as u8 * 10;
            [v, v, v, 255]
        });
        let plane = LumaPlane::from_buffer(&buffer);
        assert_eq!(plane.at(0, 0), 0.0);
        assert_eq!(plane.at(2, 1), 50.0);
        // 3x2 has no row with neighbors above and below.
        assert_eq!(plane.interior_len(), 0);
    }

    #[test]
    fn interior_of_tiny_planes_is_empty() {
        let plane = LumaPlane::from_buffer(&PixelBuffer::filled(1, 1, [0, 0, 0, 255]));
        assert_eq!(plane.interior_len(), 0);
        let plane = LumaPlane::from_buffer(&PixelBuffer::filled(3, 3, [0, 0, 0, 255]));
        assert_eq!(plane.interior_len(), 1);
    }
}
