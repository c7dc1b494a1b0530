//! Image intake and grayscale extraction.

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

/// Grayscale plane sampled by the wave bands
pub struct LumaField {
    pub width: u32,
    pub height: u32,
    data: Vec<f32>,
}

impl LumaField {
    /// Decode an image file and reduce it to per-pixel luminance.
    ///
    /// Any format the `image` crate can decode is accepted. A file that
    /// fails to decode is reported to the caller; the visualization keeps
    /// whatever state it had.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("decode {}", path.display()))?
            .to_rgba8();
        Ok(Self::from_image(&image))
    }

    /// Average the R, G and B channels of each pixel (alpha ignored).
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .pixels()
            .map(|p| (p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Luminance at (x, y), clamped to the plane edges.
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.data[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_channel_average() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let field = LumaField::from_image(&image);

        // Pure red averages to a third of full scale, alpha ignored
        assert!((field.sample(0, 0) - 85.0).abs() < 0.01);
    }

    #[test]
    fn test_field_dimensions() {
        let image = RgbaImage::from_pixel(7, 3, Rgba([10, 20, 30, 255]));
        let field = LumaField::from_image(&image);

        assert_eq!(field.width, 7);
        assert_eq!(field.height, 3);
        assert_eq!(field.data.len(), 21);
    }

    #[test]
    fn test_sample_row_major() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([90, 90, 90, 255]));
        let field = LumaField::from_image(&image);

        assert_eq!(field.sample(2, 1), 90.0);
        assert_eq!(field.sample(1, 1), 0.0);
    }

    #[test]
    fn test_sample_clamps_to_edges() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        image.put_pixel(3, 3, Rgba([120, 120, 120, 255]));
        let field = LumaField::from_image(&image);

        // Out-of-range coordinates clamp to the last row/column
        assert_eq!(field.sample(100, 100), 120.0);
    }
}
