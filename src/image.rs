//! Raster image decoding and nearest-neighbor sampling
//!
//! The reference image is decoded once into an RGBA8 buffer (alpha is forced
//! present even when the source lacks it) and sampled by normalized UV
//! coordinates. Sampling is deliberately nearest-neighbor: output grids are
//! coarse and print-scale color bleed from the nearest pixel is
//! imperceptible.

use crate::color::Rgb;
use crate::error::Result;

/// Number of channels in the decoded buffer (always RGBA)
pub const CHANNELS: usize = 4;

/// A decoded RGBA8 image
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// Raw pixel data, `width * height * 4` bytes, row-major
    pub pixels: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl RasterImage {
    /// Decode PNG or JPEG bytes into an RGBA8 buffer
    ///
    /// Fails with a decode error on malformed image bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Build an image from an existing RGBA8 buffer
    ///
    /// The buffer length must be `width * height * 4`.
    pub fn from_rgba8(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * CHANNELS);
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Sample the pixel nearest to normalized coordinates `(u, v)`
    ///
    /// `u` and `v` are clamped to `[0, 1]` (never wrapped), then mapped to
    /// `x = floor(u * (width - 1))`, `y = floor(v * (height - 1))`. Alpha is
    /// ignored.
    pub fn sample(&self, u: f64, v: f64) -> Rgb {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let x = (u * (self.width.saturating_sub(1)) as f64).floor() as usize;
        let y = (v * (self.height.saturating_sub(1)) as f64).floor() as usize;

        let idx = (y * self.width as usize + x) * CHANNELS;
        Rgb::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 image: top-left red, top-right green, bottom-left blue,
    /// bottom-right white.
    fn quadrants() -> RasterImage {
        #[rustfmt::skip]
        let pixels = vec![
            255, 0, 0, 255,    0, 255, 0, 255,
            0, 0, 255, 255,    255, 255, 255, 255,
        ];
        RasterImage::from_rgba8(pixels, 2, 2)
    }

    #[test]
    fn test_sample_corners() {
        let img = quadrants();
        assert_eq!(img.sample(0.0, 0.0), Rgb::new(255, 0, 0));
        assert_eq!(img.sample(1.0, 0.0), Rgb::new(0, 255, 0));
        assert_eq!(img.sample(0.0, 1.0), Rgb::new(0, 0, 255));
        assert_eq!(img.sample(1.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let img = quadrants();
        assert_eq!(img.sample(-0.5, -3.0), img.sample(0.0, 0.0));
        assert_eq!(img.sample(1.5, 2.0), img.sample(1.0, 1.0));
        assert_eq!(img.sample(f64::MIN, 0.0), img.sample(0.0, 0.0));
    }

    #[test]
    fn test_sample_interior_floors_down() {
        let img = quadrants();
        // floor(0.99 * 1) == 0: anything below u == 1 stays in the left column
        assert_eq!(img.sample(0.99, 0.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_sample_single_pixel_image() {
        let img = RasterImage::from_rgba8(vec![7, 8, 9, 255], 1, 1);
        assert_eq!(img.sample(0.5, 0.5), Rgb::new(7, 8, 9));
        assert_eq!(img.sample(1.0, 1.0), Rgb::new(7, 8, 9));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = RasterImage::decode(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap_err();
        assert!(err.to_string().contains("[E3002]"));
    }

    #[test]
    fn test_decode_png_forces_alpha() {
        // Encode an RGB (no alpha) PNG and confirm decode yields RGBA
        let rgb = image::RgbImage::from_pixel(2, 1, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        rgb.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let img = RasterImage::decode(&bytes).unwrap();
        assert_eq!(img.pixels.len(), 2 * 1 * CHANNELS);
        assert_eq!(img.sample(0.0, 0.0), Rgb::new(10, 20, 30));
        assert_eq!(img.pixels[3], 255);
    }
}
