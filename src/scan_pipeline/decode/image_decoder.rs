//! Photo decoder backed by the `image` crate.
//!
//! Accepts any container the enabled codecs understand (PNG, JPEG, WebP) and
//! always yields a 3-channel RGB raster, dropping alpha and expanding
//! grayscale, so downstream feature extraction sees a single layout.

use tracing::debug;

use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::decode::decoder::ImageDecoder;
use crate::scan_pipeline::decode::types::ColorRaster;

pub struct StandardImageDecoder;

impl ImageDecoder for StandardImageDecoder {
    /// Decodes encoded image bytes into an RGB raster.
    ///
    /// # Errors
    ///
    /// * `ScanError::InvalidImage` - the bytes are not a decodable image, or
    ///   decode to an image with zero area
    fn decode(&self, data: &[u8]) -> Result<ColorRaster> {
        debug!("Decoding image, {} bytes", data.len());

        if data.is_empty() {
            return Err(ScanError::InvalidImage("empty image buffer".to_string()));
        }

        let decoded = image::load_from_memory(data)
            .map_err(|e| ScanError::InvalidImage(format!("decode failed: {}", e)))?;

        let raster = ColorRaster::from(decoded.to_rgb8());
        if raster.pixel_count() == 0 {
            return Err(ScanError::InvalidImage(format!(
                "decoded image has no pixels ({}x{})",
                raster.width, raster.height
            )));
        }

        debug!("Decoded image: {}x{}", raster.width, raster.height);
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn encode(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_keeps_rgb_order() {
        let image = RgbImage::from_pixel(4, 2, Rgb([200, 100, 50]));
        let raster = StandardImageDecoder
            .decode(&encode(DynamicImage::ImageRgb8(image)))
            .unwrap();

        assert_eq!((raster.width, raster.height), (4, 2));
        assert!(raster.is_consistent());
        assert!(raster.pixels().all(|px| px == [200, 100, 50]));
    }

    #[test]
    fn test_decode_drops_alpha() {
        let image = RgbaImage::from_pixel(3, 3, image::Rgba([10, 20, 30, 0]));
        let raster = StandardImageDecoder
            .decode(&encode(DynamicImage::ImageRgba8(image)))
            .unwrap();

        assert_eq!(raster.data.len(), 3 * 3 * 3);
        assert_eq!(raster.pixels().next(), Some([10, 20, 30]));
    }

    #[test]
    fn test_decode_garbage_is_invalid_image() {
        let result = StandardImageDecoder.decode(b"definitely not a jpeg");
        assert!(matches!(result, Err(ScanError::InvalidImage(_))));
    }

    #[test]
    fn test_decode_empty_buffer_is_invalid_image() {
        let result = StandardImageDecoder.decode(&[]);
        assert!(matches!(result, Err(ScanError::InvalidImage(_))));
    }
}
