//! Decoded image types

use image::RgbImage;

pub const COLOR_CHANNELS: usize = 3;

/// Decoded 8-bit, 3-channel raster
#[derive(Debug, Clone)]
pub struct ColorRaster {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Interleaved pixel data in codec channel order [c0, c1, c2, c0, ...]
    pub data: Vec<u8>,
}

impl ColorRaster {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; COLOR_CHANNELS]> + '_ {
        self.data
            .chunks_exact(COLOR_CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// True when the buffer length agrees with the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.pixel_count() * COLOR_CHANNELS
    }
}

impl From<RgbImage> for ColorRaster {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            data: image.into_raw(),
        }
    }
}
