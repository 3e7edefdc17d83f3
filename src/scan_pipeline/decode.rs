//! Image decoding module
//!
//! Turns encoded photo bytes into a decoded 3-channel raster.

mod decoder;
mod image_decoder;
pub mod types;

pub use decoder::ImageDecoder;
pub use image_decoder::StandardImageDecoder;
pub use types::{COLOR_CHANNELS, ColorRaster};
