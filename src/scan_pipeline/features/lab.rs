//! sRGB to 8-bit CIE L*a*b* conversion.
//!
//! The regressors were fitted on L*a*b* values stored as bytes: L scaled from
//! 0..100 onto 0..255, a and b shifted by +128, every channel rounded and
//! saturated per pixel. Statistics must be taken over those quantized values
//! to match the training distribution.

use palette::{FromColor, Lab, Srgb};

const LIGHTNESS_SCALE: f32 = 255.0 / 100.0;
const CHROMA_OFFSET: f32 = 128.0;

/// Converts one sRGB pixel (D65 white) into quantized `[L, a, b]` bytes.
pub fn srgb_to_lab8(rgb: [u8; 3]) -> [u8; 3] {
    let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let lab: Lab = Lab::from_color(srgb);

    [
        saturate(lab.l * LIGHTNESS_SCALE),
        saturate(lab.a + CHROMA_OFFSET),
        saturate(lab.b + CHROMA_OFFSET),
    ]
}

fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
