use tracing::debug;

use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::decode::types::{COLOR_CHANNELS, ColorRaster};
use crate::scan_pipeline::features::lab::srgb_to_lab8;
use crate::scan_pipeline::features::types::ColorFeatures;

/// Running first and second moments for three channels.
#[derive(Debug, Default)]
struct ChannelMoments {
    sum: [f64; COLOR_CHANNELS],
    sum_sq: [f64; COLOR_CHANNELS],
}

impl ChannelMoments {
    fn push(&mut self, values: [u8; COLOR_CHANNELS]) {
        for (c, &v) in values.iter().enumerate() {
            let v = v as f64;
            self.sum[c] += v;
            self.sum_sq[c] += v * v;
        }
    }

    fn means(&self, n: f64) -> [f64; COLOR_CHANNELS] {
        self.sum.map(|s| s / n)
    }

    /// Population standard deviation per channel.
    fn std_devs(&self, n: f64) -> [f64; COLOR_CHANNELS] {
        let means = self.means(n);
        let mut out = [0.0; COLOR_CHANNELS];
        for c in 0..COLOR_CHANNELS {
            // Rounding can push the variance a hair below zero on flat images.
            out[c] = (self.sum_sq[c] / n - means[c] * means[c]).max(0.0).sqrt();
        }
        out
    }
}

/// Computes L*a*b* statistics and raw channel means from a decoded raster.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorFeatureExtractor;

impl ColorFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, raster: &ColorRaster) -> Result<ColorFeatures> {
        if raster.pixel_count() == 0 {
            return Err(ScanError::InvalidDimensions(raster.width, raster.height));
        }
        if !raster.is_consistent() {
            return Err(ScanError::InvalidImage(format!(
                "buffer holds {} bytes, expected {} for {}x{}x{}",
                raster.data.len(),
                raster.pixel_count() * COLOR_CHANNELS,
                raster.width,
                raster.height,
                COLOR_CHANNELS
            )));
        }

        let mut lab = ChannelMoments::default();
        let mut raw = ChannelMoments::default();
        for px in raster.pixels() {
            lab.push(srgb_to_lab8(px));
            raw.push(px);
        }

        let n = raster.pixel_count() as f64;
        let lab_means = lab.means(n);
        let lab_stds = lab.std_devs(n);

        let features = ColorFeatures {
            lab: [
                lab_means[0],
                lab_stds[0],
                lab_means[1],
                lab_stds[1],
                lab_means[2],
                lab_stds[2],
            ],
            channel_means: raw.means(n),
        };

        debug!(
            lab = ?features.lab,
            channel_means = ?features.channel_means,
            "Extracted color features"
        );
        Ok(features)
    }
}
