//! Feature vector types

/// Number of L*a*b* statistics: mean and std of each channel.
pub const LAB_FEATURE_COUNT: usize = 6;
/// Number of raw channel means appended in the extended layout.
pub const CHANNEL_MEAN_COUNT: usize = 3;
/// Width of the extended layout.
pub const EXTENDED_FEATURE_COUNT: usize = LAB_FEATURE_COUNT + CHANNEL_MEAN_COUNT;

/// Ordered feature values handed to the scaler.
pub type FeatureVector = Vec<f64>;

/// Both feature groups extracted from one image
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFeatures {
    /// [L_mean, L_std, A_mean, A_std, B_mean, B_std]
    pub lab: [f64; LAB_FEATURE_COUNT],
    /// Raw channel means in codec order (R, G, B for decoded photos)
    pub channel_means: [f64; CHANNEL_MEAN_COUNT],
}

impl ColorFeatures {
    pub fn lab_only(&self) -> FeatureVector {
        self.lab.to_vec()
    }

    pub fn extended(&self) -> FeatureVector {
        let mut features = Vec::with_capacity(EXTENDED_FEATURE_COUNT);
        features.extend_from_slice(&self.lab);
        features.extend_from_slice(&self.channel_means);
        features
    }

    pub fn all_finite(&self) -> bool {
        self.lab
            .iter()
            .chain(self.channel_means.iter())
            .all(|v| v.is_finite())
    }
}
