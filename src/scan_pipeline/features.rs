//! Color feature extraction module
//!
//! Reduces a decoded raster to the fixed-order color statistics the pH
//! regressors were fitted on.

mod extractor;
pub mod lab;
pub mod types;

pub use extractor::ColorFeatureExtractor;
pub use types::{
    CHANNEL_MEAN_COUNT, ColorFeatures, EXTENDED_FEATURE_COUNT, FeatureVector, LAB_FEATURE_COUNT,
};
