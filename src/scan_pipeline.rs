//! Food freshness scan pipeline
//!
//! Estimates the pH of a photographed pH-indicator strip from its color
//! statistics and rates the food's freshness against a per-food safe range.
//! Decoding, feature extraction, prediction and classification live in
//! separate modules; `scan` wires them to photo storage and scan documents.

pub mod analyzer;
pub mod common;
pub mod decode;
pub mod features;
pub mod freshness;
pub mod model;
pub mod prediction;
pub mod scan;

pub use common::{ModelError, Result, ScanConfig, ScanConfigBuilder, ScanError};

pub use analyzer::ScanAnalyzer;

pub use decode::{ColorRaster, ImageDecoder, StandardImageDecoder};

pub use features::{ColorFeatureExtractor, ColorFeatures, FeatureVector};

pub use model::{ArtifactLoader, JsonArtifactLoader, ModelBundle, ModelCache};

pub use prediction::{Prediction, PredictionPipeline};

pub use freshness::{Freshness, SafeRange, SafeRangeTable, ScanResult, classify};

pub use scan::{
    BlobStore, FsBlobStore, HandleOutcome, JsonLinesScanStore, MemoryScanStore, ScanRecord,
    ScanRequestHandler, ScanStore, ScanUpdate,
};
