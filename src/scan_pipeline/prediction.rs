//! pH prediction module
//!
//! Runs color features through the model bundle, trying each feature layout
//! the bundle may have been fitted on until one is accepted.

mod candidates;
mod pipeline;


pub use candidates::{AttemptOutcome, CandidatePlan, FeatureShape};
pub use pipeline::{Prediction, PredictionPipeline};
