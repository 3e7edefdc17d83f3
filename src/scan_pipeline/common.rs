//! Common utilities module
//!
//! Error types and configuration shared across the scan pipeline.

pub mod config;
pub mod error;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{CandidateFailure, ModelError, Result, ScanError, TransformStage};
