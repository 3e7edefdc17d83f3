//! Scan pipeline configuration types

use std::path::PathBuf;

/// Configuration for the freshness scan pipeline
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory holding the fitted scaler and regressor artifacts
    pub model_dir: PathBuf,
    /// Scaler artifact file name, relative to `model_dir`
    pub scaler_file: String,
    /// Regressor artifact file name, relative to `model_dir`
    pub regressor_file: String,
    /// Version tag written alongside every completed scan
    pub model_version: String,
    /// Whether to validate image dimensions before feature extraction
    pub validate_dimensions: bool,
    /// Largest accepted width or height, in pixels; unbounded when `None`
    pub max_dimension: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            scaler_file: "scaler.json".to_string(),
            regressor_file: "svr_model.json".to_string(),
            model_version: "svr_v2".to_string(),
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(&self.scaler_file)
    }

    pub fn regressor_path(&self) -> PathBuf {
        self.model_dir.join(&self.regressor_file)
    }
}

/// Builder for ScanConfig
#[derive(Default)]
pub struct ScanConfigBuilder {
    model_dir: Option<PathBuf>,
    scaler_file: Option<String>,
    regressor_file: Option<String>,
    model_version: Option<String>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl ScanConfigBuilder {
    pub fn model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    pub fn scaler_file(mut self, name: impl Into<String>) -> Self {
        self.scaler_file = Some(name.into());
        self
    }

    pub fn regressor_file(mut self, name: impl Into<String>) -> Self {
        self.regressor_file = Some(name.into());
        self
    }

    pub fn model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = Some(version.into());
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ScanConfig {
        let default = ScanConfig::default();
        ScanConfig {
            model_dir: self.model_dir.unwrap_or(default.model_dir),
            scaler_file: self.scaler_file.unwrap_or(default.scaler_file),
            regressor_file: self.regressor_file.unwrap_or(default.regressor_file),
            model_version: self.model_version.unwrap_or(default.model_version),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
