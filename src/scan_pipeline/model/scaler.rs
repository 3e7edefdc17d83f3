//! Feature scalers.
//!
//! A scaler maps raw color statistics onto the distribution the regressor was
//! fitted on. Exported scalers carry their fitted per-feature parameters and,
//! when the training run recorded it, the number of features they were fitted
//! with. That count drives candidate selection in the prediction pipeline.

use serde::Deserialize;

use crate::scan_pipeline::common::error::ModelError;

pub trait FeatureScaler: Send + Sync {
    /// Feature count the scaler was fitted with, if the artifact reports it.
    fn expected_width(&self) -> Option<usize>;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

fn check_width(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

fn check_finite(values: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::TransformFailed(
            "scaled features contain non-finite values".to_string(),
        ));
    }
    Ok(values)
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub n_features_in: Option<usize>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("standard scaler has no parameters".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(n) = self.n_features_in {
            if n != self.mean.len() {
                return Err(format!(
                    "n_features_in is {} but {} parameters were fitted",
                    n,
                    self.mean.len()
                ));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn expected_width(&self) -> Option<usize> {
        self.n_features_in
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.mean.len(), features)?;
        let scaled = features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // Zero-variance features are fitted with scale 1.0.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect();
        check_finite(scaled)
    }
}

/// Range scaling: `x * scale + min`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub n_features_in: Option<usize>,
}

impl MinMaxScaler {
    pub fn validate(&self) -> Result<(), String> {
        if self.min.is_empty() {
            return Err("min-max scaler has no parameters".to_string());
        }
        if self.min.len() != self.scale.len() {
            return Err(format!(
                "min has {} entries but scale has {}",
                self.min.len(),
                self.scale.len()
            ));
        }
        if let Some(n) = self.n_features_in {
            if n != self.min.len() {
                return Err(format!(
                    "n_features_in is {} but {} parameters were fitted",
                    n,
                    self.min.len()
                ));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for MinMaxScaler {
    fn expected_width(&self) -> Option<usize> {
        self.n_features_in
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.min.len(), features)?;
        let scaled = features
            .iter()
            .zip(self.min.iter().zip(self.scale.iter()))
            .map(|(x, (min, scale))| x * scale + min)
            .collect();
        check_finite(scaled)
    }
}

/// Serialized scaler as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScalerArtifact::Standard(s) => s.validate(),
            ScalerArtifact::MinMax(s) => s.validate(),
        }
    }
}

impl FeatureScaler for ScalerArtifact {
    fn expected_width(&self) -> Option<usize> {
        match self {
            ScalerArtifact::Standard(s) => s.expected_width(),
            ScalerArtifact::MinMax(s) => s.expected_width(),
        }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        match self {
            ScalerArtifact::Standard(s) => s.transform(features),
            ScalerArtifact::MinMax(s) => s.transform(features),
        }
    }
}
