//! pH regressors.

use serde::Deserialize;

use crate::scan_pipeline::common::error::ModelError;

pub trait Regressor: Send + Sync {
    /// Feature count the regressor was fitted with, if known.
    fn expected_width(&self) -> Option<usize> {
        None
    }

    /// Predicts from one scaled feature vector. The first output is the pH.
    fn predict(&self, scaled: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Kernel function of a support vector regressor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let dist_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * dist_sq).exp()
            }
            Kernel::Poly { gamma, coef0, degree } => {
                (gamma * dot(a, b) + coef0).powi(*degree as i32)
            }
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Epsilon-SVR in dual form: `sum_i dual_coef[i] * K(sv_i, x) + intercept`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SvrRegressor {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
}

impl SvrRegressor {
    pub fn width(&self) -> Option<usize> {
        self.support_vectors.first().map(Vec::len)
    }

    pub fn validate(&self) -> Result<(), String> {
        let width = self.width().ok_or("SVR has no support vectors")?;
        if width == 0 {
            return Err("SVR support vectors are empty".to_string());
        }
        if self.support_vectors.iter().any(|sv| sv.len() != width) {
            return Err("SVR support vectors have inconsistent widths".to_string());
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return Err(format!(
                "{} dual coefficients for {} support vectors",
                self.dual_coef.len(),
                self.support_vectors.len()
            ));
        }
        Ok(())
    }
}

impl Regressor for SvrRegressor {
    fn expected_width(&self) -> Option<usize> {
        self.width()
    }

    fn predict(&self, scaled: &[f64]) -> Result<Vec<f64>, ModelError> {
        let width = self
            .width()
            .ok_or_else(|| ModelError::Internal("SVR has no support vectors".to_string()))?;
        if scaled.len() != width {
            return Err(ModelError::ShapeMismatch {
                expected: width,
                actual: scaled.len(),
            });
        }

        let decision: f64 = self
            .support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * self.kernel.apply(sv, scaled))
            .sum();
        Ok(vec![decision + self.intercept])
    }
}

/// Ordinary linear model: `coef · x + intercept`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearRegressor {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn expected_width(&self) -> Option<usize> {
        Some(self.coef.len())
    }

    fn predict(&self, scaled: &[f64]) -> Result<Vec<f64>, ModelError> {
        if scaled.len() != self.coef.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coef.len(),
                actual: scaled.len(),
            });
        }
        Ok(vec![dot(&self.coef, scaled) + self.intercept])
    }
}

/// Serialized regressor as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Svr(SvrRegressor),
    Linear(LinearRegressor),
}

impl RegressorArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RegressorArtifact::Svr(m) => m.validate(),
            RegressorArtifact::Linear(m) => m.validate(),
        }
    }
}

impl Regressor for RegressorArtifact {
    fn expected_width(&self) -> Option<usize> {
        match self {
            RegressorArtifact::Svr(m) => m.expected_width(),
            RegressorArtifact::Linear(m) => m.expected_width(),
        }
    }

    fn predict(&self, scaled: &[f64]) -> Result<Vec<f64>, ModelError> {
        match self {
            RegressorArtifact::Svr(m) => m.predict(scaled),
            RegressorArtifact::Linear(m) => m.predict(scaled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rbf_svr_prediction() {
        let svr = SvrRegressor {
            kernel: Kernel::Rbf { gamma: 0.5 },
            support_vectors: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            dual_coef: vec![1.0, -2.0],
            intercept: 6.0,
        };

        let out = svr.predict(&[0.0, 0.0]).unwrap();
        // K(sv0, x) = 1, K(sv1, x) = exp(-0.5 * 2)
        let expected = 6.0 + 1.0 - 2.0 * (-1.0f64).exp();
        assert!((out[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_linear_kernel_matches_dot_product() {
        let svr = SvrRegressor {
            kernel: Kernel::Linear,
            support_vectors: vec![vec![1.0, 2.0, 3.0]],
            dual_coef: vec![0.5],
            intercept: 1.0,
        };
        assert_eq!(svr.predict(&[1.0, 1.0, 1.0]).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_poly_and_sigmoid_kernels() {
        let poly = Kernel::Poly { gamma: 1.0, coef0: 1.0, degree: 2 };
        assert_eq!(poly.apply(&[1.0, 2.0], &[3.0, 4.0]), 144.0);

        let sigmoid = Kernel::Sigmoid { gamma: 0.0, coef0: 0.0 };
        assert_eq!(sigmoid.apply(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_svr_rejects_wrong_width() {
        let svr = SvrRegressor {
            kernel: Kernel::Rbf { gamma: 0.1 },
            support_vectors: vec![vec![0.0; 9]],
            dual_coef: vec![1.0],
            intercept: 0.0,
        };
        let err = svr.predict(&[0.0; 6]).unwrap_err();
        assert_eq!(err, ModelError::ShapeMismatch { expected: 9, actual: 6 });
        assert_eq!(svr.expected_width(), Some(9));
    }

    #[test]
    fn test_linear_regressor() {
        let model = LinearRegressor {
            coef: vec![0.1, -0.2],
            intercept: 6.5,
        };
        let out = model.predict(&[1.0, 1.0]).unwrap();
        assert!((out[0] - 6.4).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_svr_artifact() {
        let json = r#"{
            "kind": "svr",
            "kernel": {"type": "rbf", "gamma": 0.25},
            "support_vectors": [[0, 0, 0, 0, 0, 0]],
            "dual_coef": [0.3],
            "intercept": 6.2
        }"#;
        let artifact: RegressorArtifact = serde_json::from_str(json).unwrap();

        assert!(artifact.validate().is_ok());
        assert_eq!(artifact.expected_width(), Some(6));
        let out = artifact.predict(&[0.0; 6]).unwrap();
        assert!((out[0] - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate_catches_malformed_svr() {
        let svr = SvrRegressor {
            kernel: Kernel::Linear,
            support_vectors: vec![vec![0.0; 6], vec![0.0; 9]],
            dual_coef: vec![1.0, 1.0],
            intercept: 0.0,
        };
        assert!(svr.validate().is_err());

        let svr = SvrRegressor {
            kernel: Kernel::Linear,
            support_vectors: Vec::new(),
            dual_coef: Vec::new(),
            intercept: 0.0,
        };
        assert!(svr.validate().is_err());
    }
}
