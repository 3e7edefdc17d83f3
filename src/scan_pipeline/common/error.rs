use std::fmt;

use thiserror::Error;

/// Failure reported by a scaler or regressor for a single input vector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("transform failed: {0}")]
    TransformFailed(String),

    #[error("internal model error: {0}")]
    Internal(String),
}

impl ModelError {
    /// Shape mismatches and transform failures are local to one candidate
    /// feature vector; anything else aborts the prediction.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ModelError::ShapeMismatch { .. } | ModelError::TransformFailed(_)
        )
    }
}

/// Which half of the model bundle rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStage {
    Scaling,
    Regression,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformStage::Scaling => write!(f, "scaling"),
            TransformStage::Regression => write!(f, "regression"),
        }
    }
}

/// A recoverable failure of one candidate feature vector.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{width}-feature candidate failed during {stage}: {source}")]
pub struct CandidateFailure {
    pub width: usize,
    pub stage: TransformStage,
    pub source: ModelError,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to load model artifact {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("Scaler expects {0} features which is unsupported")]
    UnsupportedFeatureShape(usize),

    #[error("Failed to transform features after {attempts} attempt(s): {last}")]
    AllCandidatesFailed {
        attempts: usize,
        #[source]
        last: Box<CandidateFailure>,
    },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Model error: {0}")]
    Model(ModelError),

    #[error("Invalid safe range table: {0}")]
    InvalidSafeRange(String),

    #[error("Failed to download blob {path}: {reason}")]
    BlobDownload { path: String, reason: String },

    #[error("Failed to update scan {scan_id}: {reason}")]
    StoreUpdate { scan_id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn model_load(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
        ScanError::ModelLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_model_errors() {
        assert!(ModelError::ShapeMismatch { expected: 9, actual: 6 }.is_recoverable());
        assert!(ModelError::TransformFailed("nan".into()).is_recoverable());
        assert!(!ModelError::Internal("oom".into()).is_recoverable());
    }

    #[test]
    fn test_aggregate_message_mentions_last_failure() {
        let err = ScanError::AllCandidatesFailed {
            attempts: 2,
            last: Box::new(CandidateFailure {
                width: 6,
                stage: TransformStage::Scaling,
                source: ModelError::ShapeMismatch { expected: 9, actual: 6 },
            }),
        };

        let message = err.to_string();
        assert!(message.contains("2 attempt(s)"));
        assert!(message.contains("6-feature candidate failed during scaling"));
        assert!(message.contains("expected 9 features, got 6"));
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(
            source.as_deref(),
            Some("6-feature candidate failed during scaling: expected 9 features, got 6")
        );
    }
}
