//! Model artifact loading.
//!
//! Scaler and regressor are exported by the training pipeline as two
//! independent JSON documents. [`JsonArtifactLoader`] reads both, validates
//! their fitted parameters and pairs them into a [`ModelBundle`].

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::scan_pipeline::common::config::ScanConfig;
use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::model::bundle::ModelBundle;
use crate::scan_pipeline::model::regressor::RegressorArtifact;
use crate::scan_pipeline::model::scaler::ScalerArtifact;

pub trait ArtifactLoader: Send + Sync {
    fn load(&self) -> Result<ModelBundle>;
}

impl<F> ArtifactLoader for F
where
    F: Fn() -> Result<ModelBundle> + Send + Sync,
{
    fn load(&self) -> Result<ModelBundle> {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct JsonArtifactLoader {
    scaler_path: PathBuf,
    regressor_path: PathBuf,
}

impl JsonArtifactLoader {
    pub fn new(scaler_path: impl Into<PathBuf>, regressor_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            regressor_path: regressor_path.into(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.scaler_path(), config.regressor_path())
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn regressor_path(&self) -> &Path {
        &self.regressor_path
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| ScanError::model_load(path.display(), e))?;
    debug!("Read artifact {}: {} bytes", path.display(), bytes.len());

    serde_json::from_slice(&bytes).map_err(|e| ScanError::model_load(path.display(), e))
}

impl ArtifactLoader for JsonArtifactLoader {
    fn load(&self) -> Result<ModelBundle> {
        info!(
            scaler = %self.scaler_path.display(),
            regressor = %self.regressor_path.display(),
            "Loading model artifacts"
        );

        let scaler: ScalerArtifact = read_artifact(&self.scaler_path)?;
        scaler
            .validate()
            .map_err(|e| ScanError::model_load(self.scaler_path.display(), e))?;

        let regressor: RegressorArtifact = read_artifact(&self.regressor_path)?;
        regressor
            .validate()
            .map_err(|e| ScanError::model_load(self.regressor_path.display(), e))?;

        ModelBundle::new(scaler, regressor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCALER: &str = r#"{"kind": "standard", "mean": [0,0,0,0,0,0,0,0,0], "scale": [1,1,1,1,1,1,1,1,1], "n_features_in": 9}"#;
    const REGRESSOR: &str = r#"{"kind": "linear", "coef": [0,0,0,0,0,0,0,0,0], "intercept": 6.3}"#;

    fn write_pair(dir: &TempDir, scaler: &str, regressor: &str) -> JsonArtifactLoader {
        let scaler_path = dir.path().join("scaler.json");
        let regressor_path = dir.path().join("svr_model.json");
        std::fs::write(&scaler_path, scaler).unwrap();
        std::fs::write(&regressor_path, regressor).unwrap();
        JsonArtifactLoader::new(scaler_path, regressor_path)
    }

    #[test]
    fn test_load_valid_pair() {
        let dir = TempDir::new().unwrap();
        let loader = write_pair(&dir, SCALER, REGRESSOR);

        let bundle = loader.load().unwrap();
        assert_eq!(bundle.expected_width(), Some(9));
        assert_eq!(bundle.regressor().predict(&[1.0; 9]).unwrap(), vec![6.3]);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let loader = JsonArtifactLoader::new(dir.path().join("nope.json"), dir.path().join("nada.json"));

        let err = loader.load().unwrap_err();
        assert!(matches!(err, ScanError::ModelLoad { ref path, .. } if path.ends_with("nope.json")));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        let loader = write_pair(&dir, SCALER, "{ not json");

        assert!(matches!(loader.load(), Err(ScanError::ModelLoad { .. })));
    }

    #[test]
    fn test_invalid_parameters() {
        let dir = TempDir::new().unwrap();
        let loader = write_pair(
            &dir,
            r#"{"kind": "standard", "mean": [0, 0], "scale": [1]}"#,
            REGRESSOR,
        );

        assert!(matches!(loader.load(), Err(ScanError::ModelLoad { .. })));
    }

    #[test]
    fn test_width_disagreement_between_artifacts() {
        let dir = TempDir::new().unwrap();
        let loader = write_pair(
            &dir,
            SCALER,
            r#"{"kind": "linear", "coef": [0,0,0,0,0,0], "intercept": 6.3}"#,
        );

        assert!(matches!(loader.load(), Err(ScanError::ModelLoad { .. })));
    }

    #[test]
    fn test_from_config_paths() {
        let config = ScanConfig::builder().model_dir("/srv/models").build();
        let loader = JsonArtifactLoader::from_config(&config);
        assert_eq!(loader.scaler_path(), Path::new("/srv/models/scaler.json"));
        assert_eq!(loader.regressor_path(), Path::new("/srv/models/svr_model.json"));
    }
}
