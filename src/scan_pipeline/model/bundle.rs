use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::model::artifact::ArtifactLoader;
use crate::scan_pipeline::model::regressor::Regressor;
use crate::scan_pipeline::model::scaler::FeatureScaler;

/// A fitted scaler and regressor from the same training run.
pub struct ModelBundle {
    scaler: Box<dyn FeatureScaler>,
    regressor: Box<dyn Regressor>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("scaler_width", &self.scaler.expected_width())
            .field("regressor_width", &self.regressor.expected_width())
            .finish()
    }
}

impl ModelBundle {
    /// Pairs a scaler with a regressor, rejecting pairs whose reported
    /// feature counts disagree.
    pub fn new(
        scaler: impl FeatureScaler + 'static,
        regressor: impl Regressor + 'static,
    ) -> Result<Self> {
        if let (Some(s), Some(r)) = (scaler.expected_width(), regressor.expected_width()) {
            if s != r {
                return Err(ScanError::model_load(
                    "model bundle",
                    format!("scaler expects {} features but regressor expects {}", s, r),
                ));
            }
        }

        Ok(Self {
            scaler: Box::new(scaler),
            regressor: Box::new(regressor),
        })
    }

    /// Scaler input width, `None` when the artifact does not report one.
    pub fn expected_width(&self) -> Option<usize> {
        self.scaler.expected_width()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }
}

/// Process-wide, lazily populated holder of the model bundle.
///
/// The first caller of [`ModelCache::get_or_load`] runs the loader while
/// holding the cache lock, so racing first calls load once. A failed load
/// leaves the cache empty and the next call tries again.
pub struct ModelCache<L: ArtifactLoader> {
    loader: L,
    slot: Mutex<Option<Arc<ModelBundle>>>,
}

impl<L: ArtifactLoader> ModelCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
        }
    }

    pub fn get_or_load(&self) -> Result<Arc<ModelBundle>> {
        // The slot is only written after a successful load, so a poisoned
        // lock still guards a valid value.
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(bundle) = slot.as_ref() {
            return Ok(Arc::clone(bundle));
        }

        info!("Loading model bundle");
        match self.loader.load() {
            Ok(bundle) => {
                debug!(expected_width = ?bundle.expected_width(), "Model bundle loaded");
                let bundle = Arc::new(bundle);
                *slot = Some(Arc::clone(&bundle));
                Ok(bundle)
            }
            Err(e) => {
                warn!("Model bundle load failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
