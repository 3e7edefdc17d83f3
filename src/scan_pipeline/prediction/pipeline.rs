use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::scan_pipeline::common::error::{
    CandidateFailure, ModelError, Result, ScanError, TransformStage,
};
use crate::scan_pipeline::decode::ColorRaster;
use crate::scan_pipeline::features::{ColorFeatureExtractor, ColorFeatures};
use crate::scan_pipeline::model::{ArtifactLoader, ModelBundle, ModelCache};
use crate::scan_pipeline::prediction::candidates::{AttemptOutcome, CandidatePlan, FeatureShape};

/// A pH estimate and the feature layout that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub ph: f64,
    pub shape: FeatureShape,
    /// Candidates tried, including the successful one
    pub attempts: usize,
}

/// Image → pH estimation with feature-shape fallback.
pub struct PredictionPipeline<L: ArtifactLoader> {
    models: Arc<ModelCache<L>>,
    extractor: ColorFeatureExtractor,
}

impl<L: ArtifactLoader> PredictionPipeline<L> {
    pub fn new(models: Arc<ModelCache<L>>) -> Self {
        Self {
            models,
            extractor: ColorFeatureExtractor::new(),
        }
    }

    pub fn models(&self) -> &Arc<ModelCache<L>> {
        &self.models
    }

    #[instrument(skip(self, raster), fields(width = raster.width, height = raster.height))]
    pub fn predict(&self, raster: &ColorRaster) -> Result<Prediction> {
        let bundle = self.models.get_or_load()?;

        let features = {
            let _span = tracing::info_span!("extract_features").entered();
            self.extractor.extract(raster)?
        };

        let plan = CandidatePlan::for_expected_width(bundle.expected_width())?;
        debug!(candidates = ?plan.shapes(), "Candidate plan selected");

        let mut failures = Vec::with_capacity(plan.len());
        for &shape in plan.shapes() {
            match attempt(&bundle, &features, shape)? {
                AttemptOutcome::Predicted(ph) => {
                    info!(ph, width = shape.width(), "pH predicted");
                    return Ok(Prediction {
                        ph,
                        shape,
                        attempts: failures.len() + 1,
                    });
                }
                AttemptOutcome::Failed(failure) => {
                    warn!("Candidate rejected: {}", failure);
                    failures.push(failure);
                }
            }
        }

        let attempts = failures.len();
        let last = failures.pop().ok_or_else(|| {
            ScanError::Model(ModelError::Internal("candidate plan was empty".to_string()))
        })?;
        Err(ScanError::AllCandidatesFailed {
            attempts,
            last: Box::new(last),
        })
    }
}

/// Scales and regresses one candidate. Recoverable model errors become
/// `AttemptOutcome::Failed`; anything else is returned as an error.
fn attempt(
    bundle: &ModelBundle,
    features: &ColorFeatures,
    shape: FeatureShape,
) -> Result<AttemptOutcome> {
    let _span = tracing::debug_span!("candidate", width = shape.width()).entered();
    let vector = shape.build(features);

    let scaled = match bundle.scaler().transform(&vector) {
        Ok(scaled) => scaled,
        Err(e) => return classify_failure(shape, TransformStage::Scaling, e),
    };

    let output = match bundle.regressor().predict(&scaled) {
        Ok(output) => output,
        Err(e) => return classify_failure(shape, TransformStage::Regression, e),
    };

    match output.first() {
        Some(&ph) if ph.is_finite() => Ok(AttemptOutcome::Predicted(ph)),
        Some(&ph) => classify_failure(
            shape,
            TransformStage::Regression,
            ModelError::TransformFailed(format!("regressor produced non-finite value {}", ph)),
        ),
        None => classify_failure(
            shape,
            TransformStage::Regression,
            ModelError::TransformFailed("regressor produced no output".to_string()),
        ),
    }
}

fn classify_failure(
    shape: FeatureShape,
    stage: TransformStage,
    error: ModelError,
) -> Result<AttemptOutcome> {
    if !error.is_recoverable() {
        return Err(ScanError::Model(error));
    }
    Ok(AttemptOutcome::Failed(CandidateFailure {
        width: shape.width(),
        stage,
        source: error,
    }))
}
