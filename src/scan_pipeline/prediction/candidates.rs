use crate::scan_pipeline::common::error::{CandidateFailure, Result, ScanError};
use crate::scan_pipeline::features::{
    ColorFeatures, EXTENDED_FEATURE_COUNT, FeatureVector, LAB_FEATURE_COUNT,
};

/// Feature layouts a model bundle may have been fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureShape {
    /// L*a*b* statistics followed by raw channel means (9 values)
    Extended,
    /// L*a*b* statistics only (6 values)
    LabOnly,
}

impl FeatureShape {
    pub fn width(self) -> usize {
        match self {
            FeatureShape::Extended => EXTENDED_FEATURE_COUNT,
            FeatureShape::LabOnly => LAB_FEATURE_COUNT,
        }
    }

    pub fn build(self, features: &ColorFeatures) -> FeatureVector {
        match self {
            FeatureShape::Extended => features.extended(),
            FeatureShape::LabOnly => features.lab_only(),
        }
    }
}

/// Ordered feature layouts to try against the scaler; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    shapes: Vec<FeatureShape>,
}

impl CandidatePlan {
    /// Picks candidates from the scaler's reported input width. Without a
    /// reported width the richer layout is tried first.
    pub fn for_expected_width(width: Option<usize>) -> Result<Self> {
        let shapes = match width {
            None => vec![FeatureShape::Extended, FeatureShape::LabOnly],
            Some(EXTENDED_FEATURE_COUNT) => vec![FeatureShape::Extended],
            Some(LAB_FEATURE_COUNT) => vec![FeatureShape::LabOnly],
            Some(other) => return Err(ScanError::UnsupportedFeatureShape(other)),
        };
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[FeatureShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Result of pushing one candidate through scaler and regressor.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Predicted(f64),
    Failed(CandidateFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_unknown_width_is_richer_first() {
        let plan = CandidatePlan::for_expected_width(None).unwrap();
        assert_eq!(plan.shapes(), &[FeatureShape::Extended, FeatureShape::LabOnly]);
    }

    #[test]
    fn test_plan_for_known_widths() {
        let plan = CandidatePlan::for_expected_width(Some(9)).unwrap();
        assert_eq!(plan.shapes(), &[FeatureShape::Extended]);

        let plan = CandidatePlan::for_expected_width(Some(6)).unwrap();
        assert_eq!(plan.shapes(), &[FeatureShape::LabOnly]);
    }

    #[test]
    fn test_plan_rejects_other_widths() {
        for width in [0, 3, 7, 11] {
            let result = CandidatePlan::for_expected_width(Some(width));
            assert!(matches!(result, Err(ScanError::UnsupportedFeatureShape(w)) if w == width));
        }
    }

    #[test]
    fn test_shapes_build_vectors_in_fitted_order() {
        let features = ColorFeatures {
            lab: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            channel_means: [7.0, 8.0, 9.0],
        };

        assert_eq!(
            FeatureShape::Extended.build(&features),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
        assert_eq!(FeatureShape::LabOnly.build(&features).len(), FeatureShape::LabOnly.width());
    }
}
