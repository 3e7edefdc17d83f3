use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::scan_pipeline::{
    common::{
        config::ScanConfig,
        error::{Result, ScanError},
    },
    decode::{ImageDecoder, StandardImageDecoder},
    freshness::{SafeRangeTable, ScanResult, classify},
    model::{ArtifactLoader, JsonArtifactLoader, ModelCache},
    prediction::PredictionPipeline,
};

/// Encoded photo → freshness result.
pub struct ScanAnalyzer<D: ImageDecoder, L: ArtifactLoader> {
    decoder: D,
    predictor: PredictionPipeline<L>,
    safe_ranges: SafeRangeTable,
    config: ScanConfig,
}

impl ScanAnalyzer<StandardImageDecoder, JsonArtifactLoader> {
    /// Builds an analyzer reading JSON artifacts from `config.model_dir`.
    /// Artifacts are loaded on first use, not here.
    pub fn new(config: ScanConfig, safe_ranges: SafeRangeTable) -> Self {
        let models = Arc::new(ModelCache::new(JsonArtifactLoader::from_config(&config)));
        Self {
            decoder: StandardImageDecoder,
            predictor: PredictionPipeline::new(models),
            safe_ranges,
            config,
        }
    }
}

impl<D: ImageDecoder, L: ArtifactLoader> ScanAnalyzer<D, L> {
    pub fn with_custom(
        decoder: D,
        models: Arc<ModelCache<L>>,
        safe_ranges: SafeRangeTable,
        config: ScanConfig,
    ) -> Self {
        Self {
            decoder,
            predictor: PredictionPipeline::new(models),
            safe_ranges,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ScanError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ScanError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    #[instrument(skip(self, image_data), fields(input_size = image_data.len()))]
    pub fn analyze(&self, image_data: &[u8], food: &str) -> Result<ScanResult> {
        let raster = {
            let _span = tracing::info_span!("decode_image").entered();
            self.decoder.decode(image_data)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = raster.width,
                height = raster.height
            )
            .entered();
            self.validate_dimensions(raster.width, raster.height)?;
        }

        let prediction = {
            let _span = tracing::info_span!("predict_ph").entered();
            self.predictor.predict(&raster)?
        };

        let range = self.safe_ranges.lookup(food);
        let assessment = classify(prediction.ph, range);

        info!(
            ph = prediction.ph,
            freshness = %assessment.freshness,
            safe_min = range.min,
            safe_max = range.max,
            "Scan analyzed"
        );
        Ok(ScanResult::new(prediction.ph, range, assessment))
    }

    #[instrument(skip(self, image_path))]
    pub fn analyze_file<P: AsRef<Path>>(&self, image_path: P, food: &str) -> Result<ScanResult> {
        let image_path = image_path.as_ref();
        info!(input = %image_path.display(), "Analyzing file");

        let image_data = std::fs::read(image_path)?;
        self.analyze(&image_data, food)
    }

    /// Forces the model bundle to load; used as a readiness probe.
    pub fn check_models(&self) -> Result<()> {
        self.predictor.models().get_or_load().map(|_| ())
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn safe_ranges(&self) -> &SafeRangeTable {
        &self.safe_ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_pipeline::decode::ColorRaster;
    use crate::scan_pipeline::freshness::Freshness;
    use crate::scan_pipeline::model::{LinearRegressor, ModelBundle, StandardScaler};

    struct MockDecoder {
        should_fail: bool,
        raster: ColorRaster,
    }

    impl ImageDecoder for MockDecoder {
        fn decode(&self, _data: &[u8]) -> Result<ColorRaster> {
            if self.should_fail {
                return Err(ScanError::InvalidImage("Mock decode error".to_string()));
            }
            Ok(self.raster.clone())
        }
    }

    fn mock_decoder(width: usize, height: usize) -> MockDecoder {
        MockDecoder {
            should_fail: false,
            raster: ColorRaster {
                width,
                height,
                data: [120u8, 90, 60].repeat(width * height),
            },
        }
    }

    /// Identity scaler over 9 features, regressor returning a constant.
    fn constant_models(ph: f64) -> Arc<ModelCache<impl ArtifactLoader>> {
        Arc::new(ModelCache::new(move || {
            ModelBundle::new(
                StandardScaler {
                    mean: vec![0.0; 9],
                    scale: vec![1.0; 9],
                    n_features_in: Some(9),
                },
                LinearRegressor {
                    coef: vec![0.0; 9],
                    intercept: ph,
                },
            )
        }))
    }

    #[test]
    fn test_successful_analysis() {
        let analyzer = ScanAnalyzer::with_custom(
            mock_decoder(10, 10),
            constant_models(6.1),
            SafeRangeTable::default(),
            ScanConfig::default(),
        );

        let result = analyzer.analyze(b"fake jpeg", "Chicken").unwrap();

        assert_eq!(result.ph_value, 6.1);
        assert_eq!(result.freshness, Freshness::Fresh);
        assert_eq!(result.hours_to_consume, 48);
        assert!(result.is_in_safe_range);
        assert_eq!((result.safe_ph_min, result.safe_ph_max), (5.8, 6.4));
    }

    #[test]
    fn test_unknown_food_uses_default_range() {
        let analyzer = ScanAnalyzer::with_custom(
            mock_decoder(4, 4),
            constant_models(7.1),
            SafeRangeTable::default(),
            ScanConfig::default(),
        );

        let result = analyzer.analyze(b"fake jpeg", "mystery").unwrap();

        assert_eq!((result.safe_ph_min, result.safe_ph_max), (6.0, 7.0));
        assert_eq!(result.freshness, Freshness::Moderate);
    }

    #[test]
    fn test_decoder_failure() {
        let analyzer = ScanAnalyzer::with_custom(
            MockDecoder {
                should_fail: true,
                raster: ColorRaster { width: 0, height: 0, data: Vec::new() },
            },
            constant_models(6.0),
            SafeRangeTable::default(),
            ScanConfig::default(),
        );

        let result = analyzer.analyze(b"fake jpeg", "tofu");
        assert!(matches!(result, Err(ScanError::InvalidImage(_))));
    }

    #[test]
    fn test_dimension_validation_failure() {
        let config = ScanConfig::builder().max_dimension(Some(64)).build();
        let analyzer = ScanAnalyzer::with_custom(
            mock_decoder(100, 10),
            constant_models(6.0),
            SafeRangeTable::default(),
            config,
        );

        let result = analyzer.analyze(b"fake jpeg", "tofu");
        assert!(matches!(result, Err(ScanError::InvalidDimensions(100, 10))));
    }

    #[test]
    fn test_dimension_validation_disabled() {
        let config = ScanConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(64))
            .build();
        let analyzer = ScanAnalyzer::with_custom(
            mock_decoder(100, 10),
            constant_models(6.0),
            SafeRangeTable::default(),
            config,
        );

        assert!(analyzer.analyze(b"fake jpeg", "tofu").is_ok());
    }

    #[test]
    fn test_default_config_accepts_very_wide_photo() {
        let strip = image::RgbImage::from_pixel(16385, 1, image::Rgb([180, 90, 60]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(strip)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let analyzer = ScanAnalyzer::with_custom(
            StandardImageDecoder,
            constant_models(6.2),
            SafeRangeTable::default(),
            ScanConfig::default(),
        );

        let result = analyzer.analyze(&png, "chicken").unwrap();
        assert_eq!(result.ph_value, 6.2);
    }

    #[test]
    fn test_missing_artifacts_reported_by_check() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ScanConfig::builder().model_dir(dir.path()).build();
        let analyzer = ScanAnalyzer::new(config, SafeRangeTable::default());

        assert!(matches!(analyzer.check_models(), Err(ScanError::ModelLoad { .. })));
    }
}
