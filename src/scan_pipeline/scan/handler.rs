use chrono::Utc;
use tracing::{error, info, instrument};

use crate::scan_pipeline::analyzer::ScanAnalyzer;
use crate::scan_pipeline::common::error::Result;
use crate::scan_pipeline::decode::ImageDecoder;
use crate::scan_pipeline::freshness::ScanResult;
use crate::scan_pipeline::model::ArtifactLoader;
use crate::scan_pipeline::scan::record::{ScanRecord, ScanUpdate};
use crate::scan_pipeline::scan::stores::{BlobStore, ScanStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoDocument,
    NotPending,
    MissingStoragePath,
}

/// What the handler did with one scan event
#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    Skipped(SkipReason),
    Completed(ScanResult),
    Failed(String),
}

/// Reacts to a newly created scan document: downloads the photo, runs the
/// analysis and writes exactly one update back.
pub struct ScanRequestHandler<D, L, B, S>
where
    D: ImageDecoder,
    L: ArtifactLoader,
    B: BlobStore,
    S: ScanStore,
{
    analyzer: ScanAnalyzer<D, L>,
    blobs: B,
    store: S,
}

impl<D, L, B, S> ScanRequestHandler<D, L, B, S>
where
    D: ImageDecoder,
    L: ArtifactLoader,
    B: BlobStore,
    S: ScanStore,
{
    pub fn new(analyzer: ScanAnalyzer<D, L>, blobs: B, store: S) -> Self {
        Self {
            analyzer,
            blobs,
            store,
        }
    }

    /// Handles one scan event.
    ///
    /// Analysis failures, and a rejected completion write, are recorded on
    /// the document as an error update and reported as
    /// `HandleOutcome::Failed`. Only a failure to write that error update is
    /// returned as an error.
    #[instrument(skip(self, record))]
    pub fn handle(&self, scan_id: &str, record: Option<&ScanRecord>) -> Result<HandleOutcome> {
        let Some(record) = record else {
            return Ok(HandleOutcome::Skipped(SkipReason::NoDocument));
        };
        if !record.is_pending() {
            return Ok(HandleOutcome::Skipped(SkipReason::NotPending));
        }
        let Some(storage_path) = record.image_path() else {
            return Ok(HandleOutcome::Skipped(SkipReason::MissingStoragePath));
        };

        let food = record.food_name();
        let category = record.category_name();
        info!(storage_path, food = %food, category = %category, "Processing scan");

        // Models load before the download so a missing bundle is reported
        // ahead of a missing photo.
        let analysis = self
            .analyzer
            .check_models()
            .and_then(|()| self.blobs.download(storage_path))
            .and_then(|bytes| self.analyzer.analyze(&bytes, &food));

        let failure = match analysis {
            Ok(result) => {
                let update = ScanUpdate::Complete {
                    result: result.clone(),
                    selected_food: food,
                    selected_category: category,
                    model_version: self.analyzer.config().model_version.clone(),
                    inferred_at: Utc::now(),
                };
                match self.store.update(scan_id, &update) {
                    Ok(()) => return Ok(HandleOutcome::Completed(result)),
                    Err(e) => e,
                }
            }
            Err(e) => e,
        };

        error!("Scan failed: {}", failure);
        let message = failure.to_string();
        self.store.update(
            scan_id,
            &ScanUpdate::Error {
                error_message: message.clone(),
            },
        )?;
        Ok(HandleOutcome::Failed(message))
    }

    pub fn analyzer(&self) -> &ScanAnalyzer<D, L> {
        &self.analyzer
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
