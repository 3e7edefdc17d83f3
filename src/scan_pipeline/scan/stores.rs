//! Collaborators the scan handler talks to: photo blobs and scan documents.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::scan::record::ScanUpdate;

pub trait BlobStore {
    fn download(&self, storage_path: &str) -> Result<Vec<u8>>;
}

pub trait ScanStore {
    fn update(&self, scan_id: &str, update: &ScanUpdate) -> Result<()>;
}

/// Blob store backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a storage path under the root, refusing to leave it.
    fn resolve(&self, storage_path: &str) -> Result<PathBuf> {
        let relative = Path::new(storage_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ScanError::BlobDownload {
                path: storage_path.to_string(),
                reason: "path escapes the blob root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    fn download(&self, storage_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(storage_path)?;
        let bytes = std::fs::read(&path).map_err(|e| ScanError::BlobDownload {
            path: storage_path.to_string(),
            reason: e.to_string(),
        })?;
        debug!("Downloaded {}: {} bytes", path.display(), bytes.len());
        Ok(bytes)
    }
}

/// Keeps every update in memory, in arrival order per scan.
#[derive(Debug, Default)]
pub struct MemoryScanStore {
    updates: Mutex<HashMap<String, Vec<ScanUpdate>>>,
}

impl MemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates_for(&self, scan_id: &str) -> Vec<ScanUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(scan_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl ScanStore for MemoryScanStore {
    fn update(&self, scan_id: &str, update: &ScanUpdate) -> Result<()> {
        self.updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(scan_id.to_string())
            .or_default()
            .push(update.clone());
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLine<'a> {
    scan_id: &'a str,
    #[serde(flatten)]
    update: &'a ScanUpdate,
}

/// Writes each update as one JSON line.
pub struct JsonLinesScanStore<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> JsonLinesScanStore<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write> ScanStore for JsonLinesScanStore<W> {
    fn update(&self, scan_id: &str, update: &ScanUpdate) -> Result<()> {
        let line = serde_json::to_string(&UpdateLine { scan_id, update }).map_err(|e| {
            ScanError::StoreUpdate {
                scan_id: scan_id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}
