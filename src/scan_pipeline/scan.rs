//! Scan request handling module
//!
//! Boundary between the pipeline and the outside world: scan documents,
//! photo storage and the handler that ties them to the analyzer.

mod handler;
pub mod record;
mod stores;


pub use handler::{HandleOutcome, ScanRequestHandler, SkipReason};
pub use record::{STATUS_PENDING, ScanRecord, ScanUpdate};
pub use stores::{BlobStore, FsBlobStore, JsonLinesScanStore, MemoryScanStore, ScanStore};
