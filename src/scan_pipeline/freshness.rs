//! Freshness classification module
//!
//! Maps a predicted pH and a per-food safe range to a freshness rating.

mod classifier;
mod safe_range;
pub mod types;

pub use classifier::{FRESHNESS_MARGIN, classify};
pub use safe_range::{DEFAULT_SAFE_RANGE, SafeRangeTable, normalize_food_name};
pub use types::{Assessment, Freshness, SafeRange, ScanResult};
