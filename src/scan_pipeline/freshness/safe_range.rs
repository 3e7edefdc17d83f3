use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::scan_pipeline::common::error::{Result, ScanError};
use crate::scan_pipeline::freshness::types::SafeRange;

/// Range used for foods missing from the table.
pub const DEFAULT_SAFE_RANGE: SafeRange = SafeRange::new(6.0, 7.0);

const BUILTIN_RANGES: [(&str, SafeRange); 4] = [
    ("chicken", SafeRange::new(5.8, 6.4)),
    ("tofu", SafeRange::new(6.8, 7.4)),
    ("blueberry", SafeRange::new(2.8, 3.6)),
    ("apple", SafeRange::new(3.0, 4.0)),
];

/// Food name lookup key: trimmed and lower-cased.
pub fn normalize_food_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Static per-food safe pH ranges
#[derive(Debug, Clone)]
pub struct SafeRangeTable {
    ranges: HashMap<String, SafeRange>,
}

impl Default for SafeRangeTable {
    fn default() -> Self {
        Self {
            ranges: BUILTIN_RANGES
                .iter()
                .map(|(name, range)| (name.to_string(), *range))
                .collect(),
        }
    }
}

impl SafeRangeTable {
    pub fn empty() -> Self {
        Self {
            ranges: HashMap::new(),
        }
    }

    pub fn insert(&mut self, food: &str, range: SafeRange) -> Result<()> {
        if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
            return Err(ScanError::InvalidSafeRange(format!(
                "{}: ({}, {})",
                food, range.min, range.max
            )));
        }
        self.ranges.insert(normalize_food_name(food), range);
        Ok(())
    }

    /// Parses a JSON object of `"food": [min, max]` entries.
    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let raw: HashMap<String, (f64, f64)> = serde_json::from_slice(data)
            .map_err(|e| ScanError::InvalidSafeRange(e.to_string()))?;

        let mut table = Self::empty();
        for (food, (min, max)) in raw {
            table.insert(&food, SafeRange::new(min, max))?;
        }
        debug!("Parsed {} safe range entries", table.len());
        Ok(table)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading safe range table");
        let data = std::fs::read(path)?;
        Self::from_json_slice(&data)
    }

    pub fn lookup(&self, food: &str) -> SafeRange {
        self.ranges
            .get(&normalize_food_name(food))
            .copied()
            .unwrap_or(DEFAULT_SAFE_RANGE)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
