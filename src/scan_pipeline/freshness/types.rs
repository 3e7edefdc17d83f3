//! Freshness result types

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Moderate,
    Spoiled,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Freshness::Fresh => "fresh",
            Freshness::Moderate => "moderate",
            Freshness::Spoiled => "spoiled",
        };
        f.write_str(label)
    }
}

/// Inclusive pH interval considered fresh for one food
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeRange {
    pub min: f64,
    pub max: f64,
}

impl SafeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, ph: f64) -> bool {
        self.min <= ph && ph <= self.max
    }

    pub fn widened(&self, margin: f64) -> Self {
        Self::new(self.min - margin, self.max + margin)
    }
}

/// Classifier output for one pH value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub freshness: Freshness,
    pub hours_to_consume: u32,
    pub in_safe_range: bool,
}

/// Complete outcome of one scan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub ph_value: f64,
    pub freshness: Freshness,
    pub hours_to_consume: u32,
    pub is_in_safe_range: bool,
    pub safe_ph_min: f64,
    pub safe_ph_max: f64,
}

impl ScanResult {
    pub fn new(ph: f64, range: SafeRange, assessment: Assessment) -> Self {
        Self {
            ph_value: ph,
            freshness: assessment.freshness,
            hours_to_consume: assessment.hours_to_consume,
            is_in_safe_range: assessment.in_safe_range,
            safe_ph_min: range.min,
            safe_ph_max: range.max,
        }
    }
}
