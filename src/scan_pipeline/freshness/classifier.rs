use crate::scan_pipeline::freshness::types::{Assessment, Freshness, SafeRange};

/// Tolerance around the safe range still rated "moderate", in pH units.
pub const FRESHNESS_MARGIN: f64 = 0.2;

const FRESH_HOURS: u32 = 48;
const MODERATE_HOURS: u32 = 24;

/// Rates a predicted pH against a food's safe range.
///
/// Bounds are inclusive on both tiers. A NaN pH compares false everywhere
/// and lands in `Spoiled`.
pub fn classify(ph: f64, range: SafeRange) -> Assessment {
    if range.contains(ph) {
        Assessment {
            freshness: Freshness::Fresh,
            hours_to_consume: FRESH_HOURS,
            in_safe_range: true,
        }
    } else if range.widened(FRESHNESS_MARGIN).contains(ph) {
        Assessment {
            freshness: Freshness::Moderate,
            hours_to_consume: MODERATE_HOURS,
            in_safe_range: false,
        }
    } else {
        Assessment {
            freshness: Freshness::Spoiled,
            hours_to_consume: 0,
            in_safe_range: false,
        }
    }
}
