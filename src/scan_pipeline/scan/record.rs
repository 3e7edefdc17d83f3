//! Scan documents as written by the client and updated by the handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scan_pipeline::freshness::{ScanResult, normalize_food_name};

pub const STATUS_PENDING: &str = "pending";

/// Incoming scan document. Fields are optional because clients write
/// them in several generations of layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub selected_food: Option<String>,
    #[serde(default)]
    pub food: Option<String>,
    #[serde(default)]
    pub selected_category: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn first_non_empty<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> &'a str {
    primary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(fallback.as_deref())
        .unwrap_or("")
}

impl ScanRecord {
    pub fn pending(storage_path: impl Into<String>) -> Self {
        Self {
            status: Some(STATUS_PENDING.to_string()),
            storage_path: Some(storage_path.into()),
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some(STATUS_PENDING)
    }

    /// Storage path of the photo, if present and non-empty.
    pub fn image_path(&self) -> Option<&str> {
        self.storage_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Normalized food name, preferring `selectedFood` over `food`.
    pub fn food_name(&self) -> String {
        normalize_food_name(first_non_empty(&self.selected_food, &self.food))
    }

    /// Trimmed category, preferring `selectedCategory` over `category`.
    pub fn category_name(&self) -> String {
        first_non_empty(&self.selected_category, &self.category)
            .trim()
            .to_string()
    }
}

/// Fields written back to a scan document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ScanUpdate {
    Complete {
        #[serde(flatten)]
        result: ScanResult,
        selected_food: String,
        selected_category: String,
        model_version: String,
        inferred_at: DateTime<Utc>,
    },
    Error {
        error_message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_pipeline::freshness::Freshness;

    #[test]
    fn test_parse_client_document() {
        let json = r#"{
            "status": "pending",
            "storagePath": "users/u1/scans/s1.jpg",
            "selectedFood": "  Chicken ",
            "selectedCategory": " meat ",
            "createdAt": 12345
        }"#;
        let record: ScanRecord = serde_json::from_str(json).unwrap();

        assert!(record.is_pending());
        assert_eq!(record.image_path(), Some("users/u1/scans/s1.jpg"));
        assert_eq!(record.food_name(), "chicken");
        assert_eq!(record.category_name(), "meat");
    }

    #[test]
    fn test_legacy_field_fallback() {
        let record = ScanRecord {
            food: Some("Apple".into()),
            selected_food: Some(String::new()),
            category: Some("fruit".into()),
            ..ScanRecord::pending("a.jpg")
        };

        assert_eq!(record.food_name(), "apple");
        assert_eq!(record.category_name(), "fruit");
    }

    #[test]
    fn test_missing_fields() {
        let record: ScanRecord = serde_json::from_str("{}").unwrap();
        assert!(!record.is_pending());
        assert_eq!(record.image_path(), None);
        assert_eq!(record.food_name(), "");
    }

    #[test]
    fn test_complete_update_serialization() {
        let update = ScanUpdate::Complete {
            result: ScanResult {
                ph_value: 6.6,
                freshness: Freshness::Moderate,
                hours_to_consume: 24,
                is_in_safe_range: false,
                safe_ph_min: 5.8,
                safe_ph_max: 6.4,
            },
            selected_food: "chicken".into(),
            selected_category: "meat".into(),
            model_version: "svr_v2".into(),
            inferred_at: DateTime::from_timestamp(0, 0).unwrap(),
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["status"], "complete");
        assert_eq!(value["phValue"], 6.6);
        assert_eq!(value["freshness"], "moderate");
        assert_eq!(value["hoursToConsume"], 24);
        assert_eq!(value["isInSafeRange"], false);
        assert_eq!(value["safePhMax"], 6.4);
        assert_eq!(value["selectedFood"], "chicken");
        assert_eq!(value["modelVersion"], "svr_v2");
        assert_eq!(value["inferredAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_error_update_serialization() {
        let update = ScanUpdate::Error {
            error_message: "Invalid image: decode failed".into(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["errorMessage"], "Invalid image: decode failed");
    }
}
