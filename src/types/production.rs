//! Production record and summary types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format a date as the fixed-width `YYYYMMDD` key used by the store.
/// Lexicographic order of these keys is chronological order.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// One manufactured-batch entry as stored in the `productions` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    /// `YYYYMMDD`
    pub date: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub package_type: String,
    #[serde(default)]
    pub quantity: u64,
    /// Opaque creation metadata, never read by aggregation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<serde_json::Value>,
    /// Fields added to the schema after the core five (e.g. `worker`, `memo`)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProductionRecord {
    /// Grouping key for product aggregation
    pub fn key(&self) -> ProductKey {
        ProductKey {
            product_code: self.product_code.clone(),
            package_type: self.package_type.clone(),
        }
    }

    /// Month number (1-12) from characters 4..6 of `date`.
    ///
    /// Returns `None` unless `date` is exactly eight ASCII digits with a
    /// month in range.
    pub fn month(&self) -> Option<u32> {
        let bytes = self.date.as_bytes();
        if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let month: u32 = self.date[4..6].parse().ok()?;
        (1..=12).contains(&month).then_some(month)
    }
}

/// Structured grouping key: `(productCode, packageType)`.
///
/// Never joined into one string: `("A_1", "box")` and `("A", "1_box")`
/// are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey {
    pub product_code: String,
    pub package_type: String,
}

/// Quantity total for one distinct product + package combination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    pub product_name: String,
    pub product_code: String,
    pub package_type: String,
    pub quantity: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProductionSummary {
    /// Seed a summary from the first record seen for its key.
    /// Display fields and extra fields are taken from this record only.
    pub fn from_record(record: &ProductionRecord) -> Self {
        Self {
            product_name: record.product_name.clone(),
            product_code: record.product_code.clone(),
            package_type: record.package_type.clone(),
            quantity: record.quantity,
            extra: record.extra.clone(),
        }
    }

    /// Add a later record's quantity to the running total
    pub fn add(&mut self, record: &ProductionRecord) {
        self.quantity = self.quantity.saturating_add(record.quantity);
    }

    pub fn key(&self) -> ProductKey {
        ProductKey {
            product_code: self.product_code.clone(),
            package_type: self.package_type.clone(),
        }
    }
}

/// Item count and quantity total over a list of summaries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TotalSummary {
    pub item_count: usize,
    pub total_quantity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(date: &str, code: &str, pkg: &str, name: &str, qty: u64) -> ProductionRecord {
        ProductionRecord {
            date: date.to_string(),
            product_name: name.to_string(),
            product_code: code.to_string(),
            package_type: pkg.to_string(),
            quantity: qty,
            ..Default::default()
        }
    }

    #[test]
    fn test_date_key_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(date_key(date), "20250307");
    }

    #[test]
    fn test_month_parsing() {
        assert_eq!(make_record("20250101", "A1", "box", "a", 1).month(), Some(1));
        assert_eq!(make_record("20251231", "A1", "box", "a", 1).month(), Some(12));
    }

    #[test]
    fn test_month_rejects_malformed_dates() {
        // Wrong length, separators, out-of-range months, sign characters
        for date in ["2025011", "2025-03-01", "20251301", "20250001", "2025+101", ""] {
            assert_eq!(
                make_record(date, "A1", "box", "a", 1).month(),
                None,
                "date {:?}",
                date
            );
        }
    }

    #[test]
    fn test_key_uses_code_and_package_not_name() {
        let a = make_record("20250101", "A1", "box", "あんこ餅", 1);
        let b = make_record("20250101", "A1", "box", "餡子餅", 1);
        let c = make_record("20250101", "A1", "bag", "あんこ餅", 1);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_key_has_no_separator_collision() {
        // "A_1" + "box" vs "A" + "1_box" would collide under "{code}_{pkg}"
        let a = make_record("20250101", "A_1", "box", "x", 1);
        let b = make_record("20250101", "A", "1_box", "x", 1);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_summary_add_saturates() {
        let first = make_record("20250101", "A1", "box", "a", u64::MAX - 1);
        let mut summary = ProductionSummary::from_record(&first);
        summary.add(&make_record("20250102", "A1", "box", "a", 5));
        assert_eq!(summary.quantity, u64::MAX);
    }

    #[test]
    fn test_record_deserialize_camel_case_with_extra_fields() {
        let json = r#"{
            "date": "20250101",
            "productName": "あんこ餅",
            "productCode": "A1",
            "packageType": "box",
            "quantity": 10,
            "createdAt": "2025-01-01T09:00:00Z",
            "worker": "佐藤"
        }"#;
        let record: ProductionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.product_code, "A1");
        assert_eq!(record.quantity, 10);
        assert!(record.created_at.is_some());
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.extra["worker"], serde_json::json!("佐藤"));
    }

    #[test]
    fn test_record_missing_quantity_defaults_to_zero() {
        let json = r#"{"date":"20250101","productName":"a","productCode":"A1","packageType":"box"}"#;
        let record: ProductionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, 0);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_record_missing_strings_default_to_empty() {
        let json = r#"{"date":"20250105","productCode":"B2","quantity":4}"#;
        let record: ProductionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.product_name, "");
        assert_eq!(record.package_type, "");
        assert_eq!(record.product_code, "B2");
        assert_eq!(record.quantity, 4);
    }

    #[test]
    fn test_record_negative_quantity_is_rejected() {
        let json = r#"{"date":"20250105","productCode":"C3","quantity":-5}"#;
        assert!(serde_json::from_str::<ProductionRecord>(json).is_err());
    }

    #[test]
    fn test_summary_carries_extra_from_seed_record() {
        let mut first = make_record("20250101", "A1", "box", "a", 1);
        first
            .extra
            .insert("worker".to_string(), serde_json::json!("佐藤"));
        let summary = ProductionSummary::from_record(&first);
        assert_eq!(summary.extra["worker"], serde_json::json!("佐藤"));
    }
}
