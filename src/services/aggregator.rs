//! Aggregator service for computing production totals

use indexmap::IndexMap;

use super::collation::compare_ja;
use crate::types::{ProductKey, ProductionRecord, ProductionSummary, TotalSummary};

/// Aggregator for computing production totals
pub struct Aggregator;

impl Aggregator {
    /// Aggregate records by `(productCode, packageType)`, sorted by product
    /// name under Japanese collation.
    ///
    /// Display fields of each summary come from the first record in input
    /// order (the store's return order). The sort is stable, so names that
    /// collate equal keep that first-seen order too.
    pub fn by_product(records: &[ProductionRecord]) -> Vec<ProductionSummary> {
        Self::by_product_iter(records.iter())
    }

    fn by_product_iter<'a>(
        records: impl Iterator<Item = &'a ProductionRecord>,
    ) -> Vec<ProductionSummary> {
        let mut product_map: IndexMap<ProductKey, ProductionSummary> = IndexMap::new();

        for record in records {
            product_map
                .entry(record.key())
                .and_modify(|summary| summary.add(record))
                .or_insert_with(|| ProductionSummary::from_record(record));
        }

        let mut result: Vec<ProductionSummary> = product_map.into_values().collect();
        result.sort_by(|a, b| compare_ja(&a.product_name, &b.product_name));
        result
    }

    /// Aggregate records by month (1-12), then by product within each month.
    ///
    /// Keys are exactly the months present, in order of first appearance.
    /// Records whose `date` has no valid month are skipped.
    pub fn by_month(records: &[ProductionRecord]) -> IndexMap<u32, Vec<ProductionSummary>> {
        let mut month_map: IndexMap<u32, Vec<&ProductionRecord>> = IndexMap::new();

        for record in records {
            match record.month() {
                Some(month) => month_map.entry(month).or_default().push(record),
                None => {
                    tracing::warn!(
                        date = %record.date,
                        product_code = %record.product_code,
                        "skipping record with malformed date"
                    );
                }
            }
        }

        month_map
            .into_iter()
            .map(|(month, bucket)| (month, Self::by_product_iter(bucket.into_iter())))
            .collect()
    }

    /// Item count and quantity total across summaries
    pub fn total(summaries: &[ProductionSummary]) -> TotalSummary {
        TotalSummary {
            item_count: summaries.len(),
            total_quantity: summaries
                .iter()
                .fold(0u64, |acc, s| acc.saturating_add(s.quantity)),
        }
    }
}
