//! Report types built from aggregated summaries

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ProductKey, ProductionSummary, TotalSummary};
use crate::services::collation::compare_ja;

/// Product totals for a single day (also used for "today")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub items: Vec<ProductionSummary>,
    pub item_count: usize,
    pub total_quantity: u64,
}

impl DailyReport {
    pub fn new(date: NaiveDate, items: Vec<ProductionSummary>, total: TotalSummary) -> Self {
        Self {
            date,
            items,
            item_count: total.item_count,
            total_quantity: total.total_quantity,
        }
    }
}

/// Product totals for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub items: Vec<ProductionSummary>,
    pub item_count: usize,
    pub total_quantity: u64,
}

impl MonthlyReport {
    pub fn new(year: i32, month: u32, items: Vec<ProductionSummary>, total: TotalSummary) -> Self {
        Self {
            year,
            month,
            items,
            item_count: total.item_count,
            total_quantity: total.total_quantity,
        }
    }
}

/// One product row of the yearly matrix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyRow {
    pub product_name: String,
    pub product_code: String,
    pub package_type: String,
    /// Index 0 is January
    pub monthly: [u64; 12],
    pub total: u64,
}

impl YearlyRow {
    /// Quantity for month 1-12 (0 outside that range)
    pub fn quantity(&self, month: u32) -> u64 {
        month
            .checked_sub(1)
            .and_then(|i| self.monthly.get(i as usize))
            .copied()
            .unwrap_or(0)
    }
}

/// Month-by-product matrix for one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyReport {
    pub year: i32,
    pub rows: Vec<YearlyRow>,
    /// Index 0 is January
    pub month_totals: [u64; 12],
    pub grand_total: u64,
}

impl YearlyReport {
    /// Build the matrix from a month → summaries mapping.
    ///
    /// Months are walked 1..=12 regardless of the mapping's iteration order,
    /// so a product's display name comes from its earliest month. Months
    /// absent from the mapping contribute zeros.
    pub fn from_monthly(year: i32, by_month: &IndexMap<u32, Vec<ProductionSummary>>) -> Self {
        let mut rows: IndexMap<ProductKey, YearlyRow> = IndexMap::new();
        let mut month_totals = [0u64; 12];

        for month in 1..=12u32 {
            let Some(items) = by_month.get(&month) else {
                continue;
            };
            let idx = (month - 1) as usize;

            for item in items {
                let row = rows.entry(item.key()).or_insert_with(|| YearlyRow {
                    product_name: item.product_name.clone(),
                    product_code: item.product_code.clone(),
                    package_type: item.package_type.clone(),
                    monthly: [0; 12],
                    total: 0,
                });
                row.monthly[idx] = row.monthly[idx].saturating_add(item.quantity);
                row.total = row.total.saturating_add(item.quantity);
                month_totals[idx] = month_totals[idx].saturating_add(item.quantity);
            }
        }

        let mut rows: Vec<YearlyRow> = rows.into_values().collect();
        rows.sort_by(|a, b| {
            compare_ja(&a.product_name, &b.product_name)
                .then_with(|| compare_ja(&a.package_type, &b.package_type))
                .then_with(|| a.product_code.cmp(&b.product_code))
        });

        let grand_total = month_totals
            .iter()
            .fold(0u64, |acc, q| acc.saturating_add(*q));

        Self {
            year,
            rows,
            month_totals,
            grand_total,
        }
    }

    /// Column total for month 1-12 (0 outside that range)
    pub fn month_total(&self, month: u32) -> u64 {
        month
            .checked_sub(1)
            .and_then(|i| self.month_totals.get(i as usize))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(code: &str, pkg: &str, name: &str, qty: u64) -> ProductionSummary {
        ProductionSummary {
            product_name: name.to_string(),
            product_code: code.to_string(),
            package_type: pkg.to_string(),
            quantity: qty,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_yearly_empty() {
        let report = YearlyReport::from_monthly(2025, &IndexMap::new());
        assert!(report.rows.is_empty());
        assert_eq!(report.month_totals, [0; 12]);
        assert_eq!(report.grand_total, 0);
    }

    #[test]
    fn test_yearly_rows_and_totals() {
        let mut by_month = IndexMap::new();
        // Inserted out of calendar order on purpose
        by_month.insert(12, vec![make_summary("A1", "box", "あんこ餅", 4)]);
        by_month.insert(
            3,
            vec![
                make_summary("A1", "box", "あんこ餅", 10),
                make_summary("B2", "box", "わらび餅", 7),
            ],
        );

        let report = YearlyReport::from_monthly(2025, &by_month);

        assert_eq!(report.rows.len(), 2);
        let anko = &report.rows[0];
        assert_eq!(anko.product_code, "A1");
        assert_eq!(anko.quantity(3), 10);
        assert_eq!(anko.quantity(12), 4);
        assert_eq!(anko.quantity(1), 0);
        assert_eq!(anko.total, 14);

        let warabi = &report.rows[1];
        assert_eq!(warabi.product_code, "B2");
        assert_eq!(warabi.total, 7);

        assert_eq!(report.month_total(3), 17);
        assert_eq!(report.month_total(12), 4);
        assert_eq!(report.month_total(6), 0);
        assert_eq!(report.grand_total, 21);
    }

    #[test]
    fn test_yearly_display_name_from_earliest_month() {
        let mut by_month = IndexMap::new();
        by_month.insert(5, vec![make_summary("A1", "box", "新しい名前", 1)]);
        by_month.insert(2, vec![make_summary("A1", "box", "古い名前", 1)]);

        let report = YearlyReport::from_monthly(2025, &by_month);

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].product_name, "古い名前");
        assert_eq!(report.rows[0].total, 2);
    }

    #[test]
    fn test_yearly_same_name_different_package_are_separate_rows() {
        let mut by_month = IndexMap::new();
        by_month.insert(
            1,
            vec![
                make_summary("A1", "box", "あんこ餅", 1),
                make_summary("A1", "bag", "あんこ餅", 2),
            ],
        );

        let report = YearlyReport::from_monthly(2025, &by_month);

        assert_eq!(report.rows.len(), 2);
        // Tie on name → ordered by package type
        assert_eq!(report.rows[0].package_type, "bag");
        assert_eq!(report.rows[1].package_type, "box");
    }

    #[test]
    fn test_month_lookup_out_of_range() {
        let report = YearlyReport::from_monthly(2025, &IndexMap::new());
        assert_eq!(report.month_total(0), 0);
        assert_eq!(report.month_total(13), 0);
    }
}
