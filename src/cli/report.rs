//! Plain-text report tables for the CLI

use crate::services::format::{pad_left, pad_right};
use crate::services::{format_cell, format_number};
use crate::types::{DailyReport, MonthlyReport, ProductionSummary, YearlyReport};

const MONTH_LABELS: [&str; 12] = [
    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
];

const W_CODE: usize = 10;
const W_NAME: usize = 28;
const W_PACKAGE: usize = 12;
const W_QTY: usize = 10;

const W_YEAR_PRODUCT: usize = 26;
const W_YEAR_PACKAGE: usize = 8;
const W_YEAR_MONTH: usize = 8;
const W_YEAR_TOTAL: usize = 10;

fn product_table(items: &[ProductionSummary], total_quantity: u64) -> String {
    let mut out = String::new();
    let width = W_CODE + W_NAME + W_PACKAGE + W_QTY + 3;

    out.push_str(&format!(
        "{} {} {} {}\n",
        pad_right("商品コード", W_CODE),
        pad_right("商品名", W_NAME),
        pad_right("包装タイプ", W_PACKAGE),
        pad_left("数量", W_QTY)
    ));
    out.push_str(&"─".repeat(width));
    out.push('\n');

    for item in items {
        out.push_str(&format!(
            "{} {} {} {}\n",
            pad_right(&item.product_code, W_CODE),
            pad_right(&item.product_name, W_NAME),
            pad_right(&item.package_type, W_PACKAGE),
            pad_left(&format_number(item.quantity), W_QTY)
        ));
    }

    out.push_str(&"─".repeat(width));
    out.push('\n');
    out.push_str(&format!(
        "{} {}\n",
        pad_right("合計", W_CODE + W_NAME + W_PACKAGE + 2),
        pad_left(&format_number(total_quantity), W_QTY)
    ));
    out
}

fn heading(title: &str, item_count: usize, total_quantity: u64) -> String {
    format!(
        "{}  ({}品目 / 合計 {})\n\n",
        title,
        item_count,
        format_number(total_quantity)
    )
}

/// Today's summary cards followed by the product table
pub fn render_today(report: &DailyReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "本日の日付: {}\n本日の製造品目数: {}\n本日の製造合計数: {}\n\n",
        report.date.format("%Y/%m/%d"),
        report.item_count,
        format_number(report.total_quantity)
    ));

    if report.items.is_empty() {
        out.push_str("本日の製造データはまだありません\n");
    } else {
        out.push_str(&product_table(&report.items, report.total_quantity));
    }
    out
}

pub fn render_daily(report: &DailyReport) -> String {
    let title = format!("{} の製造データ", report.date.format("%Y/%m/%d"));
    if report.items.is_empty() {
        return format!("{}\n\n製造データがありません\n", title);
    }

    let mut out = heading(&title, report.item_count, report.total_quantity);
    out.push_str(&product_table(&report.items, report.total_quantity));
    out
}

pub fn render_monthly(report: &MonthlyReport) -> String {
    let title = format!("{}年{}月 の製造数合計", report.year, report.month);
    if report.items.is_empty() {
        return format!("{}\n\n製造データがありません\n", title);
    }

    let mut out = heading(&title, report.item_count, report.total_quantity);
    out.push_str(&product_table(&report.items, report.total_quantity));
    out
}

/// Month-by-product matrix. Zero cells print as "-".
pub fn render_yearly(report: &YearlyReport) -> String {
    let title = format!("{}年 月別製造数推移", report.year);
    if report.rows.is_empty() {
        return format!("{}\n\n製造データがありません\n", title);
    }

    let width = W_YEAR_PRODUCT + W_YEAR_PACKAGE + 12 * (W_YEAR_MONTH + 1) + W_YEAR_TOTAL + 2;
    let mut out = format!("{}\n\n", title);

    let mut header = format!(
        "{} {}",
        pad_right("商品名", W_YEAR_PRODUCT),
        pad_right("包装", W_YEAR_PACKAGE)
    );
    for label in MONTH_LABELS {
        header.push(' ');
        header.push_str(&pad_left(label, W_YEAR_MONTH));
    }
    header.push(' ');
    header.push_str(&pad_left("合計", W_YEAR_TOTAL));
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"─".repeat(width));
    out.push('\n');

    for row in &report.rows {
        let product = format!("{} {}", row.product_code, row.product_name);
        let mut line = format!(
            "{} {}",
            pad_right(&product, W_YEAR_PRODUCT),
            pad_right(&row.package_type, W_YEAR_PACKAGE)
        );
        for month in 1..=12 {
            line.push(' ');
            line.push_str(&pad_left(&format_cell(row.quantity(month)), W_YEAR_MONTH));
        }
        line.push(' ');
        line.push_str(&pad_left(&format_cell(row.total), W_YEAR_TOTAL));
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&"─".repeat(width));
    out.push('\n');
    let mut totals = pad_right("合計", W_YEAR_PRODUCT + W_YEAR_PACKAGE + 1);
    for month in 1..=12 {
        totals.push(' ');
        totals.push_str(&pad_left(&format_cell(report.month_total(month)), W_YEAR_MONTH));
    }
    totals.push(' ');
    totals.push_str(&pad_left(&format_cell(report.grand_total), W_YEAR_TOTAL));
    out.push_str(&totals);
    out.push('\n');
    out
}

/// Settings check: one `name  value` line per setting
pub fn render_config(file: Option<&str>, rows: &[(&'static str, String)]) -> String {
    let mut out = format!("config file: {}\n\n", file.unwrap_or("none"));
    let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        out.push_str(&format!("{}  {}\n", pad_right(key, key_width), value));
    }
    out
}
