//! Yearly view: product × month matrix with row and column totals

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::footer::{Keybindings, Separator};
use super::products::VISIBLE_ROWS;
use super::tabs::{Tab, TabBar};
use crate::services::format::{pad_left, pad_right};
use crate::services::format_cell;
use crate::tui::theme::Theme;
use crate::types::YearlyReport;

/// Column widths: Product(22), Package(8), 12 × Month(7), Total(9)
const W_PRODUCT: usize = 22;
const W_PACKAGE: usize = 8;
const W_MONTH: usize = 7;
const W_TOTAL: usize = 9;
const TABLE_WIDTH: u16 = (W_PRODUCT + 1 + W_PACKAGE + 12 * (W_MONTH + 1) + W_TOTAL + 1) as u16;

pub struct YearlyView<'a> {
    report: &'a YearlyReport,
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> YearlyView<'a> {
    pub fn new(report: &'a YearlyReport, theme: Theme) -> Self {
        Self {
            report,
            scroll_offset: 0,
            theme,
        }
    }

    pub fn with_scroll(mut self, scroll_offset: usize) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn max_scroll_offset(report: &YearlyReport) -> usize {
        report.rows.len().saturating_sub(VISIBLE_ROWS)
    }

    /// Quantity cell; zero cells are muted "-"
    fn cell(&self, quantity: u64, width: usize, style: Style) -> Span<'static> {
        let style = if quantity == 0 {
            Style::default().fg(self.theme.muted())
        } else {
            style
        };
        Span::styled(format!(" {}", pad_left(&format_cell(quantity), width)), style)
    }

    fn render_header(&self, x: u16, y: u16, buf: &mut Buffer) {
        let mut text = format!(
            "{} {}",
            pad_right("商品名", W_PRODUCT),
            pad_right("包装", W_PACKAGE)
        );
        for month in 1..=12 {
            text.push(' ');
            text.push_str(&pad_left(&format!("{}月", month), W_MONTH));
        }
        text.push(' ');
        text.push_str(&pad_left("合計", W_TOTAL));

        let line = Line::from(Span::styled(
            text,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(x, y, &line, TABLE_WIDTH);
    }

    fn render_rows(&self, area: Rect, x: u16, buf: &mut Buffer) {
        let offset = self.scroll_offset.min(Self::max_scroll_offset(self.report));
        let text_style = Style::default().fg(self.theme.text());

        for (i, row) in self
            .report
            .rows
            .iter()
            .skip(offset)
            .take(area.height as usize)
            .enumerate()
        {
            let product = format!("{} {}", row.product_code, row.product_name);
            let mut spans = vec![
                Span::styled(pad_right(&product, W_PRODUCT), text_style),
                Span::raw(" "),
                Span::styled(
                    pad_right(&row.package_type, W_PACKAGE),
                    Style::default().fg(self.theme.muted()),
                ),
            ];
            for month in 1..=12 {
                spans.push(self.cell(row.quantity(month), W_MONTH, text_style));
            }
            spans.push(self.cell(
                row.total,
                W_TOTAL,
                Style::default()
                    .fg(self.theme.total())
                    .add_modifier(Modifier::BOLD),
            ));

            buf.set_line(x, area.y + i as u16, &Line::from(spans), TABLE_WIDTH);
        }
    }

    fn render_totals(&self, x: u16, y: u16, buf: &mut Buffer) {
        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let mut spans = vec![Span::styled(pad_right("合計", W_PRODUCT + 1 + W_PACKAGE), bold)];
        for month in 1..=12 {
            spans.push(self.cell(self.report.month_total(month), W_MONTH, bold));
        }
        spans.push(self.cell(
            self.report.grand_total,
            W_TOTAL,
            Style::default()
                .fg(self.theme.total())
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(x, y, &Line::from(spans), TABLE_WIDTH);
    }
}

impl Widget for YearlyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let row_count = self.report.rows.len().min(VISIBLE_ROWS) as u16;
        let chunks = Layout::vertical([
            Constraint::Length(1),         // Top padding
            Constraint::Length(1),         // Tabs
            Constraint::Length(1),         // Separator
            Constraint::Length(1),         // Year
            Constraint::Length(1),         // Blank
            Constraint::Length(1),         // Header
            Constraint::Length(row_count), // Product rows
            Constraint::Length(1),         // Totals
            Constraint::Length(1),         // Separator
            Constraint::Length(1),         // Keybindings
            Constraint::Min(0),            // Remaining space
        ])
        .split(area);

        TabBar::new(Tab::Yearly, self.theme).render(chunks[1], buf);
        Separator::new(self.theme).render(chunks[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", Style::default().fg(self.theme.muted())),
            Span::styled(
                format!("{}年 月別製造数推移", self.report.year),
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if self.report.rows.is_empty() {
            Paragraph::new(Span::styled(
                "製造データがありません",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        } else {
            // Left-aligned when the terminal is narrower than the matrix
            let x = area.x + area.width.saturating_sub(TABLE_WIDTH) / 2;
            self.render_header(x, chunks[5].y, buf);
            self.render_rows(chunks[6], x, buf);
            self.render_totals(x, chunks[7].y, buf);
        }

        Separator::new(self.theme).render(chunks[8], buf);
        Keybindings::new(self.theme, Tab::Yearly.has_period()).render(chunks[9], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::YearlyRow;

    fn make_row(code: &str, name: &str, month: usize, qty: u64) -> YearlyRow {
        let mut monthly = [0u64; 12];
        monthly[month - 1] = qty;
        YearlyRow {
            product_name: name.to_string(),
            product_code: code.to_string(),
            package_type: "box".to_string(),
            monthly,
            total: qty,
        }
    }

    fn make_report(rows: Vec<YearlyRow>) -> YearlyReport {
        let mut month_totals = [0u64; 12];
        for row in &rows {
            for (i, q) in row.monthly.iter().enumerate() {
                month_totals[i] += q;
            }
        }
        YearlyReport {
            year: 2025,
            grand_total: month_totals.iter().sum(),
            rows,
            month_totals,
        }
    }

    fn render_text(report: &YearlyReport, scroll: usize) -> String {
        let area = Rect::new(0, 0, TABLE_WIDTH, 30);
        let mut buf = Buffer::empty(area);
        YearlyView::new(report, Theme::Dark)
            .with_scroll(scroll)
            .render(area, &mut buf);
        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        content.replace(' ', "")
    }

    #[test]
    fn test_yearly_view_matrix() {
        let report = make_report(vec![
            make_row("A1", "あんこ餅", 1, 1200),
            make_row("B2", "わらび餅", 3, 40),
        ]);
        let text = render_text(&report, 0);

        assert!(text.contains("2025年月別製造数推移"));
        assert!(text.contains("12月"));
        // Jan 1,200 then eleven empty months, row total 1,200
        assert!(text.contains("A1あんこ餅box1,200-----------1,200"));
        assert!(text.contains("B2わらび餅box--40---------40"));
        assert!(text.contains("合計1,200-40---------1,240"));
    }

    #[test]
    fn test_yearly_view_empty() {
        let text = render_text(&make_report(Vec::new()), 0);
        assert!(text.contains("製造データがありません"));
        assert!(!text.contains("12月"));
    }

    #[test]
    fn test_yearly_max_scroll_offset() {
        let rows: Vec<YearlyRow> = (0..18)
            .map(|i| make_row(&format!("P{:02}", i), "x", 1, 1))
            .collect();
        let report = make_report(rows);
        assert_eq!(YearlyView::max_scroll_offset(&report), 3);

        let text = render_text(&report, 3);
        assert!(!text.contains("P02"));
        assert!(text.contains("P03"));
        assert!(text.contains("P17"));
    }
}
