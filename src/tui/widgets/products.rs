//! Product totals table and the Daily / Monthly views built on it

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::footer::{Keybindings, Separator};
use super::tabs::{Tab, TabBar};
use crate::services::format::{pad_left, pad_right};
use crate::services::format_number;
use crate::tui::theme::Theme;
use crate::types::ProductionSummary;

/// Visible rows for scrolling (excluding header and total)
pub const VISIBLE_ROWS: usize = 15;

/// Maximum content width (keeps layout clean on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 120;

/// Column widths: Code(10), Name(28), Package(12), Quantity(10), with 1-column gaps
const W_CODE: usize = 10;
const W_NAME: usize = 28;
const W_PACKAGE: usize = 12;
const W_QTY: usize = 10;
const TABLE_WIDTH: u16 = (W_CODE + W_NAME + W_PACKAGE + W_QTY + 3) as u16;

/// Scrollable product table with a total footer
pub struct ProductTable<'a> {
    items: &'a [ProductionSummary],
    total_quantity: u64,
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> ProductTable<'a> {
    pub fn new(items: &'a [ProductionSummary], total_quantity: u64, theme: Theme) -> Self {
        Self {
            items,
            total_quantity,
            scroll_offset: 0,
            theme,
        }
    }

    pub fn with_scroll(mut self, scroll_offset: usize) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Maximum scroll offset for an item count
    pub fn max_scroll_offset(count: usize) -> usize {
        count.saturating_sub(VISIBLE_ROWS)
    }

    /// Rows needed: header + visible items + total (1 for the empty message)
    pub fn height(count: usize) -> u16 {
        if count == 0 {
            1
        } else {
            count.min(VISIBLE_ROWS) as u16 + 2
        }
    }

    fn render_row(&self, item: &ProductionSummary, x: u16, y: u16, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(
                pad_right(&item.product_code, W_CODE),
                Style::default().fg(self.theme.code()),
            ),
            Span::raw(" "),
            Span::styled(
                pad_right(&item.product_name, W_NAME),
                Style::default().fg(self.theme.text()),
            ),
            Span::raw(" "),
            Span::styled(
                pad_right(&item.package_type, W_PACKAGE),
                Style::default().fg(self.theme.muted()),
            ),
            Span::raw(" "),
            Span::styled(
                pad_left(&format_number(item.quantity), W_QTY),
                Style::default().fg(self.theme.text()),
            ),
        ]);
        buf.set_line(x, y, &line, TABLE_WIDTH);
    }
}

impl Widget for ProductTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        if self.items.is_empty() {
            Paragraph::new(Span::styled(
                "製造データがありません",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let x = area.x + area.width.saturating_sub(TABLE_WIDTH) / 2;
        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);

        let header = Line::from(vec![Span::styled(
            format!(
                "{} {} {} {}",
                pad_right("商品コード", W_CODE),
                pad_right("商品名", W_NAME),
                pad_right("包装タイプ", W_PACKAGE),
                pad_left("数量", W_QTY)
            ),
            bold,
        )]);
        buf.set_line(x, area.y, &header, TABLE_WIDTH);

        let visible = (area.height as usize).saturating_sub(2);
        let offset = self.scroll_offset.min(Self::max_scroll_offset(self.items.len()));
        for (i, item) in self.items.iter().skip(offset).take(visible).enumerate() {
            self.render_row(item, x, area.y + 1 + i as u16, buf);
        }

        if area.height >= 2 {
            let total = Line::from(vec![
                Span::styled(pad_right("合計", W_CODE + W_NAME + W_PACKAGE + 2), bold),
                Span::raw(" "),
                Span::styled(
                    pad_left(&format_number(self.total_quantity), W_QTY),
                    Style::default()
                        .fg(self.theme.total())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            buf.set_line(x, area.y + area.height - 1, &total, TABLE_WIDTH);
        }
    }
}

/// Daily or Monthly view: selected period, counts, and the product table
pub struct ProductsView<'a> {
    /// Selected period, e.g. "2025/01/05" or "2025年3月"
    period: String,
    items: &'a [ProductionSummary],
    item_count: usize,
    total_quantity: u64,
    scroll_offset: usize,
    theme: Theme,
    tab: Tab,
}

impl<'a> ProductsView<'a> {
    pub fn new(
        period: String,
        items: &'a [ProductionSummary],
        item_count: usize,
        total_quantity: u64,
        theme: Theme,
    ) -> Self {
        Self {
            period,
            items,
            item_count,
            total_quantity,
            scroll_offset: 0,
            theme,
            tab: Tab::Daily,
        }
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    pub fn with_scroll(mut self, scroll_offset: usize) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }
}

impl Widget for ProductsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1),                                    // Top padding
            Constraint::Length(1),                                    // Tabs
            Constraint::Length(1),                                    // Separator
            Constraint::Length(1),                                    // Period
            Constraint::Length(1),                                    // Counts
            Constraint::Length(1),                                    // Blank
            Constraint::Length(ProductTable::height(self.items.len())), // Table
            Constraint::Length(1),                                    // Separator
            Constraint::Length(1),                                    // Keybindings
            Constraint::Min(0),                                       // Remaining space
        ])
        .split(centered_area);

        TabBar::new(self.tab, self.theme).render(chunks[1], buf);
        Separator::new(self.theme).render(chunks[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", Style::default().fg(self.theme.muted())),
            Span::styled(
                self.period.clone(),
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ▶", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{}品目", self.item_count),
                Style::default().fg(self.theme.text()),
            ),
            Span::styled(" / ", Style::default().fg(self.theme.muted())),
            Span::styled(
                format!("合計 {}", format_number(self.total_quantity)),
                Style::default().fg(self.theme.total()),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        ProductTable::new(self.items, self.total_quantity, self.theme)
            .with_scroll(self.scroll_offset)
            .render(chunks[6], buf);

        Separator::new(self.theme).render(chunks[7], buf);
        Keybindings::new(self.theme, self.tab.has_period()).render(chunks[8], buf);
    }
}
