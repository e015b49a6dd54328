//! Today view: summary cards over today's product table

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::footer::{Keybindings, Separator};
use super::products::ProductTable;
use super::tabs::{Tab, TabBar};
use crate::services::format_number;
use crate::tui::theme::Theme;
use crate::types::DailyReport;

const MAX_CONTENT_WIDTH: u16 = 120;
const CARD_WIDTH: u16 = 22;
const CARD_HEIGHT: u16 = 4;

pub struct TodayView<'a> {
    report: &'a DailyReport,
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> TodayView<'a> {
    pub fn new(report: &'a DailyReport, theme: Theme) -> Self {
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

    fn render_card(&self, area: Rect, buf: &mut Buffer, title: &str, value: String, accent: bool) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted()));
        let inner = block.inner(area);
        block.render(area, buf);

        let color = if accent {
            self.theme.total()
        } else {
            self.theme.date()
        };
        Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(inner, buf);
    }

    fn render_cards(&self, area: Rect, buf: &mut Buffer) {
        let cards = Layout::horizontal([Constraint::Length(CARD_WIDTH); 3])
            .flex(Flex::Center)
            .spacing(2)
            .split(area);

        self.render_card(cards[0], buf, "本日の日付", format_date(self.report.date), false);
        self.render_card(
            cards[1],
            buf,
            "製造品目数",
            self.report.item_count.to_string(),
            false,
        );
        self.render_card(
            cards[2],
            buf,
            "製造合計数",
            format_number(self.report.total_quantity),
            true,
        );
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

impl Widget for TodayView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let table_height = ProductTable::height(self.report.items.len());
        let chunks = Layout::vertical([
            Constraint::Length(1),            // Top padding
            Constraint::Length(1),            // Tabs
            Constraint::Length(1),            // Separator
            Constraint::Length(CARD_HEIGHT),  // Cards
            Constraint::Length(1),            // Blank
            Constraint::Length(table_height), // Table
            Constraint::Length(1),            // Separator
            Constraint::Length(1),            // Keybindings
            Constraint::Min(0),               // Remaining space
        ])
        .split(centered_area);

        TabBar::new(Tab::Today, self.theme).render(chunks[1], buf);
        Separator::new(self.theme).render(chunks[2], buf);
        self.render_cards(chunks[3], buf);

        if self.report.items.is_empty() {
            Paragraph::new(Span::styled(
                "本日の製造データはまだありません",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        } else {
            ProductTable::new(&self.report.items, self.report.total_quantity, self.theme)
                .with_scroll(self.scroll_offset)
                .render(chunks[5], buf);
        }

        Separator::new(self.theme).render(chunks[6], buf);
        Keybindings::new(self.theme, Tab::Today.has_period()).render(chunks[7], buf);
    }
}
