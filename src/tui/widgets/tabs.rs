//! Tab bar widget for view navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::format::display_width;
use crate::tui::theme::Theme;

/// Available tabs in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Today,
    Daily,
    Monthly,
    Yearly,
}

impl Tab {
    /// Get the display label for this tab
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "本日",
            Self::Daily => "日別",
            Self::Monthly => "月別",
            Self::Yearly => "年別",
        }
    }

    /// Get all tabs in order
    pub fn all() -> &'static [Tab] {
        &[Tab::Today, Tab::Daily, Tab::Monthly, Tab::Yearly]
    }

    /// Get the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Today => Self::Daily,
            Self::Daily => Self::Monthly,
            Self::Monthly => Self::Yearly,
            Self::Yearly => Self::Today,
        }
    }

    /// Get the previous tab (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Today => Self::Yearly,
            Self::Daily => Self::Today,
            Self::Monthly => Self::Daily,
            Self::Yearly => Self::Monthly,
        }
    }

    /// Get tab from number key (1-4)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Today),
            2 => Some(Self::Daily),
            3 => Some(Self::Monthly),
            4 => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Whether ←/→ move a selected period on this tab
    pub fn has_period(self) -> bool {
        !matches!(self, Self::Today)
    }
}

/// Tab bar widget showing available views
pub struct TabBar {
    selected: Tab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self { selected, theme }
    }

    fn display(tab: Tab, selected: bool) -> String {
        if selected {
            format!("[{}]", tab.label())
        } else {
            tab.label().to_string()
        }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Labels are full-width, so measure in terminal columns
        let total_width: u16 = Tab::all()
            .iter()
            .map(|tab| display_width(&Self::display(*tab, *tab == self.selected)) as u16 + 2)
            .sum::<u16>()
            .saturating_sub(2);

        let start_x = area.x + (area.width.saturating_sub(total_width)) / 2;
        let mut x = start_x;

        for tab in Tab::all() {
            let is_selected = *tab == self.selected;
            let display = Self::display(*tab, is_selected);

            let display_len = display_width(&display) as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}
