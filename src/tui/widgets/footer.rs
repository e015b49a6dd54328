//! Separator line and keybinding hints shared by every view

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Full-width horizontal rule
pub struct Separator {
    theme: Theme,
}

impl Separator {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Separator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }
}

/// Centered keybinding hints
pub struct Keybindings {
    theme: Theme,
    /// Show the ←→ period hint
    period: bool,
}

impl Keybindings {
    pub fn new(theme: Theme, period: bool) -> Self {
        Self { theme, period }
    }

    fn bindings(&self) -> Vec<(&'static str, &'static str)> {
        let mut bindings = vec![("Tab", ": Switch view")];
        if self.period {
            bindings.push(("←→", ": Period"));
        }
        bindings.extend([
            ("↑↓", ": Scroll"),
            ("r", ": Reload"),
            ("?", ": Help"),
            ("q", ": Quit"),
        ]);
        bindings
    }
}

impl Widget for Keybindings {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (key, desc)) in self.bindings().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, Style::default().fg(self.theme.accent())));
            spans.push(Span::styled(desc, Style::default().fg(self.theme.muted())));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
