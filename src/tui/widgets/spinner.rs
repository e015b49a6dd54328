//! Loading spinner widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::format::display_width;
use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// App branding
const APP_NAME: &str = "prodtrack";
const TAGLINE: &str = "Production quantity reports";

/// Loading spinner widget
pub struct Spinner<'a> {
    frame: usize,
    /// What is being fetched, e.g. "2025/03"
    label: &'a str,
    theme: Theme,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, label: &'a str, theme: Theme) -> Self {
        Self {
            frame,
            label,
            theme,
        }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    fn message(&self) -> String {
        format!("{} Loading {}...", self.current_char(), self.label)
    }
}

fn centered_x(area: Rect, text: &str) -> u16 {
    area.x + (area.width.saturating_sub(display_width(text) as u16)) / 2
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 || area.width < 35 {
            return;
        }

        // 4 lines: name, tagline, blank, spinner
        let center_y = area.y + area.height / 2;

        let name_y = center_y.saturating_sub(2);
        buf.set_string(
            centered_x(area, APP_NAME),
            name_y,
            APP_NAME,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        let tag_y = name_y + 1;
        buf.set_string(
            centered_x(area, TAGLINE),
            tag_y,
            TAGLINE,
            Style::default().fg(self.theme.muted()),
        );

        let message = self.message();
        buf.set_string(
            centered_x(area, &message),
            tag_y + 2,
            &message,
            Style::default().fg(self.theme.accent()),
        );
    }
}
