use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;

/// Centered overlay geometry. Size is a share of the screen, never smaller
/// than `min_width` x `min_height` cells and never larger than the screen.
#[derive(Debug, Clone, Copy)]
pub struct Popup {
    width_percent: u16,
    height_percent: u16,
    min_width: u16,
    min_height: u16,
}

impl Popup {
    pub fn new(width_percent: u16, height_percent: u16) -> Self {
        Self {
            width_percent,
            height_percent,
            min_width: 30,
            min_height: 5,
        }
    }

    pub fn with_min(mut self, min_width: u16, min_height: u16) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    pub fn centered_area(&self, full: Rect) -> Rect {
        let share = |len: u16, pct: u16| (u32::from(len) * u32::from(pct) / 100) as u16;
        let width = share(full.width, self.width_percent)
            .max(self.min_width)
            .min(full.width);
        let height = share(full.height, self.height_percent)
            .max(self.min_height)
            .min(full.height);
        Rect {
            x: full.x + (full.width - width) / 2,
            y: full.y + (full.height - height) / 2,
            width,
            height,
        }
    }

    /// Clear the background and draw a titled border. Returns the inner area.
    pub fn render_frame(&self, frame: &mut Frame, full: Rect, title: &str, theme: &Theme) -> Rect {
        let area = self.centered_area(full);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", title), theme.popup_title))
            .borders(Borders::ALL)
            .border_style(theme.popup_border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }
}

/// Modal notice: wrapped message above a key hint.
pub fn render_message_popup(
    frame: &mut Frame,
    full: Rect,
    title: &str,
    message: &str,
    hint: &str,
    theme: &Theme,
) {
    // Border + blank + hint around however many lines the message wraps to
    let text_width = (full.width / 2).max(30).saturating_sub(2).max(1) as usize;
    let wrapped = message.chars().count().div_ceil(text_width).max(1) as u16;
    let popup = Popup::new(50, 0).with_min(30, wrapped + 4);
    let inner = popup.render_frame(frame, full, title, theme);

    let [body, hint_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(message)
            .style(theme.normal)
            .wrap(Wrap { trim: true }),
        body,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, theme.dimmed))),
        hint_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_share() {
        let area = Popup::new(50, 50).centered_area(Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_minimum_and_screen_clamp() {
        let popup = Popup::new(10, 10).with_min(40, 8);
        assert_eq!(
            popup.centered_area(Rect::new(0, 0, 100, 40)),
            Rect::new(30, 16, 40, 8)
        );
        // Never larger than a tiny screen
        assert_eq!(
            popup.centered_area(Rect::new(0, 0, 20, 4)),
            Rect::new(0, 0, 20, 4)
        );
    }
}
