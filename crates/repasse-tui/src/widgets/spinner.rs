use ratatui::style::Style;
use ratatui::text::{Line, Span};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner shown next to in-flight work.
pub struct Spinner {
    tick: usize,
    style: Style,
}

impl Spinner {
    pub fn new(style: Style) -> Self {
        Self { tick: 0, style }
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.tick]
    }

    /// The current frame followed by `label`.
    pub fn line<'a>(&self, label: &'a str, label_style: Style) -> Line<'a> {
        Line::from(vec![
            Span::styled(self.frame(), self.style),
            Span::raw(" "),
            Span::styled(label, label_style),
        ])
    }
}
