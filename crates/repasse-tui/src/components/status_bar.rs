use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::component::Component;
use crate::keymap::Keymap;
use crate::theme::Theme;

/// Bottom line: service address, history fill, last message and key hints.
pub struct StatusBar {
    service_info: String,
    history_info: String,
    message: Option<(String, bool)>,
    theme: Theme,
    hints: String,
}

impl StatusBar {
    pub fn new(theme: Theme, keymap: &Keymap, service: &str) -> Self {
        let hints = format!(
            " | {}:consultar {}:copiar {}:histórico {}:logs {}:sair ",
            keymap.hint("submit"),
            keymap.hint("copy_result"),
            keymap.hint("focus_history"),
            keymap.hint("toggle_log_panel"),
            keymap.hint("quit"),
        );
        Self {
            service_info: service.to_string(),
            history_info: String::new(),
            message: None,
            theme,
            hints,
        }
    }

    pub fn set_history(&mut self, len: usize, capacity: usize) {
        self.history_info = format!("histórico {}/{}", len, capacity);
    }

    pub fn set_message(&mut self, msg: String) {
        self.message = Some((msg, false));
    }

    pub fn set_error(&mut self, msg: String) {
        self.message = Some((msg, true));
    }
}

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, _focused: bool) {
        let mut spans = vec![
            Span::styled(" ", self.theme.status_bar),
            Span::styled(self.service_info.as_str(), self.theme.status_bar),
            Span::styled(" | ", self.theme.status_bar),
            Span::styled(self.history_info.as_str(), self.theme.status_bar),
        ];

        if let Some((msg, is_error)) = &self.message {
            let style = if *is_error {
                self.theme.status_bar.patch(self.theme.error)
            } else {
                self.theme.status_bar
            };
            spans.push(Span::styled(" | ", self.theme.status_bar));
            spans.push(Span::styled(msg.as_str(), style));
        }

        spans.push(Span::styled(self.hints.as_str(), self.theme.status_bar));

        // Pad to fill width
        let content_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let padding = " ".repeat((area.width as usize).saturating_sub(content_len));
        spans.push(Span::styled(padding, self.theme.status_bar));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
