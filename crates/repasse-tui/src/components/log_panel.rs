use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Action;
use crate::components::popup::Popup;
use crate::theme::Theme;

const CAPACITY: usize = 500;

/// Overlay listing this session's status and error messages, newest last.
pub struct LogPanel {
    pub visible: bool,
    theme: Theme,
    entries: VecDeque<LogEntry>,
    /// Lines scrolled up from the newest entry; 0 follows the tail.
    scroll_back: usize,
}

struct LogEntry {
    at: DateTime<Local>,
    is_error: bool,
    message: String,
}

impl LogPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            visible: false,
            theme,
            entries: VecDeque::with_capacity(CAPACITY),
            scroll_back: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.scroll_back = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_info(&mut self, msg: String) {
        self.push(msg, false);
    }

    pub fn push_error(&mut self, msg: String) {
        self.push(msg, true);
    }

    fn push(&mut self, message: String, is_error: bool) {
        if self.entries.len() == CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            at: Local::now(),
            is_error,
            message,
        });
        // Keep a scrolled view anchored on the same entries
        if self.scroll_back > 0 {
            self.scroll_back = (self.scroll_back + 1).min(self.max_scroll());
        }
    }

    fn max_scroll(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::ClosePopup,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_back = (self.scroll_back + 1).min(self.max_scroll())
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_back = self.scroll_back.saturating_sub(1)
            }
            KeyCode::PageUp => self.scroll_back = (self.scroll_back + 10).min(self.max_scroll()),
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_back = self.max_scroll(),
            KeyCode::End | KeyCode::Char('G') => self.scroll_back = 0,
            _ => {}
        }
        Action::None
    }

    fn entry_line<'a>(&self, entry: &'a LogEntry) -> Line<'a> {
        let (mark, style) = if entry.is_error {
            ("✗ ", self.theme.error)
        } else {
            ("· ", self.theme.normal)
        };
        Line::from(vec![
            Span::styled(entry.at.format("%H:%M:%S ").to_string(), self.theme.dimmed),
            Span::styled(mark, style),
            Span::styled(entry.message.as_str(), style),
        ])
    }

    pub fn render(&self, frame: &mut Frame, full: Rect) {
        if !self.visible {
            return;
        }

        let title = format!("Mensagens ({})", self.entries.len());
        let inner = Popup::new(80, 60).render_frame(frame, full, &title, &self.theme);
        let [body, hint] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        // Window ending `scroll_back` entries before the newest
        let height = body.height as usize;
        let end = self.entries.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(height);
        let lines: Vec<Line> = self
            .entries
            .range(start..end)
            .map(|entry| self.entry_line(entry))
            .collect();
        frame.render_widget(Paragraph::new(lines), body);

        let follow = if self.scroll_back == 0 { "fim" } else { "rolando" };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("j/k: rolar  g/G: início/fim  q: fechar  [{}]", follow),
                self.theme.dimmed,
            ))),
            hint,
        );
    }
}
