use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use repasse_core::history::HistoryCache;

use crate::action::Action;
use crate::component::Component;
use crate::theme::Theme;

/// Past results, most recent first. Enter replays without a network call.
pub struct HistoryPanel {
    summaries: Vec<String>,
    capacity: usize,
    selected: usize,
    theme: Theme,
}

impl HistoryPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            summaries: Vec::new(),
            capacity: 0,
            selected: 0,
            theme,
        }
    }

    pub fn sync(&mut self, history: &HistoryCache) {
        let fresh: Vec<String> = history.all().iter().map(|r| r.summary()).collect();
        if fresh != self.summaries {
            // A new entry lands on top; keep the cursor on it
            self.summaries = fresh;
            self.selected = 0;
        }
        self.capacity = history.capacity();
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.summaries.is_empty()).then_some(self.selected)
    }

    /// Entry index drawn at screen row `row`, given the panel's last area.
    pub fn entry_at(&self, area: Rect, row: u16) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if row < inner.y || row >= inner.y + inner.height {
            return None;
        }
        let index = self.offset(inner.height) + (row - inner.y) as usize;
        (index < self.summaries.len()).then_some(index)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.summaries.len() {
            self.selected = index;
        }
    }

    fn offset(&self, height: u16) -> usize {
        let height = height.max(1) as usize;
        (self.selected + 1).saturating_sub(height)
    }
}

impl Component for HistoryPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.summaries.len() {
                    self.selected += 1;
                }
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.summaries.len().saturating_sub(1);
                Action::None
            }
            KeyCode::Enter => match self.selected() {
                Some(index) => Action::Replay(index),
                None => Action::None,
            },
            KeyCode::Char('x') | KeyCode::Delete if !self.summaries.is_empty() => {
                Action::ClearHistory
            }
            _ => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" Histórico ", self.theme.header),
                Span::styled(
                    format!("{}/{} ", self.summaries.len(), self.capacity),
                    self.theme.dimmed,
                ),
            ]))
            .borders(Borders::ALL)
            .border_style(if focused {
                self.theme.border_focused
            } else {
                self.theme.border
            });

        if self.summaries.is_empty() {
            let empty = List::new([ListItem::new(Span::styled(
                "Nenhuma consulta ainda",
                self.theme.dimmed,
            ))])
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .summaries
            .iter()
            .map(|s| ListItem::new(Span::styled(s.as_str(), self.theme.normal)))
            .collect();

        let highlight = if focused {
            self.theme.highlight
        } else {
            self.theme.normal
        };
        let list = List::new(items).block(block).highlight_style(highlight);

        let inner_height = area.height.saturating_sub(2);
        let mut state = ListState::default()
            .with_offset(self.offset(inner_height))
            .with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use repasse_core::model::LookupResult;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry(name: &str) -> LookupResult {
        LookupResult {
            entity_label: name.to_string(),
            period_label: "01.01.2024 até 31.01.2024".to_string(),
            fpm: 1.0,
            royalties: 2.0,
            todos: 3.0,
        }
    }

    fn cache(names: &[&str]) -> HistoryCache {
        let mut cache = HistoryCache::in_memory(25);
        for name in names.iter().rev() {
            cache.prepend(entry(name)).unwrap();
        }
        cache
    }

    #[test]
    fn test_enter_replays_selected() {
        let mut panel = HistoryPanel::new(Theme::default());
        panel.sync(&cache(&["Santos - SP", "Recife - PE"]));
        assert!(matches!(panel.handle_key_event(key(KeyCode::Enter)), Action::Replay(0)));
        panel.handle_key_event(key(KeyCode::Down));
        panel.handle_key_event(key(KeyCode::Down));
        assert!(matches!(panel.handle_key_event(key(KeyCode::Enter)), Action::Replay(1)));
    }

    #[test]
    fn test_empty_history() {
        let mut panel = HistoryPanel::new(Theme::default());
        panel.sync(&HistoryCache::in_memory(25));
        assert!(matches!(panel.handle_key_event(key(KeyCode::Enter)), Action::None));
        assert!(matches!(panel.handle_key_event(key(KeyCode::Char('x'))), Action::None));
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_new_entry_moves_cursor_to_top() {
        let mut panel = HistoryPanel::new(Theme::default());
        let mut history = cache(&["Santos - SP", "Recife - PE"]);
        panel.sync(&history);
        panel.select(1);
        panel.sync(&history);
        assert_eq!(panel.selected(), Some(1));

        history.prepend(entry("Natal - RN")).unwrap();
        panel.sync(&history);
        assert_eq!(panel.selected(), Some(0));
    }

    #[test]
    fn test_entry_at() {
        let mut panel = HistoryPanel::new(Theme::default());
        panel.sync(&cache(&["A", "B", "C"]));
        let area = Rect::new(40, 5, 40, 10);
        assert_eq!(panel.entry_at(area, 5), None);
        assert_eq!(panel.entry_at(area, 6), Some(0));
        assert_eq!(panel.entry_at(area, 8), Some(2));
        assert_eq!(panel.entry_at(area, 9), None);
    }

    #[test]
    fn test_clear_key() {
        let mut panel = HistoryPanel::new(Theme::default());
        panel.sync(&cache(&["A"]));
        assert!(matches!(panel.handle_key_event(key(KeyCode::Char('x'))), Action::ClearHistory));
    }
}
