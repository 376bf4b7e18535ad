use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use repasse_core::coordinator::Coordinator;
use repasse_core::session::SearchPhase;

use crate::action::{Action, FocusTarget};
use crate::component::Component;
use crate::theme::Theme;
use crate::widgets::text_input::{InputEdit, TextInput};

const PROMPT: &str = "> ";
const MAX_VISIBLE: usize = 8;

/// Municipality search field plus its suggestion dropdown.
pub struct SearchPanel {
    pub input: TextInput,
    theme: Theme,
    labels: Vec<String>,
    open: bool,
    highlighted: Option<usize>,
    selected_code: Option<u32>,
    phase: SearchPhase,
}

impl SearchPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            input: TextInput::new(),
            theme,
            labels: Vec::new(),
            open: false,
            highlighted: None,
            selected_code: None,
            phase: SearchPhase::Idle,
        }
    }

    /// Mirror the coordinator's search state.
    pub fn sync(&mut self, coordinator: &Coordinator) {
        if self.input.text() != coordinator.search_text() {
            self.input.set_text(coordinator.search_text());
        }
        let list = coordinator.suggestions();
        self.labels = list.items().iter().map(|c| c.label()).collect();
        self.open = list.is_open();
        self.highlighted = list.highlighted();
        self.selected_code = coordinator.selection().map(|c| c.code);
        self.phase = coordinator.search_phase();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Bracketed paste into the field.
    pub fn paste(&mut self, text: &str) -> Action {
        if self.input.insert_str(text) {
            Action::SearchTextChanged(self.input.text().to_string())
        } else {
            Action::None
        }
    }

    /// Where the dropdown goes: under the field, or above it when the
    /// screen has no room below.
    pub fn dropdown_area(&self, field: Rect, screen: Rect) -> Option<Rect> {
        if !self.open || self.labels.is_empty() {
            return None;
        }
        let height = self.labels.len().min(MAX_VISIBLE) as u16 + 2;
        let below = field.y + field.height;
        let y = if below + height <= screen.y + screen.height {
            below
        } else if field.y >= screen.y + height {
            field.y - height
        } else {
            return None;
        };
        Some(Rect {
            x: field.x,
            y,
            width: field.width,
            height,
        })
    }

    /// Index of the suggestion drawn at screen row `row`.
    pub fn suggestion_at(&self, dropdown: Rect, row: u16) -> Option<usize> {
        let first = dropdown.y + 1;
        if row < first || row >= dropdown.y + dropdown.height.saturating_sub(1) {
            return None;
        }
        let index = self.scroll_offset() + (row - first) as usize;
        (index < self.labels.len()).then_some(index)
    }

    fn scroll_offset(&self) -> usize {
        match self.highlighted {
            Some(h) if h >= MAX_VISIBLE => h + 1 - MAX_VISIBLE,
            _ => 0,
        }
    }

    pub fn render_dropdown(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let total = self.labels.len();
        let title = if total > MAX_VISIBLE {
            format!(" Sugestões ({}/{}) ", MAX_VISIBLE, total)
        } else {
            format!(" Sugestões ({}) ", total)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.popup_border)
            .style(self.theme.dropdown);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let offset = self.scroll_offset();
        let items: Vec<ListItem> = self.labels[offset..]
            .iter()
            .take(MAX_VISIBLE)
            .enumerate()
            .map(|(i, label)| {
                let style = if self.highlighted == Some(offset + i) {
                    self.theme.highlight
                } else {
                    self.theme.dropdown
                };
                ListItem::new(Span::styled(label.as_str(), style))
            })
            .collect();

        frame.render_widget(List::new(items), inner);
    }
}

impl Component for SearchPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        if self.open {
            match key.code {
                KeyCode::Down => return Action::SuggestionNext,
                KeyCode::Up => return Action::SuggestionPrev,
                KeyCode::Esc => return Action::DismissSuggestions,
                KeyCode::Enter if self.highlighted.is_some() => return Action::SelectHighlighted,
                _ => {}
            }
        } else {
            match key.code {
                // Bring back a list hidden by Esc or an outside click
                KeyCode::Down if !self.labels.is_empty() => {
                    return Action::FocusPanel(FocusTarget::Search)
                }
                KeyCode::Enter => return Action::FocusNext,
                _ => {}
            }
        }

        match self.input.handle_key(&key) {
            InputEdit::Changed => Action::SearchTextChanged(self.input.text().to_string()),
            InputEdit::Moved | InputEdit::Ignored => Action::None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        let mut title = vec![Span::styled(" Município ", self.theme.header)];
        match (self.selected_code, self.phase) {
            (Some(code), _) => {
                title.push(Span::styled(format!("✓ {} ", code), self.theme.success))
            }
            (None, SearchPhase::Pending | SearchPhase::Fetching) => {
                title.push(Span::styled("buscando… ", self.theme.dimmed))
            }
            (None, SearchPhase::Idle) => {}
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = self.input.line(
            PROMPT,
            self.theme.input_prompt,
            self.theme.normal,
            "digite ao menos 2 letras",
            self.theme.dimmed,
        );
        frame.render_widget(Paragraph::new(line), inner);

        if focused && inner.height > 0 {
            let x = inner.x + (PROMPT.len() + self.input.cursor()) as u16;
            frame.set_cursor_position(Position::new(
                x.min(inner.x + inner.width.saturating_sub(1)),
                inner.y,
            ));
        }
    }
}
