use chrono::{Datelike, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use repasse_core::coordinator::LOADING_MESSAGE;
use repasse_core::dates::INPUT_FORMAT;

use crate::action::{Action, FocusTarget};
use crate::theme::Theme;
use crate::widgets::spinner::Spinner;
use crate::widgets::text_input::TextInput;

const START_LABEL: &str = "Início: ";
const END_LABEL: &str = "Fim: ";
const BUTTON_LABEL: &str = "[ Consultar ]";

/// Screen rectangles of the form's three targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormAreas {
    pub start: Rect,
    pub end: Rect,
    pub button: Rect,
}

/// Period inputs and the submit button.
pub struct QueryForm {
    pub start: TextInput,
    pub end: TextInput,
    submitting: bool,
    spinner: Spinner,
    theme: Theme,
}

impl QueryForm {
    /// Prefilled with the first day of `today`'s month through `today`.
    pub fn new(theme: Theme, today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        Self {
            start: TextInput::with_text(first.format(INPUT_FORMAT).to_string()),
            end: TextInput::with_text(today.format(INPUT_FORMAT).to_string()),
            submitting: false,
            spinner: Spinner::new(theme.warning),
            theme,
        }
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn tick(&mut self) {
        if self.submitting {
            self.spinner.tick();
        }
    }

    pub fn handle_key_event(&mut self, focus: FocusTarget, key: KeyEvent) -> Action {
        match focus {
            FocusTarget::PeriodStart | FocusTarget::PeriodEnd => {
                if key.code == KeyCode::Enter {
                    return Action::Submit;
                }
                let input = if focus == FocusTarget::PeriodStart {
                    &mut self.start
                } else {
                    &mut self.end
                };
                input.handle_key(&key);
                Action::None
            }
            FocusTarget::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Action::Submit,
                _ => Action::None,
            },
            _ => Action::None,
        }
    }

    /// Paste into whichever date field is focused.
    pub fn paste(&mut self, focus: FocusTarget, text: &str) {
        match focus {
            FocusTarget::PeriodStart => {
                self.start.insert_str(text.trim());
            }
            FocusTarget::PeriodEnd => {
                self.end.insert_str(text.trim());
            }
            _ => {}
        }
    }

    /// Split the block's inner area into the two fields and the button.
    pub fn areas(area: Rect) -> FormAreas {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let row = Rect {
            height: inner.height.min(1),
            ..inner
        };
        let cols = Layout::horizontal([
            Constraint::Length((START_LABEL.chars().count() + 12) as u16),
            Constraint::Length((END_LABEL.chars().count() + 12) as u16),
            Constraint::Length((LOADING_MESSAGE.chars().count() + 3) as u16),
            Constraint::Min(0),
        ])
        .split(row);
        FormAreas {
            start: cols[0],
            end: cols[1],
            button: cols[2],
        }
    }

    /// Which focus target a click at `pos` lands on.
    pub fn target_at(area: Rect, pos: Rect) -> Option<FocusTarget> {
        let areas = Self::areas(area);
        if areas.start.intersects(pos) {
            Some(FocusTarget::PeriodStart)
        } else if areas.end.intersects(pos) {
            Some(FocusTarget::PeriodEnd)
        } else if areas.button.intersects(pos) {
            Some(FocusTarget::Submit)
        } else {
            None
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focus: FocusTarget) {
        let in_form = matches!(
            focus,
            FocusTarget::PeriodStart | FocusTarget::PeriodEnd | FocusTarget::Submit
        );
        let block = Block::default()
            .title(Span::styled(" Período ", self.theme.header))
            .borders(Borders::ALL)
            .border_style(if in_form {
                self.theme.border_focused
            } else {
                self.theme.border
            });
        frame.render_widget(block, area);

        let areas = Self::areas(area);
        for (input, label, rect, target) in [
            (&self.start, START_LABEL, areas.start, FocusTarget::PeriodStart),
            (&self.end, END_LABEL, areas.end, FocusTarget::PeriodEnd),
        ] {
            let line = input.line(
                label,
                self.theme.input_prompt,
                self.theme.normal,
                "AAAA-MM-DD",
                self.theme.dimmed,
            );
            frame.render_widget(Paragraph::new(line), rect);
            if focus == target && rect.height > 0 {
                let x = rect.x + (label.chars().count() + input.cursor()) as u16;
                frame.set_cursor_position(Position::new(
                    x.min(rect.x + rect.width.saturating_sub(1)),
                    rect.y,
                ));
            }
        }

        if self.submitting {
            let line = self.spinner.line(LOADING_MESSAGE, self.theme.button_disabled);
            frame.render_widget(Paragraph::new(line), areas.button);
        } else {
            let mut style = self.theme.button;
            if focus == FocusTarget::Submit {
                style = style.add_modifier(Modifier::REVERSED);
            }
            frame.render_widget(
                Paragraph::new(Span::styled(BUTTON_LABEL, style)),
                areas.button,
            );
        }
    }
}
