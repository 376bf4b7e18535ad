use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// What a key did to a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    /// The text changed.
    Changed,
    /// Only the cursor moved.
    Moved,
    /// The key is not an editing key.
    Ignored,
}

/// Single-line text buffer with a cursor counted in characters.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content and move the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Insert pasted text at the cursor. Line breaks and control characters are dropped.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let clean: String = text.chars().filter(|c| !c.is_control()).collect();
        if clean.is_empty() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.buffer.insert_str(at, &clean);
        self.cursor += clean.chars().count();
        true
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEdit {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.buffer.is_empty() {
                    return InputEdit::Ignored;
                }
                self.clear();
                InputEdit::Changed
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                InputEdit::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputEdit::Ignored;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.buffer.remove(at);
                InputEdit::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.len() {
                    return InputEdit::Ignored;
                }
                let at = self.byte_index(self.cursor);
                self.buffer.remove(at);
                InputEdit::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputEdit::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputEdit::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputEdit::Moved
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputEdit::Moved
            }
            _ => InputEdit::Ignored,
        }
    }

    /// Prompt followed by the text, or a dimmed placeholder when empty.
    pub fn line<'a>(
        &'a self,
        prompt: &'a str,
        prompt_style: Style,
        text_style: Style,
        placeholder: &'a str,
        placeholder_style: Style,
    ) -> Line<'a> {
        let body = if self.buffer.is_empty() {
            Span::styled(placeholder, placeholder_style)
        } else {
            Span::styled(self.buffer.as_str(), text_style)
        };
        Line::from(vec![Span::styled(prompt, prompt_style), body])
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}
