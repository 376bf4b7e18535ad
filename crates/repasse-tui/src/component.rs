use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::action::Action;

/// Trait for the panels on the query screen.
pub trait Component {
    /// Handle a key event while focused. Return an Action to dispatch.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Action {
        Action::None
    }

    /// Render the component into the given area.
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}
