use crate::action::FocusTarget;

/// Tab order of the query screen.
const ORDER: [FocusTarget; 5] = [
    FocusTarget::Search,
    FocusTarget::PeriodStart,
    FocusTarget::PeriodEnd,
    FocusTarget::Submit,
    FocusTarget::History,
];

/// Tracks which widget is currently focused.
pub struct FocusManager {
    current: FocusTarget,
}

impl FocusManager {
    pub fn new() -> Self {
        Self {
            current: FocusTarget::Search,
        }
    }

    pub fn current(&self) -> FocusTarget {
        self.current
    }

    pub fn set(&mut self, target: FocusTarget) {
        self.current = target;
    }

    pub fn is_focused(&self, target: FocusTarget) -> bool {
        self.current == target
    }

    /// Move focus to the next widget.
    pub fn next(&mut self) {
        let idx = self.index();
        self.current = ORDER[(idx + 1) % ORDER.len()];
    }

    /// Move focus to the previous widget.
    pub fn prev(&mut self) {
        let idx = self.index();
        self.current = ORDER[(idx + ORDER.len() - 1) % ORDER.len()];
    }

    fn index(&self) -> usize {
        ORDER.iter().position(|t| *t == self.current).unwrap_or(0)
    }
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_focus() {
        let fm = FocusManager::new();
        assert_eq!(fm.current(), FocusTarget::Search);
    }

    #[test]
    fn test_focus_next_cycles() {
        let mut fm = FocusManager::new();
        fm.next();
        assert_eq!(fm.current(), FocusTarget::PeriodStart);
        fm.next();
        fm.next();
        assert_eq!(fm.current(), FocusTarget::Submit);
        fm.next();
        assert_eq!(fm.current(), FocusTarget::History);
        fm.next();
        assert_eq!(fm.current(), FocusTarget::Search); // wraps
    }

    #[test]
    fn test_focus_prev_cycles() {
        let mut fm = FocusManager::new();
        fm.prev();
        assert_eq!(fm.current(), FocusTarget::History); // wraps back
        fm.prev();
        assert_eq!(fm.current(), FocusTarget::Submit);
    }

    #[test]
    fn test_focus_set() {
        let mut fm = FocusManager::new();
        fm.set(FocusTarget::PeriodEnd);
        assert!(fm.is_focused(FocusTarget::PeriodEnd));
        assert!(!fm.is_focused(FocusTarget::Search));
    }
}
