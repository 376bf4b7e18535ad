use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::action::{Action, FocusTarget};
use crate::config::KeybindingConfig;

/// A single key chord such as `Ctrl+q` or `F5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Parse "Ctrl+q", "Alt+Enter", "Shift+Tab", "F7", "x".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key, mods) = parts.split_last()?;

        let mut modifiers = KeyModifiers::NONE;
        for m in mods {
            match m.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key.to_lowercase().as_str() {
            "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "delete" | "del" => KeyCode::Delete,
            lower => {
                if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    KeyCode::F(n)
                } else {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                        _ => return None,
                    }
                }
            }
        };

        Some(Self { code, modifiers })
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        match (self.code, key.code) {
            // Terminals disagree on whether BackTab carries SHIFT
            (KeyCode::BackTab, KeyCode::BackTab) => true,
            (KeyCode::Char(a), KeyCode::Char(b)) => {
                a == b.to_ascii_lowercase()
                    && self.modifiers == key.modifiers.difference(KeyModifiers::SHIFT)
            }
            (a, b) => a == b && self.modifiers == key.modifiers,
        }
    }

    /// Short label for the status bar.
    pub fn label(&self) -> String {
        let mut out = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            out.push_str("C-");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            out.push_str("M-");
        }
        match self.code {
            KeyCode::Char(c) => out.push(c),
            KeyCode::F(n) => out.push_str(&format!("F{}", n)),
            KeyCode::Tab => out.push_str("Tab"),
            KeyCode::BackTab => out.push_str("S-Tab"),
            KeyCode::Enter => out.push_str("Enter"),
            KeyCode::Esc => out.push_str("Esc"),
            other => out.push_str(&format!("{:?}", other)),
        }
        out
    }
}

struct Binding {
    name: &'static str,
    key: KeyBinding,
    action: fn() -> Action,
}

/// Global shortcuts, resolved before the focused widget sees the key.
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn from_config(config: &KeybindingConfig) -> Self {
        let table: [(&'static str, &str, fn() -> Action); 9] = [
            ("quit", &config.quit, || Action::Quit),
            ("force_quit", &config.force_quit, || Action::Quit),
            ("focus_next", &config.focus_next, || Action::FocusNext),
            ("focus_prev", &config.focus_prev, || Action::FocusPrev),
            ("submit", &config.submit, || Action::Submit),
            ("focus_search", &config.focus_search, || {
                Action::FocusPanel(FocusTarget::Search)
            }),
            ("focus_history", &config.focus_history, || {
                Action::FocusPanel(FocusTarget::History)
            }),
            ("copy_result", &config.copy_result, || Action::CopyResult),
            ("toggle_log_panel", &config.toggle_log_panel, || {
                Action::ToggleLogPanel
            }),
        ];

        let bindings = table
            .into_iter()
            .filter_map(|(name, raw, action)| match KeyBinding::parse(raw) {
                Some(key) => Some(Binding { name, key, action }),
                None => {
                    warn!("Ignoring invalid keybinding {} = {:?}", name, raw);
                    None
                }
            })
            .collect();

        Self { bindings }
    }

    /// Resolve a global shortcut, or `Action::None`.
    pub fn resolve(&self, key: &KeyEvent) -> Action {
        self.bindings
            .iter()
            .find(|b| b.key.matches(key))
            .map(|b| (b.action)())
            .unwrap_or(Action::None)
    }

    /// Display label for a named binding, e.g. `hint("submit")` -> "F5".
    pub fn hint(&self, name: &str) -> String {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.key.label())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit() {
        let keymap = Keymap::default();
        assert!(matches!(keymap.resolve(&ctrl(KeyCode::Char('q'))), Action::Quit));
        assert!(matches!(keymap.resolve(&ctrl(KeyCode::Char('c'))), Action::Quit));
    }

    #[test]
    fn test_plain_chars_are_not_global() {
        // Typing into the search field must never trigger a shortcut
        let keymap = Keymap::default();
        assert!(matches!(keymap.resolve(&key(KeyCode::Char('q'))), Action::None));
        assert!(matches!(keymap.resolve(&key(KeyCode::Char('y'))), Action::None));
    }

    #[test]
    fn test_tab_focus() {
        let keymap = Keymap::default();
        assert!(matches!(keymap.resolve(&key(KeyCode::Tab)), Action::FocusNext));
        let backtab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(matches!(keymap.resolve(&backtab), Action::FocusPrev));
    }

    #[test]
    fn test_submit_and_copy() {
        let keymap = Keymap::default();
        assert!(matches!(keymap.resolve(&key(KeyCode::F(5))), Action::Submit));
        assert!(matches!(
            keymap.resolve(&ctrl(KeyCode::Char('y'))),
            Action::CopyResult
        ));
        assert!(matches!(
            keymap.resolve(&ctrl(KeyCode::Char('r'))),
            Action::FocusPanel(FocusTarget::History)
        ));
    }

    #[test]
    fn test_custom_binding() {
        let config = KeybindingConfig {
            submit: "Ctrl+s".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert!(matches!(keymap.resolve(&ctrl(KeyCode::Char('s'))), Action::Submit));
        assert!(matches!(keymap.resolve(&key(KeyCode::F(5))), Action::None));
        assert_eq!(keymap.hint("submit"), "C-s");
    }

    #[test]
    fn test_invalid_binding_is_dropped() {
        let config = KeybindingConfig {
            copy_result: "Hyper+y".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.hint("copy_result"), "-");
        assert_eq!(keymap.hint("quit"), "C-q");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            KeyBinding::parse("F7"),
            Some(KeyBinding {
                code: KeyCode::F(7),
                modifiers: KeyModifiers::NONE
            })
        );
        assert_eq!(
            KeyBinding::parse("Shift+Tab").map(|k| k.code),
            Some(KeyCode::BackTab)
        );
        assert_eq!(KeyBinding::parse("Ctrl+"), None);
        assert_eq!(KeyBinding::parse("Ctrl+ab"), None);
    }
}
