use std::path::PathBuf;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

/// Styles for every element of the query screen.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Style,
    pub border_focused: Style,
    pub header: Style,
    pub normal: Style,
    pub dimmed: Style,
    pub error: Style,
    pub warning: Style,
    pub success: Style,
    pub status_bar: Style,
    pub popup_border: Style,
    pub popup_title: Style,
    pub input_prompt: Style,
    /// Suggestion dropdown body.
    pub dropdown: Style,
    /// Highlighted suggestion or history row.
    pub highlight: Style,
    /// Monetary values on the result card.
    pub amount: Style,
    pub button: Style,
    pub button_disabled: Style,
}

impl Theme {
    /// Dark theme on the Catppuccin Mocha palette.
    pub fn dark() -> Self {
        let base = Color::Rgb(30, 30, 46);
        let surface0 = Color::Rgb(49, 50, 68);
        let surface1 = Color::Rgb(69, 71, 90);
        let overlay0 = Color::Rgb(108, 112, 134);
        let subtext0 = Color::Rgb(166, 173, 200);
        let text = Color::Rgb(205, 214, 244);
        let blue = Color::Rgb(137, 180, 250);
        let lavender = Color::Rgb(180, 190, 254);
        let green = Color::Rgb(166, 227, 161);
        let red = Color::Rgb(243, 139, 168);
        let peach = Color::Rgb(250, 179, 135);
        let yellow = Color::Rgb(249, 226, 175);
        let mauve = Color::Rgb(203, 166, 247);

        Self {
            border: Style::default().fg(surface1),
            border_focused: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            header: Style::default().fg(lavender).add_modifier(Modifier::BOLD),
            normal: Style::default().fg(text),
            dimmed: Style::default().fg(overlay0),
            error: Style::default().fg(red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(yellow),
            success: Style::default().fg(green),
            status_bar: Style::default().fg(subtext0).bg(surface0),
            popup_border: Style::default().fg(mauve),
            popup_title: Style::default().fg(mauve).add_modifier(Modifier::BOLD),
            input_prompt: Style::default().fg(peach),
            dropdown: Style::default().fg(text).bg(surface0),
            highlight: Style::default().fg(base).bg(blue),
            amount: Style::default().fg(green).add_modifier(Modifier::BOLD),
            button: Style::default().fg(base).bg(blue).add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(overlay0).bg(surface0),
        }
    }

    /// Light theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Blue),
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::Black),
            dimmed: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            success: Style::default().fg(Color::Green),
            status_bar: Style::default().fg(Color::Black).bg(Color::Gray),
            popup_border: Style::default().fg(Color::Blue),
            popup_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            input_prompt: Style::default().fg(Color::Blue),
            dropdown: Style::default().fg(Color::Black).bg(Color::Gray),
            highlight: Style::default().fg(Color::White).bg(Color::Blue),
            amount: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::White).bg(Color::Blue),
            button_disabled: Style::default().fg(Color::DarkGray).bg(Color::Gray),
        }
    }

    /// Load a theme by name: a built-in, or `<config_dir>/repasse/themes/<name>.toml`.
    pub fn load(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => match theme_file(name) {
                Some(path) if path.exists() => match std::fs::read_to_string(&path)
                    .ok()
                    .and_then(|content| toml::from_str::<ThemeDefinition>(&content).ok())
                {
                    Some(def) => def.to_theme(),
                    None => {
                        warn!("Failed to parse theme file: {:?}", path);
                        Self::dark()
                    }
                },
                _ => {
                    warn!("Unknown theme '{}', using dark", name);
                    Self::dark()
                }
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

fn theme_file(name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| {
        d.join("repasse")
            .join("themes")
            .join(format!("{}.toml", name))
    })
}

// --- TOML theme files ---

#[derive(Debug, Deserialize)]
struct ThemeDefinition {
    colors: ThemeColors,
}

/// Every style is optional; missing ones fall back to the dark theme.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThemeColors {
    border: Option<StyleDef>,
    border_focused: Option<StyleDef>,
    header: Option<StyleDef>,
    normal: Option<StyleDef>,
    dimmed: Option<StyleDef>,
    error: Option<StyleDef>,
    warning: Option<StyleDef>,
    success: Option<StyleDef>,
    status_bar: Option<StyleDef>,
    popup_border: Option<StyleDef>,
    popup_title: Option<StyleDef>,
    input_prompt: Option<StyleDef>,
    dropdown: Option<StyleDef>,
    highlight: Option<StyleDef>,
    amount: Option<StyleDef>,
    button: Option<StyleDef>,
    button_disabled: Option<StyleDef>,
}

#[derive(Debug, Default, Deserialize)]
struct StyleDef {
    #[serde(default)]
    fg: Option<String>,
    #[serde(default)]
    bg: Option<String>,
    #[serde(default)]
    modifiers: Option<String>,
}

impl StyleDef {
    fn to_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(ref fg) = self.fg {
            style = style.fg(parse_color(fg));
        }
        if let Some(ref bg) = self.bg {
            style = style.bg(parse_color(bg));
        }
        if let Some(ref mods) = self.modifiers {
            for m in mods.split('|') {
                match m.trim().to_uppercase().as_str() {
                    "BOLD" => style = style.add_modifier(Modifier::BOLD),
                    "ITALIC" => style = style.add_modifier(Modifier::ITALIC),
                    "UNDERLINED" => style = style.add_modifier(Modifier::UNDERLINED),
                    "DIM" => style = style.add_modifier(Modifier::DIM),
                    "REVERSED" => style = style.add_modifier(Modifier::REVERSED),
                    _ => {}
                }
            }
        }
        style
    }
}

impl ThemeDefinition {
    fn to_theme(&self) -> Theme {
        let base = Theme::dark();
        let c = &self.colors;
        let pick = |def: &Option<StyleDef>, fallback: Style| {
            def.as_ref().map(StyleDef::to_style).unwrap_or(fallback)
        };

        Theme {
            border: pick(&c.border, base.border),
            border_focused: pick(&c.border_focused, base.border_focused),
            header: pick(&c.header, base.header),
            normal: pick(&c.normal, base.normal),
            dimmed: pick(&c.dimmed, base.dimmed),
            error: pick(&c.error, base.error),
            warning: pick(&c.warning, base.warning),
            success: pick(&c.success, base.success),
            status_bar: pick(&c.status_bar, base.status_bar),
            popup_border: pick(&c.popup_border, base.popup_border),
            popup_title: pick(&c.popup_title, base.popup_title),
            input_prompt: pick(&c.input_prompt, base.input_prompt),
            dropdown: pick(&c.dropdown, base.dropdown),
            highlight: pick(&c.highlight, base.highlight),
            amount: pick(&c.amount, base.amount),
            button: pick(&c.button, base.button),
            button_disabled: pick(&c.button_disabled, base.button_disabled),
        }
    }
}

fn parse_color(s: &str) -> Color {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" | "darkgray" => Color::DarkGray,
        "light_red" | "lightred" => Color::LightRed,
        "light_green" | "lightgreen" => Color::LightGreen,
        "light_blue" | "lightblue" => Color::LightBlue,
        "white" => Color::White,
        _ => parse_hex(&s).unwrap_or(Color::White),
    }
}

/// `#RRGGBB` or `RRGGBB`.
fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
