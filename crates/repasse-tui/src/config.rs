use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use repasse_core::history::{HistoryCache, DEFAULT_CAPACITY};
use repasse_core::service::ServiceSettings;
use repasse_core::session::{SearchSettings, DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_CHARS};

/// Configurable keybindings for global shortcuts.
/// Each field holds a key string like "Ctrl+q", "Shift+Tab", "F5".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: String,
    pub force_quit: String,
    pub focus_next: String,
    pub focus_prev: String,
    pub submit: String,
    pub focus_search: String,
    pub focus_history: String,
    pub copy_result: String,
    pub toggle_log_panel: String,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: "Ctrl+q".to_string(),
            force_quit: "Ctrl+c".to_string(),
            focus_next: "Tab".to_string(),
            focus_prev: "Shift+Tab".to_string(),
            submit: "F5".to_string(),
            focus_search: "Ctrl+f".to_string(),
            focus_history: "Ctrl+r".to_string(),
            copy_result: "Ctrl+y".to_string(),
            toggle_log_panel: "F7".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub keybindings: KeybindingConfig,
    #[serde(default)]
    pub api: ServiceSettings,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// True when no config file was found on disk (first launch).
    #[serde(skip)]
    pub first_launch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "dark".to_string()
}
fn default_tick_rate() -> u64 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
        }
    }
}

impl SearchConfig {
    pub fn to_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_chars: self.min_chars.max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Snapshot file; `~/` is expanded. Defaults to the user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            path: None,
        }
    }
}

impl HistoryConfig {
    /// Where the history snapshot lives.
    pub fn resolve_path(&self) -> PathBuf {
        match self.path.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => expand_home(raw),
            _ => HistoryCache::default_path(),
        }
    }
}

/// Replace a leading `~/` with the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

impl AppConfig {
    /// Default config location: `<config_dir>/repasse/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("repasse").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = Self::default_path().unwrap_or_default();

        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(config) => return config,
                    Err(e) => warn!("Ignoring invalid config {:?}: {}", config_path, e),
                },
                Err(e) => warn!("Cannot read config {:?}: {}", config_path, e),
            }
            return Self::default();
        }

        Self {
            first_launch: true,
            ..Self::default()
        }
    }

    /// Load an explicitly requested file. Unlike [`AppConfig::load`], errors are fatal.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.general.tick_rate_ms.max(1))
    }
}
