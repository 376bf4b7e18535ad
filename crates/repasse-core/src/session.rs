use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_MIN_CHARS: usize = 2;

/// Tuning for the incremental search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

/// Where the search is between keystrokes and a rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    /// Debounce timer armed, nothing sent yet.
    Pending,
    /// Call issued, waiting for the response carrying the current token.
    Fetching,
}

/// What a text edit did to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChange {
    Scheduled,
    TooShort,
}

/// A search call to issue. `token` fences its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: u64,
    pub term: String,
}

#[derive(Debug, Clone)]
struct PendingSearch {
    term: String,
    due: Instant,
}

/// Debounce timer plus the sequence token of the latest search call.
#[derive(Debug)]
pub struct SearchSession {
    settings: SearchSettings,
    token: u64,
    pending: Option<PendingSearch>,
    phase: SearchPhase,
}

impl SearchSession {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            token: 0,
            pending: None,
            phase: SearchPhase::Idle,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn current_token(&self) -> u64 {
        self.token
    }

    /// Cancel any armed timer and re-arm it for `text` if it is long enough.
    pub fn on_text_changed(&mut self, text: &str, now: Instant) -> TextChange {
        self.pending = None;

        let term = text.trim();
        if term.chars().count() < self.settings.min_chars {
            // Neutralize anything still in flight for the previous term.
            self.invalidate();
            return TextChange::TooShort;
        }

        self.pending = Some(PendingSearch {
            term: term.to_string(),
            due: now + self.settings.debounce,
        });
        self.phase = SearchPhase::Pending;
        TextChange::Scheduled
    }

    /// Fire the timer if its deadline has passed. Issues a fresh token.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        let pending = self.pending.take()?;

        self.token += 1;
        self.phase = SearchPhase::Fetching;
        debug!("search fired: token={} term={:?}", self.token, pending.term);

        Some(SearchTicket {
            token: self.token,
            term: pending.term,
        })
    }

    /// Time left before the armed timer fires.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due.saturating_duration_since(now))
    }

    /// True if `token` belongs to the most recently issued call.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.token
    }

    /// Mark the current call as answered.
    pub fn settle(&mut self, token: u64) {
        if self.is_current(token) && self.phase == SearchPhase::Fetching {
            self.phase = SearchPhase::Idle;
        }
    }

    /// Cancel the timer and make every outstanding response stale.
    pub fn invalidate(&mut self) {
        self.pending = None;
        self.token += 1;
        self.phase = SearchPhase::Idle;
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}
