use repasse_core::error::CoreError;
use repasse_core::model::{Candidate, LookupResult};

/// All actions that can flow through the application.
#[derive(Debug, Clone)]
pub enum Action {
    // System
    Tick,
    Quit,
    Resize(u16, u16),

    // Focus
    FocusNext,
    FocusPrev,
    FocusPanel(FocusTarget),

    // Municipality search
    SearchTextChanged(String),
    SuggestionsLoaded {
        token: u64,
        outcome: Result<Vec<Candidate>, CoreError>,
    },
    SuggestionNext,
    SuggestionPrev,
    SelectSuggestion(usize),
    SelectHighlighted,
    DismissSuggestions,

    // Lookup
    Submit,
    LookupFinished(Result<LookupResult, CoreError>),

    // History
    Replay(usize),
    /// Ask before wiping the stored history.
    ClearHistory,
    ConfirmClearHistory,

    CopyResult,

    // Log panel / popups
    ToggleLogPanel,
    ClosePopup,

    // Status
    StatusMessage(String),
    ErrorMessage(String),

    // No-op
    None,
}

/// Which widget has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Search,
    PeriodStart,
    PeriodEnd,
    Submit,
    History,
}
