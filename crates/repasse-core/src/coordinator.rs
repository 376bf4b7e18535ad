use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dates::Period;
use crate::error::{CoreError, ValidationError};
use crate::history::HistoryCache;
use crate::model::{Candidate, LookupRequest, LookupResult};
use crate::render::ResultCard;
use crate::selection::Selection;
use crate::session::{SearchPhase, SearchSession, SearchSettings, SearchTicket, TextChange};
use crate::suggestions::SuggestionList;

/// Placeholder shown while a lookup is in flight.
pub const LOADING_MESSAGE: &str = "Consultando...";
/// Generic text shown in place of results when a lookup fails.
pub const FAILURE_MESSAGE: &str = "Erro ao consultar o serviço";

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    Loading,
    Result(LookupResult),
    Failed(String),
}

/// Outcome of handing a search response to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The list opened with this many candidates.
    Shown(usize),
    /// No candidates (or the call failed); the list is closed.
    Closed,
    /// A newer call was issued meanwhile; nothing changed.
    Stale,
}

/// Owns every piece of mutable search/lookup state.
///
/// Each operation is a single transition; the caller performs the I/O it
/// returns (search tickets, lookup requests) and feeds the outcome back.
#[derive(Debug)]
pub struct Coordinator {
    search_text: String,
    selection: Selection,
    session: SearchSession,
    suggestions: SuggestionList,
    submitting: bool,
    display: ResultView,
    last_displayed: Option<LookupResult>,
    history: HistoryCache,
}

impl Coordinator {
    pub fn new(settings: SearchSettings, history: HistoryCache) -> Self {
        info!(
            "coordinator ready: {} history entries (capacity {})",
            history.len(),
            history.capacity()
        );
        Self {
            search_text: String::new(),
            selection: Selection::new(),
            session: SearchSession::new(settings),
            suggestions: SuggestionList::new(),
            submitting: false,
            display: ResultView::Empty,
            last_displayed: None,
            history,
        }
    }

    // --- accessors ---

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selection(&self) -> Option<&Candidate> {
        self.selection.get()
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.session.phase()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn display(&self) -> &ResultView {
        &self.display
    }

    /// The value copy/export actions read from, independent of the selection.
    pub fn last_displayed(&self) -> Option<&LookupResult> {
        self.last_displayed.as_ref()
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    // --- search ---

    /// The user edited the search field.
    pub fn text_changed(&mut self, text: impl Into<String>, now: Instant) -> TextChange {
        self.search_text = text.into();
        self.selection.clear();

        let change = self.session.on_text_changed(&self.search_text, now);
        if change == TextChange::TooShort {
            self.suggestions.close();
        }
        change
    }

    /// Fire the debounce timer if due.
    pub fn poll_search(&mut self, now: Instant) -> Option<SearchTicket> {
        self.session.poll(now)
    }

    /// How long until the armed debounce timer fires, if one is armed.
    pub fn search_due_in(&self, now: Instant) -> Option<std::time::Duration> {
        self.session.time_until_due(now)
    }

    /// Apply a search response. Responses for superseded calls are dropped.
    pub fn apply_suggestions(
        &mut self,
        token: u64,
        outcome: Result<Vec<Candidate>, CoreError>,
    ) -> Applied {
        if !self.session.is_current(token) {
            debug!(
                "discarding stale suggestions: token={} current={}",
                token,
                self.session.current_token()
            );
            return Applied::Stale;
        }
        self.session.settle(token);

        match outcome {
            Ok(candidates) if !candidates.is_empty() => {
                let count = candidates.len();
                self.suggestions.show(candidates);
                Applied::Shown(count)
            }
            Ok(_) => {
                self.suggestions.close();
                Applied::Closed
            }
            Err(e) => {
                warn!("search failed: {}", e);
                self.suggestions.close();
                Applied::Closed
            }
        }
    }

    pub fn highlight_next(&mut self) {
        self.suggestions.highlight_next();
    }

    pub fn highlight_prev(&mut self) {
        self.suggestions.highlight_prev();
    }

    /// Bind the candidate at `index`, write its label into the field, close the list.
    pub fn select(&mut self, index: usize) -> Option<&Candidate> {
        let candidate = self.suggestions.pick(index)?;
        self.search_text = candidate.label();
        self.selection.bind(candidate);
        // The field now holds the label; nothing pending may reopen the list
        self.session.invalidate();
        self.selection.get()
    }

    pub fn select_highlighted(&mut self) -> Option<&Candidate> {
        let index = self.suggestions.highlighted()?;
        self.select(index)
    }

    /// Pointer or focus left the search widget.
    pub fn dismiss_suggestions(&mut self) {
        self.suggestions.hide();
    }

    /// Focus returned to the search field. Returns true if the list reopened.
    pub fn focus_search(&mut self) -> bool {
        self.suggestions.reopen()
    }

    // --- submission ---

    /// Validate and start a lookup.
    ///
    /// `Ok(None)` means a lookup is already in flight and the call was ignored.
    pub fn begin_submit(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<Option<LookupRequest>, ValidationError> {
        if self.submitting {
            debug!("submit ignored: lookup already in flight");
            return Ok(None);
        }

        if self.selection.is_empty() {
            return Err(ValidationError::NoSelection);
        }
        let period = Period::parse(start, end)?;
        let request = self.selection.request_for(&period)?;

        info!(
            "lookup started: codigo={} {} - {} ({} a {})",
            request.code(),
            request.name(),
            request.region(),
            request.start(),
            request.end()
        );
        self.submitting = true;
        self.display = ResultView::Loading;
        Ok(Some(request))
    }

    /// Finish the in-flight lookup. Always re-enables submission.
    pub fn finish_submit(&mut self, outcome: Result<LookupResult, CoreError>) -> &ResultView {
        self.submitting = false;

        match outcome {
            Ok(result) => {
                info!("lookup finished: {}", result.summary());
                self.show(result.clone());
                if let Err(e) = self.history.prepend(result) {
                    warn!("history not saved: {}", e);
                }
            }
            Err(e) => {
                warn!("lookup failed: {}", e);
                self.display = ResultView::Failed(FAILURE_MESSAGE.to_string());
            }
        }
        &self.display
    }

    // --- history ---

    /// Show a stored result. No network, no selection or search change.
    pub fn replay(&mut self, index: usize) -> Option<&LookupResult> {
        let result = self.history.get(index)?.clone();
        debug!("replaying history entry {}: {}", index, result.summary());
        self.show(result);
        self.last_displayed.as_ref()
    }

    pub fn clear_history(&mut self) -> Result<(), CoreError> {
        self.history.clear()
    }

    /// Card for whatever result is on screen.
    pub fn displayed_card(&self) -> Option<ResultCard> {
        match &self.display {
            ResultView::Result(result) => Some(ResultCard::from(result)),
            _ => None,
        }
    }

    fn show(&mut self, result: LookupResult) {
        self.last_displayed = Some(result.clone());
        self.display = ResultView::Result(result);
    }
}
