use crate::model::Candidate;

/// Candidates from the latest applied search, plus visibility and highlight.
#[derive(Debug, Default)]
pub struct SuggestionList {
    items: Vec<Candidate>,
    open: bool,
    highlighted: usize,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list. An empty list closes instead of showing an empty panel.
    pub fn show(&mut self, candidates: Vec<Candidate>) {
        self.items = candidates;
        self.highlighted = 0;
        self.open = !self.items.is_empty();
    }

    /// Hide the panel and drop its entries.
    pub fn close(&mut self) {
        self.items.clear();
        self.highlighted = 0;
        self.open = false;
    }

    /// Hide without dropping entries, so focus can bring them back.
    pub fn hide(&mut self) {
        self.open = false;
    }

    /// Reopen the last rendered list if there is one. Returns true if it reopened.
    pub fn reopen(&mut self) -> bool {
        if !self.open && !self.items.is_empty() {
            self.open = true;
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        if self.open && !self.items.is_empty() {
            Some(self.highlighted)
        } else {
            None
        }
    }

    pub fn highlight_next(&mut self) {
        if !self.items.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.items.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.items.is_empty() {
            self.highlighted = if self.highlighted == 0 {
                self.items.len() - 1
            } else {
                self.highlighted - 1
            };
        }
    }

    /// Take the candidate at `index` and close the list.
    pub fn pick(&mut self, index: usize) -> Option<Candidate> {
        if !self.open {
            return None;
        }
        let candidate = self.items.get(index).cloned()?;
        self.close();
        Some(candidate)
    }
}
