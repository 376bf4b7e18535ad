use tracing::debug;

use crate::dates::Period;
use crate::error::ValidationError;
use crate::model::{Candidate, LookupRequest};

/// The municipality currently committed for submission.
///
/// Only [`Selection::bind`] can fill it, and it takes a candidate that came
/// back from the search call. Any edit of the search text clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<Candidate>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, candidate: Candidate) {
        debug!(
            "selection bound: {} ({})",
            candidate.label(),
            candidate.code
        );
        self.current = Some(candidate);
    }

    pub fn clear(&mut self) {
        if let Some(prev) = self.current.take() {
            debug!("selection cleared (was {})", prev.code);
        }
    }

    pub fn get(&self) -> Option<&Candidate> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Build a lookup request for the bound candidate. Fails closed when empty.
    pub fn request_for(&self, period: &Period) -> Result<LookupRequest, ValidationError> {
        let candidate = self.current.as_ref().ok_or(ValidationError::NoSelection)?;
        Ok(LookupRequest::new(candidate, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        Period::parse("2023-01-01", "2023-12-31").unwrap()
    }

    #[test]
    fn test_empty_selection_fails_closed() {
        let selection = Selection::new();
        assert!(selection.is_empty());
        assert_eq!(
            selection.request_for(&period()),
            Err(ValidationError::NoSelection)
        );
    }

    #[test]
    fn test_bound_selection_builds_request() {
        let mut selection = Selection::new();
        selection.bind(Candidate::new(123, "Springfield", "IL"));

        let req = selection.request_for(&period()).unwrap();
        assert_eq!(req.code(), 123);
        assert_eq!(req.name(), "Springfield");
        assert_eq!(req.region(), "IL");
        assert_eq!(req.start(), "01.01.2023");
        assert_eq!(req.end(), "31.12.2023");
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.bind(Candidate::new(1, "A", "B"));
        selection.clear();
        assert!(selection.get().is_none());
        // clearing twice is harmless
        selection.clear();
        assert!(selection.is_empty());
    }
}
