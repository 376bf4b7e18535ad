use chrono::NaiveDate;

use crate::error::ValidationError;

/// Input format of the period fields.
pub const INPUT_FORMAT: &str = "%Y-%m-%d";
/// Format the lookup service expects.
pub const WIRE_FORMAT: &str = "%d.%m.%Y";

/// A closed calendar range for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Parse both bounds from `YYYY-MM-DD` text.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_input(start, "data inicial")?;
        let end = parse_input(end, "data final")?;
        if end < start {
            return Err(ValidationError::ReversedPeriod);
        }
        Ok(Self { start, end })
    }

    pub fn wire_start(&self) -> String {
        self.start.format(WIRE_FORMAT).to_string()
    }

    pub fn wire_end(&self) -> String {
        self.end.format(WIRE_FORMAT).to_string()
    }
}

fn parse_input(value: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), INPUT_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

/// Convert `YYYY-MM-DD` to `DD.MM.YYYY`. Returns None for anything that is not a real date.
pub fn iso_to_wire(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), INPUT_FORMAT)
        .ok()
        .map(|d| d.format(WIRE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_to_wire() {
        assert_eq!(iso_to_wire("2023-01-01"), Some("01.01.2023".to_string()));
        assert_eq!(iso_to_wire("2023-12-31"), Some("31.12.2023".to_string()));
        assert_eq!(iso_to_wire(""), None);
        assert_eq!(iso_to_wire("2023-02-30"), None);
        assert_eq!(iso_to_wire("31/12/2023"), None);
    }

    #[test]
    fn test_parse_period() {
        let p = Period::parse("2023-01-01", " 2023-12-31 ").unwrap();
        assert_eq!(p.wire_start(), "01.01.2023");
        assert_eq!(p.wire_end(), "31.12.2023");
    }

    #[test]
    fn test_single_day_period() {
        let p = Period::parse("2024-02-29", "2024-02-29").unwrap();
        assert_eq!(p.start, p.end);
    }

    #[test]
    fn test_malformed_start() {
        let err = Period::parse("", "2023-12-31").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidDate {
                field: "data inicial",
                ..
            }
        ));
    }

    #[test]
    fn test_reversed_period() {
        let err = Period::parse("2023-12-31", "2023-01-01").unwrap_err();
        assert_eq!(err, ValidationError::ReversedPeriod);
    }
}
