//! Common types used across EPISIM

use crate::error::EpisimError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive span of simulation days.
///
/// A scenario covering `start == end` spans exactly one day; the import
/// pipeline expects one daily record per covered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EpisimError> {
        if end < start {
            return Err(EpisimError::InvalidDateSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of days covered, both endpoints inclusive.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The date at a given zero-based day offset from the start.
    pub fn date_at(&self, offset: i64) -> NaiveDate {
        self.start + chrono::Duration::days(offset)
    }
}

impl std::fmt::Display for DateSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_span() {
        let span = DateSpan::new(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(span.days(), 1);
        assert_eq!(span.date_at(0), date(2024, 3, 1));
    }

    #[test]
    fn test_multi_day_span() {
        let span = DateSpan::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
        assert_eq!(span.days(), 10);
        assert_eq!(span.date_at(9), date(2024, 3, 10));
    }

    #[test]
    fn test_inverted_span_rejected() {
        let result = DateSpan::new(date(2024, 3, 10), date(2024, 3, 1));
        assert!(matches!(result, Err(EpisimError::InvalidDateSpan { .. })));
    }
}
