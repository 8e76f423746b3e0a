//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Date range for history queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn new(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range is usable when it does not run backwards
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_range_validity() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2025, 5, d).unwrap();

        assert!(DateRange::new(day(1), day(10)).is_valid());
        assert!(DateRange::new(day(5), day(5)).is_valid());
        assert!(!DateRange::new(day(10), day(1)).is_valid());
    }
}
