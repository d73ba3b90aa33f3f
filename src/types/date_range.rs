//! Half-open calendar date ranges used to drive the scrape loop.

use chrono::{Days, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Ascending sequence of calendar dates from `start` (inclusive) to `end` (exclusive).
///
/// The range is `Copy`, so iterating a copy leaves the original `(start, end)` pair
/// intact and the sequence can be restarted at will. Only real calendar dates are
/// produced since every step goes through [`NaiveDate`] arithmetic.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wunder_history::DateRange;
///
/// let start = NaiveDate::from_ymd_opt(2020, 2, 28).unwrap();
/// let end = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
/// let dates: Vec<_> = DateRange::new(start, end).collect();
/// assert_eq!(dates.len(), 3); // Feb 28, Feb 29, Mar 1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates the range yields. Zero when `start >= end`.
    pub fn num_days(&self) -> usize {
        if self.start >= self.end {
            0
        } else {
            (self.end - self.start).num_days() as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_days() == 0
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }
        let current = self.start;
        // `end` bounds the walk, so stepping past NaiveDate::MAX only happens at the very end.
        self.start = current.checked_add_days(Days::new(1)).unwrap_or(self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.num_days();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateRange {}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
