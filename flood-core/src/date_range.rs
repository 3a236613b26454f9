use chrono::{Days, NaiveDate};

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The `days` consecutive dates starting at `start`.
    ///
    /// `None` when `days` is 0 or the last date lies past `NaiveDate::MAX`.
    pub fn window(start: NaiveDate, days: u32) -> Option<DateRange> {
        let last_offset = days.checked_sub(1)?;
        let end = start.checked_add_days(Days::new(u64::from(last_offset)))?;
        Some(DateRange(start, end))
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // `current` is the last representable date; close the range.
            None => self.1 = NaiveDate::MIN,
        }
        Some(current)
    }
}
