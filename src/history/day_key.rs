use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate};

use super::HistoryError;

/// Calendar-day bucket identifier in the fixed `YYYYMMDD` form.
///
/// Two timestamps map to the same `DayKey` iff they fall on the same local
/// calendar date. Because every field is zero-padded, lexicographic order of
/// the rendered form agrees with chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_datetime(ts: DateTime<Local>) -> Self {
        Self(ts.date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days elapsed between this bucket's day-start and `today`'s.
    /// Negative when the bucket is in the future.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.0).num_days()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HistoryError::InvalidDayKey(s.to_string()));
        }

        let year: i32 = s[0..4].parse().map_err(|_| HistoryError::InvalidDayKey(s.to_string()))?;
        let month: u32 = s[4..6].parse().map_err(|_| HistoryError::InvalidDayKey(s.to_string()))?;
        let day: u32 = s[6..8].parse().map_err(|_| HistoryError::InvalidDayKey(s.to_string()))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| HistoryError::InvalidDayKey(s.to_string()))
    }
}
