//! Timestamp codec for loan identifiers and due dates.
//!
//! Both use the literal `YYYY.MM.DD HH.MM.SS` pattern (local time, 24-hour
//! clock). Every conversion between text and time goes through [`Stamp`] so
//! the two formats cannot drift apart.

use chrono::{Datelike, Duration, Local, NaiveDateTime, Timelike};
use std::{fmt, str::FromStr};

use crate::error::AppError;

/// chrono format string shared by loan ids and due dates
pub const STAMP_FORMAT: &str = "%Y.%m.%d %H.%M.%S";

/// A second-granularity local timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(NaiveDateTime);

impl Stamp {
    /// Current wall-clock time, truncated to the second
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// Wrap a datetime, dropping sub-second precision so that formatting
    /// and re-parsing yields the same value
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Stamp(dt.with_nanosecond(0).unwrap_or(dt))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month, 1-12
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn plus_days(&self, days: i64) -> Self {
        Stamp(self.0 + Duration::days(days))
    }

    /// Whole days elapsed from `self` until `later`, rounded down
    pub fn whole_days_until(&self, later: Stamp) -> i64 {
        (later.0 - self.0).num_seconds().div_euclid(86_400)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STAMP_FORMAT))
    }
}

impl FromStr for Stamp {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), STAMP_FORMAT)
            .map(Stamp)
            .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
    }
}

impl From<NaiveDateTime> for Stamp {
    fn from(dt: NaiveDateTime) -> Self {
        Stamp::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Stamp {
        Stamp::from_datetime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        )
    }

    #[test]
    fn test_format_is_zero_padded() {
        assert_eq!(at(2025, 6, 3, 9, 5, 7).to_string(), "2025.06.03 09.05.07");
    }

    #[test]
    fn test_parse() {
        let stamp: Stamp = "2025.12.31 23.59.59".parse().unwrap();
        assert_eq!(stamp, at(2025, 12, 31, 23, 59, 59));
        assert_eq!(stamp.year(), 2025);
        assert_eq!(stamp.month(), 12);
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!("2025-12-31 23:59:59".parse::<Stamp>().is_err());
        assert!("2025.13.01 00.00.00".parse::<Stamp>().is_err());
        assert!("L001".parse::<Stamp>().is_err());
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let dt = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 750)
            .unwrap();
        let stamp = Stamp::from_datetime(dt);
        assert_eq!(stamp.to_string().parse::<Stamp>().unwrap(), stamp);
    }

    #[test]
    fn test_plus_days_crosses_month() {
        assert_eq!(at(2025, 1, 28, 12, 0, 0).plus_days(7), at(2025, 2, 4, 12, 0, 0));
    }

    #[test]
    fn test_whole_days_until_floors() {
        let due = at(2025, 3, 1, 12, 0, 0);
        assert_eq!(due.whole_days_until(at(2025, 3, 2, 11, 59, 59)), 0);
        assert_eq!(due.whole_days_until(at(2025, 3, 2, 12, 0, 0)), 1);
        assert_eq!(due.whole_days_until(at(2025, 3, 11, 18, 0, 0)), 10);
    }
}
