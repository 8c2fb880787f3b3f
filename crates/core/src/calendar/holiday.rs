//! Recurring holidays.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::error::CalendarError;

/// A day of the year without the year, e.g. `18-09`.
///
/// Holidays recur yearly, so they are matched on `(day, month)` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayMonth {
    month: u32,
    day: u32,
}

impl DayMonth {
    /// Creates a day-month, rejecting days that never exist (29-02 is allowed).
    #[must_use]
    pub fn new(day: u32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2020, month, day).map(|_| Self { month, day })
    }

    /// The day-month of a calendar date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// Day of month.
    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }

    /// Month number (1-12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for DayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.day, self.month)
    }
}

impl FromStr for DayMonth {
    type Err = CalendarError;

    /// Parses the `DD-MM` configuration format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidHoliday(s.to_string());
        let (day, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let day = day.trim().parse::<u32>().map_err(|_| invalid())?;
        let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(day, month).ok_or_else(invalid)
    }
}

/// Immutable set of recurring non-banking days.
///
/// Weekends are not stored here; they are always non-banking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    days: BTreeSet<DayMonth>,
}

impl HolidayCalendar {
    /// Creates a calendar from day-months.
    pub fn new(days: impl IntoIterator<Item = DayMonth>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Parses `DD-MM` entries, skipping the ones that do not parse.
    ///
    /// Returns the calendar and the rejected entries so the caller can report
    /// them; a bad entry never prevents the rest from loading.
    pub fn parse_lenient<'a>(entries: impl IntoIterator<Item = &'a str>) -> (Self, Vec<String>) {
        let mut days = BTreeSet::new();
        let mut rejected = Vec::new();
        for entry in entries {
            if entry.trim().is_empty() {
                continue;
            }
            match entry.parse::<DayMonth>() {
                Ok(day) => {
                    days.insert(day);
                }
                Err(_) => rejected.push(entry.to_string()),
            }
        }
        (Self { days }, rejected)
    }

    /// Returns true if the date's day-month is a holiday, whatever its year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&DayMonth::of(date))
    }

    /// Number of configured holidays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if no holiday is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterates holidays in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = DayMonth> + '_ {
        self.days.iter().copied()
    }
}

impl FromIterator<DayMonth> for HolidayCalendar {
    fn from_iter<T: IntoIterator<Item = DayMonth>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_month() {
        let day: DayMonth = "18-09".parse().unwrap();
        assert_eq!(day.day(), 18);
        assert_eq!(day.month(), 9);
        assert_eq!(day.to_string(), "18-09");
        assert_eq!(" 1-1 ".parse::<DayMonth>().unwrap().to_string(), "01-01");
    }

    #[test]
    fn test_reject_invalid_day_month() {
        for raw in ["", "31", "32-01", "30-02", "aa-bb", "01-13", "12/10"] {
            assert!(raw.parse::<DayMonth>().is_err(), "{raw} should not parse");
        }
        assert!("29-02".parse::<DayMonth>().is_ok());
    }

    #[test]
    fn test_contains_ignores_year() {
        let calendar = HolidayCalendar::new([DayMonth::new(25, 12).unwrap()]);
        assert!(calendar.contains(NaiveDate::from_ymd_opt(2020, 12, 25).unwrap()));
        assert!(calendar.contains(NaiveDate::from_ymd_opt(1999, 12, 25).unwrap()));
        assert!(!calendar.contains(NaiveDate::from_ymd_opt(2020, 12, 24).unwrap()));
    }

    #[test]
    fn test_parse_lenient_skips_bad_entries() {
        let (calendar, rejected) =
            HolidayCalendar::parse_lenient(["31-07", "bogus", "", "30-07", "31-02"]);
        assert_eq!(calendar.len(), 2);
        assert_eq!(rejected, vec!["bogus".to_string(), "31-02".to_string()]);
        let listed: Vec<String> = calendar.iter().map(|d| d.to_string()).collect();
        assert_eq!(listed, vec!["30-07", "31-07"]);
    }
}
