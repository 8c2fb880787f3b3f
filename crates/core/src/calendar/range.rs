//! Timezone-aware date ranges.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Format used when a range is handed to the ledger as UTC wall-clock text.
pub const UTC_QUERY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A report window, both ends inclusive, anchored to a civil timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First instant covered by the report.
    pub start_date: DateTime<Tz>,
    /// Last instant covered by the report.
    pub end_date: DateTime<Tz>,
}

impl DateRange {
    /// Creates a range from its two ends.
    #[must_use]
    pub const fn new(start_date: DateTime<Tz>, end_date: DateTime<Tz>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Returns true if the instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_utc() && instant <= self.end_utc()
    }

    /// Start of the window in UTC.
    #[must_use]
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start_date.with_timezone(&Utc)
    }

    /// End of the window in UTC.
    #[must_use]
    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end_date.with_timezone(&Utc)
    }

    /// Both ends as `YYYY-MM-DD HH:mm:ss` in UTC.
    #[must_use]
    pub fn to_utc_strings(&self) -> (String, String) {
        (
            self.start_utc().format(UTC_QUERY_FORMAT).to_string(),
            self.end_utc().format(UTC_QUERY_FORMAT).to_string(),
        )
    }
}

/// Which instant to keep when a local time happens twice (DST fall back).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ambiguity {
    Earliest,
    Latest,
}

/// Resolves a local wall-clock time to an instant without ever failing.
///
/// Times skipped by a DST jump resolve to the first valid local time after them.
pub(crate) fn resolve_local(tz: Tz, naive: NaiveDateTime, pick: Ambiguity) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, latest) => match pick {
            Ambiguity::Earliest => earliest,
            Ambiguity::Latest => latest,
        },
        LocalResult::None => {
            // gaps are at most a few hours wide
            let mut probe = naive;
            for _ in 0..(4 * 24) {
                probe += Duration::minutes(15);
                if let Some(instant) = tz.from_local_datetime(&probe).earliest() {
                    return instant;
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}

/// Local midnight at the start of `date`.
pub(crate) fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN), Ambiguity::Earliest)
}

/// Local 23:59:59.999 of `date`.
pub(crate) fn end_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    resolve_local(tz, date.and_time(last), Ambiguity::Latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Santiago;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(
            start_of_day(Santiago, date(2020, 8, 3)),
            end_of_day(Santiago, date(2020, 8, 3)),
        );
        assert!(range.contains(range.start_utc()));
        assert!(range.contains(range.end_utc()));
        assert!(!range.contains(range.end_utc() + Duration::milliseconds(1)));
    }

    #[test]
    fn test_skipped_midnight_resolves_forward() {
        // Santiago jumped from 00:00 to 01:00 on 2020-09-06
        let start = start_of_day(Santiago, date(2020, 9, 6));
        assert_eq!(
            start.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
            "2020-09-06 01:00:00-03:00"
        );
    }

    #[test]
    fn test_repeated_hour_picks_requested_side() {
        // 2020-04-04 23:xx happened twice in Santiago
        let naive = date(2020, 4, 4).and_hms_opt(23, 30, 0).unwrap();
        let early = resolve_local(Santiago, naive, Ambiguity::Earliest);
        let late = resolve_local(Santiago, naive, Ambiguity::Latest);
        assert!(early < late);
        assert_eq!(late - early, Duration::hours(1));
    }
}
