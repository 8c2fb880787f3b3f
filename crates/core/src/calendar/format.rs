//! Date renderings used in report rows and file names.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// `DD-MM-YYYY HH:mm` in local time, the timestamp shown in report rows.
#[must_use]
pub fn report_timestamp(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%d-%m-%Y %H:%M").to_string()
}

/// `DDMMYYYY` (or `YYYYMMDD` when `inverted`) of the local date.
#[must_use]
pub fn compact_date(instant: DateTime<Utc>, tz: Tz, inverted: bool) -> String {
    let local = instant.with_timezone(&tz);
    if inverted {
        local.format("%Y%m%d").to_string()
    } else {
        local.format("%d%m%Y").to_string()
    }
}

/// `DDMMYYYY` of a civil date.
#[must_use]
pub fn file_date(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// Short bank-file date: unpadded day, padded month, two-digit year.
///
/// `2020-08-05` renders as `50820`.
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    format!(
        "{}{:02}{:02}",
        date.day(),
        date.month(),
        date.year().rem_euclid(100)
    )
}
