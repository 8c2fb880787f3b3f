//! Banking-day arithmetic and report windows.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

use super::error::CalendarError;
use super::holiday::HolidayCalendar;
use super::range::{Ambiguity, DateRange, end_of_day, resolve_local};

/// Returns true unless the date is a Saturday, a Sunday or a holiday.
#[must_use]
pub fn is_banking_day(date: NaiveDate, holidays: &HolidayCalendar) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(date)
}

/// Walks backward from `date` to the first banking day at or before it.
///
/// Returns that day together with the adjustment count, which starts at 1:
/// callers pass a date already one day before the one they care about, so a
/// date that is itself a banking day yields `(date, 1)`.
#[must_use]
pub fn adjust_backward(date: NaiveDate, holidays: &HolidayCalendar) -> (NaiveDate, u32) {
    let mut current = date;
    let mut days_walked = 1;
    while !is_banking_day(current, holidays) {
        let Some(previous) = current.pred_opt() else {
            break;
        };
        current = previous;
        days_walked += 1;
    }
    (current, days_walked)
}

/// Parses an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz, CalendarError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimezone(name.to_string()))
}

fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Holiday calendar, timezone and settlement cutoff for one process.
///
/// Immutable once built; share it behind an `Arc` across request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankingCalendar {
    holidays: HolidayCalendar,
    timezone: Tz,
    cutoff: NaiveTime,
}

impl BankingCalendar {
    /// Hour at which a banking day rolls over unless configured otherwise.
    pub const DEFAULT_CUTOFF_HOUR: u32 = 14;

    /// Creates a calendar with the default 14:00 cutoff.
    #[must_use]
    pub fn new(holidays: HolidayCalendar, timezone: Tz) -> Self {
        Self {
            holidays,
            timezone,
            cutoff: NaiveTime::from_hms_opt(Self::DEFAULT_CUTOFF_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }

    /// Replaces the cutoff hour.
    pub fn with_cutoff_hour(mut self, hour: u32) -> Result<Self, CalendarError> {
        self.cutoff =
            NaiveTime::from_hms_opt(hour, 0, 0).ok_or(CalendarError::InvalidCutoffHour(hour))?;
        Ok(self)
    }

    /// Holidays in effect.
    #[must_use]
    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Civil timezone every boundary is computed in.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Local settlement cutoff.
    #[must_use]
    pub fn cutoff(&self) -> NaiveTime {
        self.cutoff
    }

    /// See [`is_banking_day`].
    #[must_use]
    pub fn is_banking_day(&self, date: NaiveDate) -> bool {
        is_banking_day(date, &self.holidays)
    }

    /// See [`adjust_backward`].
    #[must_use]
    pub fn adjust_backward(&self, date: NaiveDate) -> (NaiveDate, u32) {
        adjust_backward(date, &self.holidays)
    }

    /// Cutoff time on `date`, local.
    fn at_cutoff(&self, date: NaiveDate) -> chrono::DateTime<Tz> {
        resolve_local(self.timezone, date.and_time(self.cutoff), Ambiguity::Earliest)
    }

    /// First instant settling into `reference`: cutoff on the last banking
    /// day before it.
    fn settlement_start(&self, reference: NaiveDate) -> chrono::DateTime<Tz> {
        let day_before = reference.pred_opt().unwrap_or(reference);
        let (_, adjust) = self.adjust_backward(day_before);
        self.at_cutoff(days_before(reference, adjust))
    }

    /// Daily reconciliation window for `reference`.
    ///
    /// Runs from the cutoff on the last banking day before `reference` through
    /// the end of `reference`. A Monday therefore picks up Friday afternoon
    /// and the whole weekend.
    #[must_use]
    pub fn banking_day_range(&self, reference: NaiveDate) -> DateRange {
        DateRange::new(
            self.settlement_start(reference),
            end_of_day(self.timezone, reference),
        )
    }

    /// Cash-in/cash-out window for `reference`: same start as
    /// [`Self::banking_day_range`], ending just before the cutoff on
    /// `reference` itself.
    #[must_use]
    pub fn settlement_window(&self, reference: NaiveDate) -> DateRange {
        DateRange::new(
            self.settlement_start(reference),
            self.at_cutoff(reference) - Duration::milliseconds(1),
        )
    }

    /// Banking month containing `month` (any day of it).
    ///
    /// August 2020 with no holidays runs from 2020-07-31 14:00 to
    /// 2020-08-31 14:00. The start is adjusted from the day before the first
    /// of the month; the end is adjusted from the last day itself, so its
    /// count is reduced by one.
    #[must_use]
    pub fn banking_month_range(&self, month: NaiveDate) -> DateRange {
        let first = month.with_day(1).unwrap_or(month);
        let last = last_day_of_month(first);

        let day_before = first.pred_opt().unwrap_or(first);
        let (_, start_adjust) = self.adjust_backward(day_before);
        let (_, end_adjust) = self.adjust_backward(last);

        DateRange::new(
            self.at_cutoff(days_before(first, start_adjust)),
            self.at_cutoff(days_before(last, end_adjust - 1)),
        )
    }

    /// Plain local calendar month containing `month`, from 00:00 on the first
    /// through 23:59:59.999 on the last day.
    #[must_use]
    pub fn calendar_month_range(&self, month: NaiveDate) -> DateRange {
        let first = month.with_day(1).unwrap_or(month);
        self.calendar_day_range(first, last_day_of_month(first))
    }

    /// Plain local-day window from the start of `start` to the end of `end`.
    #[must_use]
    pub fn calendar_day_range(&self, start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(
            super::range::start_of_day(self.timezone, start),
            end_of_day(self.timezone, end),
        )
    }
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}
