//! Banking calendar.
//!
//! Report windows in this system never follow plain calendar days: money moved
//! after the 14:00 cutoff settles on the next banking day, and weekends and
//! holidays are never a boundary. This module computes those windows:
//! - Banking day and settlement (cash-in/cash-out) windows
//! - Banking month windows used by regulatory files
//! - Plain local-day windows for ad hoc exports

pub mod banking;
pub mod error;
pub mod format;
pub mod holiday;
pub mod range;


pub use banking::{BankingCalendar, adjust_backward, is_banking_day, parse_timezone};
pub use error::CalendarError;
pub use holiday::{DayMonth, HolidayCalendar};
pub use range::DateRange;
