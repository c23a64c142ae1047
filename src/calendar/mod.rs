//! Seams to the lunar-calendar engine and to the wall clock.

pub mod clock;

pub use clock::{Clock, SystemClock};

use chrono::NaiveDate;

use crate::domain::{CalendarDate, GeoLocation, SunTimes};
use crate::errors::ReminderResult;

/// Lunar-date arithmetic and astronomical lookups provided by the host's calendar engine.
///
/// Implementations report unresolvable dates or locations (e.g. polar days without a
/// sunset) as [`ReminderError::CalendarLookup`](crate::errors::ReminderError::CalendarLookup);
/// callers never substitute a guessed time.
pub trait CalendarEngine: Send + Sync {
    /// Advances (or, for negative `days`, rewinds) a lunar date.
    fn add_days(&self, date: &CalendarDate, days: i64) -> ReminderResult<CalendarDate>;

    /// Civil (Gregorian) date that shares its daytime with `date`.
    fn to_civil(&self, date: &CalendarDate) -> ReminderResult<NaiveDate>;

    /// Lunar date whose daytime falls on the civil `date`.
    fn from_civil(&self, date: NaiveDate) -> ReminderResult<CalendarDate>;

    fn sun_times(&self, date: &CalendarDate, location: &GeoLocation) -> ReminderResult<SunTimes>;
}
