#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use luach_reminders::calendar::{CalendarEngine, Clock};
use luach_reminders::domain::{CalendarDate, GeoLocation, SunTimes, TimeOfDay};
use luach_reminders::notifications::{
    CancelOutcome, InMemoryNotificationService, NotificationService,
};
use luach_reminders::reminders::{ReminderId, ReminderInstance};
use luach_reminders::{NotificationError, ReminderError, ReminderManager, ReminderResult};

/// Name of a location the test calendar cannot resolve sunrise/sunset for.
pub const POLAR: &str = "Polar Station";

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Lunar day `abs` in a flat 30-day-month calendar.
pub fn lunar(abs: i64) -> CalendarDate {
    let month = u8::try_from((abs.div_euclid(30)).rem_euclid(12) + 1).unwrap();
    let day = u8::try_from(abs.rem_euclid(30) + 1).unwrap();
    CalendarDate::new(5785, month, day, abs).unwrap()
}

/// Deterministic calendar: lunar day `abs` shares its daytime with `epoch() + abs`.
///
/// Sunrise is 06:mm and sunset 18:mm where `mm = abs mod 60`, so every lookup reveals
/// which lunar date it was made for.
pub struct TestCalendar;

impl CalendarEngine for TestCalendar {
    fn add_days(&self, date: &CalendarDate, days: i64) -> ReminderResult<CalendarDate> {
        Ok(lunar(date.abs() + days))
    }

    fn to_civil(&self, date: &CalendarDate) -> ReminderResult<NaiveDate> {
        Ok(epoch() + Duration::days(date.abs()))
    }

    fn from_civil(&self, date: NaiveDate) -> ReminderResult<CalendarDate> {
        Ok(lunar((date - epoch()).num_days()))
    }

    fn sun_times(&self, date: &CalendarDate, location: &GeoLocation) -> ReminderResult<SunTimes> {
        if location.name() == POLAR {
            return Err(ReminderError::CalendarLookup(format!(
                "no sunset at {} on {date}",
                location.name()
            )));
        }
        Ok(SunTimes {
            sunrise: sunrise_on(date.abs()),
            sunset: sunset_on(date.abs()),
        })
    }
}

pub fn sunrise_on(abs: i64) -> TimeOfDay {
    TimeOfDay::new(6, u8::try_from(abs.rem_euclid(60)).unwrap()).unwrap()
}

pub fn sunset_on(abs: i64) -> TimeOfDay {
    TimeOfDay::new(18, u8::try_from(abs.rem_euclid(60)).unwrap()).unwrap()
}

/// Clock frozen at one instant; device local time is taken to be UTC.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight at the start of civil day `epoch() + days`.
    pub fn at_day(days: i64) -> Self {
        let date = epoch() + Duration::days(days);
        Self(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn local_now(&self) -> NaiveDateTime {
        self.0.naive_utc()
    }

    fn now_at(&self, _: &GeoLocation) -> NaiveDateTime {
        self.0.naive_utc()
    }
}

/// Notification service that rejects a fixed set of ids and forwards the rest.
pub struct FlakyNotifier {
    pub inner: InMemoryNotificationService,
    failing: HashSet<ReminderId>,
}

impl FlakyNotifier {
    pub fn failing_on(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            inner: InMemoryNotificationService::new(),
            failing: ids.into_iter().map(ReminderId::from).collect(),
        }
    }

    fn check(&self, id: ReminderId) -> Result<(), NotificationError> {
        if self.failing.contains(&id) {
            return Err(NotificationError::Rejected {
                id: id.to_string(),
                reason: "platform refused".into(),
            });
        }
        Ok(())
    }
}

impl NotificationService for FlakyNotifier {
    fn schedule(&self, reminder: &ReminderInstance) -> Result<(), NotificationError> {
        self.check(reminder.id)?;
        self.inner.schedule(reminder)
    }

    fn cancel(&self, id: ReminderId) -> Result<CancelOutcome, NotificationError> {
        self.check(id)?;
        self.inner.cancel(id)
    }

    fn cancel_all(&self) -> Result<(), NotificationError> {
        self.inner.cancel_all()
    }
}

/// A manager whose clock reads midnight of civil day `epoch() + day`.
pub fn manager_on_day(day: i64) -> (ReminderManager, Arc<InMemoryNotificationService>) {
    let service = Arc::new(InMemoryNotificationService::new());
    let manager = ReminderManager::new(
        Arc::new(TestCalendar),
        service.clone(),
        Arc::new(FixedClock::at_day(day)),
    );
    (manager, service)
}

pub fn pending_ids(service: &InMemoryNotificationService) -> Vec<ReminderId> {
    service.pending().into_iter().map(|r| r.id).collect()
}

pub fn polar_location() -> GeoLocation {
    GeoLocation::new(POLAR, 89.0, 0.0, 0).unwrap()
}
