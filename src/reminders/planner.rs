//! Turns a logical event into its concrete reminder instances.
//!
//! Planning is pure apart from calendar-engine lookups. Instances whose fire time has
//! already passed are still returned; deciding what to do with them belongs to the caller.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::identity::{ReminderId, ReminderKey, ReminderKind, CHECK_DAYS, FLAGGED_PERIOD_CAP};
use super::messages::{self, MessageStyle, ReminderText};
use crate::calendar::CalendarEngine;
use crate::domain::{CalendarDate, CivilTimestamp, FlaggedPeriod, GeoLocation, Onah, TimeOfDay};
use crate::errors::ReminderResult;

/// The unit handed to the notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderInstance {
    pub id: ReminderId,
    pub title: String,
    pub body: String,
    pub fire_at: CivilTimestamp,
}

impl ReminderInstance {
    fn new(key: ReminderKey, text: ReminderText, fire_at: CivilTimestamp) -> Self {
        Self {
            id: key.encode(),
            title: text.title,
            body: text.body,
            fire_at,
        }
    }
}

/// Flagged-period instances plus the number of qualifying periods left out by the cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlaggedPlan {
    pub instances: Vec<ReminderInstance>,
    pub dropped: usize,
}

pub struct RecurrencePlanner<'a> {
    calendar: &'a dyn CalendarEngine,
    twenty_four_hour: bool,
}

impl<'a> RecurrencePlanner<'a> {
    pub fn new(calendar: &'a dyn CalendarEngine) -> Self {
        Self {
            calendar,
            twenty_four_hour: false,
        }
    }

    pub fn with_twenty_four_hour_clock(mut self, enabled: bool) -> Self {
        self.twenty_four_hour = enabled;
        self
    }

    fn style(&self, discreet: bool) -> MessageStyle {
        MessageStyle {
            discreet,
            twenty_four_hour: self.twenty_four_hour,
        }
    }

    /// "A hefsek may be possible today", fired at `time` on the civil day of `date`.
    pub fn hefsek(
        &self,
        date: &CalendarDate,
        time: TimeOfDay,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<ReminderInstance> {
        let sun = self.calendar.sun_times(date, location)?;
        let civil = self.calendar.to_civil(date)?;
        Ok(ReminderInstance::new(
            ReminderKey::singleton(ReminderKind::HefsekReminder)?,
            messages::hefsek(self.style(discreet), sun.sunset),
            CivilTimestamp::new(civil, time),
        ))
    }

    /// Immersion-night reminder, fired at `time` on the civil day of `date`.
    pub fn immersion(
        &self,
        date: &CalendarDate,
        time: TimeOfDay,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<ReminderInstance> {
        let sun = self.calendar.sun_times(date, location)?;
        let civil = self.calendar.to_civil(date)?;
        Ok(ReminderInstance::new(
            ReminderKey::singleton(ReminderKind::ImmersionReminder)?,
            messages::immersion(self.style(discreet), sun.sunset),
            CivilTimestamp::new(civil, time),
        ))
    }

    /// Check `i` fires `i + 1` civil days after the hefsek, at `time`.
    pub fn morning_checks(
        &self,
        hefsek: &CalendarDate,
        event_id: u32,
        time: TimeOfDay,
        discreet: bool,
    ) -> ReminderResult<Vec<ReminderInstance>> {
        let base = self.calendar.to_civil(hefsek)?;
        let style = self.style(discreet);
        (0..CHECK_DAYS)
            .map(|index| -> ReminderResult<ReminderInstance> {
                let key =
                    ReminderKey::per_cycle(ReminderKind::MorningCheckReminder, event_id, index)?;
                Ok(ReminderInstance::new(
                    key,
                    messages::morning_check(style, index),
                    CivilTimestamp::new(civil_day_after(base, index), time),
                ))
            })
            .collect()
    }

    /// Check `i` fires on civil day `base + i + 1` at `sunset(hefsek + i) + offset_hours`.
    ///
    /// The sunset comes from the advanced lunar date and the day from the advanced civil
    /// date. The two must never be derived from the same date source.
    pub fn afternoon_checks(
        &self,
        hefsek: &CalendarDate,
        event_id: u32,
        offset_hours: i32,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<Vec<ReminderInstance>> {
        let base = self.calendar.to_civil(hefsek)?;
        let style = self.style(discreet);
        let mut instances = Vec::with_capacity(usize::from(CHECK_DAYS));
        for index in 0..CHECK_DAYS {
            let lunar = self.calendar.add_days(hefsek, i64::from(index))?;
            let sunset = self.calendar.sun_times(&lunar, location)?.sunset;
            let key =
                ReminderKey::per_cycle(ReminderKind::AfternoonCheckReminder, event_id, index)?;
            instances.push(ReminderInstance::new(
                key,
                messages::afternoon_check(style, index, sunset),
                CivilTimestamp::offset_from(civil_day_after(base, index), sunset, offset_hours),
            ));
        }
        Ok(instances)
    }

    /// Reminders for the flagged periods of one onah on or after `today`, in list order.
    ///
    /// Slots are numbered from 1 and stop at [`FLAGGED_PERIOD_CAP`]; the rest are counted as
    /// dropped. Day reminders anchor on sunrise and night reminders on sunset.
    pub fn flagged_periods(
        &self,
        periods: &[FlaggedPeriod],
        today: &CalendarDate,
        onah: Onah,
        offset_hours: i32,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<FlaggedPlan> {
        let kind = match onah {
            Onah::Day => ReminderKind::FlaggedDayPeriod,
            Onah::Night => ReminderKind::FlaggedNightPeriod,
        };
        let style = self.style(discreet);
        let mut plan = FlaggedPlan::default();
        let active = periods
            .iter()
            .filter(|period| period.onah == onah && period.date.abs() >= today.abs());

        for (position, period) in active.enumerate() {
            if position >= usize::from(FLAGGED_PERIOD_CAP) {
                plan.dropped += 1;
                continue;
            }
            let sun = self.calendar.sun_times(&period.date, location)?;
            let anchor = match onah {
                Onah::Day => sun.sunrise,
                Onah::Night => sun.sunset,
            };
            let civil = self.calendar.to_civil(&period.date)?;
            let slot = u8::try_from(position + 1).unwrap_or(FLAGGED_PERIOD_CAP);
            plan.instances.push(ReminderInstance::new(
                ReminderKey::slot(kind, slot)?,
                messages::flagged_period(style, period, anchor),
                CivilTimestamp::offset_from(civil, anchor, offset_hours),
            ));
        }
        Ok(plan)
    }
}

fn civil_day_after(base: NaiveDate, index: u8) -> NaiveDate {
    base + Duration::days(i64::from(index) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SunTimes;
    use crate::errors::ReminderError;

    /// Lunar day `abs` falls on 2025-01-01 + abs and has sunset at 17:00 + (abs mod 7) minutes.
    struct StubCalendar;

    fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn lunar(abs: i64) -> CalendarDate {
        let day = u8::try_from(abs.rem_euclid(29) + 1).unwrap();
        CalendarDate::new(5785, 10, day, abs).unwrap()
    }

    impl CalendarEngine for StubCalendar {
        fn add_days(&self, date: &CalendarDate, days: i64) -> ReminderResult<CalendarDate> {
            Ok(lunar(date.abs() + days))
        }

        fn to_civil(&self, date: &CalendarDate) -> ReminderResult<NaiveDate> {
            Ok(epoch() + Duration::days(date.abs()))
        }

        fn from_civil(&self, date: NaiveDate) -> ReminderResult<CalendarDate> {
            Ok(lunar((date - epoch()).num_days()))
        }

        fn sun_times(&self, date: &CalendarDate, _: &GeoLocation) -> ReminderResult<SunTimes> {
            if date.abs() == 999 {
                return Err(ReminderError::CalendarLookup("no sunset".into()));
            }
            let minute = u8::try_from(date.abs().rem_euclid(7)).unwrap();
            Ok(SunTimes {
                sunrise: TimeOfDay::new(6, minute).unwrap(),
                sunset: TimeOfDay::new(17, minute).unwrap(),
            })
        }
    }

    #[test]
    fn morning_checks_fire_on_following_civil_days() {
        let planner = RecurrencePlanner::new(&StubCalendar);
        let time = TimeOfDay::new(7, 30).unwrap();
        let instances = planner.morning_checks(&lunar(10), 3, time, false).unwrap();
        assert_eq!(instances.len(), 7);
        for (index, instance) in instances.iter().enumerate() {
            let expected = epoch() + Duration::days(10 + index as i64 + 1);
            assert_eq!(instance.fire_at, CivilTimestamp::new(expected, time));
        }
    }

    #[test]
    fn afternoon_checks_use_advanced_lunar_sunset() {
        let planner = RecurrencePlanner::new(&StubCalendar);
        let instances = planner
            .afternoon_checks(&lunar(20), 1, -1, &GeoLocation::jerusalem(), false)
            .unwrap();
        let third = &instances[2];
        // lunar 22 -> sunset 17:01; civil day is base + 3.
        assert_eq!(third.fire_at.date(), epoch() + Duration::days(23));
        assert_eq!((third.fire_at.hour(), third.fire_at.minute()), (16, 1));
    }

    #[test]
    fn flagged_periods_skip_past_and_other_onah() {
        let planner = RecurrencePlanner::new(&StubCalendar);
        let periods = vec![
            FlaggedPeriod::new(lunar(4), Onah::Day, "past"),
            FlaggedPeriod::new(lunar(6), Onah::Night, "other onah"),
            FlaggedPeriod::new(lunar(5), Onah::Day, "today"),
            FlaggedPeriod::new(lunar(8), Onah::Day, "later"),
        ];
        let plan = planner
            .flagged_periods(&periods, &lunar(5), Onah::Day, 1, &GeoLocation::jerusalem(), false)
            .unwrap();
        assert_eq!(plan.dropped, 0);
        let bodies: Vec<&str> = plan.instances.iter().map(|i| i.body.as_str()).collect();
        assert!(bodies[0].starts_with("today"));
        assert!(bodies[1].starts_with("later"));
        assert_eq!(plan.instances[0].id.to_string(), "1051");
        assert_eq!(plan.instances[1].id.to_string(), "1052");
        // sunrise on lunar 5 is 06:05, plus one hour.
        assert_eq!(plan.instances[0].fire_at.hour(), 7);
    }

    #[test]
    fn lookup_failures_propagate() {
        let planner = RecurrencePlanner::new(&StubCalendar);
        let err = planner
            .immersion(
                &lunar(999),
                TimeOfDay::new(18, 0).unwrap(),
                &GeoLocation::jerusalem(),
                false,
            )
            .expect_err("lookup failure must surface");
        assert!(matches!(err, ReminderError::CalendarLookup(_)));
    }
}
