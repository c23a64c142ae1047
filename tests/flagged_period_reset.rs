mod common;

use chrono::Duration;
use common::{epoch, lunar, manager_on_day, pending_ids, polar_location, sunrise_on, sunset_on};
use luach_reminders::config::ReminderSettings;
use luach_reminders::domain::{CivilTimestamp, FlaggedPeriod, Onah};
use luach_reminders::reminders::{
    AppSnapshot, ReminderKind, FLAGGED_PERIOD_CAP, FLAGGED_PERIOD_SLOTS,
};
use luach_reminders::ReminderError;

fn periods(onah: Onah, days: impl IntoIterator<Item = i64>) -> Vec<FlaggedPeriod> {
    days.into_iter()
        .map(|abs| FlaggedPeriod::new(lunar(abs), onah, format!("Flagged {abs}")))
        .collect()
}

fn snapshot(flagged: Vec<FlaggedPeriod>) -> AppSnapshot {
    AppSnapshot::new(ReminderSettings::default(), flagged)
}

#[test]
fn thirty_day_periods_schedule_exactly_the_cap() {
    let (manager, service) = manager_on_day(100);
    let state = snapshot(periods(Onah::Day, 101..131));

    let report = manager.reset_day_period_reminders(&state).unwrap();
    assert_eq!(report.scheduled.scheduled(), 24);
    assert_eq!(report.scheduled.dropped, 6);
    assert_eq!(service.len(), usize::from(FLAGGED_PERIOD_CAP));

    let ids: Vec<String> = pending_ids(&service).iter().map(|id| id.to_string()).collect();
    assert!(ids.iter().all(|id| id.starts_with("105")));
    assert!(!ids.contains(&"1050".to_string()));
    assert!(ids.contains(&"10524".to_string()));
}

#[test]
fn reset_is_idempotent() {
    let (manager, service) = manager_on_day(100);
    let state = snapshot(periods(Onah::Day, [102, 105, 109]));

    manager.reset_day_period_reminders(&state).unwrap();
    let once = service.pending();
    let second = manager.reset_day_period_reminders(&state).unwrap();
    assert_eq!(service.pending(), once);
    assert_eq!(second.cleared.cancelled(), 3);
    assert_eq!(second.cleared.ids().len(), 25);
}

#[test]
fn reset_drops_slots_for_periods_that_disappeared() {
    let (manager, service) = manager_on_day(100);
    manager
        .reset_night_period_reminders(&snapshot(periods(Onah::Night, 101..111)))
        .unwrap();
    assert_eq!(service.len(), 10);

    manager
        .reset_night_period_reminders(&snapshot(periods(Onah::Night, [104, 107])))
        .unwrap();
    let bodies: Vec<String> = service.pending().into_iter().map(|r| r.body).collect();
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0].starts_with("Flagged 104"));
    assert!(bodies[1].starts_with("Flagged 107"));
}

#[test]
fn periods_before_today_and_of_the_other_onah_are_ignored() {
    let (manager, service) = manager_on_day(100);
    let mut flagged = periods(Onah::Day, [98, 99, 100, 103]);
    flagged.extend(periods(Onah::Night, [101, 102]));
    let state = snapshot(flagged);

    let report = manager.reset_day_period_reminders(&state).unwrap();
    assert_eq!(report.scheduled.outcomes.len(), 2);
    assert_eq!(service.len(), 2);
    assert!(service
        .pending()
        .iter()
        .all(|r| r.title == "Luach - Daytime flagged date notification"));
}

#[test]
fn day_and_night_resets_use_separate_slots() {
    let (manager, service) = manager_on_day(100);
    let mut flagged = periods(Onah::Day, [101, 102]);
    flagged.extend(periods(Onah::Night, [101, 102, 103]));
    let state = snapshot(flagged);

    manager.reset_day_period_reminders(&state).unwrap();
    manager.reset_night_period_reminders(&state).unwrap();
    assert_eq!(service.len(), 5);

    let cleared = manager.remove_all_day_period_reminders();
    assert_eq!(cleared.cancelled(), 2);
    assert_eq!(service.len(), 3);
    assert!(pending_ids(&service)
        .iter()
        .all(|id| id.to_string().starts_with(&ReminderKind::FlaggedNightPeriod.tag().to_string())));
}

#[test]
fn day_reminders_fire_relative_to_sunrise_with_the_configured_offset() {
    let (manager, service) = manager_on_day(100);
    let settings = ReminderSettings {
        remind_day_onah_hours: 2,
        discreet: true,
        ..ReminderSettings::default()
    };
    let state = AppSnapshot::new(settings, periods(Onah::Day, [103]));

    manager.reset_day_period_reminders(&state).unwrap();
    let reminder = service.pending().pop().unwrap();
    let sunrise = sunrise_on(103);
    assert_eq!(reminder.fire_at.hour(), u32::from(sunrise.hour()) + 2);
    assert_eq!(reminder.fire_at.minute(), u32::from(sunrise.minute()));
    assert!(reminder
        .body
        .starts_with(&format!("The daytime of {} needs to be observed.", lunar(103))));
}

#[test]
fn failed_lookup_still_clears_the_previous_reminders() {
    let (manager, service) = manager_on_day(100);
    let good = snapshot(periods(Onah::Night, [101, 102]));
    manager.reset_night_period_reminders(&good).unwrap();
    assert_eq!(service.len(), 2);

    let polar = AppSnapshot::new(
        ReminderSettings {
            location: polar_location(),
            ..ReminderSettings::default()
        },
        periods(Onah::Night, [101, 102, 103]),
    );
    let err = manager
        .reset_night_period_reminders(&polar)
        .expect_err("lookup failure must surface");
    assert!(matches!(err, ReminderError::CalendarLookup(_)));
    assert!(service.is_empty());
    assert_eq!(service.cancel_requests().len(), 2 * FLAGGED_PERIOD_SLOTS.count());
}

#[test]
fn night_reminders_fire_relative_to_sunset_with_the_configured_offset() {
    for offset in [-3, 0, 7] {
        let (manager, service) = manager_on_day(100);
        let settings = ReminderSettings {
            remind_night_onah_hours: offset,
            ..ReminderSettings::default()
        };
        let state = AppSnapshot::new(settings, periods(Onah::Night, [105]));

        manager.reset_night_period_reminders(&state).unwrap();
        let reminder = service.pending().pop().unwrap();
        let civil = epoch() + Duration::days(105);
        assert_eq!(
            reminder.fire_at,
            CivilTimestamp::offset_from(civil, sunset_on(105), offset),
            "offset {offset}"
        );
        assert_eq!(reminder.title, "Luach - Nighttime flagged date notification");
    }
}

#[test]
fn night_reminder_past_midnight_lands_on_the_next_civil_day() {
    let (manager, service) = manager_on_day(100);
    let settings = ReminderSettings {
        remind_night_onah_hours: 7,
        ..ReminderSettings::default()
    };
    let state = AppSnapshot::new(settings, periods(Onah::Night, [105]));

    manager.reset_night_period_reminders(&state).unwrap();
    let reminder = service.pending().pop().unwrap();
    assert_eq!(reminder.fire_at.date(), epoch() + Duration::days(106));
    assert_eq!((reminder.fire_at.hour(), reminder.fire_at.minute()), (1, 45));
}

#[test]
fn flagged_bodies_follow_the_24_hour_setting() {
    let (manager, service) = manager_on_day(100);
    let settings = ReminderSettings {
        use_24_hour_clock: true,
        ..ReminderSettings::default()
    };
    let state = AppSnapshot::new(settings, periods(Onah::Night, [101]));

    manager.reset_night_period_reminders(&state).unwrap();
    let reminder = service.pending().pop().unwrap();
    assert_eq!(reminder.body, "Flagged 101\nSunset is at 18:41");
}
