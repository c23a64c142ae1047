use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calendar::{CalendarEngine, Clock};
use crate::config::ReminderSettings;
use crate::domain::{CalendarDate, GeoLocation, Onah, TimeOfDay};
use crate::errors::{NotificationError, ReminderResult};
use crate::notifications::{CancelOutcome, NotificationService};
use crate::reminders::{
    AppStateSource, RecurrencePlanner, ReminderId, ReminderInstance, ReminderKey, ReminderKind,
};

/// Result of handing one reminder to the notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleStatus {
    Scheduled,
    /// Fire time was not in the future; nothing was sent to the service.
    SkippedPast,
    Failed(NotificationError),
}

/// Result of asking the notification service to cancel one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelStatus {
    Cancelled,
    NotFound,
    Failed(NotificationError),
}

/// Per-reminder outcomes of a scheduling batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub outcomes: Vec<(ReminderId, ScheduleStatus)>,
    /// Qualifying flagged periods left out because the kind's slots were full.
    pub dropped: usize,
}

impl ScheduleReport {
    pub fn scheduled_ids(&self) -> Vec<ReminderId> {
        self.ids_where(|status| matches!(status, ScheduleStatus::Scheduled))
    }

    pub fn scheduled(&self) -> usize {
        self.scheduled_ids().len()
    }

    pub fn skipped(&self) -> usize {
        self.ids_where(|status| matches!(status, ScheduleStatus::SkippedPast))
            .len()
    }

    pub fn failed(&self) -> usize {
        self.ids_where(|status| matches!(status, ScheduleStatus::Failed(_)))
            .len()
    }

    fn ids_where(&self, predicate: impl Fn(&ScheduleStatus) -> bool) -> Vec<ReminderId> {
        self.outcomes
            .iter()
            .filter(|(_, status)| predicate(status))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Per-id outcomes of a cancellation sweep. The sweep completes as long as every id was tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelReport {
    pub outcomes: Vec<(ReminderId, CancelStatus)>,
}

impl CancelReport {
    /// Every id the sweep addressed, in order.
    pub fn ids(&self) -> Vec<ReminderId> {
        self.outcomes.iter().map(|(id, _)| *id).collect()
    }

    pub fn cancelled(&self) -> usize {
        self.count(|status| matches!(status, CancelStatus::Cancelled))
    }

    pub fn not_found(&self) -> usize {
        self.count(|status| matches!(status, CancelStatus::NotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, CancelStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&CancelStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, status)| predicate(status))
            .count()
    }

    fn merge(mut self, other: CancelReport) -> Self {
        self.outcomes.extend(other.outcomes);
        self
    }
}

/// Outcome of rebuilding one flagged-period kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub cleared: CancelReport,
    pub scheduled: ScheduleReport,
}

/// Facade that adds and cancels reminders for logical events.
///
/// The manager keeps no record of what it scheduled. Cancellation re-derives every id the
/// matching add could have produced, so it also clears reminders built from data that has
/// since changed.
pub struct ReminderManager {
    calendar: Arc<dyn CalendarEngine>,
    notifier: Arc<dyn NotificationService>,
    clock: Arc<dyn Clock>,
    twenty_four_hour: bool,
}

impl ReminderManager {
    pub fn new(
        calendar: Arc<dyn CalendarEngine>,
        notifier: Arc<dyn NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calendar,
            notifier,
            clock,
            twenty_four_hour: false,
        }
    }

    pub fn with_twenty_four_hour_clock(mut self, enabled: bool) -> Self {
        self.twenty_four_hour = enabled;
        self
    }

    fn planner(&self) -> RecurrencePlanner<'_> {
        self.planner_with_clock(self.twenty_four_hour)
    }

    /// Planner for the settings-driven operations, which follow the user's clock preference.
    fn planner_for(&self, settings: &ReminderSettings) -> RecurrencePlanner<'_> {
        self.planner_with_clock(settings.use_24_hour_clock)
    }

    fn planner_with_clock(&self, twenty_four_hour: bool) -> RecurrencePlanner<'_> {
        RecurrencePlanner::new(self.calendar.as_ref()).with_twenty_four_hour_clock(twenty_four_hour)
    }

    pub fn add_hefsek_reminder(
        &self,
        date: &CalendarDate,
        time: TimeOfDay,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<ScheduleReport> {
        let instance = self.planner().hefsek(date, time, location, discreet)?;
        Ok(self.submit(vec![instance]))
    }

    /// Hefsek reminder on `date` at the configured time, location and wording.
    pub fn add_configured_hefsek_reminder(
        &self,
        date: &CalendarDate,
        settings: &ReminderSettings,
    ) -> ReminderResult<ScheduleReport> {
        let instance = self.planner_for(settings).hefsek(
            date,
            settings.hefsek_time,
            &settings.location,
            settings.discreet,
        )?;
        Ok(self.submit(vec![instance]))
    }

    pub fn cancel_hefsek_reminder(&self) -> CancelReport {
        self.cancel_kind(ReminderKind::HefsekReminder, 0)
    }

    pub fn add_immersion_reminder(
        &self,
        date: &CalendarDate,
        time: TimeOfDay,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<ScheduleReport> {
        let instance = self.planner().immersion(date, time, location, discreet)?;
        Ok(self.submit(vec![instance]))
    }

    /// Immersion reminder on `date` at the configured time, location and wording.
    pub fn add_configured_immersion_reminder(
        &self,
        date: &CalendarDate,
        settings: &ReminderSettings,
    ) -> ReminderResult<ScheduleReport> {
        let instance = self.planner_for(settings).immersion(
            date,
            settings.immersion_time,
            &settings.location,
            settings.discreet,
        )?;
        Ok(self.submit(vec![instance]))
    }

    pub fn cancel_immersion_reminder(&self) -> CancelReport {
        self.cancel_kind(ReminderKind::ImmersionReminder, 0)
    }

    pub fn add_morning_check_reminders(
        &self,
        hefsek: &CalendarDate,
        tahara_event_id: u32,
        time: TimeOfDay,
        discreet: bool,
    ) -> ReminderResult<ScheduleReport> {
        let instances = self
            .planner()
            .morning_checks(hefsek, tahara_event_id, time, discreet)?;
        Ok(self.submit(instances))
    }

    pub fn add_afternoon_check_reminders(
        &self,
        hefsek: &CalendarDate,
        tahara_event_id: u32,
        offset_hours: i32,
        location: &GeoLocation,
        discreet: bool,
    ) -> ReminderResult<ScheduleReport> {
        let instances = self.planner().afternoon_checks(
            hefsek,
            tahara_event_id,
            offset_hours,
            location,
            discreet,
        )?;
        Ok(self.submit(instances))
    }

    /// Schedules both daily checks for a cycle from the configured times.
    ///
    /// Both sets are planned before anything is submitted, so a failed sunset lookup leaves
    /// the service untouched.
    pub fn add_all_check_reminders(
        &self,
        hefsek: &CalendarDate,
        tahara_event_id: u32,
        settings: &ReminderSettings,
    ) -> ReminderResult<ScheduleReport> {
        let planner = self.planner_for(settings);
        let mut instances = planner.morning_checks(
            hefsek,
            tahara_event_id,
            settings.morning_check_time,
            settings.discreet,
        )?;
        instances.extend(planner.afternoon_checks(
            hefsek,
            tahara_event_id,
            settings.afternoon_check_offset_hours,
            &settings.location,
            settings.discreet,
        )?);
        instances.sort_by_key(|instance| instance.fire_at);
        Ok(self.submit(instances))
    }

    pub fn cancel_morning_check_reminders(&self, tahara_event_id: u32) -> CancelReport {
        self.cancel_kind(ReminderKind::MorningCheckReminder, tahara_event_id)
    }

    pub fn cancel_afternoon_check_reminders(&self, tahara_event_id: u32) -> CancelReport {
        self.cancel_kind(ReminderKind::AfternoonCheckReminder, tahara_event_id)
    }

    /// Cancels the morning and afternoon ranges of a cycle in one sweep.
    pub fn cancel_all_check_reminders(&self, tahara_event_id: u32) -> CancelReport {
        self.cancel_morning_check_reminders(tahara_event_id)
            .merge(self.cancel_afternoon_check_reminders(tahara_event_id))
    }

    pub fn remove_all_day_period_reminders(&self) -> CancelReport {
        self.cancel_kind(ReminderKind::FlaggedDayPeriod, 0)
    }

    pub fn remove_all_night_period_reminders(&self) -> CancelReport {
        self.cancel_kind(ReminderKind::FlaggedNightPeriod, 0)
    }

    /// Replaces every daytime flagged-period reminder with the set derived from `state`.
    pub fn reset_day_period_reminders(
        &self,
        state: &dyn AppStateSource,
    ) -> ReminderResult<ResetReport> {
        self.reset_period_reminders(state, Onah::Day)
    }

    /// Replaces every nighttime flagged-period reminder with the set derived from `state`.
    pub fn reset_night_period_reminders(
        &self,
        state: &dyn AppStateSource,
    ) -> ReminderResult<ResetReport> {
        self.reset_period_reminders(state, Onah::Night)
    }

    pub fn cancel_all(&self) -> ReminderResult<()> {
        self.notifier.cancel_all()?;
        info!("all pending reminders cancelled");
        Ok(())
    }

    /// Sweeps the kind's whole slot range before planning, so a failed lookup leaves no
    /// reminders behind for that kind.
    fn reset_period_reminders(
        &self,
        state: &dyn AppStateSource,
        onah: Onah,
    ) -> ReminderResult<ResetReport> {
        let settings = state.settings();
        let (kind, offset_hours) = match onah {
            Onah::Day => (
                ReminderKind::FlaggedDayPeriod,
                settings.remind_day_onah_hours,
            ),
            Onah::Night => (
                ReminderKind::FlaggedNightPeriod,
                settings.remind_night_onah_hours,
            ),
        };
        let cleared = self.cancel_kind(kind, 0);
        let plan = self
            .calendar
            .from_civil(self.clock.now_at(&settings.location).date())
            .and_then(|today| {
                self.planner_for(settings).flagged_periods(
                    state.flagged_periods(),
                    &today,
                    onah,
                    offset_hours,
                    &settings.location,
                    settings.discreet,
                )
            });
        let plan = match plan {
            Ok(plan) => plan,
            Err(err) => {
                warn!(
                    %kind,
                    cleared = cleared.cancelled(),
                    error = %err,
                    "flagged period reminders cleared but could not be rebuilt"
                );
                return Err(err);
            }
        };
        if plan.dropped > 0 {
            info!(
                %kind,
                dropped = plan.dropped,
                "flagged periods beyond the reminder cap were not scheduled"
            );
        }

        let mut scheduled = self.submit(plan.instances);
        scheduled.dropped = plan.dropped;
        info!(
            %kind,
            scheduled = scheduled.scheduled(),
            skipped = scheduled.skipped(),
            failed = scheduled.failed(),
            "flagged period reminders rebuilt"
        );
        Ok(ResetReport { cleared, scheduled })
    }

    fn submit(&self, instances: Vec<ReminderInstance>) -> ScheduleReport {
        let now = self.clock.local_now();
        let mut report = ScheduleReport::default();
        for instance in instances {
            let status = if instance.fire_at.naive() <= now {
                info!(
                    reminder_id = %instance.id,
                    fire_at = %instance.fire_at,
                    title = %instance.title,
                    "fire time already passed; reminder not scheduled"
                );
                ScheduleStatus::SkippedPast
            } else {
                match self.notifier.schedule(&instance) {
                    Ok(()) => {
                        debug!(
                            reminder_id = %instance.id,
                            fire_at = %instance.fire_at,
                            "reminder scheduled"
                        );
                        ScheduleStatus::Scheduled
                    }
                    Err(err) => {
                        warn!(
                            reminder_id = %instance.id,
                            error = %err,
                            "failed to schedule reminder"
                        );
                        ScheduleStatus::Failed(err)
                    }
                }
            };
            report.outcomes.push((instance.id, status));
        }
        report
    }

    fn cancel_kind(&self, kind: ReminderKind, event_id: u32) -> CancelReport {
        let mut report = CancelReport::default();
        for key in ReminderKey::all_for(kind, event_id) {
            let id = key.encode();
            let status = match self.notifier.cancel(id) {
                Ok(CancelOutcome::Cancelled) => CancelStatus::Cancelled,
                Ok(CancelOutcome::NotFound) => CancelStatus::NotFound,
                Err(err) => {
                    warn!(reminder_id = %id, error = %err, "failed to cancel reminder");
                    CancelStatus::Failed(err)
                }
            };
            debug!(reminder_id = %id, ?status, "reminder cancellation requested");
            report.outcomes.push((id, status));
        }
        report
    }
}
