use crate::config::ReminderSettings;
use crate::domain::FlaggedPeriod;

/// Read-only view of the application state the flagged-period reset rebuilds from.
pub trait AppStateSource {
    fn settings(&self) -> &ReminderSettings;

    /// Flagged periods as currently computed by the cycle-tracking logic, in chronological order.
    fn flagged_periods(&self) -> &[FlaggedPeriod];
}

/// Owned snapshot of the application state.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub settings: ReminderSettings,
    pub flagged_periods: Vec<FlaggedPeriod>,
}

impl AppSnapshot {
    pub fn new(settings: ReminderSettings, flagged_periods: Vec<FlaggedPeriod>) -> Self {
        Self {
            settings,
            flagged_periods,
        }
    }
}

impl AppStateSource for AppSnapshot {
    fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    fn flagged_periods(&self) -> &[FlaggedPeriod] {
        &self.flagged_periods
    }
}
