//! Reminder identity, planning, wording and the application-state seam.

pub mod identity;
pub mod messages;
pub mod planner;
pub mod state;

pub use identity::{
    KeyShape, ReminderId, ReminderKey, ReminderKind, CHECK_DAYS, FLAGGED_PERIOD_CAP,
    FLAGGED_PERIOD_SLOTS,
};
pub use messages::MessageStyle;
pub use planner::{FlaggedPlan, RecurrencePlanner, ReminderInstance};
pub use state::{AppSnapshot, AppStateSource};
