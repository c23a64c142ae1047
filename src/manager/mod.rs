pub mod reminder_manager;

pub use reminder_manager::{
    CancelReport, CancelStatus, ReminderManager, ResetReport, ScheduleReport, ScheduleStatus,
};
