#![doc(test(attr(deny(warnings))))]

//! Luach Reminders derives, schedules and cancels the local reminders behind the
//! tahara cycle and flagged onah periods.
//!
//! Reminders are never tracked after scheduling: every id is reconstructed from
//! `(kind, tahara event id, sequence index)` whenever it has to be cancelled.

pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;
pub mod manager;
pub mod notifications;
pub mod reminders;
pub mod utils;

pub use errors::{NotificationError, ReminderError, ReminderResult};
pub use manager::{ReminderManager, ScheduleReport, ScheduleStatus};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(build = %build.summary(), "Luach reminders initialized.");
    });
}
