//! Value types shared by the planner, the manager and the external collaborators.

pub mod calendar;
pub mod common;

pub use calendar::{CalendarDate, FlaggedPeriod, Onah};
pub use common::{CivilTimestamp, GeoLocation, SunTimes, TimeOfDay};
