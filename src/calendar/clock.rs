use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::domain::GeoLocation;

/// Clock abstracts access to the current timestamp so scheduling stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Device wall-clock time, the frame reminder fire times are expressed in.
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }

    /// Wall-clock time at `location`, used to find the current calendar position there.
    fn now_at(&self, location: &GeoLocation) -> NaiveDateTime {
        self.now().naive_utc() + location.utc_offset()
    }
}

/// Real-time clock backed by the system time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
