use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{ReminderError, ReminderResult};

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Wall-clock hour and minute, as reported by the calendar engine or configured by the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: u8,
    minute: u8,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = ReminderError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        TimeOfDay::new(raw.hour, raw.minute)
    }
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> ReminderResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(ReminderError::InvalidInput(format!(
                "time of day {hour:02}:{minute:02} is out of range"
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or_default()
    }

    /// Formats as `7:05 PM` or, with `twenty_four_hour`, as `19:05`.
    pub fn display(&self, twenty_four_hour: bool) -> String {
        if twenty_four_hour {
            return format!("{:02}:{:02}", self.hour, self.minute);
        }
        let suffix = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minute, suffix)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Sunrise and sunset for one date at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: TimeOfDay,
    pub sunset: TimeOfDay,
}

/// A place on earth, used for sunrise/sunset lookups and for the local "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoLocation")]
pub struct GeoLocation {
    name: String,
    latitude: f64,
    longitude: f64,
    utc_offset_minutes: i32,
    elevation_m: f64,
}

#[derive(Deserialize)]
struct RawGeoLocation {
    name: String,
    latitude: f64,
    longitude: f64,
    utc_offset_minutes: i32,
    #[serde(default)]
    elevation_m: f64,
}

impl TryFrom<RawGeoLocation> for GeoLocation {
    type Error = ReminderError;

    fn try_from(raw: RawGeoLocation) -> Result<Self, Self::Error> {
        GeoLocation::new(raw.name, raw.latitude, raw.longitude, raw.utc_offset_minutes)
            .map(|location| location.with_elevation(raw.elevation_m))
    }
}

impl GeoLocation {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        utc_offset_minutes: i32,
    ) -> ReminderResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReminderError::InvalidInput(
                "location name must not be empty".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ReminderError::InvalidInput(format!(
                "latitude {latitude} is out of range"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ReminderError::InvalidInput(format!(
                "longitude {longitude} is out of range"
            )));
        }
        if utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ReminderError::InvalidInput(format!(
                "UTC offset of {utc_offset_minutes} minutes is out of range"
            )));
        }
        Ok(Self {
            name,
            latitude,
            longitude,
            utc_offset_minutes,
            elevation_m: 0.0,
        })
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = elevation_m;
        self
    }

    pub fn jerusalem() -> Self {
        Self {
            name: "Jerusalem".into(),
            latitude: 31.778,
            longitude: 35.235,
            utc_offset_minutes: 120,
            elevation_m: 800.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    pub fn utc_offset(&self) -> Duration {
        Duration::minutes(self.utc_offset_minutes.into())
    }
}

/// A local civil date and wall-clock time; the unit handed to the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivilTimestamp(NaiveDateTime);

impl CivilTimestamp {
    pub fn new(date: NaiveDate, time: TimeOfDay) -> Self {
        Self(date.and_time(time.to_naive_time()))
    }

    /// `time + hours` on `date`; the result rolls into the neighbouring day when it overflows.
    pub fn offset_from(date: NaiveDate, time: TimeOfDay, hours: i32) -> Self {
        Self(date.and_time(time.to_naive_time()) + Duration::hours(hours.into()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for CivilTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
