use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ReminderError, ReminderResult};

const MONTH_NAMES: [&str; 13] = [
    "Nissan",
    "Iyar",
    "Sivan",
    "Tamuz",
    "Av",
    "Elul",
    "Tishrei",
    "Cheshvan",
    "Kislev",
    "Teves",
    "Shvat",
    "Adar",
    "Adar Sheini",
];

/// A lunar calendar date as produced by the calendar engine.
///
/// Months are numbered from Nissan (1) through Adar Sheini (13). `abs` is the engine's
/// absolute day count; it is declared first so ordering follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarDate")]
pub struct CalendarDate {
    abs: i64,
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Deserialize)]
struct RawCalendarDate {
    abs: i64,
    year: i32,
    month: u8,
    day: u8,
}

impl TryFrom<RawCalendarDate> for CalendarDate {
    type Error = ReminderError;

    fn try_from(raw: RawCalendarDate) -> Result<Self, Self::Error> {
        CalendarDate::new(raw.year, raw.month, raw.day, raw.abs)
    }
}

impl CalendarDate {
    pub fn new(year: i32, month: u8, day: u8, abs: i64) -> ReminderResult<Self> {
        if !(1..=13).contains(&month) {
            return Err(ReminderError::InvalidInput(format!(
                "lunar month {month} is out of range"
            )));
        }
        if !(1..=30).contains(&day) {
            return Err(ReminderError::InvalidInput(format!(
                "lunar day {day} is out of range"
            )));
        }
        if year < 1 {
            return Err(ReminderError::InvalidInput(format!(
                "lunar year {year} is out of range"
            )));
        }
        Ok(Self {
            abs,
            year,
            month,
            day,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn abs(&self) -> i64 {
        self.abs
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

/// Half of a halachic day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Onah {
    Day,
    Night,
}

impl Onah {
    pub fn label(&self) -> &'static str {
        match self {
            Onah::Day => "daytime",
            Onah::Night => "nighttime",
        }
    }
}

/// An onah flagged by the cycle-tracking logic as requiring observance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedPeriod {
    pub date: CalendarDate,
    pub onah: Onah,
    /// Full, non-discreet explanation shown in the reminder body.
    pub description: String,
}

impl FlaggedPeriod {
    pub fn new(date: CalendarDate, onah: Onah, description: impl Into<String>) -> Self {
        Self {
            date,
            onah,
            description: description.into(),
        }
    }
}
