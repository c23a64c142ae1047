use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{GeoLocation, TimeOfDay};
use crate::errors::{ReminderError, ReminderResult};
use crate::utils::paths::{app_data_dir, ensure_dir, settings_file_in};

const TMP_SUFFIX: &str = "tmp";
const MAX_OFFSET_HOURS: i32 = 12;

/// User preferences that drive reminder wording and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    pub location: GeoLocation,
    pub discreet: bool,
    pub use_24_hour_clock: bool,
    /// Hours after sunrise for daytime flagged-period reminders; negative means before.
    pub remind_day_onah_hours: i32,
    /// Hours after sunset for nighttime flagged-period reminders; negative means before.
    pub remind_night_onah_hours: i32,
    pub hefsek_time: TimeOfDay,
    pub morning_check_time: TimeOfDay,
    pub afternoon_check_offset_hours: i32,
    pub immersion_time: TimeOfDay,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            location: GeoLocation::jerusalem(),
            discreet: false,
            use_24_hour_clock: false,
            remind_day_onah_hours: 0,
            remind_night_onah_hours: 0,
            hefsek_time: time(9, 0),
            morning_check_time: time(7, 0),
            afternoon_check_offset_hours: -1,
            immersion_time: time(18, 0),
        }
    }
}

fn time(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap_or_default()
}

impl ReminderSettings {
    /// Rejects hour offsets that would move a reminder more than half a day from its anchor.
    pub fn validate(&self) -> ReminderResult<()> {
        let offsets = [
            ("remind_day_onah_hours", self.remind_day_onah_hours),
            ("remind_night_onah_hours", self.remind_night_onah_hours),
            (
                "afternoon_check_offset_hours",
                self.afternoon_check_offset_hours,
            ),
        ];
        for (name, value) in offsets {
            if value.abs() > MAX_OFFSET_HOURS {
                return Err(ReminderError::InvalidInput(format!(
                    "{name} must be within ±{MAX_OFFSET_HOURS} hours, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Loads and saves [`ReminderSettings`] as JSON in the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> ReminderResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> ReminderResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: settings_file_in(&base),
        })
    }

    /// Returns the stored settings, or the defaults when nothing has been saved yet.
    pub fn load(&self) -> ReminderResult<ReminderSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file; using defaults");
            return Ok(ReminderSettings::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let settings: ReminderSettings = serde_json::from_str(&data)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, settings: &ReminderSettings) -> ReminderResult<()> {
        settings.validate()?;
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "reminder settings saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> ReminderResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
