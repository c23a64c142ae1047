use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ReminderResult;

const DEFAULT_DIR_NAME: &str = ".luach_reminders";
const SETTINGS_FILE: &str = "settings.json";

/// Returns the application data directory, defaulting to `~/.luach_reminders`.
///
/// `LUACH_REMINDERS_HOME` overrides the location.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("LUACH_REMINDERS_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn settings_file_in(base: &Path) -> PathBuf {
    base.join(SETTINGS_FILE)
}

pub fn ensure_dir(path: &Path) -> ReminderResult<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
