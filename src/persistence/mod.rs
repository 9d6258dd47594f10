//! Save/load of progress and settings
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes (tmp file, then rename over the save)
//! - Corrupt or missing saves fall back to defaults

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::progress::{ProgressSnapshot, ProgressTracker};
use crate::settings::Settings;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Default save file name, relative to the working directory
pub const DEFAULT_SAVE_FILE: &str = "cyber_arcade_save.json";

/// On-disk envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    #[serde(default = "default_progress")]
    pub progress: ProgressSnapshot,
    #[serde(default)]
    pub settings: Settings,
}

impl SaveData {
    pub fn new(progress: &ProgressTracker, settings: &Settings) -> Self {
        Self {
            version: SAVE_VERSION,
            progress: progress.snapshot(),
            settings: settings.clone(),
        }
    }

    /// Rebuild the tracker; malformed fields degrade to defaults
    pub fn progress(&self) -> ProgressTracker {
        ProgressTracker::restore(&self.progress)
    }
}

impl Default for SaveData {
    fn default() -> Self {
        Self::new(&ProgressTracker::new(), &Settings::default())
    }
}

fn default_progress() -> ProgressSnapshot {
    ProgressTracker::new().snapshot()
}

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// Save written by a newer build
    UnsupportedVersion(u32),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "save file I/O failed: {}", e),
            PersistenceError::Parse(e) => write!(f, "save file is corrupt: {}", e),
            PersistenceError::UnsupportedVersion(v) => {
                write!(f, "save version {} is newer than {}", v, SAVE_VERSION)
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Parse(e) => Some(e),
            PersistenceError::UnsupportedVersion(_) => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Parse(e)
    }
}

/// Parse a save from disk
pub fn load(path: &Path) -> Result<SaveData, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let mut data: SaveData = serde_json::from_str(&json)?;
    if data.version > SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }
    data.version = SAVE_VERSION;
    data.settings = data.settings.sanitized();
    Ok(data)
}

/// Load a save, starting fresh when it is missing or unreadable
pub fn load_or_default(path: &Path) -> SaveData {
    match load(path) {
        Ok(data) => {
            log::info!("Loaded save from {}", path.display());
            data
        }
        Err(PersistenceError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No save found at {}, starting fresh", path.display());
            SaveData::default()
        }
        Err(e) => {
            log::warn!("Ignoring save at {}: {}", path.display(), e);
            SaveData::default()
        }
    }
}

/// Write a save atomically
pub fn save(path: &Path, data: &SaveData) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(data)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::info!("Progress saved to {}", path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
