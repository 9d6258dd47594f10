//! Arcade settings and preferences
//!
//! One explicit settings object owned by the scene state machine and handed
//! out by reference. Persisted alongside progress in the save file.

use serde::{Deserialize, Serialize};

/// Window presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayMode {
    #[default]
    Windowed,
    Fullscreen,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Windowed => "Windowed",
            DisplayMode::Fullscreen => "Fullscreen",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Windowed => DisplayMode::Fullscreen,
            DisplayMode::Fullscreen => DisplayMode::Windowed,
        }
    }
}

/// Volume change per Options key press
pub const VOLUME_STEP: f32 = 0.1;

/// Arcade settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub display_mode: DisplayMode,
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Input ===
    /// Delay before a held key starts repeating (ms)
    pub key_repeat_delay_ms: u32,
    /// Interval between repeats of a held key (ms)
    pub key_repeat_interval_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Windowed,
            show_fps: false,

            master_volume: 0.7,
            music_volume: 0.5,
            sfx_volume: 0.8,

            key_repeat_delay_ms: 200,
            key_repeat_interval_ms: 50,
        }
    }
}

impl Settings {
    pub fn is_fullscreen(&self) -> bool {
        self.display_mode == DisplayMode::Fullscreen
    }

    /// Flip between windowed and fullscreen, returning the new mode
    pub fn toggle_fullscreen(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        log::info!("Display mode: {}", self.display_mode.as_str());
        self.display_mode
    }

    /// Nudge master volume, clamped to [0, 1]
    pub fn adjust_master_volume(&mut self, delta: f32) {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
    }

    /// Effective music gain
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Effective sound effect gain
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Clamp values that may have been hand-edited in the save file
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}
