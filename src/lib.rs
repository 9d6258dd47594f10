//! Cyber Arcade - A cybersecurity mini-game arcade
//!
//! Core modules:
//! - `scene`: Top-level scene state machine (menus, pause, game over, playing)
//! - `games`: Mini-game contract, game catalog and factory registry
//! - `sim`: Deterministic tower-defense simulation (Firewall Defender)
//! - `progress`: Score, high score, unlocks and achievements
//! - `renderer`: Draw-command frames handed to an external rasterizer
//! - `platform`: Input snapshot delivered by the frame driver
//! - `persistence`: Save/load of progress and settings
//! - `tuning`: Data-driven game balance

pub mod games;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use games::{GameId, MiniGame};
pub use progress::ProgressTracker;
pub use scene::{Arcade, Scene};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    pub const GAME_TITLE: &str = "Cyber Arcade";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Fixed simulation timestep (60 Hz frame driver)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Size of one tower-defense grid cell in pixels
    pub const CELL_SIZE: f32 = 40.0;
    /// Grid dimensions (cells)
    pub const GRID_WIDTH: i32 = (SCREEN_WIDTH / CELL_SIZE) as i32;
    pub const GRID_HEIGHT: i32 = (SCREEN_HEIGHT / CELL_SIZE) as i32;
}

/// Pixel position of the center of a grid cell
#[inline]
pub fn cell_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(
        x as f32 * consts::CELL_SIZE + consts::CELL_SIZE / 2.0,
        y as f32 * consts::CELL_SIZE + consts::CELL_SIZE / 2.0,
    )
}

/// Grid cell containing a pixel position
#[inline]
pub fn pixel_to_cell(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / consts::CELL_SIZE).floor() as i32,
        (pos.y / consts::CELL_SIZE).floor() as i32,
    )
}

/// Convert a position in grid units (cell centers at integer coordinates) to pixels
#[inline]
pub fn grid_to_pixel(pos: Vec2) -> Vec2 {
    pos * consts::CELL_SIZE + Vec2::splat(consts::CELL_SIZE / 2.0)
}
