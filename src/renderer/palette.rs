//! Named colors for draw commands

use serde::{Deserialize, Serialize};

/// Palette color identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    NeonBlue,
    NeonPink,
    NeonGreen,
    NeonPurple,
    NeonOrange,
    NeonYellow,
    NeonRed,
    DarkBlue,
    DarkPurple,
    Black,
    White,
    Gray,
    LightGray,
    /// Translucent black used behind the pause menu
    Overlay,
}

impl Color {
    /// RGBA components (0-255)
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            Color::NeonBlue => [0, 195, 255, 255],
            Color::NeonPink => [255, 0, 128, 255],
            Color::NeonGreen => [57, 255, 20, 255],
            Color::NeonPurple => [180, 0, 255, 255],
            Color::NeonOrange => [255, 100, 0, 255],
            Color::NeonYellow => [255, 255, 0, 255],
            Color::NeonRed => [255, 40, 40, 255],
            Color::DarkBlue => [10, 20, 40, 255],
            Color::DarkPurple => [30, 10, 50, 255],
            Color::Black => [0, 0, 0, 255],
            Color::White => [255, 255, 255, 255],
            Color::Gray => [100, 100, 100, 255],
            Color::LightGray => [200, 200, 200, 255],
            Color::Overlay => [0, 0, 0, 180],
        }
    }
}
