//! Deterministic tower-defense simulation
//!
//! All Firewall Defender gameplay logic lives here. This module must be pure
//! and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{
    Cell, DefenseEvent, DefensePhase, DefenseState, Economy, Enemy, EnemyKind, Path,
    PlacementError, Projectile, Tower, Wave,
};
pub use tick::{TickInput, place_tower, tick};
