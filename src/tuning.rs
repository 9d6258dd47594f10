//! Data-driven game balance for Firewall Defender
//!
//! Everything a designer might tweak lives in [`DefenseTuning`] so tests and
//! alternate modes can swap values without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::sim::EnemyKind;

/// Tower-defense balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseTuning {
    /// Grid size in cells (width, height)
    pub grid_size: (i32, i32),
    /// Path corners in grid cells; consecutive points share a row or column
    pub path_waypoints: Vec<(i32, i32)>,

    pub starting_lives: u32,
    pub starting_money: u32,

    pub tower_cost: u32,
    pub tower_damage: u32,
    /// Targeting radius in grid cells
    pub tower_range: f32,
    /// Seconds between shots
    pub tower_attack_interval: f32,

    /// Seconds the field must sit empty before the next wave
    pub wave_delay: f32,
    pub initial_wave_quota: u32,
    /// Added to the quota after every spawned wave
    pub wave_quota_step: u32,
    /// End the run as a win once this many waves are cleared
    pub max_waves: Option<u32>,
    /// Enemy kinds drawn uniformly at spawn time
    pub enemy_mix: Vec<EnemyKind>,

    /// Projectile animation speed (fraction of flight per second)
    pub projectile_speed: f32,
    /// Waves to clear without a breach for Firewall Master
    pub firewall_master_waves: u32,
}

impl Default for DefenseTuning {
    fn default() -> Self {
        let mid = GRID_HEIGHT / 2;
        Self {
            grid_size: (GRID_WIDTH, GRID_HEIGHT),
            // Enter left, dip through the middle of the board, exit right
            path_waypoints: vec![
                (0, mid - 4),
                (10, mid - 4),
                (10, mid + 3),
                (21, mid + 3),
                (21, mid - 4),
                (GRID_WIDTH - 1, mid - 4),
            ],

            starting_lives: 10,
            starting_money: 100,

            tower_cost: 50,
            tower_damage: 10,
            tower_range: 3.0,
            tower_attack_interval: 1.0,

            wave_delay: 5.0,
            initial_wave_quota: 5,
            wave_quota_step: 2,
            max_waves: None,
            enemy_mix: vec![EnemyKind::Low, EnemyKind::Medium, EnemyKind::High],

            projectile_speed: 6.0,
            firewall_master_waves: 5,
        }
    }
}

impl DefenseTuning {
    /// Straight path along one row, handy for focused scenarios
    pub fn straight_path(row: i32, length: i32) -> Vec<(i32, i32)> {
        vec![(0, row), (length - 1, row)]
    }

    /// Check the waypoints describe a usable path
    pub fn validate(&self) -> Result<(), String> {
        if self.path_waypoints.len() < 2 {
            return Err("path needs at least two waypoints".to_string());
        }
        let (w, h) = self.grid_size;
        for &(x, y) in &self.path_waypoints {
            if x < 0 || y < 0 || x >= w || y >= h {
                return Err(format!("waypoint ({}, {}) is off the grid", x, y));
            }
        }
        for pair in self.path_waypoints.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            if x0 != x1 && y0 != y1 {
                return Err(format!(
                    "segment ({}, {}) -> ({}, {}) is diagonal",
                    x0, y0, x1, y1
                ));
            }
        }
        if self.enemy_mix.is_empty() {
            return Err("enemy mix is empty".to_string());
        }
        Ok(())
    }
}
