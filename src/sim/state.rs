//! Firewall Defender state and entity types
//!
//! Everything one playthrough owns: towers, enemies, projectiles, the wave
//! counter and the economy. Grid positions are in cell units with cell
//! centers at integer coordinates.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::DefenseTuning;

/// Grid cell coordinate
pub type Cell = (i32, i32);

/// Malware strains, weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Virus: fast, low HP
    Low,
    /// Trojan
    Medium,
    /// Ransomware: slow, high HP
    High,
}

impl EnemyKind {
    pub fn max_health(&self) -> i32 {
        match self {
            EnemyKind::Low => 30,
            EnemyKind::Medium => 50,
            EnemyKind::High => 80,
        }
    }

    /// Path cells per second
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Low => 0.5,
            EnemyKind::Medium => 0.3,
            EnemyKind::High => 0.2,
        }
    }

    pub fn bounty(&self) -> u32 {
        match self {
            EnemyKind::Low => 20,
            EnemyKind::Medium => 30,
            EnemyKind::High => 50,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnemyKind::Low => "Virus",
            EnemyKind::Medium => "Trojan",
            EnemyKind::High => "Ransomware",
        }
    }
}

/// The fixed route enemies follow, expanded into individual cells
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    cells: Vec<Cell>,
    lookup: HashSet<Cell>,
}

impl Path {
    /// Expand axis-aligned waypoints into a contiguous cell list
    pub fn from_waypoints(waypoints: &[Cell]) -> Self {
        let mut cells: Vec<Cell> = Vec::new();
        if let Some(&first) = waypoints.first() {
            cells.push(first);
        }
        for pair in waypoints.windows(2) {
            let (mut x, mut y) = pair[0];
            let (tx, ty) = pair[1];
            while (x, y) != (tx, ty) {
                x += (tx - x).signum();
                y += (ty - y).signum();
                cells.push((x, y));
            }
        }
        let lookup = cells.iter().copied().collect();
        Self { cells, lookup }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.lookup.contains(&cell)
    }

    /// Progress value at which an enemy breaches
    pub fn length(&self) -> f32 {
        self.cells.len().saturating_sub(1) as f32
    }

    /// Interpolated grid position for a progress value
    pub fn position_at(&self, progress: f32) -> Vec2 {
        let Some(&last) = self.cells.last() else {
            return Vec2::ZERO;
        };
        let progress = progress.clamp(0.0, self.length());
        let index = progress.floor() as usize;
        let frac = progress - index as f32;

        let a = cell_to_vec(self.cells[index]);
        let b = self
            .cells
            .get(index + 1)
            .map(|c| cell_to_vec(*c))
            .unwrap_or_else(|| cell_to_vec(last));
        a.lerp(b, frac)
    }
}

/// Cell coordinate as a grid-space vector
#[inline]
pub fn cell_to_vec(cell: Cell) -> Vec2 {
    Vec2::new(cell.0 as f32, cell.1 as f32)
}

/// A firewall tower (never moves)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: u32,
    pub cell: Cell,
    pub damage: u32,
    /// Targeting radius in cells
    pub range: f32,
    /// Seconds until the next shot; 0 means ready
    pub cooldown: f32,
    pub attack_interval: f32,
}

impl Tower {
    pub fn position(&self) -> Vec2 {
        cell_to_vec(self.cell)
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Count the cooldown down by one tick, clamped at zero
    pub fn cool_down(&mut self, dt: f32) {
        self.cooldown -= dt;
        // Snap float residue so a full interval never costs an extra tick
        if self.cooldown < COOLDOWN_EPSILON {
            self.cooldown = 0.0;
        }
    }
}

const COOLDOWN_EPSILON: f32 = 1e-4;

/// A piece of malware walking the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Spawn-ordered id
    pub id: u32,
    pub kind: EnemyKind,
    pub path_progress: f32,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub bounty: u32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind) -> Self {
        Self {
            id,
            kind,
            path_progress: 0.0,
            health: kind.max_health(),
            max_health: kind.max_health(),
            speed: kind.speed(),
            bounty: kind.bounty(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Cosmetic shot from a tower toward an enemy (damage already applied)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub tower_id: u32,
    pub enemy_id: u32,
    /// Tower position (grid units)
    pub from: Vec2,
    /// Target position at fire time, used once the enemy is gone
    pub target: Vec2,
    /// Flight progress 0-1
    pub progress: f32,
}

/// Wave counter and spawn pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Waves spawned so far
    pub number: u32,
    /// Enemies in the next wave
    pub quota: u32,
    /// Seconds since the last spawn
    pub timer: f32,
    /// A spawned wave still has live enemies
    pub in_progress: bool,
}

/// Currency balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub money: u32,
}

impl Economy {
    /// Debit `cost` if affordable
    pub fn try_spend(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(left) => {
                self.money = left;
                true
            }
            None => false,
        }
    }

    pub fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }
}

/// Simulation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefensePhase {
    Active,
    /// Terminal
    GameOver,
}

/// Why a placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    OffGrid,
    OnPath,
    Occupied,
    InsufficientFunds { cost: u32, balance: u32 },
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::OffGrid => write!(f, "cell is off the grid"),
            PlacementError::OnPath => write!(f, "cell is on the enemy path"),
            PlacementError::Occupied => write!(f, "cell already has a tower"),
            PlacementError::InsufficientFunds { cost, balance } => {
                write!(f, "tower costs {} but only {} available", cost, balance)
            }
        }
    }
}

/// Things that happened during the last tick
#[derive(Debug, Clone, PartialEq)]
pub enum DefenseEvent {
    TowerPlaced { cell: Cell, money_left: u32 },
    PlacementRejected { cell: Cell, reason: PlacementError },
    WaveSpawned { wave: u32, enemies: u32 },
    EnemyHit { tower_id: u32, enemy_id: u32, damage: u32 },
    EnemyKilled { enemy_id: u32, bounty: u32 },
    Breach { enemy_id: u32, lives_left: u32 },
    WaveCleared { wave: u32 },
    GameOver { won: bool, score: u64 },
}

/// Complete state of one Firewall Defender playthrough
#[derive(Debug, Clone)]
pub struct DefenseState {
    pub seed: u64,
    pub tuning: DefenseTuning,
    pub path: Path,
    pub rng: Pcg32,
    pub phase: DefensePhase,
    pub lives: u32,
    /// Enemies that reached the end of the path this run
    pub breaches: u32,
    pub score: u64,
    /// Run ended by clearing every configured wave
    pub won: bool,
    pub economy: Economy,
    pub wave: Wave,
    /// Placement order
    pub towers: Vec<Tower>,
    /// Spawn order
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<DefenseEvent>,
    next_id: u32,
}

impl DefenseState {
    /// New run with default balance
    pub fn new(seed: u64) -> Self {
        Self::build(seed, DefenseTuning::default())
    }

    /// New run with custom balance
    pub fn with_tuning(seed: u64, tuning: DefenseTuning) -> Result<Self, String> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: DefenseTuning) -> Self {
        Self {
            seed,
            path: Path::from_waypoints(&tuning.path_waypoints),
            rng: Pcg32::seed_from_u64(seed),
            phase: DefensePhase::Active,
            lives: tuning.starting_lives,
            breaches: 0,
            score: 0,
            won: false,
            economy: Economy {
                money: tuning.starting_money,
            },
            wave: Wave {
                number: 0,
                quota: tuning.initial_wave_quota,
                timer: 0.0,
                in_progress: false,
            },
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == DefensePhase::GameOver
    }

    pub fn in_grid(&self, cell: Cell) -> bool {
        let (w, h) = self.tuning.grid_size;
        cell.0 >= 0 && cell.1 >= 0 && cell.0 < w && cell.1 < h
    }

    pub fn tower_at(&self, cell: Cell) -> Option<&Tower> {
        self.towers.iter().find(|t| t.cell == cell)
    }

    /// Spawn one enemy at the path start
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind));
        id
    }

    /// Grid position of an enemy
    pub fn enemy_position(&self, enemy: &Enemy) -> Vec2 {
        self.path.position_at(enemy.path_progress)
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_expands_waypoints() {
        let path = Path::from_waypoints(&[(0, 2), (2, 2), (2, 0)]);
        assert_eq!(path.cells(), &[(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)]);
        assert_eq!(path.length(), 4.0);
        assert!(path.contains((2, 1)));
        assert!(!path.contains((1, 1)));
    }

    #[test]
    fn test_path_position_interpolates() {
        let path = Path::from_waypoints(&[(0, 2), (2, 2), (2, 0)]);
        assert_eq!(path.position_at(0.0), Vec2::new(0.0, 2.0));
        assert_eq!(path.position_at(1.5), Vec2::new(1.5, 2.0));
        assert_eq!(path.position_at(3.0), Vec2::new(2.0, 1.0));
        // Clamped past the end
        assert_eq!(path.position_at(99.0), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_enemy_stats_from_kind() {
        let enemy = Enemy::new(1, EnemyKind::Medium);
        assert_eq!(enemy.health, 50);
        assert_eq!(enemy.max_health, 50);
        assert_eq!(enemy.speed, 0.3);
        assert_eq!(enemy.bounty, 30);
        assert_eq!(enemy.health_ratio(), 1.0);
    }

    #[test]
    fn test_economy_never_goes_negative() {
        let mut economy = Economy { money: 60 };
        assert!(economy.try_spend(50));
        assert!(!economy.try_spend(50));
        assert_eq!(economy.money, 10);
        economy.credit(20);
        assert_eq!(economy.money, 30);
    }

    #[test]
    fn test_tower_cooldown_clamps_at_zero() {
        let mut tower = Tower {
            id: 1,
            cell: (0, 0),
            damage: 10,
            range: 3.0,
            cooldown: 0.01,
            attack_interval: 1.0,
        };
        tower.cool_down(1.0);
        assert_eq!(tower.cooldown, 0.0);
        assert!(tower.is_ready());
    }

    #[test]
    fn test_new_state_from_tuning() {
        let state = DefenseState::new(7);
        assert_eq!(state.lives, 10);
        assert_eq!(state.economy.money, 100);
        assert_eq!(state.wave.quota, 5);
        assert_eq!(state.phase, DefensePhase::Active);
        assert!(state.path.length() > 0.0);
    }

    #[test]
    fn test_with_tuning_rejects_bad_path() {
        let tuning = DefenseTuning {
            path_waypoints: vec![(0, 0)],
            ..Default::default()
        };
        assert!(DefenseState::with_tuning(1, tuning).is_err());
    }
}
