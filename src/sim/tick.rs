//! Fixed timestep simulation tick
//!
//! Each tick runs the same pipeline in a fixed order:
//! input → spawner → enemy advance → combat → death sweep → projectiles → loss check.
//! Movement happens before combat so a breaching enemy is resolved before
//! towers get another shot at it.

use rand::Rng;

use super::state::{
    Cell, DefenseEvent, DefensePhase, DefenseState, PlacementError, Projectile, Tower,
};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Grid cell clicked this tick
    pub place_at: Option<Cell>,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut DefenseState, input: &TickInput, dt: f32) {
    state.events.clear();
    if state.phase == DefensePhase::GameOver {
        return;
    }
    state.time_ticks += 1;

    if let Some(cell) = input.place_at {
        place_tower(state, cell).ok();
    }
    run_spawner(state, dt);
    advance_enemies(state, dt);
    resolve_combat(state, dt);
    sweep_dead(state);
    update_projectiles(state, dt);
    check_end(state);
}

/// Try to build a tower on `cell`
pub fn place_tower(state: &mut DefenseState, cell: Cell) -> Result<u32, PlacementError> {
    let result = validate_placement(state, cell);
    let result = result.and_then(|()| {
        let cost = state.tuning.tower_cost;
        if state.economy.try_spend(cost) {
            Ok(())
        } else {
            Err(PlacementError::InsufficientFunds {
                cost,
                balance: state.economy.money,
            })
        }
    });

    match result {
        Ok(()) => {
            let id = state.next_entity_id();
            state.towers.push(Tower {
                id,
                cell,
                damage: state.tuning.tower_damage,
                range: state.tuning.tower_range,
                cooldown: 0.0,
                attack_interval: state.tuning.tower_attack_interval,
            });
            let money_left = state.economy.money;
            log::info!(
                "Firewall placed at ({}, {})! Money: {}",
                cell.0,
                cell.1,
                money_left
            );
            state
                .events
                .push(DefenseEvent::TowerPlaced { cell, money_left });
            Ok(id)
        }
        Err(reason) => {
            log::debug!("Placement at ({}, {}) rejected: {}", cell.0, cell.1, reason);
            state
                .events
                .push(DefenseEvent::PlacementRejected { cell, reason });
            Err(reason)
        }
    }
}

fn validate_placement(state: &DefenseState, cell: Cell) -> Result<(), PlacementError> {
    if !state.in_grid(cell) {
        return Err(PlacementError::OffGrid);
    }
    if state.path.contains(cell) {
        return Err(PlacementError::OnPath);
    }
    if state.tower_at(cell).is_some() {
        return Err(PlacementError::Occupied);
    }
    Ok(())
}

/// Release the next wave once the field is empty and the delay has passed
fn run_spawner(state: &mut DefenseState, dt: f32) {
    state.wave.timer += dt;

    if !state.enemies.is_empty() || state.wave.timer <= state.tuning.wave_delay {
        return;
    }

    let count = state.wave.quota;
    for _ in 0..count {
        let pick = state.rng.random_range(0..state.tuning.enemy_mix.len());
        let kind = state.tuning.enemy_mix[pick];
        state.spawn_enemy(kind);
    }

    state.wave.number += 1;
    state.wave.quota += state.tuning.wave_quota_step;
    state.wave.timer = 0.0;
    state.wave.in_progress = count > 0;

    log::info!("Wave {} incoming! {} enemies", state.wave.number, count);
    state.events.push(DefenseEvent::WaveSpawned {
        wave: state.wave.number,
        enemies: count,
    });
}

/// Move every enemy along the path and resolve breaches
fn advance_enemies(state: &mut DefenseState, dt: f32) {
    let end = state.path.length();
    let mut breached = Vec::new();

    for enemy in &mut state.enemies {
        enemy.path_progress = (enemy.path_progress + enemy.speed * dt).min(end);
        if enemy.path_progress >= end {
            breached.push(enemy.id);
        }
    }

    if breached.is_empty() {
        return;
    }
    state.enemies.retain(|e| !breached.contains(&e.id));

    for enemy_id in breached {
        state.lives = state.lives.saturating_sub(1);
        state.breaches += 1;
        log::info!("Malware breached! Lives: {}", state.lives);
        state.events.push(DefenseEvent::Breach {
            enemy_id,
            lives_left: state.lives,
        });
    }
}

/// Ready towers shoot the nearest enemy in range; damage lands immediately
fn resolve_combat(state: &mut DefenseState, dt: f32) {
    for tower_idx in 0..state.towers.len() {
        state.towers[tower_idx].cool_down(dt);
        if !state.towers[tower_idx].is_ready() {
            continue;
        }

        let tower_pos = state.towers[tower_idx].position();
        let range = state.towers[tower_idx].range;

        // Strict comparison keeps the earliest-spawned enemy on ties
        let mut best: Option<(usize, f32)> = None;
        for (i, enemy) in state.enemies.iter().enumerate() {
            let distance = tower_pos.distance(state.path.position_at(enemy.path_progress));
            if distance > range {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        let Some((enemy_idx, _)) = best else {
            continue;
        };

        let tower = &mut state.towers[tower_idx];
        tower.cooldown = tower.attack_interval;
        let (tower_id, damage) = (tower.id, tower.damage);

        let enemy = &mut state.enemies[enemy_idx];
        enemy.health -= damage as i32;
        let enemy_id = enemy.id;
        let target = state.path.position_at(enemy.path_progress);

        state.projectiles.push(Projectile {
            tower_id,
            enemy_id,
            from: tower_pos,
            target,
            progress: 0.0,
        });
        state.events.push(DefenseEvent::EnemyHit {
            tower_id,
            enemy_id,
            damage,
        });
    }
}

/// Remove destroyed enemies and pay out their bounties
fn sweep_dead(state: &mut DefenseState) {
    let dead: Vec<(u32, u32)> = state
        .enemies
        .iter()
        .filter(|e| e.is_dead())
        .map(|e| (e.id, e.bounty))
        .collect();

    if dead.is_empty() {
        return;
    }
    state.enemies.retain(|e| !e.is_dead());

    for (enemy_id, bounty) in dead {
        state.economy.credit(bounty);
        state.score += bounty as u64;
        log::debug!("Malware eliminated! +{} money", bounty);
        state
            .events
            .push(DefenseEvent::EnemyKilled { enemy_id, bounty });
    }
}

/// Animate cosmetic projectiles; drop the ones that arrived
fn update_projectiles(state: &mut DefenseState, dt: f32) {
    let speed = state.tuning.projectile_speed;
    for projectile in &mut state.projectiles {
        projectile.progress = (projectile.progress + speed * dt).min(1.0);
    }
    state.projectiles.retain(|p| p.progress < 1.0);
}

/// Wave clear bookkeeping and the terminal transition
fn check_end(state: &mut DefenseState) {
    if state.wave.in_progress && state.enemies.is_empty() {
        state.wave.in_progress = false;
        log::info!("Wave {} cleared", state.wave.number);
        state.events.push(DefenseEvent::WaveCleared {
            wave: state.wave.number,
        });
        // A breach that empties the field on the last life is still a loss
        if state.lives > 0
            && state
                .tuning
                .max_waves
                .is_some_and(|max| state.wave.number >= max)
        {
            state.won = true;
        }
    }

    if state.lives == 0 || state.won {
        state.phase = DefensePhase::GameOver;
        log::info!(
            "Game Over! Final Score: {} (wave {}, {})",
            state.score,
            state.wave.number,
            if state.won { "network secured" } else { "network breached" }
        );
        state.events.push(DefenseEvent::GameOver {
            won: state.won,
            score: state.score,
        });
    }
}
