//! Firewall Defender: place firewalls to stop malware reaching the network core
//!
//! Thin adapter between the mini-game contract and the tower-defense
//! simulation in [`crate::sim`].

use glam::Vec2;

use super::{GameContext, GameExit, GameId, GameOutcome, MiniGame};
use crate::consts::{CELL_SIZE, SCREEN_WIDTH};
use crate::progress::Achievement;
use crate::renderer::{Color, Frame};
use crate::sim::{DefenseEvent, DefenseState, EnemyKind, TickInput, tick};
use crate::tuning::DefenseTuning;
use crate::{grid_to_pixel, pixel_to_cell};

pub struct FirewallDefender {
    state: DefenseState,
    quit: bool,
}

impl FirewallDefender {
    pub fn new(seed: u64) -> Self {
        log::info!("Firewall Defender started! Place towers to stop malware from reaching the network core!");
        Self {
            state: DefenseState::new(seed),
            quit: false,
        }
    }

    /// Start with custom balance; invalid tuning falls back to the defaults
    pub fn with_tuning(seed: u64, tuning: DefenseTuning) -> Self {
        let state = DefenseState::with_tuning(seed, tuning).unwrap_or_else(|e| {
            log::error!("Invalid Firewall Defender tuning ({}), using defaults", e);
            DefenseState::new(seed)
        });
        Self { state, quit: false }
    }

    pub fn state(&self) -> &DefenseState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DefenseState {
        &mut self.state
    }

    /// Forward simulation events to the progress tracker
    fn report(&self, ctx: &mut GameContext<'_>) {
        for event in &self.state.events {
            match *event {
                DefenseEvent::EnemyKilled { bounty, .. } => ctx.progress.add_score(bounty as u64),
                DefenseEvent::WaveCleared { wave }
                    if self.state.breaches == 0
                        && wave >= self.state.tuning.firewall_master_waves =>
                {
                    ctx.progress.unlock_achievement(Achievement::FirewallMaster);
                }
                _ => {}
            }
        }
    }

    fn enemy_color(kind: EnemyKind) -> Color {
        match kind {
            EnemyKind::Low => Color::NeonPink,
            EnemyKind::Medium => Color::NeonOrange,
            EnemyKind::High => Color::NeonPurple,
        }
    }

    fn render_board(&self, frame: &mut Frame) {
        let cell = Vec2::splat(CELL_SIZE);
        let (w, h) = self.state.tuning.grid_size;
        for x in 0..w {
            for y in 0..h {
                frame.rect_outline(Vec2::new(x as f32, y as f32) * CELL_SIZE, cell, Color::DarkBlue);
            }
        }
        for &(x, y) in self.state.path.cells() {
            frame.rect(Vec2::new(x as f32, y as f32) * CELL_SIZE, cell, Color::Gray);
        }
    }

    fn render_entities(&self, frame: &mut Frame) {
        for tower in &self.state.towers {
            frame.circle(grid_to_pixel(tower.position()), 15.0, Color::NeonBlue);
        }

        for enemy in &self.state.enemies {
            let pos = grid_to_pixel(self.state.enemy_position(enemy));
            frame.circle(pos, 10.0, Self::enemy_color(enemy.kind));
            frame.bar(
                pos - Vec2::new(15.0, 20.0),
                Vec2::new(30.0, 5.0),
                enemy.health_ratio(),
                Color::NeonRed,
                Color::NeonGreen,
            );
        }

        for projectile in &self.state.projectiles {
            // Chase the live enemy; fall back to where it was when fired
            let target = self
                .state
                .enemy(projectile.enemy_id)
                .map(|e| self.state.enemy_position(e))
                .unwrap_or(projectile.target);
            let pos = grid_to_pixel(projectile.from.lerp(target, projectile.progress));
            frame.line(grid_to_pixel(projectile.from), pos, 2.0, Color::NeonYellow);
            frame.circle(pos, 5.0, Color::NeonYellow);
        }
    }

    fn render_ui(&self, frame: &mut Frame) {
        let stats = [
            format!("Wave: {}", self.state.wave.number),
            format!("Lives: {}", self.state.lives),
            format!("Money: {}", self.state.economy.money),
            format!("Towers: {}", self.state.towers.len()),
        ];
        for (i, stat) in stats.into_iter().enumerate() {
            frame.text(
                stat,
                Vec2::new(SCREEN_WIDTH - 200.0, 20.0 + i as f32 * 40.0),
                36.0,
                Color::NeonGreen,
            );
        }

        let cost = self.state.tuning.tower_cost;
        let instructions = [
            format!("Click to place Firewall ({} money)", cost),
            "Stop malware from reaching the end!".to_string(),
            "Viruses (Pink): Fast, Low HP".to_string(),
            "Trojans (Orange): Medium".to_string(),
            "Ransomware (Purple): Slow, High HP".to_string(),
        ];
        for (i, line) in instructions.into_iter().enumerate() {
            frame.text(line, Vec2::new(20.0, 20.0 + i as f32 * 25.0), 24.0, Color::LightGray);
        }

        if self.state.is_over() {
            let (banner, color) = if self.state.won {
                ("NETWORK SECURED", Color::NeonGreen)
            } else {
                ("NETWORK BREACHED", Color::NeonPink)
            };
            frame.text_centered(
                banner,
                Vec2::new(SCREEN_WIDTH / 2.0, 80.0),
                64.0,
                color,
            );
        }
    }
}

impl MiniGame for FirewallDefender {
    fn id(&self) -> GameId {
        GameId::FirewallDefender
    }

    fn update(&mut self, ctx: &mut GameContext<'_>) {
        if self.is_finished() {
            return;
        }
        let input = TickInput {
            place_at: ctx.input.clicked.then(|| pixel_to_cell(ctx.input.pointer)),
        };
        tick(&mut self.state, &input, ctx.dt);
        self.report(ctx);
    }

    fn render(&self, frame: &mut Frame) {
        self.render_board(frame);
        self.render_entities(frame);
        self.render_ui(frame);
    }

    fn end_game(&mut self) {
        if !self.quit {
            log::info!("Firewall Defender ended early at wave {}", self.state.wave.number);
        }
        self.quit = true;
    }

    fn outcome(&self) -> Option<GameOutcome> {
        let exit = if self.quit {
            GameExit::Quit
        } else if self.state.is_over() {
            if self.state.won { GameExit::Won } else { GameExit::Lost }
        } else {
            return None;
        };
        Some(GameOutcome {
            game: GameId::FirewallDefender,
            exit,
            score: self.state.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center;
    use crate::consts::SIM_DT;
    use crate::platform::FrameInput;
    use crate::progress::ProgressTracker;
    use crate::renderer::DrawCommand;

    fn step(game: &mut FirewallDefender, input: &FrameInput, progress: &mut ProgressTracker) {
        let mut ctx = GameContext {
            input,
            dt: SIM_DT,
            progress,
        };
        game.update(&mut ctx);
    }

    #[test]
    fn test_click_places_tower_at_pointer_cell() {
        let mut game = FirewallDefender::new(5);
        let mut progress = ProgressTracker::new();

        step(&mut game, &FrameInput::click_at(cell_center(1, 1)), &mut progress);
        assert_eq!(game.state().towers.len(), 1);
        assert_eq!(game.state().towers[0].cell, (1, 1));

        // Pointer without a click edge does nothing
        let mut hover = FrameInput::new();
        hover.pointer = cell_center(2, 1);
        step(&mut game, &hover, &mut progress);
        assert_eq!(game.state().towers.len(), 1);
    }

    #[test]
    fn test_kills_report_score() {
        let tuning = DefenseTuning {
            path_waypoints: DefenseTuning::straight_path(9, 32),
            wave_delay: 1_000.0,
            ..Default::default()
        };
        let mut game = FirewallDefender::with_tuning(5, tuning);
        let mut progress = ProgressTracker::new();
        step(&mut game, &FrameInput::click_at(cell_center(1, 8)), &mut progress);
        game.state_mut().spawn_enemy(EnemyKind::Low);

        for _ in 0..600 {
            step(&mut game, &FrameInput::new(), &mut progress);
            if game.state().enemies.is_empty() {
                break;
            }
        }
        assert_eq!(progress.score(), 20);
        assert_eq!(progress.high_score(), 20);
    }

    #[test]
    fn test_clean_waves_award_firewall_master() {
        let tuning = DefenseTuning {
            path_waypoints: DefenseTuning::straight_path(9, 32),
            wave_delay: 0.0,
            initial_wave_quota: 1,
            wave_quota_step: 0,
            enemy_mix: vec![EnemyKind::Low],
            firewall_master_waves: 2,
            ..Default::default()
        };
        let mut game = FirewallDefender::with_tuning(5, tuning);
        game.state_mut().economy.money = 1_000;
        let mut progress = ProgressTracker::new();
        for x in 0..4 {
            step(&mut game, &FrameInput::click_at(cell_center(x, 8)), &mut progress);
            step(&mut game, &FrameInput::click_at(cell_center(x, 10)), &mut progress);
        }

        for _ in 0..600 {
            step(&mut game, &FrameInput::new(), &mut progress);
            if game.state().wave.number >= 3 {
                break;
            }
        }
        assert_eq!(game.state().breaches, 0);
        assert!(progress.has_achievement(Achievement::FirewallMaster));
    }

    #[test]
    fn test_loss_reports_outcome() {
        let mut game = FirewallDefender::new(5);
        game.state_mut().lives = 1;
        game.state_mut().spawn_enemy(EnemyKind::Low);
        let end = game.state().path.length();
        game.state_mut().enemies[0].path_progress = end;

        let mut progress = ProgressTracker::new();
        step(&mut game, &FrameInput::new(), &mut progress);

        let outcome = game.outcome();
        assert_eq!(
            outcome,
            Some(GameOutcome {
                game: GameId::FirewallDefender,
                exit: GameExit::Lost,
                score: 0,
            })
        );

        let mut frame = Frame::new();
        game.render(&mut frame);
        assert!(frame.contains_text("NETWORK BREACHED"));
    }

    #[test]
    fn test_last_wave_breach_reports_loss() {
        let tuning = DefenseTuning {
            max_waves: Some(1),
            ..Default::default()
        };
        let mut game = FirewallDefender::with_tuning(5, tuning);
        let state = game.state_mut();
        state.lives = 1;
        state.spawn_enemy(EnemyKind::Medium);
        state.enemies[0].path_progress = state.path.length();
        state.wave.number = 1;
        state.wave.in_progress = true;

        let mut progress = ProgressTracker::new();
        step(&mut game, &FrameInput::new(), &mut progress);

        assert_eq!(game.outcome().map(|o| o.exit), Some(GameExit::Lost));
        let mut frame = Frame::new();
        game.render(&mut frame);
        assert!(frame.contains_text("NETWORK BREACHED"));
    }

    #[test]
    fn test_shot_draws_trail_from_tower() {
        let tuning = DefenseTuning {
            path_waypoints: DefenseTuning::straight_path(9, 32),
            wave_delay: 1_000.0,
            ..Default::default()
        };
        let mut game = FirewallDefender::with_tuning(5, tuning);
        let mut progress = ProgressTracker::new();
        game.state_mut().spawn_enemy(EnemyKind::High);
        step(&mut game, &FrameInput::click_at(cell_center(1, 8)), &mut progress);
        assert_eq!(game.state().projectiles.len(), 1);

        let mut frame = Frame::new();
        game.render(&mut frame);
        let tower = cell_center(1, 8);
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Line { from, color: Color::NeonYellow, .. } if *from == tower
        )));
    }

    #[test]
    fn test_render_hud() {
        let game = FirewallDefender::new(5);
        let mut frame = Frame::new();
        game.render(&mut frame);
        assert!(frame.contains_text("Lives: 10"));
        assert!(frame.contains_text("Money: 100"));
        assert!(frame.contains_text("Click to place Firewall (50 money)"));
    }

    #[test]
    fn test_invalid_tuning_falls_back() {
        let tuning = DefenseTuning {
            enemy_mix: Vec::new(),
            ..Default::default()
        };
        let game = FirewallDefender::with_tuning(5, tuning);
        assert_eq!(game.state().tuning, DefenseTuning::default());
    }
}
