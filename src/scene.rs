//! Scene state machine
//!
//! Owns the active scene, the single live mini-game instance, the progress
//! tracker and the settings. Per tick it routes input to the active scene
//! only; rendering mirrors that dispatch.
//!
//! ```text
//!   MainMenu ──start(id)──▶ Playing(id) ──finished──▶ GameOver ──▶ MainMenu
//!     │  ▲                      │  ▲
//!     ▼  │ Hub/GameSelect/      ▼  │ pause / resume
//!   (navigation)  Options     Paused ──quit──▶ MainMenu
//! ```

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{GAME_TITLE, SCREEN_HEIGHT, SCREEN_WIDTH, VERSION};
use crate::games::{GameContext, GameExit, GameId, GameOutcome, GameRegistry, MiniGame};
use crate::platform::{FrameInput, Key, KeyRepeat};
use crate::progress::{Achievement, ProgressTracker};
use crate::renderer::{Color, Frame};
use crate::settings::{Settings, VOLUME_STEP};

/// Top-level mode the arcade is presenting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    MainMenu,
    Hub,
    GameSelect,
    Paused,
    GameOver,
    Options,
    Playing(GameId),
}

impl std::fmt::Display for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scene::MainMenu => f.write_str("main_menu"),
            Scene::Hub => f.write_str("arcade_hub"),
            Scene::GameSelect => f.write_str("game_select"),
            Scene::Paused => f.write_str("paused"),
            Scene::GameOver => f.write_str("game_over"),
            Scene::Options => f.write_str("options"),
            Scene::Playing(id) => write!(f, "playing:{}", id),
        }
    }
}

/// The arcade front-end
pub struct Arcade {
    scene: Scene,
    /// Scene preempted by Paused
    previous_scene: Option<Scene>,
    /// Live mini-game; exists exactly while a Playing scene is current or paused
    game: Option<Box<dyn MiniGame>>,
    last_outcome: Option<GameOutcome>,
    progress: ProgressTracker,
    settings: Settings,
    registry: GameRegistry,
    /// Seeds each new game instance
    rng: Pcg32,
    running: bool,
    time_ticks: u64,
    volume_up: KeyRepeat,
    volume_down: KeyRepeat,
}

impl Arcade {
    /// Fresh arcade with built-in games, default progress and settings
    pub fn new(seed: u64) -> Self {
        Self::with_parts(
            seed,
            ProgressTracker::new(),
            Settings::default(),
            GameRegistry::with_builtin_games(),
        )
    }

    pub fn with_parts(
        seed: u64,
        progress: ProgressTracker,
        settings: Settings,
        registry: GameRegistry,
    ) -> Self {
        log::info!("{} v{} starting in main menu", GAME_TITLE, VERSION);
        Self {
            scene: Scene::MainMenu,
            previous_scene: None,
            game: None,
            last_outcome: None,
            progress,
            settings,
            registry,
            rng: Pcg32::seed_from_u64(seed),
            running: true,
            time_ticks: 0,
            volume_up: KeyRepeat::default(),
            volume_down: KeyRepeat::default(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn previous_scene(&self) -> Option<Scene> {
        self.previous_scene
    }

    /// False once a quit was requested from the main menu
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressTracker {
        &mut self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn active_game(&self) -> Option<&dyn MiniGame> {
        self.game.as_deref()
    }

    pub fn last_outcome(&self) -> Option<GameOutcome> {
        self.last_outcome
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    //--- Update ------------------------------------------------------------

    /// Advance one frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        self.time_ticks += 1;

        if input.was_pressed(Key::F11) {
            toggle_fullscreen(&mut self.settings);
        }
        if input.was_pressed(Key::Escape) {
            self.handle_cancel();
            return;
        }

        match self.scene {
            Scene::MainMenu => self.update_main_menu(input),
            Scene::Hub | Scene::GameSelect => {
                if input.was_pressed(Key::Backspace) {
                    self.navigate(Scene::MainMenu);
                }
            }
            Scene::Options => self.update_options(input, dt),
            Scene::Paused => {
                if input.was_pressed(Key::letter('q')) {
                    self.end_active_game();
                }
            }
            Scene::GameOver => {
                if input.was_pressed(Key::Enter) || input.clicked {
                    self.navigate(Scene::MainMenu);
                }
            }
            Scene::Playing(_) => self.update_game(input, dt),
        }
    }

    fn update_main_menu(&mut self, input: &FrameInput) {
        if let Some(id) = input.pressed_digit().and_then(GameId::from_menu_slot) {
            self.start_game(id);
        } else if input.was_pressed(Key::letter('o')) {
            self.navigate(Scene::Options);
        } else if input.was_pressed(Key::letter('h')) {
            self.navigate(Scene::Hub);
        } else if input.was_pressed(Key::letter('g')) {
            self.navigate(Scene::GameSelect);
        }
    }

    fn update_options(&mut self, input: &FrameInput, dt: f32) {
        if input.was_pressed(Key::letter('f')) {
            toggle_fullscreen(&mut self.settings);
        }
        let delay = self.settings.key_repeat_delay_ms as f32 / 1000.0;
        let interval = self.settings.key_repeat_interval_ms as f32 / 1000.0;
        if self.volume_up.fires(input, Key::Plus, dt, delay, interval) {
            self.settings.adjust_master_volume(VOLUME_STEP);
        }
        if self.volume_down.fires(input, Key::Minus, dt, delay, interval) {
            self.settings.adjust_master_volume(-VOLUME_STEP);
        }
        if input.was_pressed(Key::Backspace) {
            self.navigate(Scene::MainMenu);
        }
    }

    fn update_game(&mut self, input: &FrameInput, dt: f32) {
        let Some(game) = self.game.as_mut() else {
            panic!("scene {} has no live game instance", self.scene);
        };
        let mut ctx = GameContext {
            input,
            dt,
            progress: &mut self.progress,
        };
        game.update(&mut ctx);

        if game.is_finished() {
            self.finish_game();
        }
    }

    //--- Transitions -------------------------------------------------------

    /// Start a mini-game from the main menu. Locked, unknown or unavailable
    /// ids are refused and the arcade stays in the main menu.
    pub fn start_game(&mut self, id: GameId) -> bool {
        if self.scene != Scene::MainMenu {
            log::warn!("Cannot start {} from {}", id, self.scene);
            return false;
        }
        if !self.progress.is_unlocked(id) {
            log::warn!("Game {} is locked", id.title());
            return false;
        }
        let seed = self.rng.next_u64();
        let Some(game) = self.registry.create(id, seed) else {
            log::warn!("Game {} is not available yet", id.title());
            return false;
        };

        log::info!("Starting game: {}", id.title());
        self.game = Some(game);
        self.set_scene(Scene::Playing(id));
        true
    }

    /// Freeze the current scene under the pause overlay
    pub fn pause(&mut self) -> bool {
        if matches!(self.scene, Scene::MainMenu | Scene::Paused) {
            return false;
        }
        self.previous_scene = Some(self.scene);
        self.set_scene(Scene::Paused);
        true
    }

    /// Return to exactly the scene that was paused
    pub fn resume(&mut self) -> bool {
        if self.scene != Scene::Paused {
            return false;
        }
        let Some(previous) = self.previous_scene.take() else {
            debug_assert!(false, "resumed from pause with no recorded scene");
            log::error!("Resumed from pause with no recorded scene, returning to main menu");
            self.set_scene(Scene::MainMenu);
            return false;
        };
        self.set_scene(previous);
        true
    }

    /// Escape semantics: quit from the main menu, resume when paused,
    /// pause everywhere else
    pub fn handle_cancel(&mut self) {
        match self.scene {
            Scene::MainMenu => self.request_quit(),
            Scene::Paused => {
                self.resume();
            }
            _ => {
                self.pause();
            }
        }
    }

    /// Stop the frame loop
    pub fn request_quit(&mut self) {
        log::info!("Quit requested");
        self.running = false;
    }

    /// Menu navigation between MainMenu and Hub, GameSelect or Options
    pub fn navigate(&mut self, target: Scene) -> bool {
        let allowed = match (self.scene, target) {
            (Scene::MainMenu, Scene::Hub | Scene::GameSelect | Scene::Options) => true,
            (Scene::Hub | Scene::GameSelect | Scene::Options | Scene::GameOver, Scene::MainMenu) => {
                true
            }
            _ => false,
        };
        if !allowed {
            log::warn!("Ignoring navigation {} -> {}", self.scene, target);
            return false;
        }
        self.set_scene(target);
        true
    }

    /// End the live mini-game early and go back to the main menu
    pub fn end_active_game(&mut self) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        game.end_game();
        self.finish_game();
        true
    }

    /// Tear down the finished instance and pick the follow-up scene
    fn finish_game(&mut self) {
        let Some(game) = self.game.take() else {
            return;
        };
        let outcome = game.outcome();
        drop(game);

        self.previous_scene = None;
        self.last_outcome = outcome;
        match outcome {
            Some(GameOutcome {
                exit: GameExit::Lost | GameExit::Won,
                game,
                score,
            }) => {
                log::info!("{} over with score {}", game.title(), score);
                self.set_scene(Scene::GameOver);
            }
            _ => self.set_scene(Scene::MainMenu),
        }
    }

    fn set_scene(&mut self, scene: Scene) {
        if scene != self.scene {
            log::debug!("Scene {} -> {}", self.scene, scene);
        }
        self.scene = scene;
    }

    //--- Render ------------------------------------------------------------

    /// Draw commands for the current frame
    pub fn render(&self) -> Frame {
        let mut frame = Frame::new();
        frame.rect(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT), Color::Black);
        self.render_scene(self.scene, &mut frame);
        frame
    }

    fn render_scene(&self, scene: Scene, frame: &mut Frame) {
        match scene {
            Scene::MainMenu => self.render_main_menu(frame),
            Scene::Hub => self.render_hub(frame),
            Scene::GameSelect => self.render_game_select(frame),
            Scene::Options => self.render_options(frame),
            Scene::GameOver => self.render_game_over(frame),
            Scene::Playing(_) => {
                let Some(game) = self.game.as_deref() else {
                    panic!("scene {} has no live game instance", scene);
                };
                game.render(frame);
            }
            Scene::Paused => {
                match self.previous_scene {
                    Some(previous) if previous != Scene::Paused => {
                        self.render_scene(previous, frame)
                    }
                    _ => debug_assert!(false, "paused with no recorded scene"),
                }
                self.render_pause_overlay(frame);
            }
        }
    }

    fn render_main_menu(&self, frame: &mut Frame) {
        let center_x = SCREEN_WIDTH / 2.0;
        frame.text_centered(GAME_TITLE, Vec2::new(center_x, 100.0), 74.0, Color::NeonBlue);
        frame.text_centered(
            "Cybersecurity Mini-Games Collection",
            Vec2::new(center_x, 160.0),
            36.0,
            Color::NeonGreen,
        );

        let mut options: Vec<(String, Color)> = GameId::ALL
            .iter()
            .map(|id| {
                if self.progress.is_unlocked(*id) {
                    (format!("{}. {}", id.menu_slot(), id.title()), Color::NeonGreen)
                } else {
                    (format!("{}. ??? (Locked)", id.menu_slot()), Color::Gray)
                }
            })
            .collect();
        options.push(("H. Arcade Hub".to_string(), Color::NeonBlue));
        options.push(("G. Game Select".to_string(), Color::NeonBlue));
        options.push(("O. Options".to_string(), Color::NeonBlue));
        options.push(("ESC. Exit".to_string(), Color::NeonPink));

        for (i, (text, color)) in options.into_iter().enumerate() {
            frame.text_centered(text, Vec2::new(center_x, 230.0 + i as f32 * 45.0), 32.0, color);
        }

        frame.text_centered(
            format!("Version {} | Press number keys to select games", VERSION),
            Vec2::new(center_x, SCREEN_HEIGHT - 30.0),
            24.0,
            Color::LightGray,
        );
    }

    fn render_hub(&self, frame: &mut Frame) {
        let center_x = SCREEN_WIDTH / 2.0;
        frame.text_centered("ARCADE HUB", Vec2::new(center_x, 100.0), 64.0, Color::NeonBlue);
        frame.text_centered(
            format!(
                "Score: {}   High Score: {}",
                self.progress.score(),
                self.progress.high_score()
            ),
            Vec2::new(center_x, 170.0),
            32.0,
            Color::NeonGreen,
        );

        for (i, achievement) in Achievement::ALL.iter().enumerate() {
            let unlocked = self.progress.has_achievement(*achievement);
            let (mark, color) = if unlocked {
                ("[x]", Color::NeonYellow)
            } else {
                ("[ ]", Color::Gray)
            };
            frame.text(
                format!(
                    "{} {} ({} pts) - {}",
                    mark,
                    achievement.name(),
                    achievement.points(),
                    achievement.description()
                ),
                Vec2::new(200.0, 240.0 + i as f32 * 40.0),
                28.0,
                color,
            );
        }
        frame.text_centered(
            "Backspace. Back to Main Menu",
            Vec2::new(center_x, SCREEN_HEIGHT - 30.0),
            24.0,
            Color::LightGray,
        );
    }

    fn render_game_select(&self, frame: &mut Frame) {
        let center_x = SCREEN_WIDTH / 2.0;
        frame.text_centered("GAME SELECT", Vec2::new(center_x, 100.0), 64.0, Color::NeonBlue);

        for (i, id) in GameId::ALL.iter().enumerate() {
            let (status, color) = if !self.progress.is_unlocked(*id) {
                ("Locked", Color::Gray)
            } else if self.registry.is_registered(*id) {
                ("Ready", Color::NeonGreen)
            } else {
                ("Coming soon", Color::NeonOrange)
            };
            frame.text_centered(
                format!("{}. {} - {}", id.menu_slot(), id.title(), status),
                Vec2::new(center_x, 200.0 + i as f32 * 50.0),
                32.0,
                color,
            );
        }
        frame.text_centered(
            "Backspace. Back to Main Menu",
            Vec2::new(center_x, SCREEN_HEIGHT - 30.0),
            24.0,
            Color::LightGray,
        );
    }

    fn render_options(&self, frame: &mut Frame) {
        frame.rect(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT), Color::DarkBlue);
        let center_x = SCREEN_WIDTH / 2.0;
        frame.text_centered("OPTIONS", Vec2::new(center_x, 100.0), 64.0, Color::NeonBlue);

        let options = [
            format!("F. Display: {}", self.settings.display_mode.as_str()),
            format!(
                "+/-. Master Volume: {:.0}%",
                self.settings.master_volume * 100.0
            ),
            format!(
                "Music {:.0}%  SFX {:.0}%",
                self.settings.effective_music_volume() * 100.0,
                self.settings.effective_sfx_volume() * 100.0
            ),
            "Backspace. Back to Main Menu".to_string(),
        ];
        for (i, option) in options.into_iter().enumerate() {
            frame.text_centered(option, Vec2::new(center_x, 200.0 + i as f32 * 60.0), 32.0, Color::NeonGreen);
        }
    }

    fn render_game_over(&self, frame: &mut Frame) {
        let center_x = SCREEN_WIDTH / 2.0;
        let center_y = SCREEN_HEIGHT / 2.0;
        let (title, color) = match self.last_outcome.map(|o| o.exit) {
            Some(GameExit::Won) => ("YOU WIN", Color::NeonGreen),
            _ => ("GAME OVER", Color::NeonPink),
        };
        frame.text_centered(title, Vec2::new(center_x, center_y - 120.0), 72.0, color);

        if let Some(outcome) = self.last_outcome {
            frame.text_centered(
                outcome.game.title(),
                Vec2::new(center_x, center_y - 50.0),
                36.0,
                Color::NeonBlue,
            );
            frame.text_centered(
                format!("Final Score: {}", outcome.score),
                Vec2::new(center_x, center_y),
                36.0,
                Color::White,
            );
        }
        frame.text_centered(
            format!("High Score: {}", self.progress.high_score()),
            Vec2::new(center_x, center_y + 50.0),
            32.0,
            Color::NeonYellow,
        );
        frame.text_centered(
            "Press Enter to return to the Main Menu",
            Vec2::new(center_x, center_y + 120.0),
            24.0,
            Color::LightGray,
        );
    }

    fn render_pause_overlay(&self, frame: &mut Frame) {
        let center_x = SCREEN_WIDTH / 2.0;
        let center_y = SCREEN_HEIGHT / 2.0;
        frame.rect(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT), Color::Overlay);
        frame.text_centered("PAUSED", Vec2::new(center_x, center_y - 50.0), 72.0, Color::NeonBlue);
        frame.text_centered(
            "Press ESC to resume",
            Vec2::new(center_x, center_y + 50.0),
            32.0,
            Color::White,
        );
        if self.game.is_some() {
            frame.text_centered(
                "Press Q to quit to the Main Menu",
                Vec2::new(center_x, center_y + 100.0),
                24.0,
                Color::LightGray,
            );
        }
    }
}

/// Flip the display mode on the settings object the caller hands in
pub fn toggle_fullscreen(settings: &mut Settings) {
    settings.toggle_fullscreen();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::renderer::DrawCommand;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Mini-game that counts updates and finishes on demand
    struct ScriptedGame {
        id: GameId,
        updates: Rc<Cell<u32>>,
        finish_after: Option<u32>,
        quit: bool,
    }

    impl MiniGame for ScriptedGame {
        fn id(&self) -> GameId {
            self.id
        }

        fn update(&mut self, ctx: &mut GameContext<'_>) {
            self.updates.set(self.updates.get() + 1);
            ctx.progress.add_score(5);
        }

        fn render(&self, frame: &mut Frame) {
            frame.text(format!("scripted {}", self.updates.get()), Vec2::ZERO, 12.0, Color::White);
        }

        fn end_game(&mut self) {
            self.quit = true;
        }

        fn outcome(&self) -> Option<GameOutcome> {
            let exit = if self.quit {
                GameExit::Quit
            } else if self.finish_after.is_some_and(|n| self.updates.get() >= n) {
                GameExit::Lost
            } else {
                return None;
            };
            Some(GameOutcome {
                game: self.id,
                exit,
                score: self.updates.get() as u64 * 5,
            })
        }
    }

    fn scripted_arcade(finish_after: Option<u32>) -> (Arcade, Rc<Cell<u32>>) {
        let updates = Rc::new(Cell::new(0));
        let counter = updates.clone();
        let mut registry = GameRegistry::with_builtin_games();
        registry.register(
            GameId::PacketRunner,
            Box::new(move |_seed| -> Box<dyn MiniGame> {
                Box::new(ScriptedGame {
                    id: GameId::PacketRunner,
                    updates: counter.clone(),
                    finish_after,
                    quit: false,
                })
            }),
        );
        let arcade = Arcade::with_parts(1, ProgressTracker::new(), Settings::default(), registry);
        (arcade, updates)
    }

    fn idle(arcade: &mut Arcade) {
        arcade.update(&FrameInput::new(), SIM_DT);
    }

    fn press(arcade: &mut Arcade, key: Key) {
        arcade.update(&FrameInput::key(key), SIM_DT);
    }

    fn game_addr(arcade: &Arcade) -> Option<*const ()> {
        arcade
            .active_game()
            .map(|g| g as *const dyn MiniGame as *const ())
    }

    #[test]
    fn test_starts_in_main_menu() {
        let arcade = Arcade::new(1);
        assert_eq!(arcade.scene(), Scene::MainMenu);
        assert!(arcade.is_running());
        assert!(arcade.active_game().is_none());
    }

    #[test]
    fn test_escape_in_main_menu_quits() {
        let mut arcade = Arcade::new(1);
        press(&mut arcade, Key::Escape);
        assert!(!arcade.is_running());
        assert_eq!(arcade.scene(), Scene::MainMenu);
    }

    #[test]
    fn test_digit_starts_game() {
        let mut arcade = Arcade::new(1);
        press(&mut arcade, Key::Digit(2));
        assert_eq!(arcade.scene(), Scene::Playing(GameId::FirewallDefender));
        assert_eq!(
            arcade.active_game().map(|g| g.id()),
            Some(GameId::FirewallDefender)
        );
    }

    #[test]
    fn test_locked_game_rejected() {
        let mut arcade = Arcade::with_parts(
            1,
            ProgressTracker::locked(),
            Settings::default(),
            GameRegistry::with_builtin_games(),
        );
        assert!(!arcade.start_game(GameId::FirewallDefender));
        assert_eq!(arcade.scene(), Scene::MainMenu);
        assert!(arcade.active_game().is_none());

        arcade.progress_mut().unlock_game(GameId::FirewallDefender);
        assert!(arcade.start_game(GameId::FirewallDefender));
    }

    #[test]
    fn test_unavailable_game_rejected() {
        let mut arcade = Arcade::new(1);
        assert!(!arcade.start_game(GameId::CodeBreaker));
        assert_eq!(arcade.scene(), Scene::MainMenu);
    }

    #[test]
    fn test_start_only_from_main_menu() {
        let mut arcade = Arcade::new(1);
        assert!(arcade.navigate(Scene::Hub));
        assert!(!arcade.start_game(GameId::FirewallDefender));
        assert_eq!(arcade.scene(), Scene::Hub);
    }

    #[test]
    fn test_pause_resume_keeps_instance() {
        let mut arcade = Arcade::new(1);
        assert!(arcade.start_game(GameId::FirewallDefender));
        for _ in 0..30 {
            idle(&mut arcade);
        }
        let addr = game_addr(&arcade);
        let before = arcade.render();

        press(&mut arcade, Key::Escape);
        assert_eq!(arcade.scene(), Scene::Paused);
        assert_eq!(arcade.previous_scene(), Some(Scene::Playing(GameId::FirewallDefender)));
        for _ in 0..30 {
            idle(&mut arcade);
        }

        press(&mut arcade, Key::Escape);
        assert_eq!(arcade.scene(), Scene::Playing(GameId::FirewallDefender));
        assert_eq!(game_addr(&arcade), addr);
        // Nothing advanced while paused
        assert_eq!(arcade.render(), before);
    }

    #[test]
    fn test_paused_game_is_not_updated() {
        let (mut arcade, updates) = scripted_arcade(None);
        assert!(arcade.start_game(GameId::PacketRunner));
        idle(&mut arcade);
        assert_eq!(updates.get(), 1);

        assert!(arcade.pause());
        idle(&mut arcade);
        idle(&mut arcade);
        assert_eq!(updates.get(), 1);

        assert!(arcade.resume());
        idle(&mut arcade);
        assert_eq!(updates.get(), 2);
        assert_eq!(arcade.progress().score(), 10);
    }

    #[test]
    fn test_pause_resume_every_scene() {
        let mut arcade = Arcade::new(1);
        for target in [Scene::Hub, Scene::GameSelect, Scene::Options] {
            assert!(arcade.navigate(target));
            assert!(arcade.pause());
            assert_eq!(arcade.scene(), Scene::Paused);
            assert!(arcade.resume());
            assert_eq!(arcade.scene(), target);
            assert_eq!(arcade.previous_scene(), None);
            assert!(arcade.navigate(Scene::MainMenu));
        }
        assert!(!arcade.pause());
        assert_eq!(arcade.scene(), Scene::MainMenu);
    }

    #[test]
    fn test_finished_game_goes_to_game_over() {
        let (mut arcade, _) = scripted_arcade(Some(3));
        assert!(arcade.start_game(GameId::PacketRunner));
        idle(&mut arcade);
        idle(&mut arcade);
        assert_eq!(arcade.scene(), Scene::Playing(GameId::PacketRunner));

        idle(&mut arcade);
        assert_eq!(arcade.scene(), Scene::GameOver);
        assert!(arcade.active_game().is_none());
        assert_eq!(arcade.last_outcome().map(|o| o.score), Some(15));
        assert!(arcade.render().contains_text("Final Score: 15"));

        // Game over can itself be paused and resumed
        press(&mut arcade, Key::Escape);
        assert_eq!(arcade.scene(), Scene::Paused);
        press(&mut arcade, Key::Escape);
        assert_eq!(arcade.scene(), Scene::GameOver);

        press(&mut arcade, Key::Enter);
        assert_eq!(arcade.scene(), Scene::MainMenu);
    }

    #[test]
    fn test_quit_from_pause_returns_to_menu() {
        let mut arcade = Arcade::new(1);
        assert!(arcade.start_game(GameId::FirewallDefender));
        press(&mut arcade, Key::Escape);
        press(&mut arcade, Key::letter('q'));

        assert_eq!(arcade.scene(), Scene::MainMenu);
        assert!(arcade.active_game().is_none());
        assert_eq!(arcade.previous_scene(), None);
        assert_eq!(arcade.last_outcome().map(|o| o.exit), Some(GameExit::Quit));
    }

    #[test]
    fn test_menu_navigation() {
        let mut arcade = Arcade::new(1);
        press(&mut arcade, Key::letter('h'));
        assert_eq!(arcade.scene(), Scene::Hub);
        press(&mut arcade, Key::Backspace);
        assert_eq!(arcade.scene(), Scene::MainMenu);
        press(&mut arcade, Key::letter('g'));
        assert_eq!(arcade.scene(), Scene::GameSelect);
        press(&mut arcade, Key::Backspace);
        press(&mut arcade, Key::letter('o'));
        assert_eq!(arcade.scene(), Scene::Options);
        assert!(!arcade.navigate(Scene::Hub));
    }

    #[test]
    fn test_fullscreen_toggles() {
        let mut arcade = Arcade::new(1);
        press(&mut arcade, Key::F11);
        assert!(arcade.settings().is_fullscreen());

        press(&mut arcade, Key::letter('o'));
        press(&mut arcade, Key::letter('f'));
        assert!(!arcade.settings().is_fullscreen());

        press(&mut arcade, Key::Minus);
        assert!((arcade.settings().master_volume - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_held_volume_key_repeats() {
        let mut arcade = Arcade::new(1);
        arcade.settings_mut().master_volume = 0.0;
        press(&mut arcade, Key::letter('o'));
        press(&mut arcade, Key::Plus);
        assert!((arcade.settings().master_volume - 0.1).abs() < 1e-5);

        let mut hold = FrameInput::new();
        hold.held.insert(Key::Plus);
        // 200 ms delay then 50 ms interval: 30 held ticks (500 ms) fire 7 times
        for _ in 0..30 {
            arcade.update(&hold, SIM_DT);
        }
        let volume = arcade.settings().master_volume;
        assert!((0.65..=0.85).contains(&volume), "volume {}", volume);
        assert!(arcade.render().contains_text("Music"));
    }

    #[test]
    fn test_options_show_effective_volumes() {
        let mut arcade = Arcade::new(1);
        press(&mut arcade, Key::letter('o'));
        assert!(arcade.render().contains_text("Music 35%  SFX 56%"));
    }

    #[test]
    fn test_pause_overlay_over_game() {
        let mut arcade = Arcade::new(1);
        assert!(arcade.start_game(GameId::FirewallDefender));
        let playing = arcade.render();
        arcade.pause();
        let paused = arcade.render();

        // The game's frame sits under the overlay
        assert_eq!(&paused.commands[..playing.len()], &playing.commands[..]);
        assert!(paused.commands[playing.len()..].iter().any(|c| matches!(
            c,
            DrawCommand::Rect { color: Color::Overlay, .. }
        )));
        assert!(paused.contains_text("PAUSED"));
        assert!(paused.contains_text("Lives: 10"));
    }

    #[test]
    fn test_main_menu_shows_locks() {
        let mut progress = ProgressTracker::locked();
        progress.unlock_game(GameId::FirewallDefender);
        let arcade = Arcade::with_parts(
            1,
            progress,
            Settings::default(),
            GameRegistry::with_builtin_games(),
        );
        let frame = arcade.render();
        assert!(frame.contains_text("2. Firewall Defender"));
        assert!(frame.contains_text("1. ??? (Locked)"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no recorded scene")]
    fn test_resume_without_previous_scene_fails_fast() {
        let mut arcade = Arcade::new(1);
        arcade.scene = Scene::Paused;
        arcade.resume();
    }

    #[test]
    #[should_panic(expected = "no live game instance")]
    fn test_render_playing_without_instance_panics() {
        let mut arcade = Arcade::new(1);
        arcade.scene = Scene::Playing(GameId::FirewallDefender);
        arcade.render();
    }
}
