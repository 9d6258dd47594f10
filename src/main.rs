//! Cyber Arcade entry point
//!
//! Loads the save, drives the arcade with a scripted headless frame loop and
//! writes progress back on exit. A windowed front-end feeds `FrameInput`s and
//! rasterizes `Frame`s the same way.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cyber_arcade::consts::{GAME_TITLE, SIM_DT, VERSION};
use cyber_arcade::games::{GameId, GameRegistry};
use cyber_arcade::persistence::{self, DEFAULT_SAVE_FILE, SaveData};
use cyber_arcade::platform::{FrameInput, Key};
use cyber_arcade::sim::Cell;
use cyber_arcade::{Arcade, Scene, cell_center};

/// Ten minutes of simulated play
const MAX_TICKS: u32 = 60 * 60 * 10;

/// Ticks between scripted tower placement attempts
const PLACE_EVERY: u32 = 120;

/// Firewall spots hugging the default path's corners
const TOWER_PLAN: [Cell; 12] = [
    (9, 6),
    (11, 8),
    (9, 11),
    (11, 11),
    (20, 11),
    (22, 8),
    (20, 6),
    (3, 6),
    (6, 4),
    (15, 11),
    (15, 13),
    (25, 6),
];

fn main() {
    env_logger::init();
    log::info!("{} v{} (native) starting...", GAME_TITLE, VERSION);

    let save_path = Path::new(DEFAULT_SAVE_FILE);
    let data = persistence::load_or_default(save_path);
    let mut arcade = Arcade::with_parts(
        clock_seed(),
        data.progress(),
        data.settings.clone(),
        GameRegistry::with_builtin_games(),
    );

    run_scripted_session(&mut arcade);

    let data = SaveData::new(arcade.progress(), arcade.settings());
    if let Err(e) = persistence::save(save_path, &data) {
        log::error!("Failed to save progress: {}", e);
    }
    log::info!(
        "Session over: score {}, high score {}",
        arcade.progress().score(),
        arcade.progress().high_score()
    );
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn frame(arcade: &mut Arcade, input: &FrameInput) {
    arcade.update(input, SIM_DT);
    let frame = arcade.render();
    log::trace!("{} draw commands", frame.len());
}

/// Play one round of Firewall Defender, then quit from the main menu
fn run_scripted_session(arcade: &mut Arcade) {
    let game = GameId::FirewallDefender;
    frame(arcade, &FrameInput::key(Key::Digit(game.menu_slot())));

    if arcade.scene() == Scene::Playing(game) {
        let mut plan = TOWER_PLAN.iter();
        let mut ticks = 0;
        while ticks < MAX_TICKS && arcade.scene() == Scene::Playing(game) {
            let input = if ticks % PLACE_EVERY == 0 {
                plan.next()
                    .map(|&(x, y)| FrameInput::click_at(cell_center(x, y)))
                    .unwrap_or_default()
            } else {
                FrameInput::new()
            };
            frame(arcade, &input);
            ticks += 1;
        }
        log::info!("Scripted run stopped after {} ticks", ticks);
    } else {
        log::warn!("{} could not be started", game.title());
    }

    match arcade.scene() {
        Scene::GameOver => frame(arcade, &FrameInput::key(Key::Enter)),
        Scene::Playing(_) => {
            frame(arcade, &FrameInput::key(Key::Escape));
            frame(arcade, &FrameInput::key(Key::letter('q')));
        }
        _ => {}
    }

    frame(arcade, &FrameInput::key(Key::Escape));
    if arcade.is_running() {
        log::warn!("Arcade did not stop from {}", arcade.scene());
    }
}
