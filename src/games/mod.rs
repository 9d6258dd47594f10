//! Mini-game contract and factory registry
//!
//! The scene state machine only ever sees `Box<dyn MiniGame>`. Concrete games
//! are created through [`GameRegistry`], looked up by [`GameId`] once when a
//! game starts.

pub mod catalog;
pub mod firewall_defender;

use std::collections::HashMap;

pub use catalog::GameId;
pub use firewall_defender::FirewallDefender;

use crate::platform::FrameInput;
use crate::progress::ProgressTracker;
use crate::renderer::Frame;

/// Per-tick data handed to the active mini-game
pub struct GameContext<'a> {
    pub input: &'a FrameInput,
    pub dt: f32,
    /// Score deltas and unlocks are reported here
    pub progress: &'a mut ProgressTracker,
}

/// How a mini-game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameExit {
    /// Played to a loss
    Lost,
    /// Cleared every objective
    Won,
    /// Player bailed out through `end_game`
    Quit,
}

/// Result reported once a mini-game is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub game: GameId,
    pub exit: GameExit,
    pub score: u64,
}

/// Lifecycle every mini-game implements
pub trait MiniGame {
    fn id(&self) -> GameId;

    /// Advance one tick of game logic
    fn update(&mut self, ctx: &mut GameContext<'_>);

    /// Draw the current state
    fn render(&self, frame: &mut Frame);

    /// Terminate early; afterwards the game must report itself finished
    fn end_game(&mut self);

    /// `Some` once the game is over, polled after every `update`
    fn outcome(&self) -> Option<GameOutcome>;

    fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Builds a fresh game instance from a seed
pub type GameFactory = Box<dyn Fn(u64) -> Box<dyn MiniGame>>;

/// Factories keyed by game id
#[derive(Default)]
pub struct GameRegistry {
    factories: HashMap<GameId, GameFactory>,
}

impl GameRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every implemented game
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        registry.register(
            GameId::FirewallDefender,
            Box::new(|seed| -> Box<dyn MiniGame> { Box::new(FirewallDefender::new(seed)) }),
        );
        registry
    }

    pub fn register(&mut self, id: GameId, factory: GameFactory) {
        if self.factories.insert(id, factory).is_some() {
            log::warn!("Game {} was already registered and has been replaced", id);
        }
    }

    pub fn is_registered(&self, id: GameId) -> bool {
        self.factories.contains_key(&id)
    }

    /// Instantiate a game, `None` if no factory exists for `id`
    pub fn create(&self, id: GameId, seed: u64) -> Option<Box<dyn MiniGame>> {
        self.factories.get(&id).map(|factory| factory(seed))
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("GameRegistry").field("games", &ids).finish()
    }
}
