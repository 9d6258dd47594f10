//! Score, unlock and achievement tracking
//!
//! Lives for the whole process. Mini-games report point deltas and unlock
//! events here; the save routine reads and restores it as a flat mapping of
//! named scalar fields.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::games::GameId;

/// Achievements the arcade can award
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstBlood,
    FirewallMaster,
    CodeCracker,
    SocialEngineer,
    SpeedDemon,
    PerfectGame,
}

impl Achievement {
    pub const ALL: [Achievement; 6] = [
        Achievement::FirstBlood,
        Achievement::FirewallMaster,
        Achievement::CodeCracker,
        Achievement::SocialEngineer,
        Achievement::SpeedDemon,
        Achievement::PerfectGame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::FirstBlood => "first_blood",
            Achievement::FirewallMaster => "firewall_master",
            Achievement::CodeCracker => "code_cracker",
            Achievement::SocialEngineer => "social_engineer",
            Achievement::SpeedDemon => "speed_demon",
            Achievement::PerfectGame => "perfect_game",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s.trim())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstBlood => "First Blood",
            Achievement::FirewallMaster => "Firewall Master",
            Achievement::CodeCracker => "Code Cracker",
            Achievement::SocialEngineer => "Social Engineer",
            Achievement::SpeedDemon => "Speed Demon",
            Achievement::PerfectGame => "Perfect Game",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstBlood => "Catch your first packet",
            Achievement::FirewallMaster => "Complete Firewall Defender without leaks",
            Achievement::CodeCracker => "Solve 10 cryptography puzzles",
            Achievement::SocialEngineer => "Detect 20 phishing attempts",
            Achievement::SpeedDemon => "Win CTF Racer in under 2 minutes",
            Achievement::PerfectGame => "Get maximum score in all mini-games",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Achievement::FirstBlood => 10,
            Achievement::FirewallMaster => 50,
            Achievement::CodeCracker => 30,
            Achievement::SocialEngineer => 40,
            Achievement::SpeedDemon => 25,
            Achievement::PerfectGame => 100,
        }
    }
}

/// Flat key-value snapshot handed to the external save routine
pub type ProgressSnapshot = BTreeMap<String, String>;

/// Snapshot field names
pub mod fields {
    pub const SCORE: &str = "score";
    pub const HIGH_SCORE: &str = "high_score";
    pub const UNLOCKED_GAMES: &str = "unlocked_games";
    pub const ACHIEVEMENTS: &str = "achievements";
}

/// Running score, high-water mark, unlocked games and achievements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressTracker {
    score: u64,
    high_score: u64,
    unlocked_games: BTreeSet<GameId>,
    achievements: BTreeSet<Achievement>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// Fresh tracker: zero score, every catalog game unlocked
    pub fn new() -> Self {
        Self {
            score: 0,
            high_score: 0,
            unlocked_games: GameId::ALL.into_iter().collect(),
            achievements: BTreeSet::new(),
        }
    }

    /// Tracker with nothing unlocked
    pub fn locked() -> Self {
        Self {
            unlocked_games: BTreeSet::new(),
            ..Self::new()
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn unlocked_games(&self) -> &BTreeSet<GameId> {
        &self.unlocked_games
    }

    pub fn achievements(&self) -> &BTreeSet<Achievement> {
        &self.achievements
    }

    pub fn is_unlocked(&self, id: GameId) -> bool {
        self.unlocked_games.contains(&id)
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Add points to the running total and raise the high score if passed
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    /// Award an achievement. Returns false if it was already awarded.
    pub fn unlock_achievement(&mut self, achievement: Achievement) -> bool {
        if !self.achievements.insert(achievement) {
            return false;
        }
        log::info!(
            "Achievement Unlocked: {} - {}",
            achievement.name(),
            achievement.description()
        );
        true
    }

    /// Unlock a game. Returns false if it was already unlocked.
    pub fn unlock_game(&mut self, id: GameId) -> bool {
        if !self.unlocked_games.insert(id) {
            return false;
        }
        log::info!("Game Unlocked: {}", id.title());
        true
    }

    /// Flatten into named scalar fields
    pub fn snapshot(&self) -> ProgressSnapshot {
        let join = |items: Vec<&str>| items.join(",");

        let mut snapshot = ProgressSnapshot::new();
        snapshot.insert(fields::SCORE.to_string(), self.score.to_string());
        snapshot.insert(fields::HIGH_SCORE.to_string(), self.high_score.to_string());
        snapshot.insert(
            fields::UNLOCKED_GAMES.to_string(),
            join(self.unlocked_games.iter().map(|g| g.as_str()).collect()),
        );
        snapshot.insert(
            fields::ACHIEVEMENTS.to_string(),
            join(self.achievements.iter().map(|a| a.as_str()).collect()),
        );
        snapshot
    }

    /// Rebuild from a snapshot. Missing or malformed fields fall back to
    /// zero / empty, except a missing unlock list which unlocks the whole
    /// catalog; unknown ids are skipped.
    pub fn restore(snapshot: &ProgressSnapshot) -> Self {
        let number = |key: &str| -> u64 {
            match snapshot.get(key).map(|v| v.trim().parse::<u64>()) {
                Some(Ok(n)) => n,
                Some(Err(e)) => {
                    log::warn!("Ignoring malformed {} in save: {}", key, e);
                    0
                }
                None => 0,
            }
        };
        let list = |key: &str| -> Vec<String> {
            snapshot
                .get(key)
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let score = number(fields::SCORE);
        // An absent unlock list means the starter set; an empty one stays empty
        let unlocked_games = if snapshot.contains_key(fields::UNLOCKED_GAMES) {
            list(fields::UNLOCKED_GAMES)
                .iter()
                .filter_map(|s| {
                    let id = GameId::from_str(s);
                    if id.is_none() {
                        log::warn!("Ignoring unknown game id in save: {}", s);
                    }
                    id
                })
                .collect()
        } else {
            GameId::ALL.into_iter().collect()
        };
        let achievements = list(fields::ACHIEVEMENTS)
            .iter()
            .filter_map(|s| {
                let achievement = Achievement::from_str(s);
                if achievement.is_none() {
                    log::warn!("Ignoring unknown achievement in save: {}", s);
                }
                achievement
            })
            .collect();

        Self {
            score,
            // High score can never trail the running score
            high_score: number(fields::HIGH_SCORE).max(score),
            unlocked_games,
            achievements,
        }
    }
}
