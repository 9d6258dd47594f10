//! Game catalog: every mini-game the arcade knows about

use serde::{Deserialize, Serialize};

/// Identifier of a catalog mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    PacketRunner,
    FirewallDefender,
    CodeBreaker,
    SocialEngineering,
    CtfRacer,
}

impl GameId {
    /// Catalog order (main menu numbering)
    pub const ALL: [GameId; 5] = [
        GameId::PacketRunner,
        GameId::FirewallDefender,
        GameId::CodeBreaker,
        GameId::SocialEngineering,
        GameId::CtfRacer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::PacketRunner => "packet_runner",
            GameId::FirewallDefender => "firewall_defender",
            GameId::CodeBreaker => "code_breaker",
            GameId::SocialEngineering => "social_engineering",
            GameId::CtfRacer => "ctf_racer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s.trim())
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            GameId::PacketRunner => "Packet Runner",
            GameId::FirewallDefender => "Firewall Defender",
            GameId::CodeBreaker => "Code Breaker",
            GameId::SocialEngineering => "Social Engineering Sim",
            GameId::CtfRacer => "CTF Racer",
        }
    }

    /// 1-based menu slot
    pub fn menu_slot(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|id| id == self)
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    /// Game bound to a 1-based menu slot
    pub fn from_menu_slot(slot: u8) -> Option<Self> {
        (slot as usize)
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
