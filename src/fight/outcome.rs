//! Values the engine hands to renderers and storage

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::fight::fighter::Strike;

/// Tabular view of one fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub archetype: String,
    pub health: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
    pub luck: f64,
    pub special: String,
    pub stunned: bool,
}

/// An attack that went ahead, aimed at the fighter in position `opponent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub opponent: usize,
    #[serde(flatten)]
    pub strike: Strike,
}

/// One fighter's turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub round: u32,
    pub fighter: usize,
    /// None when the turn was lost to a stun
    pub outcome: Option<AttackOutcome>,
}

impl TurnResult {
    pub fn was_skipped(&self) -> bool {
        self.outcome.is_none()
    }
}

/// How the fight ended. Positions refer to the fight's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FightResult {
    Knockout { winner: usize, loser: usize },
    /// Rounds ran out; `winner` has strictly the most health left
    Decision { winner: usize },
    /// Rounds ran out with the top health shared
    Draw,
}

impl FightResult {
    pub fn winner(&self) -> Option<usize> {
        match self {
            FightResult::Knockout { winner, .. } | FightResult::Decision { winner } => {
                Some(*winner)
            }
            FightResult::Draw => None,
        }
    }

    pub fn loser(&self) -> Option<usize> {
        match self {
            FightResult::Knockout { loser, .. } => Some(*loser),
            _ => None,
        }
    }

    pub fn is_knockout(&self) -> bool {
        matches!(self, FightResult::Knockout { .. })
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, FightResult::Draw)
    }
}

/// Complete record of a fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightReport {
    pub card: String,
    pub first_striker: usize,
    pub opening: Vec<FighterSnapshot>,
    pub turns: Vec<TurnResult>,
    pub rounds: u32,
    pub closing: Vec<FighterSnapshot>,
    pub result: FightResult,
}

impl FightReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let name = |position: usize| {
            self.closing
                .get(position)
                .map(|s| s.name.as_str())
                .unwrap_or("?")
        };

        match self.result {
            FightResult::Knockout { winner, loser } => format!(
                "{}: {} knocked out {} in round {}",
                self.card,
                name(winner),
                name(loser),
                self.rounds
            ),
            FightResult::Decision { winner } => format!(
                "{}: {} wins on health after {} rounds",
                self.card,
                name(winner),
                self.rounds
            ),
            FightResult::Draw => format!("{}: draw after {} rounds", self.card, self.rounds),
        }
    }
}
