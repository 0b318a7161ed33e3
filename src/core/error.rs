use thiserror::Error;

use crate::fight::FightPhase;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Fighter {0} is invalid")]
    InvalidFighterName(String),

    #[error("Roster is full ({capacity} fighters)")]
    RosterFull { capacity: usize },

    #[error("Roster is incomplete: {have} of {need} fighters selected")]
    RosterIncomplete { have: usize, need: usize },

    #[error("No fighter at position {0}")]
    UnknownPosition(usize),

    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("{stat} value {value} is outside the archetype range {min}..={max}")]
    StatOutOfRange {
        stat: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Fight is in the {actual:?} phase, expected {expected:?}")]
    WrongPhase {
        expected: FightPhase,
        actual: FightPhase,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid archetype catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuelError>;
