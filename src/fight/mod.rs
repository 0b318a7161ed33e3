pub mod archetype;
pub mod constants;
pub mod engine;
pub mod fighter;
pub mod outcome;
pub mod roster;
pub mod skills;

pub use archetype::{Archetype, ArchetypeCatalog, LuckRange, Stat, StatRange, StatValue};
pub use engine::{Fight, FightPhase, Turns};
pub use fighter::{Fighter, FighterStats, Strike};
pub use outcome::{AttackOutcome, FightReport, FightResult, FighterSnapshot, TurnResult};
pub use roster::Roster;
pub use skills::SpecialSkill;
