//! A single combatant
//!
//! Strength, defense, speed and luck are fixed at creation. Health only
//! goes down (never below zero) unless it is explicitly set.

use serde::{Deserialize, Serialize};

use crate::core::error::{DuelError, Result};
use crate::core::rng::Randomness;
use crate::fight::archetype::{Archetype, ArchetypeCatalog, Stat};
use crate::fight::outcome::FighterSnapshot;
use crate::fight::roster::Roster;
use crate::fight::skills::{resolve_special, SpecialSkill};

/// Stats a fighter is created with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub health: i32,
    pub strength: i32,
    pub defense: i32,
    pub speed: i32,
    /// Chance to defend, 0.0 to 1.0 in hundredths
    pub luck: f64,
}

impl FighterStats {
    pub fn new(health: i32, strength: i32, defense: i32, speed: i32, luck: f64) -> Self {
        Self {
            health,
            strength,
            defense,
            speed,
            luck,
        }
    }

    /// Draw every stat from the archetype ranges
    pub fn generate(archetype: &Archetype, rng: &mut dyn Randomness) -> Self {
        Self {
            health: archetype.health.roll(rng),
            strength: archetype.strength.roll(rng),
            defense: archetype.defense.roll(rng),
            speed: archetype.speed.roll(rng),
            luck: archetype.luck.roll(rng),
        }
    }

    fn whole(&self, stat: Stat) -> Option<i32> {
        match stat {
            Stat::Health => Some(self.health),
            Stat::Strength => Some(self.strength),
            Stat::Defense => Some(self.defense),
            Stat::Speed => Some(self.speed),
            Stat::Luck => None,
        }
    }
}

/// What a single attack did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    /// Flavor verb ("slashed", "pounded", ...)
    pub verb: String,
    /// Whether the opponent's defense roll succeeded
    pub defended: bool,
    /// Basic damage dealt; Lucky Strike bonus damage is not included
    pub damage: i32,
    /// Skill that fired, if any
    pub special: Option<SpecialSkill>,
}

#[derive(Debug, Clone)]
pub struct Fighter<'c> {
    name: String,
    archetype: &'c Archetype,
    health: i32,
    strength: i32,
    defense: i32,
    speed: i32,
    luck: f64,
    stunned: bool,
}

impl<'c> Fighter<'c> {
    /// Create a fighter of the given archetype with freshly rolled stats
    pub fn create(
        name: &str,
        roster: &Roster,
        archetype: &'c Archetype,
        rng: &mut dyn Randomness,
    ) -> Result<Self> {
        check_name(name, roster)?;
        Ok(Self::roll(name, archetype, rng))
    }

    /// Create a fighter whose archetype is drawn uniformly from the catalog
    pub fn create_random(
        name: &str,
        roster: &Roster,
        catalog: &'c ArchetypeCatalog,
        rng: &mut dyn Randomness,
    ) -> Result<Self> {
        check_name(name, roster)?;
        let archetype = catalog.random_archetype(rng);
        Ok(Self::roll(name, archetype, rng))
    }

    /// Create a fighter from known stats, which must lie within the archetype ranges
    pub fn with_stats(
        name: &str,
        roster: &Roster,
        archetype: &'c Archetype,
        stats: FighterStats,
    ) -> Result<Self> {
        check_name(name, roster)?;

        for stat in Stat::ALL {
            if let (Some(range), Some(value)) = (archetype.range(stat), stats.whole(stat)) {
                if !range.contains(value) {
                    return Err(DuelError::StatOutOfRange {
                        stat: stat.name(),
                        value: value as f64,
                        min: range.min as f64,
                        max: range.max as f64,
                    });
                }
            }
        }

        if !archetype.luck.contains(stats.luck) {
            return Err(DuelError::StatOutOfRange {
                stat: Stat::Luck.name(),
                value: stats.luck,
                min: archetype.luck.min,
                max: archetype.luck.max,
            });
        }

        Ok(Self::assemble(name, archetype, stats))
    }

    fn roll(name: &str, archetype: &'c Archetype, rng: &mut dyn Randomness) -> Self {
        let stats = FighterStats::generate(archetype, rng);
        Self::assemble(name, archetype, stats)
    }

    fn assemble(name: &str, archetype: &'c Archetype, stats: FighterStats) -> Self {
        Self {
            name: name.to_string(),
            archetype,
            health: stats.health,
            strength: stats.strength,
            defense: stats.defense,
            speed: stats.speed,
            luck: stats.luck,
            stunned: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> &'c Archetype {
        self.archetype
    }

    pub fn special(&self) -> SpecialSkill {
        self.archetype.special
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn luck(&self) -> f64 {
        self.luck
    }

    pub fn stats(&self) -> FighterStats {
        FighterStats::new(self.health, self.strength, self.defense, self.speed, self.luck)
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn set_stunned(&mut self, stunned: bool) {
        self.stunned = stunned;
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health.max(0);
    }

    /// Apply damage; health never drops below zero and negative amounts are ignored
    pub fn incur_damage(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount.max(0)).max(0);
    }

    pub fn is_knocked_out(&self) -> bool {
        self.health <= 0
    }

    /// Defense chance in whole percent
    pub fn defense_chance(&self) -> u32 {
        (self.luck * 100.0).round() as u32
    }

    /// Percentile roll against luck; true means the incoming attack is blocked
    pub fn roll_defense(&self, rng: &mut dyn Randomness) -> bool {
        rng.percentile() <= self.defense_chance()
    }

    /// Strength minus the opponent's defense, never negative
    pub fn basic_attack_damage(&self, opponent: &Fighter<'_>) -> i32 {
        (self.strength - opponent.defense).max(0)
    }

    /// Resolve one attack against `opponent`
    ///
    /// Returns `None` when the turn is lost to a stun; the stun is cleared
    /// so the next attack goes ahead.
    pub fn attack(
        &mut self,
        opponent: &mut Fighter<'_>,
        rng: &mut dyn Randomness,
    ) -> Option<Strike> {
        if self.stunned {
            self.stunned = false;
            tracing::debug!(fighter = %self.name, "turn skipped, stun cleared");
            return None;
        }

        let defended = opponent.roll_defense(rng);
        let damage = if defended {
            0
        } else {
            let damage = self.basic_attack_damage(opponent);
            opponent.incur_damage(damage);
            damage
        };

        let special = resolve_special(self, opponent, defended, rng);
        let verb = self.archetype.flavor_attack(rng).to_string();

        Some(Strike {
            verb,
            defended,
            damage,
            special,
        })
    }

    pub fn snapshot(&self) -> FighterSnapshot {
        FighterSnapshot {
            name: self.name.clone(),
            archetype: self.archetype.name.clone(),
            health: self.health,
            strength: self.strength,
            defense: self.defense,
            speed: self.speed,
            luck: self.luck,
            special: self.archetype.special.name().to_string(),
            stunned: self.stunned,
        }
    }
}

fn check_name(name: &str, roster: &Roster) -> Result<()> {
    if roster.is_valid(name) {
        Ok(())
    } else {
        Err(DuelError::InvalidFighterName(name.to_string()))
    }
}
