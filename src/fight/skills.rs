//! Special skills
//!
//! Skills are evaluated after the basic attack in a fixed priority order.
//! The first check that matches applies its effect and stops the chain, so
//! at most one skill fires per attack. Percentile rolls are only drawn
//! once a skill's non-random conditions hold.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::rng::Randomness;
use crate::fight::constants::{COUNTER_ATTACK_DAMAGE, LUCKY_STRIKE_CHANCE, STUNNING_BLOW_CHANCE};
use crate::fight::fighter::Fighter;

/// Skill carried by an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialSkill {
    /// Unblocked attacks may land a second blow worth the attacker's strength
    #[serde(rename = "Lucky Strike")]
    LuckyStrike,
    /// Unblocked attacks may stun the opponent for their next turn
    #[serde(rename = "Stunning Blow")]
    StunningBlow,
    /// Defended attacks against this fighter hurt the attacker
    #[serde(rename = "Counter Attack")]
    CounterAttack,
}

impl SpecialSkill {
    pub fn name(&self) -> &'static str {
        match self {
            SpecialSkill::LuckyStrike => "Lucky Strike",
            SpecialSkill::StunningBlow => "Stunning Blow",
            SpecialSkill::CounterAttack => "Counter Attack",
        }
    }
}

impl fmt::Display for SpecialSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type SkillCheck = fn(&mut Fighter<'_>, &mut Fighter<'_>, bool, &mut dyn Randomness) -> bool;

/// Checks in priority order
const SKILL_CHECKS: [(SpecialSkill, SkillCheck); 3] = [
    (SpecialSkill::LuckyStrike, lucky_strike),
    (SpecialSkill::StunningBlow, stunning_blow),
    (SpecialSkill::CounterAttack, counter_attack),
];

/// Run the skill chain for one attack and return the skill that fired
pub fn resolve_special(
    actor: &mut Fighter<'_>,
    opponent: &mut Fighter<'_>,
    defended: bool,
    rng: &mut dyn Randomness,
) -> Option<SpecialSkill> {
    for (skill, check) in SKILL_CHECKS {
        if check(actor, opponent, defended, rng) {
            tracing::debug!(
                skill = %skill,
                actor = actor.name(),
                opponent = opponent.name(),
                "special skill fired"
            );
            return Some(skill);
        }
    }
    None
}

fn lucky_strike(
    actor: &mut Fighter<'_>,
    opponent: &mut Fighter<'_>,
    defended: bool,
    rng: &mut dyn Randomness,
) -> bool {
    if actor.special() != SpecialSkill::LuckyStrike || defended {
        return false;
    }
    if rng.percentile() > LUCKY_STRIKE_CHANCE {
        return false;
    }
    // Bypasses defense entirely
    opponent.incur_damage(actor.strength());
    true
}

fn stunning_blow(
    actor: &mut Fighter<'_>,
    opponent: &mut Fighter<'_>,
    defended: bool,
    rng: &mut dyn Randomness,
) -> bool {
    if actor.special() != SpecialSkill::StunningBlow || defended {
        return false;
    }
    if rng.percentile() > STUNNING_BLOW_CHANCE {
        return false;
    }
    opponent.set_stunned(true);
    true
}

fn counter_attack(
    actor: &mut Fighter<'_>,
    opponent: &mut Fighter<'_>,
    defended: bool,
    _rng: &mut dyn Randomness,
) -> bool {
    if opponent.special() != SpecialSkill::CounterAttack || !defended {
        return false;
    }
    actor.incur_damage(COUNTER_ATTACK_DAMAGE);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight::{ArchetypeCatalog, FighterStats, Roster};
    use crate::testing::ScriptedRolls;

    fn fighter(name: &str, archetype: &str, stats: FighterStats) -> Fighter<'static> {
        let archetype = ArchetypeCatalog::standard().get(archetype).unwrap();
        Fighter::with_stats(name, Roster::standard(), archetype, stats).unwrap()
    }

    fn swordsman() -> Fighter<'static> {
        fighter("Batman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4))
    }

    fn brute() -> Fighter<'static> {
        fighter("Bane", "Brute", FighterStats::new(95, 70, 45, 50, 0.3))
    }

    fn grappler() -> Fighter<'static> {
        fighter("Superman", "Grappler", FighterStats::new(80, 78, 38, 70, 0.35))
    }

    #[test]
    fn test_skill_names_match_catalog_identifiers() {
        assert_eq!(SpecialSkill::LuckyStrike.to_string(), "Lucky Strike");
        assert_eq!(SpecialSkill::StunningBlow.to_string(), "Stunning Blow");
        assert_eq!(SpecialSkill::CounterAttack.to_string(), "Counter Attack");
    }

    #[test]
    fn test_lucky_strike_deals_strength_damage() {
        let mut actor = swordsman();
        let mut opponent = brute();
        let mut rng = ScriptedRolls::new([LUCKY_STRIKE_CHANCE as i64]);

        let fired = resolve_special(&mut actor, &mut opponent, false, &mut rng);

        assert_eq!(fired, Some(SpecialSkill::LuckyStrike));
        assert_eq!(opponent.health(), 95 - 70);
    }

    #[test]
    fn test_lucky_strike_misses_above_chance() {
        let mut actor = swordsman();
        let mut opponent = brute();
        let mut rng = ScriptedRolls::new([LUCKY_STRIKE_CHANCE as i64 + 1]);

        assert_eq!(resolve_special(&mut actor, &mut opponent, false, &mut rng), None);
        assert_eq!(opponent.health(), 95);
    }

    #[test]
    fn test_no_roll_drawn_when_defended() {
        let mut actor = swordsman();
        let mut opponent = brute();
        let mut rng = ScriptedRolls::new([1]);

        assert_eq!(resolve_special(&mut actor, &mut opponent, true, &mut rng), None);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_stunning_blow_stuns_opponent() {
        let mut actor = brute();
        let mut opponent = swordsman();
        let mut rng = ScriptedRolls::new([STUNNING_BLOW_CHANCE as i64]);

        let fired = resolve_special(&mut actor, &mut opponent, false, &mut rng);

        assert_eq!(fired, Some(SpecialSkill::StunningBlow));
        assert!(opponent.is_stunned());
        assert_eq!(opponent.health(), 50);
    }

    #[test]
    fn test_counter_attack_hurts_attacker() {
        let mut actor = swordsman();
        let mut opponent = grappler();
        let mut rng = ScriptedRolls::default();

        let fired = resolve_special(&mut actor, &mut opponent, true, &mut rng);

        assert_eq!(fired, Some(SpecialSkill::CounterAttack));
        assert_eq!(actor.health(), 50 - COUNTER_ATTACK_DAMAGE);
        assert_eq!(opponent.health(), 80);
    }

    #[test]
    fn test_counter_attack_needs_defense() {
        let mut actor = brute();
        let mut opponent = grappler();
        let mut rng = ScriptedRolls::new([100]);

        assert_eq!(resolve_special(&mut actor, &mut opponent, false, &mut rng), None);
        assert_eq!(actor.health(), 95);
    }

    #[test]
    fn test_grappler_attacker_has_no_active_skill() {
        let mut actor = grappler();
        let mut opponent = brute();
        let mut rng = ScriptedRolls::new([1]);

        assert_eq!(resolve_special(&mut actor, &mut opponent, false, &mut rng), None);
        assert_eq!(rng.remaining(), 1);
    }
}
