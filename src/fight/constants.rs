//! Fight constants - all tunable values in one place

// Special skill gating (percentile rolls, 1..=100)
pub const LUCKY_STRIKE_CHANCE: u32 = 5;
pub const STUNNING_BLOW_CHANCE: u32 = 2;

// Flat damage dealt back to an attacker whose blow was defended by a grappler
pub const COUNTER_ATTACK_DAMAGE: i32 = 10;

// Verb used when an archetype has no flavor attacks
pub const DEFAULT_ATTACK_VERB: &str = "hit";

// Joins fighter names on the fight card
pub const CARD_SEPARATOR: &str = " vs. ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_chances_are_percentiles() {
        assert!(LUCKY_STRIKE_CHANCE > 0 && LUCKY_STRIKE_CHANCE <= 100);
        assert!(STUNNING_BLOW_CHANCE > 0 && STUNNING_BLOW_CHANCE < LUCKY_STRIKE_CHANCE);
    }

    #[test]
    fn test_counter_damage_positive() {
        assert!(COUNTER_ATTACK_DAMAGE > 0);
    }
}
