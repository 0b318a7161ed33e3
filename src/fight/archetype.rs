//! Fighter archetypes and their stat generation ranges
//!
//! The standard catalog is built once per process and shared by
//! reference. Custom catalogs can be loaded from TOML:
//!
//! ```toml
//! [[archetype]]
//! name = "Swordsman"
//! health = [40, 60]
//! strength = [60, 70]
//! defense = [20, 30]
//! speed = [90, 100]
//! luck = [0.3, 0.5]
//! attacks = ["slashed", "stabbed", "punched"]
//! special = "Lucky Strike"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::error::{DuelError, Result};
use crate::core::rng::Randomness;
use crate::fight::constants::DEFAULT_ATTACK_VERB;
use crate::fight::skills::SpecialSkill;

/// Inclusive range for a whole-number stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Draw over the range scaled by 100, then round back to a whole number
    pub fn roll(&self, rng: &mut dyn Randomness) -> i32 {
        let scaled = rng.range_inclusive(self.min as i64 * 100, self.max as i64 * 100);
        (scaled as f64 / 100.0).round() as i32
    }
}

impl From<(i32, i32)> for StatRange {
    fn from((min, max): (i32, i32)) -> Self {
        Self { min, max }
    }
}

impl From<StatRange> for (i32, i32) {
    fn from(range: StatRange) -> Self {
        (range.min, range.max)
    }
}

/// Inclusive range for luck, a fraction with two-decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LuckRange {
    pub min: f64,
    pub max: f64,
}

impl LuckRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw a value in hundredths so the result keeps two decimals
    pub fn roll(&self, rng: &mut dyn Randomness) -> f64 {
        let low = (self.min * 100.0).round() as i64;
        let high = (self.max * 100.0).round() as i64;
        rng.range_inclusive(low, high) as f64 / 100.0
    }
}

impl fmt::Display for StatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl fmt::Display for LuckRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}-{:.2}", self.min, self.max)
    }
}

impl From<(f64, f64)> for LuckRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<LuckRange> for (f64, f64) {
    fn from(range: LuckRange) -> Self {
        (range.min, range.max)
    }
}

/// Stat generated from an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    Strength,
    Defense,
    Speed,
    Luck,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::Health,
        Stat::Strength,
        Stat::Defense,
        Stat::Speed,
        Stat::Luck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::Strength => "strength",
            Stat::Defense => "defense",
            Stat::Speed => "speed",
            Stat::Luck => "luck",
        }
    }
}

/// A generated stat value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Whole(i32),
    Fraction(f64),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Whole(value) => write!(f, "{}", value),
            StatValue::Fraction(value) => write!(f, "{:.2}", value),
        }
    }
}

/// A fighter class: stat ranges, flavor verbs and one special skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub health: StatRange,
    pub strength: StatRange,
    pub defense: StatRange,
    pub speed: StatRange,
    pub luck: LuckRange,
    /// Flavor verbs, chosen uniformly per attack
    #[serde(default)]
    pub attacks: Vec<String>,
    pub special: SpecialSkill,
}

impl Archetype {
    /// Range for a whole-number stat (None for luck)
    pub fn range(&self, stat: Stat) -> Option<StatRange> {
        match stat {
            Stat::Health => Some(self.health),
            Stat::Strength => Some(self.strength),
            Stat::Defense => Some(self.defense),
            Stat::Speed => Some(self.speed),
            Stat::Luck => None,
        }
    }

    pub fn generate_stat(&self, stat: Stat, rng: &mut dyn Randomness) -> StatValue {
        match self.range(stat) {
            Some(range) => StatValue::Whole(range.roll(rng)),
            None => StatValue::Fraction(self.luck.roll(rng)),
        }
    }

    /// Uniformly chosen flavor verb
    pub fn flavor_attack(&self, rng: &mut dyn Randomness) -> &str {
        if self.attacks.is_empty() {
            return DEFAULT_ATTACK_VERB;
        }
        &self.attacks[rng.index(self.attacks.len())]
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DuelError::InvalidCatalog("archetype with empty name".into()));
        }

        for stat in Stat::ALL {
            if let Some(range) = self.range(stat) {
                if range.min > range.max {
                    return Err(DuelError::InvalidCatalog(format!(
                        "{}: {} range {}..={} is inverted",
                        self.name,
                        stat.name(),
                        range.min,
                        range.max
                    )));
                }
            }
        }

        if self.health.min <= 0 {
            return Err(DuelError::InvalidCatalog(format!(
                "{}: health must start above zero",
                self.name
            )));
        }

        if !(0.0..=1.0).contains(&self.luck.min)
            || !(0.0..=1.0).contains(&self.luck.max)
            || self.luck.min > self.luck.max
        {
            return Err(DuelError::InvalidCatalog(format!(
                "{}: luck range {}..={} must lie within 0..=1",
                self.name, self.luck.min, self.luck.max
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "archetype", default)]
    archetypes: Vec<Archetype>,
}

/// Read-only table of archetypes in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Archetype>,
}

static STANDARD: OnceLock<ArchetypeCatalog> = OnceLock::new();

impl ArchetypeCatalog {
    /// Build a catalog, rejecting empty tables, duplicates and bad ranges
    pub fn new(archetypes: Vec<Archetype>) -> Result<Self> {
        if archetypes.is_empty() {
            return Err(DuelError::InvalidCatalog("no archetypes defined".into()));
        }

        let mut seen = HashSet::new();
        for archetype in &archetypes {
            archetype.validate()?;
            if !seen.insert(archetype.name.as_str()) {
                return Err(DuelError::InvalidCatalog(format!(
                    "duplicate archetype {}",
                    archetype.name
                )));
            }
        }

        Ok(Self { archetypes })
    }

    /// The built-in Swordsman / Brute / Grappler table
    pub fn standard() -> &'static ArchetypeCatalog {
        STANDARD.get_or_init(|| ArchetypeCatalog {
            archetypes: standard_archetypes(),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.archetypes)
    }

    /// Load a catalog from a TOML file of `[[archetype]]` tables
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn names(&self) -> Vec<&str> {
        self.archetypes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.name == name)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn random_archetype(&self, rng: &mut dyn Randomness) -> &Archetype {
        &self.archetypes[rng.index(self.archetypes.len())]
    }

    pub fn generate_stat(
        &self,
        archetype: &str,
        stat: Stat,
        rng: &mut dyn Randomness,
    ) -> Result<StatValue> {
        let archetype = self
            .get(archetype)
            .ok_or_else(|| DuelError::UnknownArchetype(archetype.to_string()))?;
        Ok(archetype.generate_stat(stat, rng))
    }

    /// Flavor verb for the named archetype, "hit" if it is unknown
    pub fn flavor_attack(&self, archetype: &str, rng: &mut dyn Randomness) -> &str {
        match self.get(archetype) {
            Some(archetype) => archetype.flavor_attack(rng),
            None => DEFAULT_ATTACK_VERB,
        }
    }

    /// Skill identifier for the named archetype, empty if it is unknown
    pub fn special_skill_name(&self, archetype: &str) -> &'static str {
        self.get(archetype).map(|a| a.special.name()).unwrap_or("")
    }
}

fn verbs(list: &[&str]) -> Vec<String> {
    list.iter().map(|v| v.to_string()).collect()
}

fn standard_archetypes() -> Vec<Archetype> {
    vec![
        Archetype {
            name: "Swordsman".into(),
            health: StatRange::new(40, 60),
            strength: StatRange::new(60, 70),
            defense: StatRange::new(20, 30),
            speed: StatRange::new(90, 100),
            luck: LuckRange::new(0.3, 0.5),
            attacks: verbs(&["slashed", "stabbed", "punched"]),
            special: SpecialSkill::LuckyStrike,
        },
        Archetype {
            name: "Brute".into(),
            health: StatRange::new(90, 100),
            strength: StatRange::new(65, 75),
            defense: StatRange::new(40, 50),
            speed: StatRange::new(40, 65),
            luck: LuckRange::new(0.3, 0.35),
            attacks: verbs(&["threw", "squeezed", "pounded"]),
            special: SpecialSkill::StunningBlow,
        },
        Archetype {
            name: "Grappler".into(),
            health: StatRange::new(60, 100),
            strength: StatRange::new(75, 80),
            defense: StatRange::new(35, 40),
            speed: StatRange::new(60, 80),
            luck: LuckRange::new(0.3, 0.4),
            attacks: verbs(&["punched", "kicked", "headbutted"]),
            special: SpecialSkill::CounterAttack,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;
    use crate::testing::ScriptedRolls;

    #[test]
    fn test_standard_catalog_order() {
        let catalog = ArchetypeCatalog::standard();
        assert_eq!(catalog.names(), vec!["Swordsman", "Brute", "Grappler"]);
        assert!(catalog.is_valid("Brute"));
        assert!(!catalog.is_valid("brute"));
    }

    #[test]
    fn test_whole_stat_rounds_scaled_draw() {
        let range = StatRange::new(40, 60);
        // 4049 / 100 = 40.49 -> 40, 4050 -> 40.5 -> 41
        let mut rng = ScriptedRolls::new([4049, 4050, 6000]);
        assert_eq!(range.roll(&mut rng), 40);
        assert_eq!(range.roll(&mut rng), 41);
        assert_eq!(range.roll(&mut rng), 60);
    }

    #[test]
    fn test_luck_keeps_two_decimals() {
        let range = LuckRange::new(0.3, 0.35);
        let mut rng = ScriptedRolls::new([33]);
        assert_eq!(range.roll(&mut rng), 0.33);
    }

    #[test]
    fn test_generated_stats_stay_in_range() {
        let catalog = ArchetypeCatalog::standard();
        let mut rng = SeededRng::new(2024);
        for archetype in catalog.iter() {
            for stat in Stat::ALL {
                for _ in 0..10_000 {
                    let value = catalog.generate_stat(&archetype.name, stat, &mut rng).unwrap();
                    match (stat, value) {
                        (Stat::Luck, StatValue::Fraction(luck)) => {
                            assert!(
                                archetype.luck.contains(luck),
                                "{} luck {}",
                                archetype.name,
                                luck
                            );
                        }
                        (_, StatValue::Whole(whole)) => {
                            let range = archetype.range(stat).unwrap();
                            assert!(
                                range.contains(whole),
                                "{} {} {}",
                                archetype.name,
                                stat.name(),
                                whole
                            );
                        }
                        other => panic!("unexpected stat value {:?}", other),
                    }
                }
            }
        }
    }

    #[test]
    fn test_generate_stat_unknown_archetype() {
        let mut rng = SeededRng::new(1);
        let result = ArchetypeCatalog::standard().generate_stat("Ninja", Stat::Speed, &mut rng);
        assert!(matches!(result, Err(DuelError::UnknownArchetype(name)) if name == "Ninja"));
    }

    #[test]
    fn test_flavor_attack_defaults_to_hit() {
        let catalog = ArchetypeCatalog::standard();
        let mut rng = ScriptedRolls::new([2]);
        assert_eq!(catalog.flavor_attack("Ninja", &mut rng), "hit");
        assert_eq!(catalog.flavor_attack("Brute", &mut rng), "pounded");
    }

    #[test]
    fn test_special_skill_name() {
        let catalog = ArchetypeCatalog::standard();
        assert_eq!(catalog.special_skill_name("Grappler"), "Counter Attack");
        assert_eq!(catalog.special_skill_name(""), "");
    }

    #[test]
    fn test_random_archetype_is_uniform_index() {
        let catalog = ArchetypeCatalog::standard();
        let mut rng = ScriptedRolls::new([0, 1, 2]);
        assert_eq!(catalog.random_archetype(&mut rng).name, "Swordsman");
        assert_eq!(catalog.random_archetype(&mut rng).name, "Brute");
        assert_eq!(catalog.random_archetype(&mut rng).name, "Grappler");
    }

    #[test]
    fn test_toml_catalog() {
        let catalog = ArchetypeCatalog::from_toml_str(
            r#"
            [[archetype]]
            name = "Ninja"
            health = [30, 40]
            strength = [50, 55]
            defense = [10, 15]
            speed = [95, 100]
            luck = [0.5, 0.6]
            special = "Lucky Strike"
            "#,
        )
        .unwrap();

        let ninja = catalog.get("Ninja").unwrap();
        assert_eq!(ninja.health, StatRange::new(30, 40));
        assert_eq!(ninja.luck, LuckRange::new(0.5, 0.6));
        assert!(ninja.attacks.is_empty());
        assert_eq!(ninja.special, SpecialSkill::LuckyStrike);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut archetypes = standard_archetypes();
        archetypes[0].speed = StatRange::new(100, 90);
        assert!(matches!(
            ArchetypeCatalog::new(archetypes),
            Err(DuelError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let mut archetypes = standard_archetypes();
        archetypes.push(archetypes[1].clone());
        assert!(ArchetypeCatalog::new(archetypes).is_err());
        assert!(ArchetypeCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_luck_above_one() {
        let mut archetypes = standard_archetypes();
        archetypes[2].luck = LuckRange::new(0.5, 1.5);
        assert!(ArchetypeCatalog::new(archetypes).is_err());
    }
}
