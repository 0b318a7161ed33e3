//! Fight engine: roster setup, turn order and the round loop
//!
//! ```text
//! Setup --compute_turn_order--> Ordering --first turn--> RoundLoop --KO / last round--> Resolved
//! ```
//!
//! Each fighter attacks the next position in the roster, which makes the
//! engine a duel engine: with more than two fighters the attacks form a
//! ring rather than a free-for-all.

use serde::{Deserialize, Serialize};

use crate::core::config::FightConfig;
use crate::core::error::{DuelError, Result};
use crate::core::rng::Randomness;
use crate::fight::archetype::ArchetypeCatalog;
use crate::fight::constants::CARD_SEPARATOR;
use crate::fight::fighter::Fighter;
use crate::fight::outcome::{AttackOutcome, FightReport, FightResult, FighterSnapshot, TurnResult};
use crate::fight::roster::Roster;

/// Lifecycle of a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FightPhase {
    /// Accepting fighters
    Setup,
    /// Turn order fixed, no turn taken yet
    Ordering,
    /// Rounds in progress
    RoundLoop,
    /// Knockout or rounds exhausted
    Resolved,
}

pub struct Fight<'c, R> {
    config: FightConfig,
    catalog: &'c ArchetypeCatalog,
    roster: &'c Roster,
    fighters: Vec<Fighter<'c>>,
    order: Vec<usize>,
    rng: R,
    phase: FightPhase,
    /// Current round, 0 until the first turn
    round: u32,
    /// Index into `order` of the next fighter to act
    cursor: usize,
}

impl<'c, R: Randomness> Fight<'c, R> {
    pub fn new(
        config: FightConfig,
        catalog: &'c ArchetypeCatalog,
        roster: &'c Roster,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            fighters: Vec::with_capacity(config.max_fighters),
            config,
            catalog,
            roster,
            order: Vec::new(),
            rng,
            phase: FightPhase::Setup,
            round: 0,
            cursor: 0,
        })
    }

    /// Fight over the standard catalog and roster
    pub fn standard(config: FightConfig, rng: R) -> Result<Fight<'static, R>> {
        Fight::new(config, ArchetypeCatalog::standard(), Roster::standard(), rng)
    }

    pub fn config(&self) -> &FightConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'c ArchetypeCatalog {
        self.catalog
    }

    pub fn roster(&self) -> &'c Roster {
        self.roster
    }

    pub fn phase(&self) -> FightPhase {
        self.phase
    }

    /// Current round (rounds fought once resolved)
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn fighters(&self) -> &[Fighter<'c>] {
        &self.fighters
    }

    pub fn fighter(&self, position: usize) -> Option<&Fighter<'c>> {
        self.fighters.get(position)
    }

    pub fn fighter_mut(&mut self, position: usize) -> Option<&mut Fighter<'c>> {
        self.fighters.get_mut(position)
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_full(&self) -> bool {
        self.fighters.len() >= self.config.max_fighters
    }

    /// Add a fighter with a randomly drawn archetype
    pub fn add_fighter(&mut self, name: &str) -> Result<usize> {
        self.check_can_add(name)?;
        let fighter = Fighter::create_random(name, self.roster, self.catalog, &mut self.rng)
            .map_err(|e| {
                tracing::warn!(name, error = %e, "fighter rejected");
                e
            })?;
        Ok(self.push(fighter))
    }

    /// Add a fighter of a specific archetype
    pub fn add_fighter_as(&mut self, name: &str, archetype: &str) -> Result<usize> {
        self.check_can_add(name)?;
        let archetype = self
            .catalog
            .get(archetype)
            .ok_or_else(|| DuelError::UnknownArchetype(archetype.to_string()))?;
        let fighter = Fighter::create(name, self.roster, archetype, &mut self.rng)
            .map_err(|e| {
                tracing::warn!(name, error = %e, "fighter rejected");
                e
            })?;
        Ok(self.push(fighter))
    }

    /// Add an already built fighter
    pub fn push_fighter(&mut self, fighter: Fighter<'c>) -> Result<usize> {
        self.check_can_add(fighter.name())?;
        Ok(self.push(fighter))
    }

    fn check_can_add(&self, name: &str) -> Result<()> {
        if self.phase != FightPhase::Setup {
            return Err(DuelError::WrongPhase {
                expected: FightPhase::Setup,
                actual: self.phase,
            });
        }
        if self.is_full() {
            tracing::warn!(name, capacity = self.config.max_fighters, "roster full");
            return Err(DuelError::RosterFull {
                capacity: self.config.max_fighters,
            });
        }
        Ok(())
    }

    fn push(&mut self, fighter: Fighter<'c>) -> usize {
        tracing::debug!(
            name = fighter.name(),
            archetype = %fighter.archetype().name,
            health = fighter.health(),
            speed = fighter.speed(),
            "fighter added"
        );
        self.fighters.push(fighter);
        self.fighters.len() - 1
    }

    /// Fighter cards, e.g. "Batman vs. Superman"
    pub fn card(&self) -> String {
        self.fighters
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(CARD_SEPARATOR)
    }

    pub fn snapshots(&self) -> Vec<FighterSnapshot> {
        self.fighters.iter().map(Fighter::snapshot).collect()
    }

    /// Position of the fighter who throws the first punch
    ///
    /// Highest speed wins; equal speed goes to the lower defense; a full
    /// tie keeps the earlier roster position.
    pub fn first_striker(&self) -> Option<usize> {
        let mut best: Option<(usize, &Fighter<'c>)> = None;
        for (position, fighter) in self.fighters.iter().enumerate() {
            best = match best {
                None => Some((position, fighter)),
                Some((_, current))
                    if fighter.speed() > current.speed()
                        || (fighter.speed() == current.speed()
                            && fighter.defense() < current.defense()) =>
                {
                    Some((position, fighter))
                }
                keep => keep,
            };
        }
        best.map(|(position, _)| position)
    }

    /// Fix the order fighters act in: roster positions rotated to start at the first striker
    pub fn compute_turn_order(&mut self) -> Result<&[usize]> {
        if self.phase != FightPhase::Setup {
            return Err(DuelError::WrongPhase {
                expected: FightPhase::Setup,
                actual: self.phase,
            });
        }
        if !self.is_full() {
            return Err(DuelError::RosterIncomplete {
                have: self.fighters.len(),
                need: self.config.max_fighters,
            });
        }

        let count = self.fighters.len();
        let first = self.first_striker().unwrap_or(0);
        self.order = (0..count).map(|offset| (first + offset) % count).collect();
        self.phase = FightPhase::Ordering;

        tracing::info!(
            card = %self.card(),
            first = self.fighters[first].name(),
            "turn order set"
        );
        Ok(&self.order)
    }

    pub fn opponent_of(&self, position: usize) -> usize {
        (position + 1) % self.fighters.len().max(1)
    }

    /// Resolve one attack by the fighter at `position` against its opponent
    ///
    /// Does not advance the round loop; `next_turn` does that.
    pub fn fighter_turn(&mut self, position: usize) -> Result<TurnResult> {
        if self.fighters.len() < 2 {
            return Err(DuelError::RosterIncomplete {
                have: self.fighters.len(),
                need: self.config.max_fighters,
            });
        }
        if position >= self.fighters.len() {
            return Err(DuelError::UnknownPosition(position));
        }
        Ok(self.resolve_turn(position))
    }

    fn resolve_turn(&mut self, position: usize) -> TurnResult {
        let opponent = self.opponent_of(position);
        let (fighter, target) = pair_mut(&mut self.fighters, position, opponent);

        let outcome = fighter
            .attack(target, &mut self.rng)
            .map(|strike| AttackOutcome { opponent, strike });

        match &outcome {
            Some(o) => tracing::debug!(
                round = self.round,
                fighter = fighter.name(),
                opponent = target.name(),
                verb = %o.strike.verb,
                defended = o.strike.defended,
                damage = o.strike.damage,
                special = ?o.strike.special,
                opponent_health = target.health(),
                "turn"
            ),
            None => tracing::debug!(
                round = self.round,
                fighter = fighter.name(),
                "turn skipped (stunned)"
            ),
        }

        TurnResult {
            round: self.round,
            fighter: position,
            outcome,
        }
    }

    /// Pull the next turn of the round loop
    ///
    /// Computes the turn order first if that has not happened yet. Returns
    /// `Ok(None)` once the fight is resolved.
    pub fn next_turn(&mut self) -> Result<Option<TurnResult>> {
        self.ensure_ordered()?;
        Ok(self.step())
    }

    /// Iterator over the remaining turns
    pub fn turns(&mut self) -> Result<Turns<'_, 'c, R>> {
        self.ensure_ordered()?;
        Ok(Turns { fight: self })
    }

    /// Drive the round loop to completion
    pub fn run(&mut self) -> Result<FightResult> {
        self.ensure_ordered()?;
        while self.step().is_some() {}
        Ok(self.result())
    }

    /// Drive the round loop to completion and keep a full record
    pub fn run_report(&mut self) -> Result<FightReport> {
        self.ensure_ordered()?;
        let opening = self.snapshots();
        let turns: Vec<TurnResult> = std::iter::from_fn(|| self.step()).collect();

        Ok(FightReport {
            card: self.card(),
            first_striker: self.order.first().copied().unwrap_or(0),
            opening,
            turns,
            rounds: self.round,
            closing: self.snapshots(),
            result: self.result(),
        })
    }

    fn ensure_ordered(&mut self) -> Result<()> {
        if self.phase == FightPhase::Setup {
            self.compute_turn_order()?;
        }
        Ok(())
    }

    fn step(&mut self) -> Option<TurnResult> {
        match self.phase {
            FightPhase::Setup | FightPhase::Resolved => return None,
            FightPhase::Ordering => {
                self.phase = FightPhase::RoundLoop;
                self.round = 1;
                self.cursor = 0;
            }
            FightPhase::RoundLoop => {}
        }

        let position = self.order[self.cursor];
        self.cursor += 1;
        let turn = self.resolve_turn(position);

        if self.fighters.iter().any(Fighter::is_knocked_out) {
            self.resolve();
        } else if self.cursor >= self.order.len() {
            if self.round >= self.config.max_rounds {
                self.resolve();
            } else {
                self.round += 1;
                self.cursor = 0;
            }
        }

        Some(turn)
    }

    fn resolve(&mut self) {
        self.phase = FightPhase::Resolved;
        let result = self.result();
        tracing::info!(round = self.round, result = ?result, "fight resolved");
    }

    /// Outcome based on the current fighter state
    ///
    /// A knocked-out fighter always loses. Without a knockout the most
    /// remaining health wins, and a shared top health is a draw.
    pub fn result(&self) -> FightResult {
        if let Some(loser) = self.fighters.iter().position(Fighter::is_knocked_out) {
            return match self.leader(|f| !f.is_knocked_out()) {
                Some(winner) => FightResult::Knockout { winner, loser },
                None => FightResult::Draw,
            };
        }

        match self.leader(|_| true) {
            Some(winner) => FightResult::Decision { winner },
            None => FightResult::Draw,
        }
    }

    /// Sole fighter with the most health among those passing `filter`
    fn leader(&self, filter: impl Fn(&Fighter<'c>) -> bool) -> Option<usize> {
        let top = self
            .fighters
            .iter()
            .filter(|f| filter(*f))
            .map(Fighter::health)
            .max()?;
        let mut leaders = self
            .fighters
            .iter()
            .enumerate()
            .filter(|(_, f)| filter(*f) && f.health() == top)
            .map(|(position, _)| position);

        match (leaders.next(), leaders.next()) {
            (Some(position), None) => Some(position),
            _ => None,
        }
    }
}

/// Remaining turns of a fight, one per `next`
pub struct Turns<'f, 'c, R> {
    fight: &'f mut Fight<'c, R>,
}

impl<R: Randomness> Iterator for Turns<'_, '_, R> {
    type Item = TurnResult;

    fn next(&mut self) -> Option<TurnResult> {
        self.fight.step()
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b, "a fighter cannot attack itself");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::SeededRng;
    use crate::fight::fighter::FighterStats;
    use crate::testing::ScriptedRolls;

    fn fighter(name: &str, kind: &str, stats: FighterStats) -> Fighter<'static> {
        let archetype = ArchetypeCatalog::standard().get(kind).unwrap();
        Fighter::with_stats(name, Roster::standard(), archetype, stats).unwrap()
    }

    fn duel(a: Fighter<'static>, b: Fighter<'static>) -> Fight<'static, ScriptedRolls> {
        let mut fight = Fight::standard(FightConfig::default(), ScriptedRolls::default()).unwrap();
        fight.push_fighter(a).unwrap();
        fight.push_fighter(b).unwrap();
        fight
    }

    #[test]
    fn test_add_fighter_errors_are_distinct() {
        let mut fight = Fight::standard(FightConfig::default(), SeededRng::new(1)).unwrap();

        assert!(matches!(
            fight.add_fighter("Spider-Man"),
            Err(DuelError::InvalidFighterName(_))
        ));
        assert_eq!(fight.add_fighter("Batman").unwrap(), 0);
        assert_eq!(fight.add_fighter("Batman").unwrap(), 1);
        assert!(matches!(
            fight.add_fighter("Superman"),
            Err(DuelError::RosterFull { capacity: 2 })
        ));
        assert_eq!(fight.fighters().len(), 2);
    }

    #[test]
    fn test_add_fighter_as_unknown_archetype() {
        let mut fight = Fight::standard(FightConfig::default(), SeededRng::new(1)).unwrap();
        assert!(matches!(
            fight.add_fighter_as("Batman", "Ninja"),
            Err(DuelError::UnknownArchetype(_))
        ));
        let position = fight.add_fighter_as("Batman", "Grappler").unwrap();
        assert_eq!(fight.fighter(position).unwrap().archetype().name, "Grappler");
    }

    #[test]
    fn test_card_joins_names() {
        let fight = duel(
            fighter("Batman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4)),
            fighter("Superman", "Brute", FighterStats::new(95, 70, 45, 50, 0.3)),
        );
        assert_eq!(fight.card(), "Batman vs. Superman");
    }

    #[test]
    fn test_order_requires_full_roster() {
        let mut fight = Fight::standard(FightConfig::default(), SeededRng::new(1)).unwrap();
        fight.add_fighter("Batman").unwrap();
        assert!(matches!(
            fight.compute_turn_order(),
            Err(DuelError::RosterIncomplete { have: 1, need: 2 })
        ));
    }

    #[test]
    fn test_faster_fighter_goes_first() {
        let mut fight = duel(
            fighter("Batman", "Brute", FighterStats::new(95, 70, 45, 50, 0.3)),
            fighter("Superman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4)),
        );
        assert_eq!(fight.compute_turn_order().unwrap(), &[1, 0]);
        assert_eq!(fight.phase(), FightPhase::Ordering);
    }

    #[test]
    fn test_speed_tie_goes_to_lower_defense() {
        let mut fight = duel(
            fighter("Batman", "Grappler", FighterStats::new(80, 78, 38, 60, 0.35)),
            fighter("Superman", "Brute", FighterStats::new(95, 70, 40, 60, 0.3)),
        );
        assert_eq!(fight.first_striker(), Some(0));

        let mut fight = duel(
            fighter("Batman", "Brute", FighterStats::new(95, 70, 45, 60, 0.3)),
            fighter("Superman", "Grappler", FighterStats::new(80, 78, 38, 60, 0.35)),
        );
        assert_eq!(fight.compute_turn_order().unwrap(), &[1, 0]);
    }

    #[test]
    fn test_full_tie_keeps_roster_order() {
        let stats = FighterStats::new(50, 70, 20, 95, 0.4);
        let mut fight = duel(
            fighter("Batman", "Swordsman", stats),
            fighter("Superman", "Swordsman", stats),
        );
        assert_eq!(fight.compute_turn_order().unwrap(), &[0, 1]);
    }

    #[test]
    fn test_roster_locked_after_ordering() {
        let mut fight = duel(
            fighter("Batman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4)),
            fighter("Superman", "Brute", FighterStats::new(95, 70, 45, 50, 0.3)),
        );
        fight.compute_turn_order().unwrap();
        assert!(matches!(
            fight.add_fighter("Flash"),
            Err(DuelError::WrongPhase { expected: FightPhase::Setup, actual: FightPhase::Ordering })
        ));
        assert!(fight.compute_turn_order().is_err());
    }

    #[test]
    fn test_fighter_turn_targets_next_position() {
        let mut fight = duel(
            fighter("Batman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4)),
            fighter("Superman", "Swordsman", FighterStats::new(60, 60, 30, 90, 0.3)),
        );
        fight.rng = ScriptedRolls::new([100, 100, 0]);

        let turn = fight.fighter_turn(0).unwrap();
        let outcome = turn.outcome.unwrap();
        assert_eq!(outcome.opponent, 1);
        assert_eq!(outcome.strike.damage, 40);
        assert_eq!(fight.fighter(1).unwrap().health(), 20);

        assert!(matches!(fight.fighter_turn(5), Err(DuelError::UnknownPosition(5))));
    }

    #[test]
    fn test_result_decision_and_draw() {
        let mut fight = duel(
            fighter("Batman", "Swordsman", FighterStats::new(50, 70, 20, 95, 0.4)),
            fighter("Superman", "Swordsman", FighterStats::new(60, 60, 30, 90, 0.3)),
        );
        assert_eq!(fight.result(), FightResult::Decision { winner: 1 });

        fight.fighter_mut(1).unwrap().set_health(50);
        assert_eq!(fight.result(), FightResult::Draw);

        fight.fighter_mut(0).unwrap().set_health(0);
        assert_eq!(fight.result(), FightResult::Knockout { winner: 1, loser: 0 });
    }

    #[test]
    fn test_knockout_loser_is_never_winner() {
        let mut fight = duel(
            fighter("Batman", "Swordsman", FighterStats::new(60, 70, 20, 95, 0.4)),
            fighter("Superman", "Brute", FighterStats::new(90, 70, 45, 50, 0.3)),
        );
        // the knocked-out fighter had more health than its rival before the blow
        fight.fighter_mut(1).unwrap().set_health(0);
        let result = fight.result();
        assert!(result.is_knockout());
        assert_eq!(result.loser(), Some(1));
        assert_eq!(result.winner(), Some(0));
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut items = [1, 2, 3];
        let (a, b) = pair_mut(&mut items, 2, 0);
        assert_eq!((*a, *b), (3, 1));
        let (a, b) = pair_mut(&mut items, 0, 1);
        assert_eq!((*a, *b), (1, 2));
    }
}
