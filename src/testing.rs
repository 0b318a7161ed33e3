//! Testing utilities
//!
//! `ScriptedRolls` replays a fixed list of draws so a test can force a
//! defense roll to fail, a skill to fire, or a particular flavor verb.

use std::collections::VecDeque;

use crate::core::rng::{Randomness, SeededRng};

/// Randomness that returns scripted values in order
///
/// Each draw pops the next value and clamps it into the requested range
/// (`range_inclusive`) or to a valid index (`index`). Once the script runs
/// out, draws come from a seeded generator so long fights still finish.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    script: VecDeque<i64>,
    fallback: SeededRng,
}

impl ScriptedRolls {
    pub fn new(script: impl IntoIterator<Item = i64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: SeededRng::new(0),
        }
    }

    /// Append more draws to the end of the script
    pub fn push(&mut self, roll: i64) {
        self.script.push_back(roll);
    }

    /// Scripted draws not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Default for ScriptedRolls {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Randomness for ScriptedRolls {
    fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        match self.script.pop_front() {
            Some(roll) => roll.clamp(low, high.max(low)),
            None => self.fallback.range_inclusive(low, high),
        }
    }

    fn index(&mut self, len: usize) -> usize {
        match self.script.pop_front() {
            Some(roll) => roll.clamp(0, len.saturating_sub(1) as i64) as usize,
            None => self.fallback.index(len),
        }
    }
}
