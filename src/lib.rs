//! Dawn of Justice - deterministic turn-based duel engine
//!
//! Two fighters from a fixed roster draw an archetype, roll their stats and
//! trade blows for a bounded number of rounds until one is knocked out or
//! the rounds run out. All randomness flows through one injectable source,
//! so a seed reproduces a fight exactly.
//!
//! ```
//! use dawn_of_justice::core::{FightConfig, SeededRng};
//! use dawn_of_justice::fight::Fight;
//!
//! let mut fight = Fight::standard(FightConfig::default(), SeededRng::new(42)).unwrap();
//! fight.add_fighter("Batman").unwrap();
//! fight.add_fighter("Superman").unwrap();
//! let result = fight.run().unwrap();
//! assert!(fight.round() <= 30);
//! # let _ = result;
//! ```

pub mod core;
pub mod fight;
pub mod testing;
