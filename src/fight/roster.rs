//! Allowed fighter names

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::error::{DuelError, Result};

const STANDARD_NAMES: [&str; 25] = [
    "Aquaman",
    "Bane",
    "Batman",
    "Black Adam",
    "Catwoman",
    "Cyborg",
    "Darkseid",
    "Deadshot",
    "Deathstroke",
    "Doomsday",
    "Flash",
    "Green Arrow",
    "Green Lantern",
    "Harley Quinn",
    "Joker",
    "Lex Luthor",
    "Lobo",
    "Martian Manhunter",
    "Nightwing",
    "Shazam",
    "Sinestro",
    "Solomon Grundy",
    "Superman",
    "Wonder Woman",
    "Zatanna",
];

static STANDARD: OnceLock<Roster> = OnceLock::new();

/// Ordered list of names a fight card may draw from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(DuelError::InvalidConfig("roster has no names".into()));
        }
        if let Some(blank) = names.iter().find(|n| n.trim().is_empty()) {
            return Err(DuelError::InvalidConfig(format!(
                "roster contains a blank name {:?}",
                blank
            )));
        }
        Ok(Self { names })
    }

    pub fn standard() -> &'static Roster {
        STANDARD.get_or_init(|| Roster {
            names: STANDARD_NAMES.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// Parse `names = [...]`
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let roster: Roster = toml::from_str(content)?;
        Self::new(roster.names)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
