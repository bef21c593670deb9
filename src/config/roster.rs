//! Robot and weapon catalogs.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{read, records};
use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Robot, Weapon};

/// Robot templates and weapon variants, each sorted by name.
///
/// Handing an entry out always produces an independent value; templates are
/// never shared with a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    robots: BTreeMap<String, Robot>,
    weapons: BTreeMap<String, Weapon>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read robot records (`name hp armor`) and weapon records
    /// (`name sigma`) from two files.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] if a file cannot be read
    /// or holds a malformed record.
    pub fn load(robots: &Path, weapons: &Path) -> EngineResult<Self> {
        let mut roster = Self::new();
        roster.add_robots(&read(robots)?, &robots.display().to_string())?;
        roster.add_weapons(&read(weapons)?, &weapons.display().to_string())?;
        tracing::debug!(
            robots = roster.robots.len(),
            weapons = roster.weapons.len(),
            "roster loaded"
        );
        Ok(roster)
    }

    /// Add `name hp armor` records. A repeated name replaces the earlier
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] naming the first
    /// malformed line.
    pub fn add_robots(&mut self, text: &str, origin: &str) -> EngineResult<()> {
        for (line, record) in records(text) {
            let invalid = |reason: &str| configuration_error(origin, line, reason);
            let [name, hp, armor] = fields::<3>(record).ok_or_else(|| invalid("expected `name hp armor`"))?;
            let hp = number(hp).ok_or_else(|| invalid("health is not a number"))?;
            let armor = number(armor).ok_or_else(|| invalid("armor is not a number"))?;
            let robot = Robot::new(name, hp, armor).map_err(|err| invalid(&err.to_string()))?;
            self.robots.insert(name.to_string(), robot);
        }
        Ok(())
    }

    /// Add `name sigma` records. A repeated name replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] naming the first
    /// malformed line.
    pub fn add_weapons(&mut self, text: &str, origin: &str) -> EngineResult<()> {
        for (line, record) in records(text) {
            let invalid = |reason: &str| configuration_error(origin, line, reason);
            let [name, sigma] = fields::<2>(record).ok_or_else(|| invalid("expected `name sigma`"))?;
            let sigma = number(sigma).ok_or_else(|| invalid("damage coefficient is not a number"))?;
            let weapon = Weapon::new(name, sigma).map_err(|err| invalid(&err.to_string()))?;
            self.weapons.insert(name.to_string(), weapon);
        }
        Ok(())
    }

    /// Robot templates in name order.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.values()
    }

    /// Weapon variants in name order.
    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.values()
    }

    /// Independent copies of every weapon variant.
    #[must_use]
    pub fn weapon_catalog(&self) -> Vec<Weapon> {
        self.weapons.values().cloned().collect()
    }

    /// Take a robot out of the roster.
    ///
    /// `choice` indexes the name-ordered list; `None` picks uniformly. The
    /// template is removed so the next draw cannot return the same model,
    /// and a fresh copy is returned. `None` if the index is out of range or
    /// the roster has no robots left.
    pub fn draw_robot<D: Dice + ?Sized>(&mut self, choice: Option<usize>, dice: &mut D) -> Option<Robot> {
        let index = pick(choice, self.robots.len(), dice)?;
        let name = self.robots.keys().nth(index)?.clone();
        let template = self.robots.remove(&name)?;
        Some(template.duplicate())
    }

    /// Copy a weapon variant.
    ///
    /// `choice` indexes the name-ordered list; `None` picks uniformly.
    pub fn weapon<D: Dice + ?Sized>(&self, choice: Option<usize>, dice: &mut D) -> Option<Weapon> {
        let index = pick(choice, self.weapons.len(), dice)?;
        self.weapons.values().nth(index).cloned()
    }
}

fn pick<D: Dice + ?Sized>(choice: Option<usize>, len: usize, dice: &mut D) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match choice {
        Some(index) => (index < len).then_some(index),
        None => {
            let bound = u32::try_from(len).unwrap_or(u32::MAX);
            usize::try_from(dice.below(bound)).ok()
        }
    }
}

fn fields<const N: usize>(record: &str) -> Option<[&str; N]> {
    let tokens: Vec<&str> = record.split_whitespace().collect();
    tokens.try_into().ok()
}

fn number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn configuration_error(origin: &str, line: usize, reason: &str) -> EngineError {
    EngineError::InvalidConfiguration {
        origin: origin.to_string(),
        line,
        reason: reason.to_string(),
    }
}
