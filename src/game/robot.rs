//! Robots: health, armor, equipment and the combat formulas.

use std::fmt;

use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Coord, Virus, Weapon};

/// Numerator of the health term of the move limit.
const MOBILITY_HP: f64 = 9000.0;

/// Numerator of the armor term of the move limit.
const MOBILITY_ARMOR: f64 = 600.0;

/// A combatant.
///
/// Base stats are fixed at construction. Health is floored at zero and a
/// robot at zero health is dead for good.
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    name: String,
    base_hp: f64,
    base_armor: f64,
    hp: f64,
    armor: f64,
    move_limit: u32,
    weapon: Option<Weapon>,
    virus: Option<Virus>,
    position: Option<Coord>,
}

impl Robot {
    /// Create an unplaced, unarmed robot at full health.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStats`] unless both stats are finite
    /// and strictly positive.
    pub fn new(name: impl Into<String>, hp: f64, armor: f64) -> EngineResult<Self> {
        let name = name.into();
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(hp) && valid(armor)) {
            return Err(EngineError::InvalidStats { name });
        }
        Ok(Self {
            name,
            base_hp: hp,
            base_armor: armor,
            hp,
            armor,
            move_limit: move_limit(hp, armor),
            weapon: None,
            virus: None,
            position: None,
        })
    }

    /// An independent copy with the same name and base stats, at full
    /// health, without weapon, infection or position.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            base_hp: self.base_hp,
            base_armor: self.base_armor,
            hp: self.base_hp,
            armor: self.base_armor,
            move_limit: self.move_limit,
            weapon: None,
            virus: None,
            position: None,
        }
    }

    /// Robot model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Health at construction.
    #[must_use]
    pub const fn base_hp(&self) -> f64 {
        self.base_hp
    }

    /// Armor at construction.
    #[must_use]
    pub const fn base_armor(&self) -> f64 {
        self.base_armor
    }

    /// Current health.
    #[must_use]
    pub const fn hp(&self) -> f64 {
        self.hp
    }

    /// Current armor.
    #[must_use]
    pub const fn armor(&self) -> f64 {
        self.armor
    }

    /// Largest `|dx| + |dy| + |dz|` a single move may cover.
    #[must_use]
    pub const fn move_limit(&self) -> u32 {
        self.move_limit
    }

    /// Equipped weapon.
    #[must_use]
    pub const fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    /// Attached virus.
    #[must_use]
    pub const fn virus(&self) -> Option<&Virus> {
        self.virus.as_ref()
    }

    /// Current cell, `None` before placement.
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    /// Whether health reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Whether a virus is attached.
    #[must_use]
    pub const fn is_infected(&self) -> bool {
        self.virus.is_some()
    }

    /// Whether a weapon is equipped.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.weapon.is_some()
    }

    /// Move to `position`, carrying the weapon and virus along.
    pub fn set_position(&mut self, position: Coord) {
        self.position = Some(position);
        if let Some(weapon) = &mut self.weapon {
            weapon.set_position(Some(position));
        }
        if let Some(virus) = &mut self.virus {
            virus.set_position(Some(position));
        }
    }

    /// Equip `weapon`, discarding the current one.
    pub fn set_weapon(&mut self, weapon: Weapon) {
        self.replace_weapon(Some(weapon));
    }

    /// Put `weapon` in the weapon slot and return what was there.
    ///
    /// The new weapon moves to the robot's cell.
    pub fn replace_weapon(&mut self, weapon: Option<Weapon>) -> Option<Weapon> {
        let incoming = weapon.map(|mut weapon| {
            weapon.set_position(self.position);
            weapon
        });
        std::mem::replace(&mut self.weapon, incoming)
    }

    /// Attach `virus`, replacing any current infection.
    pub fn infect(&mut self, mut virus: Virus) {
        virus.set_position(self.position);
        self.virus = Some(virus);
    }

    /// Attack `target`.
    ///
    /// `damage = max(0, sigma / distance * U - target.armor * U)` with the
    /// distance clamped to at least one cell. An unarmed attacker or an
    /// unplaced robot deals nothing and draws nothing.
    ///
    /// Returns the damage dealt.
    pub fn attack<D: Dice + ?Sized>(&self, target: &mut Self, dice: &mut D) -> f64 {
        let (Some(weapon), Some(from), Some(to)) = (&self.weapon, self.position, target.position)
        else {
            return 0.0;
        };
        let distance = from.distance(to).max(1.0);
        let strike = weapon.sigma() / distance * dice.unit();
        let parry = target.armor * dice.unit();
        let damage = (strike - parry).max(0.0);
        if damage > 0.0 {
            target.receive_damage(damage);
        }
        damage
    }

    /// Lose `amount` health, never dropping below zero.
    pub fn receive_damage(&mut self, amount: f64) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    /// Apply one tick of the attached virus.
    ///
    /// The virus loses one turn of life and is cleared once spent.
    /// Returns the damage applied, zero when not infected.
    pub fn receive_virus_damage<D: Dice + ?Sized>(&mut self, dice: &mut D) -> f64 {
        let Some(virus) = &mut self.virus else {
            return 0.0;
        };
        let damage = virus.calc_damage(dice);
        virus.reduce();
        if virus.is_spent() {
            self.virus = None;
        }
        self.receive_damage(damage);
        damage
    }

    /// Drop health to zero.
    pub fn kill(&mut self) {
        self.hp = 0.0;
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (hp {:.2}/{:.2}, armor {:.2}, moves {})",
            self.name, self.hp, self.base_hp, self.armor, self.move_limit
        )
    }
}

// Both stats are validated positive and finite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn move_limit(hp: f64, armor: f64) -> u32 {
    (MOBILITY_HP / hp + MOBILITY_ARMOR / armor).floor().min(f64::from(u32::MAX)) as u32
}
