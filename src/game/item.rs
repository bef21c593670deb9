//! Special items scattered through the arena.
//!
//! A robot that steps on an item triggers it:
//! - a bomb explodes and is gone,
//! - a virus leaves the arena and rides along with the robot, draining
//!   health every turn until it runs out of life,
//! - a weapon is exchanged with whatever the robot was holding, the old
//!   weapon staying behind on the same cell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Arena, Coord, Robot};

/// Damage scale of a bomb: the blast deals `BOMB_DAMAGE * U(0,1)`.
pub const BOMB_DAMAGE: f64 = 300.0;

/// Damage scale of a virus tick: `VIRUS_DAMAGE * U(0,1)` per turn.
pub const VIRUS_DAMAGE: f64 = 100.0;

/// A virus lives `floor(VIRUS_MAX_LIFE * U(0,1))` turns.
pub const VIRUS_MAX_LIFE: u32 = 5;

/// An explosive that damages the first robot stepping on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bomb {
    position: Option<Coord>,
}

impl Bomb {
    /// Create an unplaced bomb.
    #[must_use]
    pub const fn new() -> Self {
        Self { position: None }
    }

    /// Current cell, if the bomb lies in an arena.
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    /// Move the bomb to `position`.
    pub fn set_position(&mut self, position: Option<Coord>) {
        self.position = position;
    }

    /// Explode on `robot`. The bomb leaves the arena for good.
    ///
    /// Returns the damage dealt.
    pub fn effect<D: Dice + ?Sized>(mut self, robot: &mut Robot, arena: &mut Arena, dice: &mut D) -> f64 {
        let damage = BOMB_DAMAGE * dice.unit();
        robot.receive_damage(damage);
        if let Some(cell) = self.position {
            arena.remove_item(cell);
        }
        self.position = None;
        damage
    }
}

/// An infection that drains health once per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Virus {
    life: u32,
    position: Option<Coord>,
}

impl Virus {
    /// Create an unplaced virus with a random life span.
    #[must_use]
    pub fn new<D: Dice + ?Sized>(dice: &mut D) -> Self {
        Self::with_life(dice.below(VIRUS_MAX_LIFE))
    }

    /// Create an unplaced virus with a fixed life span.
    #[must_use]
    pub const fn with_life(life: u32) -> Self {
        Self { life, position: None }
    }

    /// Remaining turns.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Current cell (the carrier's cell once attached).
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    /// Move the virus to `position`.
    pub fn set_position(&mut self, position: Option<Coord>) {
        self.position = position;
    }

    /// Damage of one tick.
    pub fn calc_damage<D: Dice + ?Sized>(&self, dice: &mut D) -> f64 {
        VIRUS_DAMAGE * dice.unit()
    }

    /// Spend one turn of life.
    pub fn reduce(&mut self) {
        self.life = self.life.saturating_sub(1);
    }

    /// Whether the virus has no life left.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.life == 0
    }

    /// Infect `robot`. The virus leaves the arena and travels with it.
    ///
    /// Returns the life span of the infection.
    pub fn effect(self, robot: &mut Robot, arena: &mut Arena) -> u32 {
        if let Some(cell) = self.position {
            arena.remove_item(cell);
        }
        let life = self.life;
        robot.infect(self);
        life
    }
}

/// A weapon. Its `sigma` scales attack damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    name: String,
    sigma: f64,
    position: Option<Coord>,
}

impl Weapon {
    /// Create an unplaced weapon.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStats`] unless `sigma` is finite and
    /// strictly positive.
    pub fn new(name: impl Into<String>, sigma: f64) -> EngineResult<Self> {
        let name = name.into();
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(EngineError::InvalidStats { name });
        }
        Ok(Self {
            name,
            sigma,
            position: None,
        })
    }

    /// Weapon name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Damage coefficient.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Current cell (the holder's cell when equipped).
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        self.position
    }

    /// Move the weapon to `position`.
    pub fn set_position(&mut self, position: Option<Coord>) {
        self.position = position;
    }

    /// Hand this weapon to `robot`.
    ///
    /// A weapon lying on a cell is exchanged with the robot's current one,
    /// which stays behind on that cell. Applying the effect a second time
    /// (see [`exchange_weapon`]) undoes the exchange.
    pub fn effect(self, robot: &mut Robot, arena: &mut Arena) -> Effect {
        let Some(cell) = self.position else {
            let dropped = robot.replace_weapon(Some(self));
            return Effect::WeaponSwapped {
                equipped: robot.weapon().map(ToString::to_string),
                dropped: dropped.map(|w| w.to_string()),
            };
        };
        // Lay it down first so the exchange below always sees it on `cell`.
        if arena.place_item(cell, SpecialItem::Weapon(self)).is_err() {
            return Effect::WeaponSwapped {
                equipped: robot.weapon().map(ToString::to_string),
                dropped: None,
            };
        }
        exchange_weapon(arena, cell, robot)
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.name, self.sigma)
    }
}

/// Any item that can lie on an arena cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecialItem {
    /// See [`Bomb`].
    Bomb(Bomb),
    /// See [`Virus`].
    Virus(Virus),
    /// See [`Weapon`].
    Weapon(Weapon),
}

impl SpecialItem {
    /// Draw a random item: bomb, virus or weapon with equal odds.
    ///
    /// Weapons are copies of a random entry of `weapons`; with an empty
    /// catalog only bombs and viruses are drawn.
    pub fn random<D: Dice + ?Sized>(dice: &mut D, weapons: &[Weapon]) -> Self {
        let categories = if weapons.is_empty() { 2 } else { 3 };
        match dice.below(categories) {
            0 => Self::Bomb(Bomb::new()),
            1 => Self::Virus(Virus::new(dice)),
            _ => {
                let count = u32::try_from(weapons.len()).unwrap_or(u32::MAX);
                let index = dice.below(count) as usize;
                let mut weapon = weapons[index].clone();
                weapon.set_position(None);
                Self::Weapon(weapon)
            }
        }
    }

    /// Current cell of the item.
    #[must_use]
    pub const fn position(&self) -> Option<Coord> {
        match self {
            Self::Bomb(bomb) => bomb.position(),
            Self::Virus(virus) => virus.position(),
            Self::Weapon(weapon) => weapon.position(),
        }
    }

    /// Move the item to `position`.
    pub fn set_position(&mut self, position: Option<Coord>) {
        match self {
            Self::Bomb(bomb) => bomb.set_position(position),
            Self::Virus(virus) => virus.set_position(position),
            Self::Weapon(weapon) => weapon.set_position(position),
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bomb(_) => "bomb",
            Self::Virus(_) => "virus",
            Self::Weapon(_) => "weapon",
        }
    }

    /// Apply this item to `robot`.
    pub fn effect<D: Dice + ?Sized>(self, robot: &mut Robot, arena: &mut Arena, dice: &mut D) -> Effect {
        match self {
            Self::Bomb(bomb) => Effect::Exploded {
                damage: bomb.effect(robot, arena, dice),
            },
            Self::Virus(virus) => Effect::Infected {
                turns: virus.effect(robot, arena),
            },
            Self::Weapon(weapon) => weapon.effect(robot, arena),
        }
    }
}

impl fmt::Display for SpecialItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bomb(_) => write!(f, "bomb"),
            Self::Virus(virus) => write!(f, "virus ({} turns)", virus.life()),
            Self::Weapon(weapon) => write!(f, "{weapon}"),
        }
    }
}

/// Outcome of triggering an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A bomb went off.
    Exploded {
        /// Damage dealt to the robot.
        damage: f64,
    },
    /// The robot caught a virus.
    Infected {
        /// Life span of the infection.
        turns: u32,
    },
    /// The robot's weapon slot was exchanged with a cell.
    WeaponSwapped {
        /// Weapon now held by the robot.
        equipped: Option<String>,
        /// Weapon left behind on the cell.
        dropped: Option<String>,
    },
}

/// Trigger the item lying at `cell`, if any, on `robot`.
///
/// # Errors
///
/// Returns [`EngineError::OutOfBounds`] if `cell` is outside the arena.
pub fn trigger<D: Dice + ?Sized>(
    arena: &mut Arena,
    cell: Coord,
    robot: &mut Robot,
    dice: &mut D,
) -> EngineResult<Option<Effect>> {
    let Some(item) = arena.item_at(cell)?.cloned() else {
        return Ok(None);
    };
    tracing::debug!(kind = item.kind(), %cell, robot = robot.name(), "item triggered");
    Ok(Some(item.effect(robot, arena, dice)))
}

/// Swap the robot's weapon slot with the weapon lying at `cell`.
///
/// Either side may be empty. Bombs and viruses on the cell are left alone.
/// Two consecutive calls restore the original arrangement.
pub fn exchange_weapon(arena: &mut Arena, cell: Coord, robot: &mut Robot) -> Effect {
    let lying = match arena.remove_item(cell) {
        Some(SpecialItem::Weapon(weapon)) => Some(weapon),
        Some(other) => {
            // Not a weapon: put it back untouched.
            let _ = arena.place_item(cell, other);
            None
        }
        None => None,
    };
    let held = robot.replace_weapon(lying);
    let dropped = held.map(|weapon| {
        let label = weapon.to_string();
        let _ = arena.place_item(cell, SpecialItem::Weapon(weapon));
        label
    });
    Effect::WeaponSwapped {
        equipped: robot.weapon().map(ToString::to_string),
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::game::ArenaSettings;

    fn arena() -> Arena {
        let settings = ArenaSettings {
            min_dimension: 1,
            fill_coefficient: 0.0,
        };
        Arena::new(5, 5, 5, &settings, &[], &mut ScriptedDice::default()).unwrap()
    }

    fn robot_at(coord: Coord) -> Robot {
        let mut robot = Robot::new("Tank", 100.0, 10.0).unwrap();
        robot.set_position(coord);
        robot
    }

    #[test]
    fn test_bomb_effect_damages_and_disappears() {
        let mut arena = arena();
        let cell = Coord::new(1, 1, 1);
        arena.place_item(cell, SpecialItem::Bomb(Bomb::new())).unwrap();
        let mut robot = robot_at(Coord::new(0, 1, 1));

        let effect = trigger(&mut arena, cell, &mut robot, &mut ScriptedDice::new([0.5])).unwrap();
        assert_eq!(effect, Some(Effect::Exploded { damage: 150.0 }));
        assert!(robot.is_dead());
        assert!(arena.item_at(cell).unwrap().is_none());
    }

    #[test]
    fn test_virus_effect_attaches_to_robot() {
        let mut arena = arena();
        let cell = Coord::new(2, 2, 2);
        arena.place_item(cell, SpecialItem::Virus(Virus::with_life(3))).unwrap();
        let mut robot = robot_at(Coord::new(2, 2, 1));

        let effect = trigger(&mut arena, cell, &mut robot, &mut ScriptedDice::default()).unwrap();
        assert_eq!(effect, Some(Effect::Infected { turns: 3 }));
        assert!(robot.is_infected());
        assert_eq!(robot.virus().unwrap().position(), Some(Coord::new(2, 2, 1)));
        assert_eq!(arena.item_count(), 0);
    }

    #[test]
    fn test_virus_life_is_drawn_below_max() {
        let virus = Virus::new(&mut ScriptedDice::new([0.99]));
        assert_eq!(virus.life(), 4);
        let virus = Virus::new(&mut ScriptedDice::new([0.0]));
        assert_eq!(virus.life(), 0);
    }

    #[test]
    fn test_virus_reduce_never_goes_negative() {
        let mut virus = Virus::with_life(1);
        virus.reduce();
        assert!(virus.is_spent());
        virus.reduce();
        assert_eq!(virus.life(), 0);
    }

    #[test]
    fn test_weapon_pickup_drops_old_weapon_on_cell() {
        let mut arena = arena();
        let cell = Coord::new(3, 3, 3);
        let mut robot = robot_at(Coord::new(3, 3, 2));
        robot.set_weapon(Weapon::new("Pistol", 10.0).unwrap());
        arena
            .place_item(cell, SpecialItem::Weapon(Weapon::new("Laser", 80.0).unwrap()))
            .unwrap();

        trigger(&mut arena, cell, &mut robot, &mut ScriptedDice::default()).unwrap();

        assert_eq!(robot.weapon().unwrap().name(), "Laser");
        assert_eq!(robot.weapon().unwrap().position(), Some(Coord::new(3, 3, 2)));
        match arena.item_at(cell).unwrap() {
            Some(SpecialItem::Weapon(w)) => {
                assert_eq!(w.name(), "Pistol");
                assert_eq!(w.position(), Some(cell));
            }
            other => panic!("expected dropped pistol, got {other:?}"),
        }
    }

    #[test]
    fn test_weapon_exchange_twice_restores() {
        let mut arena = arena();
        let cell = Coord::new(0, 0, 1);
        let mut robot = robot_at(Coord::new(0, 0, 0));
        arena
            .place_item(cell, SpecialItem::Weapon(Weapon::new("Laser", 80.0).unwrap()))
            .unwrap();
        let arena_before = arena.clone();
        let robot_before = robot.clone();

        exchange_weapon(&mut arena, cell, &mut robot);
        assert!(robot.is_armed());
        assert_eq!(arena.item_count(), 0);

        exchange_weapon(&mut arena, cell, &mut robot);
        assert_eq!(robot, robot_before);
        assert_eq!(arena, arena_before);
    }

    #[test]
    fn test_exchange_leaves_bombs_alone() {
        let mut arena = arena();
        let cell = Coord::new(1, 0, 0);
        arena.place_item(cell, SpecialItem::Bomb(Bomb::new())).unwrap();
        let mut robot = robot_at(Coord::new(0, 0, 0));

        exchange_weapon(&mut arena, cell, &mut robot);
        assert!(!robot.is_armed());
        assert_eq!(arena.item_at(cell).unwrap().map(SpecialItem::kind), Some("bomb"));
    }

    #[test]
    fn test_random_item_without_weapons() {
        let mut dice = ScriptedDice::new([0.99, 0.5]);
        let item = SpecialItem::random(&mut dice, &[]);
        assert_eq!(item.kind(), "virus");
    }

    #[test]
    fn test_random_item_weapon_is_a_copy() {
        let catalog = vec![Weapon::new("A", 1.0).unwrap(), Weapon::new("B", 2.0).unwrap()];
        let mut dice = ScriptedDice::new([0.9, 0.9]);
        match SpecialItem::random(&mut dice, &catalog) {
            SpecialItem::Weapon(w) => {
                assert_eq!(w.name(), "B");
                assert_eq!(w.position(), None);
            }
            other => panic!("expected weapon, got {other:?}"),
        }
    }

    #[test]
    fn test_weapon_rejects_bad_sigma() {
        assert!(Weapon::new("Dud", 0.0).is_err());
        assert!(Weapon::new("Dud", f64::NAN).is_err());
    }
}
