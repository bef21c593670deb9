//! Game layer: the arena, its items, the robots and the per-turn action
//! interpreter.
//!
//! - Arena grid with scattered special items (bombs, viruses, weapons)
//! - Robots with health, armor, weapon and infection state
//! - Players owning a robot and a foul counter
//! - Action resolution (command parsing, movement, combat, fouls, collisions)

mod action;
mod arena;
mod battlefield;
mod coord;
mod invariants;
mod item;
mod player;
mod robot;

pub use action::{Action, Command, Event, ResolvedAction, Signal};
pub use arena::{Arena, ArenaSettings, MAX_DIMENSION};
pub use battlefield::Battlefield;
pub use coord::Coord;
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use item::{Bomb, Effect, SpecialItem, Virus, Weapon, exchange_weapon, trigger};
pub use player::{Player, PlayerId};
pub use robot::Robot;

/// Yes/no question asked to the acting player during resolution.
///
/// The engine asks it when a move lands on a weapon: declining keeps the
/// weapon the robot already had.
pub trait Confirm {
    /// Ask `question`; the answer counts as "yes" when it starts with `yes`.
    fn confirm(&mut self, question: &str, yes: char) -> bool;
}

impl<F: FnMut(&str, char) -> bool> Confirm for F {
    fn confirm(&mut self, question: &str, yes: char) -> bool {
        self(question, yes)
    }
}

/// A [`Confirm`] that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAnswer(pub bool);

impl Confirm for AutoAnswer {
    fn confirm(&mut self, _question: &str, _yes: char) -> bool {
        self.0
    }
}
