// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Robo Duel: a deterministic, turn-based robot duel engine.
//!
//! Two robots share a three-dimensional arena scattered with bombs, viruses
//! and weapons. Players alternate single commands (`move dx dy dz`,
//! `attack`, `exit`) until one robot's health reaches zero.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (console, scripts, history)   │
//! ├─────────────────────────────────────┤
//! │   Duel loop (slots, forfeits)       │
//! ├─────────────────────────────────────┤
//! │   Action interpreter                │
//! ├─────────────────────────────────────┤
//! │   Arena / items / robots / players  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every random draw goes through [`Dice`], so a duel driven by a seeded
//! generator replays identically.

pub mod config;
pub mod dice;
pub mod duel;
pub mod error;
pub mod game;
pub mod history;

pub use config::{Roster, Settings};
pub use dice::{Dice, ScriptedDice};
pub use duel::{CommandSource, Duel, DuelOutcome, Script};
pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, Arena, ArenaSettings, AutoAnswer, Battlefield, Command, Confirm, Coord, Event, Player,
    PlayerId, ResolvedAction, Robot, Signal, SpecialItem, Weapon,
};
