//! The arena together with the two players fighting in it.

use crate::dice::Dice;
use crate::game::{Arena, Player};

/// Everything an action mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct Battlefield {
    /// The shared grid.
    pub arena: Arena,
    /// Player 1 and player 2, in that order.
    pub players: [Player; 2],
}

impl Battlefield {
    /// Pair an arena with two players as they are.
    #[must_use]
    pub const fn new(arena: Arena, players: [Player; 2]) -> Self {
        Self { arena, players }
    }

    /// Place both robots on distinct random free cells.
    ///
    /// Returns `None` if the arena has no room for two robots.
    pub fn deploy<D: Dice + ?Sized>(arena: Arena, mut players: [Player; 2], dice: &mut D) -> Option<Self> {
        let first = arena.random_free_coordinate(dice)?;
        let second = arena.random_free_coordinate_avoiding(dice, &[first])?;
        players[0].robot_mut().set_position(first);
        players[1].robot_mut().set_position(second);
        tracing::debug!(%first, %second, "robots deployed");
        Some(Self { arena, players })
    }

    /// Split into the acting player, the waiting player and the arena for
    /// action `number`: odd numbers belong to player 1.
    pub fn pair_mut(&mut self, number: u8) -> (&mut Player, &mut Player, &mut Arena) {
        let [first, second] = &mut self.players;
        if number % 2 == 1 {
            (first, second, &mut self.arena)
        } else {
            (second, first, &mut self.arena)
        }
    }

    /// The player acting on action `number`.
    #[must_use]
    pub const fn active(&self, number: u8) -> &Player {
        if number % 2 == 1 { &self.players[0] } else { &self.players[1] }
    }

    /// Whether either robot is dead.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.players.iter().any(Player::is_defeated)
    }

    /// A human-readable snapshot of both robots and the arena.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .players
            .iter()
            .map(|player| {
                let robot = player.robot();
                let weapon = robot
                    .weapon()
                    .map_or_else(|| "unarmed".to_string(), ToString::to_string);
                let position = robot
                    .position()
                    .map_or_else(|| "unplaced".to_string(), |c| c.to_string());
                format!(
                    "Player {}: {} | weapon {} | at {} | hp {:.2} | armor {:.2} | {} | fouls {}",
                    player.id(),
                    robot.name(),
                    weapon,
                    position,
                    robot.hp(),
                    robot.armor(),
                    if robot.is_infected() { "infected" } else { "healthy" },
                    player.fouls()
                )
            })
            .collect();
        lines.push(self.arena.to_string());
        lines
    }
}
