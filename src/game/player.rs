//! Player state management.

use crate::error::{EngineError, EngineResult};
use crate::game::Robot;

/// Unique identifier for a player. Always positive.
pub type PlayerId = u8;

/// A participant: one robot plus a running foul count.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: PlayerId,
    robot: Robot,
    fouls: u32,
}

impl Player {
    /// Create a player owning `robot`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPlayer`] if `id` is zero.
    pub fn new(id: PlayerId, robot: Robot) -> EngineResult<Self> {
        if id == 0 {
            return Err(EngineError::InvalidPlayer { id });
        }
        Ok(Self { id, robot, fouls: 0 })
    }

    /// Player identifier.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// The owned robot.
    #[must_use]
    pub const fn robot(&self) -> &Robot {
        &self.robot
    }

    /// Mutable access to the owned robot.
    pub const fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    /// Fouls committed so far in this match.
    #[must_use]
    pub const fn fouls(&self) -> u32 {
        self.fouls
    }

    /// Record one more foul and return the new total.
    pub const fn add_foul(&mut self) -> u32 {
        self.fouls = self.fouls.saturating_add(1);
        self.fouls
    }

    /// Whether the robot is dead.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.robot.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot() -> Robot {
        Robot::new("Tank", 100.0, 10.0).unwrap()
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, robot()).unwrap();
        assert_eq!(player.id(), 1);
        assert_eq!(player.fouls(), 0);
        assert_eq!(player.robot().name(), "Tank");
        assert!(!player.is_defeated());
    }

    #[test]
    fn test_player_id_must_be_positive() {
        assert_eq!(
            Player::new(0, robot()).unwrap_err(),
            EngineError::InvalidPlayer { id: 0 }
        );
    }

    #[test]
    fn test_fouls_accumulate() {
        let mut player = Player::new(2, robot()).unwrap();
        assert_eq!(player.add_foul(), 1);
        assert_eq!(player.add_foul(), 2);
        assert_eq!(player.fouls(), 2);
    }

    #[test]
    fn test_defeat_follows_robot() {
        let mut player = Player::new(1, robot()).unwrap();
        player.robot_mut().kill();
        assert!(player.is_defeated());
    }
}
