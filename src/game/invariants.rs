//! Battlefield invariants - sanity checks that detect engine bugs.
//!
//! No command, legal or not, should ever break these. A violation means a
//! resolution step left the arena or a robot in an impossible state.

use crate::game::{Battlefield, PlayerId, Robot};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all battlefield invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(field: &Battlefield) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut report = |message: String| violations.push(InvariantViolation { message });

    // Items sit inside the grid, on the cell they believe they are on
    for (cell, item) in field.arena.items() {
        if !field.arena.contains(cell) {
            report(format!("{} at {cell} lies outside the arena", item.kind()));
        }
        if item.position() != Some(cell) {
            report(format!(
                "{} stored at {cell} believes it is at {:?}",
                item.kind(),
                item.position()
            ));
        }
    }

    for player in &field.players {
        check_robot(player.id(), player.robot(), field, &mut report);
    }

    // Two robots never share a cell
    let [first, second] = &field.players;
    match (first.robot().position(), second.robot().position()) {
        (Some(a), Some(b)) if a == b => report(format!("both robots occupy {a}")),
        _ => {}
    }

    violations
}

fn check_robot(id: PlayerId, robot: &Robot, field: &Battlefield, report: &mut impl FnMut(String)) {
    // An unplaced robot is legal: it cannot attack and every move fouls
    let position = robot.position();
    if let Some(cell) = position.filter(|cell| !field.arena.contains(*cell)) {
        report(format!("player {id} robot at {cell} is outside the arena"));
    }

    if !(0.0..=robot.base_hp()).contains(&robot.hp()) {
        report(format!(
            "player {id} robot health {} outside [0, {}]",
            robot.hp(),
            robot.base_hp()
        ));
    }

    if let Some(weapon) = robot.weapon().filter(|w| w.position() != position) {
        report(format!(
            "player {id} weapon at {:?} does not follow robot at {position:?}",
            weapon.position()
        ));
    }
    if let Some(virus) = robot.virus().filter(|v| v.position() != position) {
        report(format!(
            "player {id} virus at {:?} does not follow robot at {position:?}",
            virus.position()
        ));
    }
}

/// Assert all battlefield invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(field: &Battlefield) {
    let violations = check_invariants(field);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Battlefield invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_field: &Battlefield) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::game::{Arena, ArenaSettings, Bomb, Coord, Player, SpecialItem, Virus, Weapon};

    fn create_valid_field() -> Battlefield {
        let settings = ArenaSettings {
            min_dimension: 1,
            fill_coefficient: 0.0,
        };
        let mut arena = Arena::new(5, 5, 5, &settings, &[], &mut ScriptedDice::default()).unwrap();
        arena
            .place_item(Coord::new(2, 2, 2), SpecialItem::Bomb(Bomb::new()))
            .unwrap();

        let mut players = [
            Player::new(1, Robot::new("Tank", 100.0, 10.0).unwrap()).unwrap(),
            Player::new(2, Robot::new("Scout", 50.0, 5.0).unwrap()).unwrap(),
        ];
        players[0].robot_mut().set_weapon(Weapon::new("Laser", 5.0).unwrap());
        players[0].robot_mut().set_position(Coord::new(0, 0, 0));
        players[1].robot_mut().infect(Virus::with_life(2));
        players[1].robot_mut().set_position(Coord::new(4, 4, 4));
        Battlefield::new(arena, players)
    }

    #[test]
    fn test_valid_field_passes() {
        let field = create_valid_field();
        assert!(check_invariants(&field).is_empty());
    }

    #[test]
    fn test_shared_cell_detected() {
        let mut field = create_valid_field();
        field.players[1].robot_mut().set_position(Coord::new(0, 0, 0));

        let violations = check_invariants(&field);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("both robots"));
    }

    #[test]
    fn test_robot_outside_detected() {
        let mut field = create_valid_field();
        field.players[0].robot_mut().set_position(Coord::new(5, 0, 0));

        let violations = check_invariants(&field);
        assert!(violations.iter().any(|v| v.message.contains("outside the arena")));
    }

    #[test]
    fn test_unplaced_robot_allowed() {
        let mut field = create_valid_field();
        let mut tank = Robot::new("Tank", 100.0, 10.0).unwrap();
        tank.set_weapon(Weapon::new("Laser", 5.0).unwrap());
        field.players[0] = Player::new(1, tank).unwrap();

        assert!(check_invariants(&field).is_empty());
    }

    #[test]
    #[should_panic(expected = "invariant violations")]
    fn test_assert_panics_in_debug() {
        let mut field = create_valid_field();
        field.players[1].robot_mut().set_position(Coord::new(0, 0, 0));
        assert_invariants(&field);
    }
}
