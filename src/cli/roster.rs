//! Roster command implementation.

use super::CliError;
use robo_duel::Roster;
use std::path::Path;

/// Execute the roster command.
///
/// # Errors
///
/// Returns an error if either roster file is missing or malformed.
pub(crate) fn execute(robots: &Path, weapons: &Path) -> Result<(), CliError> {
    let roster = Roster::load(robots, weapons)?;

    println!("Robots:");
    for robot in roster.robots() {
        println!(
            "  {:<16} hp {:>8.2}  armor {:>8.2}  move limit {}",
            robot.name(),
            robot.base_hp(),
            robot.base_armor(),
            robot.move_limit()
        );
    }
    println!("Weapons:");
    for weapon in roster.weapons() {
        println!("  {:<16} sigma {:>8.2}", weapon.name(), weapon.sigma());
    }
    Ok(())
}
