#![no_main]

//! Configuration parser fuzzer.
//!
//! Arbitrary text must never panic the settings or roster parsers, and
//! anything they accept must satisfy the constraints they promise.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use robo_duel::{Roster, Settings};

/// Raw file contents for each configuration file.
#[derive(Arbitrary, Debug)]
struct ConfigInput {
    settings: String,
    robots: String,
    weapons: String,
}

fuzz_target!(|input: ConfigInput| {
    if let Ok(settings) = Settings::parse(&input.settings, "config.txt") {
        assert!(settings.min_dimension > 0);
        assert!(settings.fill_coefficient.is_finite());
        assert!(settings.fill_coefficient >= 0.0);
    }

    let mut roster = Roster::new();
    if roster.add_robots(&input.robots, "robots.txt").is_ok() {
        for robot in roster.robots() {
            assert!(robot.base_hp() > 0.0 && robot.base_hp().is_finite());
            assert!(robot.base_armor() > 0.0 && robot.base_armor().is_finite());
        }
    }
    if roster.add_weapons(&input.weapons, "weapons.txt").is_ok() {
        for weapon in roster.weapons() {
            assert!(weapon.sigma() > 0.0 && weapon.sigma().is_finite());
        }
    }
});
