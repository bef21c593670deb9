#![no_main]

//! Action resolution fuzzer.
//!
//! Builds a small filled arena from fuzzer-chosen dimensions and robot
//! stats, then feeds arbitrary commands through the duel:
//! 1. Well-formed moves, attacks and exits
//! 2. Raw command text, including garbage
//! 3. Arbitrary answers to weapon prompts
//!
//! Invariants are checked after every accepted command.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robo_duel::game::check_invariants;
use robo_duel::{Arena, ArenaSettings, Battlefield, Duel, EngineError, Player, Robot, Weapon};

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Attack,
    Exit,
    Move { dx: i16, dy: i16, dz: i16 },
    Raw(String),
}

impl FuzzCommand {
    fn text(&self) -> String {
        match self {
            Self::Attack => "attack".to_string(),
            Self::Exit => "exit".to_string(),
            Self::Move { dx, dy, dz } => format!("move {dx} {dy} {dz}"),
            Self::Raw(text) => text.clone(),
        }
    }
}

/// Structured input for duel fuzzing.
#[derive(Arbitrary, Debug)]
struct DuelInput {
    /// Arena dimensions, folded into `2..=9`.
    dims: [u8; 3],
    /// Fill coefficient in hundredths.
    fill: u8,
    /// Health and armor for each robot.
    stats: [(u16, u16); 2],
    /// Weapon strength for each robot; zero means unarmed.
    sigma: [u16; 2],
    /// Answers to "take the weapon?" prompts, cycled.
    answers: Vec<bool>,
    /// Commands in play order.
    commands: Vec<FuzzCommand>,
    /// RNG seed for every random draw.
    seed: u64,
}

fuzz_target!(|input: DuelInput| {
    let mut rng = SmallRng::seed_from_u64(input.seed);
    let [w, l, h] = input.dims.map(|d| u32::from(d % 8) + 2);
    let settings = ArenaSettings {
        min_dimension: 2,
        fill_coefficient: f64::from(input.fill % 101) / 100.0,
    };
    let catalog = [Weapon::new("Blaster", 45.0).unwrap(), Weapon::new("Railgun", 400.0).unwrap()];
    let arena = Arena::new(w, l, h, &settings, &catalog, &mut rng).unwrap();

    let mut robots = Vec::with_capacity(2);
    for (index, ((hp, armor), sigma)) in input.stats.into_iter().zip(input.sigma).enumerate() {
        let mut robot = Robot::new(
            format!("R{index}"),
            f64::from(hp.max(1)),
            f64::from(armor.max(1)),
        )
        .unwrap();
        if sigma > 0 {
            robot.set_weapon(Weapon::new("Own", f64::from(sigma)).unwrap());
        }
        robots.push(robot);
    }
    let second = robots.pop().unwrap();
    let first = robots.pop().unwrap();
    let players = [Player::new(1, first).unwrap(), Player::new(2, second).unwrap()];
    let Some(field) = Battlefield::deploy(arena, players, &mut rng) else {
        return;
    };

    let violations = check_invariants(&field);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    let mut answers = input.answers.iter().copied().cycle();
    let mut confirm = |_: &str, _: char| answers.next().unwrap_or(false);
    let mut duel = Duel::new(field);

    for command in input.commands.iter().take(64) {
        match duel.submit(&command.text(), &mut rng, &mut confirm) {
            Ok(_) => {}
            Err(EngineError::DuelOver) => break,
            Err(EngineError::InvalidCommandSyntax { .. }) => continue,
            Err(other) => panic!("unexpected rejection: {other}"),
        }
        let violations = check_invariants(duel.field());
        assert!(violations.is_empty(), "Invariants violated: {violations:?}");
    }

    if duel.is_over() {
        assert!(duel.decision().is_some());
    }
});
