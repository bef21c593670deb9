//! Play command implementation.

use super::CliError;
use super::console::Console;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use robo_duel::{
    Arena, Battlefield, Dice, Duel, EngineError, Player, Robot, Roster, Settings, Weapon, history,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Inputs of the play command.
#[derive(Debug)]
pub(crate) struct PlayOptions {
    pub(crate) robots: PathBuf,
    pub(crate) weapons: PathBuf,
    pub(crate) config: PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) dims: Option<Vec<u32>>,
    pub(crate) script: Option<PathBuf>,
    pub(crate) save: Option<PathBuf>,
    pub(crate) min_dimension: Option<u32>,
    pub(crate) fill: Option<f64>,
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, setup input ends early
/// or the history cannot be saved.
pub(crate) fn execute(options: &PlayOptions) -> Result<(), CliError> {
    let roster = Roster::load(&options.robots, &options.weapons)?;

    let mut settings = Settings::load(&options.config);
    if let Some(min_dimension) = options.min_dimension {
        settings.min_dimension = min_dimension;
    }
    if let Some(fill) = options.fill {
        settings.fill_coefficient = fill;
    }
    if let Some(save) = options.save.clone() {
        settings.save_file = save;
    }

    // Generate seed if not provided
    let seed = options.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(42, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
    });
    tracing::info!(seed, "starting match");
    let mut rng = SmallRng::seed_from_u64(seed);

    match &options.script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| CliError::new(format!("Failed to open script {}: {e}", path.display())))?;
            play(&Console::new(BufReader::new(file), true), roster, &settings, options, &mut rng)
        }
        None => play(&Console::new(io::stdin().lock(), false), roster, &settings, options, &mut rng),
    }
}

fn play<R: BufRead>(
    console: &Console<R>,
    mut roster: Roster,
    settings: &Settings,
    options: &PlayOptions,
    rng: &mut SmallRng,
) -> Result<(), CliError> {
    println!("{RULE}\nROBO DUEL\n{RULE}");

    let mut players = Vec::with_capacity(2);
    for id in 1..=2 {
        let mut robot = choose_robot(console, &mut roster, id, rng)?;
        if let Some(weapon) = choose_weapon(console, &roster, id, rng)? {
            robot.set_weapon(weapon);
        }
        players.push(Player::new(id, robot)?);
    }
    let players: [Player; 2] = players
        .try_into()
        .map_err(|_| CliError::new("expected exactly two players"))?;

    let arena = build_arena(console, &roster.weapon_catalog(), settings, options.dims.as_deref(), rng)?;
    let field = Battlefield::deploy(arena, players, rng)
        .ok_or_else(|| CliError::new("The arena has no room for both robots"))?;

    let duel = Duel::new(field);
    let outcome = duel.run(&mut console.commands(), &mut console.answers(), rng);

    println!("{RULE}");
    println!("Game over!");
    println!("THE WINNER IS PLAYER {} after {} turns.", outcome.winner, outcome.turns);
    println!("{RULE}");

    history::save(&settings.save_file, &outcome.history).map_err(|e| {
        CliError::new(format!("Failed to save history to {}: {e}", settings.save_file.display()))
    })?;
    println!("History saved to: {}", settings.save_file.display());
    Ok(())
}

const RULE: &str = "----------------------------------------------";

fn choose_robot<R: BufRead, D: Dice>(
    console: &Console<R>,
    roster: &mut Roster,
    id: u8,
    dice: &mut D,
) -> Result<Robot, CliError> {
    println!("Player {id}, choose your robot:");
    for (index, robot) in roster.robots().enumerate() {
        println!("  {}. {robot}", index + 1);
    }
    loop {
        let answer = console
            .ask("Robot number (0 or empty for random):")
            .ok_or_else(|| CliError::new("input ended during setup"))?;
        if roster.robots().next().is_none() {
            return Err(CliError::new("the roster has no robots left"));
        }
        let drawn = parse_choice(&answer).and_then(|choice| roster.draw_robot(choice, dice));
        let Some(robot) = drawn else {
            eprintln!("Invalid option. Try again.");
            continue;
        };
        println!("Player {id} takes {}.", robot.name());
        return Ok(robot);
    }
}

fn choose_weapon<R: BufRead, D: Dice>(
    console: &Console<R>,
    roster: &Roster,
    id: u8,
    dice: &mut D,
) -> Result<Option<Weapon>, CliError> {
    if roster.weapons().next().is_none() {
        return Ok(None);
    }
    println!("Player {id}, choose your weapon:");
    for (index, weapon) in roster.weapons().enumerate() {
        println!("  {}. {weapon}", index + 1);
    }
    loop {
        let answer = console
            .ask("Weapon number (0 or empty for random):")
            .ok_or_else(|| CliError::new("input ended during setup"))?;
        let picked = parse_choice(&answer).and_then(|choice| roster.weapon(choice, dice));
        if picked.is_some() {
            return Ok(picked);
        }
        eprintln!("Invalid option. Try again.");
    }
}

fn build_arena<R: BufRead, D: Dice>(
    console: &Console<R>,
    weapons: &[Weapon],
    settings: &Settings,
    dims: Option<&[u32]>,
    dice: &mut D,
) -> Result<Arena, CliError> {
    let arena_settings = settings.arena();
    if let Some(&[w, l, h]) = dims {
        return Ok(Arena::new(w, l, h, &arena_settings, weapons, dice)?);
    }
    loop {
        let answer = console
            .ask("Enter the arena width, length and height as integers (e.g. 35 41 30):")
            .ok_or_else(|| CliError::new("input ended during setup"))?;
        let Some([w, l, h]) = parse_dims(&answer) else {
            eprintln!("Expected three integers. Try again.");
            continue;
        };
        match Arena::new(w, l, h, &arena_settings, weapons, dice) {
            Ok(arena) => return Ok(arena),
            Err(error @ EngineError::InvalidDimension { .. }) => eprintln!("{error}. Try again."),
            Err(error) => return Err(error.into()),
        }
    }
}

/// `Some(None)` for an empty answer or `0` (random pick), `Some(Some(i))`
/// for a 1-based menu number, `None` for anything else.
fn parse_choice(answer: &str) -> Option<Option<usize>> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Some(None);
    }
    answer.parse::<usize>().ok().map(|n| n.checked_sub(1))
}

fn parse_dims(answer: &str) -> Option<[u32; 3]> {
    let values: Vec<u32> = answer
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    values.try_into().ok()
}
