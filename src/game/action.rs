//! Single-turn command interpreter.
//!
//! An [`Action`] is pending until [`Action::make`] consumes it. Resolution
//! either rejects the command text (the pending action is dropped and the
//! caller asks again) or produces a [`ResolvedAction`] whose event log can
//! no longer change.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Arena, Battlefield, Confirm, Coord, Effect, Player, PlayerId, Robot};
use crate::game::{exchange_weapon, trigger};

/// Token a player answers with to take a weapon.
const YES: char = 'y';

/// Random single-axis probes before the collision fix scans neighbours.
const DISPLACEMENT_ATTEMPTS: u32 = 64;

/// The six unit offsets along one axis.
const NEIGHBOURS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shoot the opponent with the equipped weapon.
    Attack,
    /// Displace the robot by the given offset.
    Move {
        /// Offset along x.
        dx: i32,
        /// Offset along y.
        dy: i32,
        /// Offset along z.
        dz: i32,
    },
    /// Forfeit the match.
    Exit,
}

impl FromStr for Command {
    type Err = EngineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidCommandSyntax {
            command: line.to_string(),
        };
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("attack") => Ok(Self::Attack),
            Some("exit") => Ok(Self::Exit),
            Some("move") => {
                let offsets = tokens
                    .map(str::parse::<i32>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| invalid())?;
                match offsets.as_slice() {
                    &[dx, dy, dz] => Ok(Self::Move { dx, dy, dz }),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }
}

/// What the caller should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Keep playing.
    Continue,
    /// The acting player quit.
    Terminate,
}

/// One entry of an action's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The command line as typed.
    Command {
        /// Raw text.
        text: String,
    },
    /// Turn and action numbers.
    Header {
        /// Turn number.
        turn: u32,
        /// Action number inside the turn.
        number: u8,
    },
    /// An attack was carried out.
    Attack {
        /// Acting player.
        attacker: PlayerId,
        /// Attacked player.
        target: PlayerId,
        /// Damage dealt, possibly zero.
        damage: f64,
    },
    /// The robot moved.
    Moved {
        /// Acting player.
        player: PlayerId,
        /// Final cell.
        to: Coord,
    },
    /// The destination was taken by the opponent.
    Collision {
        /// Intended destination.
        from: Coord,
        /// Corrected destination.
        to: Coord,
    },
    /// A bomb went off under the robot.
    Exploded {
        /// Damage taken.
        damage: f64,
    },
    /// The robot caught a virus.
    Infected {
        /// Life span of the infection.
        turns: u32,
    },
    /// The robot stepped on a weapon.
    WeaponFound {
        /// Label of the weapon found.
        weapon: String,
        /// Whether the player took it.
        taken: bool,
    },
    /// The attached virus ticked.
    VirusDamage {
        /// Damage taken.
        damage: f64,
    },
    /// An illegal move was cancelled and punished.
    Foul {
        /// Why the move was illegal.
        reason: String,
        /// Penalty damage.
        damage: f64,
    },
    /// The acting player quit.
    Exit,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { text } => write!(f, "Command: {text}"),
            Self::Header { turn, number } => write!(f, "TURN {turn} - ACTION {number}"),
            Self::Attack {
                attacker,
                target,
                damage,
            } => write!(f, "Player {attacker} attacked Player {target}. Damage: {damage:.1}."),
            Self::Moved { player, to } => write!(f, "Player {player} moved to {to}."),
            Self::Collision { from, to } => {
                write!(f, "Position {from} already taken. Displaced to {to}.")
            }
            Self::Exploded { damage } => write!(f, "Bomb found! Took {damage:.1} damage."),
            Self::Infected { turns } => {
                write!(f, "Virus found! Robot infected for {turns} turns.")
            }
            Self::WeaponFound { weapon, taken } => {
                let verdict = if *taken { "and took it" } else { "but left it" };
                write!(f, "Robot found weapon {weapon} {verdict}.")
            }
            Self::VirusDamage { damage } => write!(f, "Took {damage:.1} virus damage."),
            Self::Foul { reason, damage } => {
                write!(f, "Reckless move cancelled: {reason}. Took {damage:.0} damage.")
            }
            Self::Exit => write!(f, "The game was ended."),
        }
    }
}

/// A pending action for one slot of the match.
#[derive(Debug)]
pub struct Action {
    turn: u32,
    number: u8,
    events: Vec<Event>,
}

impl Action {
    /// Create the pending action for `turn` and action `number`.
    ///
    /// # Panics
    ///
    /// Panics if `turn` is zero or `number` is not 1 or 2.
    #[must_use]
    pub fn new(turn: u32, number: u8) -> Self {
        assert!(turn > 0, "turns start at 1");
        assert!(matches!(number, 1 | 2), "action number must be 1 or 2");
        Self {
            turn,
            number,
            events: Vec::new(),
        }
    }

    /// Turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Action number inside the turn.
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// Resolve `command` against `field`.
    ///
    /// Illegal moves do not fail: they become fouls and the action still
    /// resolves. `exit` only records the intent; killing the quitter is up
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCommandSyntax`] if `command` does not
    /// parse. The action is consumed either way.
    pub fn make<D, C>(
        mut self,
        command: &str,
        field: &mut Battlefield,
        dice: &mut D,
        confirm: &mut C,
    ) -> EngineResult<ResolvedAction>
    where
        D: Dice + ?Sized,
        C: Confirm + ?Sized,
    {
        let parsed: Command = command.parse()?;

        self.events.push(Event::Command {
            text: command.trim().to_string(),
        });
        self.events.push(Event::Header {
            turn: self.turn,
            number: self.number,
        });

        let (active, passive, arena) = field.pair_mut(self.number);
        let player = active.id();

        match parsed {
            Command::Exit => {
                self.events.push(Event::Exit);
                return Ok(self.finish(player, Signal::Terminate));
            }
            Command::Attack => {
                let damage = active.robot().attack(passive.robot_mut(), dice);
                self.events.push(Event::Attack {
                    attacker: player,
                    target: passive.id(),
                    damage,
                });
            }
            Command::Move { dx, dy, dz } => {
                let opponent = passive.robot().position();
                let moved = relocate(
                    player,
                    active.robot_mut(),
                    (dx, dy, dz),
                    arena,
                    opponent,
                    dice,
                    confirm,
                );
                match moved {
                    Ok(events) => self.events.extend(events),
                    Err(violation) if violation.is_movement_violation() => {
                        self.events.push(punish(active, &violation));
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        let robot = active.robot_mut();
        if robot.is_infected() {
            let damage = robot.receive_virus_damage(dice);
            tracing::debug!(player, damage, "virus tick");
            self.events.push(Event::VirusDamage { damage });
        }

        Ok(self.finish(player, Signal::Continue))
    }

    fn finish(self, player: PlayerId, signal: Signal) -> ResolvedAction {
        let log = self.events.iter().fold(String::new(), |mut log, event| {
            log.push_str(&event.to_string());
            log.push('\n');
            log
        });
        ResolvedAction {
            turn: self.turn,
            number: self.number,
            player,
            events: self.events,
            log,
            signal,
        }
    }
}

/// Carry out a move, returning the events it produced.
fn relocate<D, C>(
    player: PlayerId,
    robot: &mut Robot,
    (dx, dy, dz): (i32, i32, i32),
    arena: &mut Arena,
    opponent: Option<Coord>,
    dice: &mut D,
    confirm: &mut C,
) -> EngineResult<Vec<Event>>
where
    D: Dice + ?Sized,
    C: Confirm + ?Sized,
{
    let requested = u64::from(dx.unsigned_abs()) + u64::from(dy.unsigned_abs()) + u64::from(dz.unsigned_abs());
    if requested > u64::from(robot.move_limit()) {
        return Err(EngineError::ExceedsMoveLimit {
            requested: u32::try_from(requested).unwrap_or(u32::MAX),
            limit: robot.move_limit(),
        });
    }
    let Some(origin) = robot.position() else {
        return Err(EngineError::OutOfBounds {
            coord: Coord::new(dx, dy, dz),
        });
    };
    let target = origin.offset(dx, dy, dz);
    if !arena.contains(target) {
        return Err(EngineError::OutOfBounds { coord: target });
    }

    let mut events = Vec::new();
    match trigger(arena, target, robot, dice)? {
        Some(Effect::Exploded { damage }) => events.push(Event::Exploded { damage }),
        Some(Effect::Infected { turns }) => events.push(Event::Infected { turns }),
        Some(Effect::WeaponSwapped { equipped, .. }) => {
            let weapon = equipped.unwrap_or_default();
            let taken = confirm.confirm(&format!("Weapon {weapon} found. Take it?"), YES);
            if !taken {
                exchange_weapon(arena, target, robot);
            }
            tracing::debug!(%weapon, taken, "weapon found");
            events.push(Event::WeaponFound { weapon, taken });
        }
        None => {}
    }

    if opponent == Some(target) {
        let fixed = displace(arena, target, origin, dice);
        robot.set_position(fixed);
        tracing::debug!(%target, %fixed, "collision fixed");
        events.push(Event::Moved { player, to: fixed });
        events.push(Event::Collision {
            from: target,
            to: fixed,
        });
    } else {
        robot.set_position(target);
        events.push(Event::Moved { player, to: target });
    }
    Ok(events)
}

/// Pick an in-bounds cell one step away from `occupied` along one axis.
///
/// Falls back to `origin` if no neighbour lies inside the arena.
fn displace<D: Dice + ?Sized>(arena: &Arena, occupied: Coord, origin: Coord, dice: &mut D) -> Coord {
    let usable = |cell: Coord| arena.contains(cell) && cell != occupied;
    for _ in 0..DISPLACEMENT_ATTEMPTS {
        let axis = dice.below(3);
        let step = match dice.below(3) {
            0 => -1,
            1 => 0,
            _ => 1,
        };
        let candidate = match axis {
            0 => occupied.offset(step, 0, 0),
            1 => occupied.offset(0, step, 0),
            _ => occupied.offset(0, 0, step),
        };
        if usable(candidate) {
            return candidate;
        }
    }
    NEIGHBOURS
        .iter()
        .map(|&(dx, dy, dz)| occupied.offset(dx, dy, dz))
        .find(|cell| usable(*cell))
        .unwrap_or(origin)
}

/// Charge a foul to `player`: the n-th foul costs `2^n` health.
fn punish(player: &mut Player, violation: &EngineError) -> Event {
    let fouls = player.add_foul();
    let damage = 2f64.powi(i32::try_from(fouls).unwrap_or(i32::MAX));
    player.robot_mut().receive_damage(damage);
    tracing::debug!(player = player.id(), fouls, damage, %violation, "foul");
    Event::Foul {
        reason: violation.to_string(),
        damage,
    }
}

/// A consumed action: its slot, who acted and the frozen log.
///
/// Ordered and compared by `(turn, number)` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAction {
    turn: u32,
    number: u8,
    player: PlayerId,
    events: Vec<Event>,
    log: String,
    signal: Signal,
}

impl ResolvedAction {
    /// Turn number.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Action number inside the turn.
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// The acting player.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Events in the order they happened.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The rendered log, one event per line.
    #[must_use]
    pub fn log(&self) -> &str {
        &self.log
    }

    /// What the caller should do next.
    #[must_use]
    pub const fn signal(&self) -> Signal {
        self.signal
    }
}

impl PartialEq for ResolvedAction {
    fn eq(&self, other: &Self) -> bool {
        (self.turn, self.number) == (other.turn, other.number)
    }
}

impl Eq for ResolvedAction {}

impl PartialOrd for ResolvedAction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResolvedAction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.turn, self.number).cmp(&(other.turn, other.number))
    }
}

impl fmt::Display for ResolvedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.log)
    }
}
