//! Error types for the duel engine.

use std::fmt;

use crate::game::Coord;

/// Failures raised while setting up or resolving a duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Command text does not follow the `attack` / `move dx dy dz` / `exit` grammar.
    ///
    /// Non-fatal: the caller re-prompts for the same turn.
    InvalidCommandSyntax {
        /// The rejected command line.
        command: String,
    },
    /// A coordinate lies outside the arena grid.
    OutOfBounds {
        /// The offending coordinate.
        coord: Coord,
    },
    /// A move asks for more units than the robot can travel.
    ExceedsMoveLimit {
        /// Sum of the absolute displacement components.
        requested: u32,
        /// The robot's move limit.
        limit: u32,
    },
    /// Arena construction with a dimension outside the accepted range.
    InvalidDimension {
        /// Configured minimum for every dimension.
        minimum: u32,
        /// Largest accepted dimension.
        maximum: u32,
        /// Requested width.
        width: u32,
        /// Requested length.
        length: u32,
        /// Requested height.
        height: u32,
    },
    /// Malformed roster or parameter record.
    InvalidConfiguration {
        /// Where the record came from (file path or label).
        origin: String,
        /// 1-based line number, 0 when the whole source is at fault.
        line: usize,
        /// What is wrong with the record.
        reason: String,
    },
    /// Player identifiers start at 1.
    InvalidPlayer {
        /// The rejected identifier.
        id: u8,
    },
    /// Robots and weapons need strictly positive stats.
    InvalidStats {
        /// Name of the robot or weapon.
        name: String,
    },
    /// A command was submitted after one of the robots died.
    DuelOver,
}

impl EngineError {
    /// Whether this error breaks one of the movement rules.
    ///
    /// Movement violations never reach the caller of an action: they are
    /// turned into a foul instead.
    #[must_use]
    pub const fn is_movement_violation(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::ExceedsMoveLimit { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommandSyntax { command } => {
                write!(f, "invalid command {command:?}, expected `attack`, `move dx dy dz` or `exit`")
            }
            Self::OutOfBounds { coord } => write!(f, "position {coord} is outside the arena"),
            Self::ExceedsMoveLimit { requested, limit } => {
                write!(f, "move of {requested} units exceeds the limit of {limit}")
            }
            Self::InvalidDimension {
                minimum,
                maximum,
                width,
                length,
                height,
            } => write!(
                f,
                "arena {width} x {length} x {height} rejected, every dimension must be between {minimum} and {maximum}"
            ),
            Self::InvalidConfiguration {
                origin,
                line,
                reason,
            } => {
                if *line == 0 {
                    write!(f, "bad configuration in {origin}: {reason}")
                } else {
                    write!(f, "bad configuration in {origin} line {line}: {reason}")
                }
            }
            Self::InvalidPlayer { id } => write!(f, "invalid player id {id} (must be > 0)"),
            Self::InvalidStats { name } => {
                write!(f, "{name} must have strictly positive stats")
            }
            Self::DuelOver => write!(f, "the duel is already over"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
