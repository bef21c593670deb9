//! Match loop: slot sequencing, forfeits and the end-of-match decision.

use std::collections::VecDeque;

use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Action, Battlefield, Confirm, PlayerId, ResolvedAction, Signal, assert_invariants};

/// Supplies command lines to [`Duel::run`].
pub trait CommandSource {
    /// The command for slot `(turn, number)`, or `None` once the source is
    /// exhausted. An exhausted source forfeits the match.
    fn next_command(&mut self, field: &Battlefield, turn: u32, number: u8) -> Option<String>;

    /// Called when a command was rejected; the same slot is asked again.
    fn rejected(&mut self, _error: &EngineError) {}

    /// Called after every resolved action.
    fn resolved(&mut self, _action: &ResolvedAction) {}
}

/// A fixed list of command lines.
#[derive(Debug, Clone, Default)]
pub struct Script {
    lines: VecDeque<String>,
}

impl Script {
    /// Create a script from command lines.
    #[must_use]
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl CommandSource for Script {
    fn next_command(&mut self, _field: &Battlefield, _turn: u32, _number: u8) -> Option<String> {
        self.lines.pop_front()
    }
}

/// How a finished match ended.
#[derive(Debug, Clone)]
pub struct DuelOutcome {
    /// The surviving player.
    pub winner: PlayerId,
    /// The defeated player.
    pub loser: PlayerId,
    /// Turn of the last action.
    pub turns: u32,
    /// Every resolved action, in order.
    pub history: Vec<ResolvedAction>,
}

/// A match in progress.
///
/// Action numbers alternate 1 (player 1) and 2 (player 2); the turn
/// counter grows whenever the action number wraps back to 1.
#[derive(Debug, Clone)]
pub struct Duel {
    field: Battlefield,
    turn: u32,
    number: u8,
    history: Vec<ResolvedAction>,
}

impl Duel {
    /// Start a match on `field`.
    ///
    /// Robots are normally placed with [`Battlefield::deploy`] first. An
    /// unplaced robot is still playable: its attacks deal nothing and every
    /// move it tries is a foul.
    #[must_use]
    pub const fn new(field: Battlefield) -> Self {
        Self {
            field,
            turn: 1,
            number: 1,
            history: Vec::new(),
        }
    }

    /// The `(turn, number)` of the next action.
    #[must_use]
    pub const fn slot(&self) -> (u32, u8) {
        (self.turn, self.number)
    }

    /// Current state of the arena and players.
    #[must_use]
    pub const fn field(&self) -> &Battlefield {
        &self.field
    }

    /// Actions resolved so far.
    #[must_use]
    pub fn history(&self) -> &[ResolvedAction] {
        &self.history
    }

    /// Whether a robot is dead.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.field.is_decided()
    }

    /// Resolve `command` for the current slot.
    ///
    /// `exit` kills the acting robot. On success the slot advances and the
    /// action is appended to the history.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuelOver`] once a robot is dead, or
    /// [`EngineError::InvalidCommandSyntax`] for malformed text, in which
    /// case nothing changes and the same slot should be asked again.
    pub fn submit<D, C>(&mut self, command: &str, dice: &mut D, confirm: &mut C) -> EngineResult<&ResolvedAction>
    where
        D: Dice + ?Sized,
        C: Confirm + ?Sized,
    {
        if self.is_over() {
            return Err(EngineError::DuelOver);
        }

        let resolved = Action::new(self.turn, self.number).make(command, &mut self.field, dice, confirm)?;
        if resolved.signal() == Signal::Terminate {
            let (quitter, _, _) = self.field.pair_mut(self.number);
            quitter.robot_mut().kill();
            tracing::info!(player = quitter.id(), turn = self.turn, "player forfeited");
        }
        assert_invariants(&self.field);
        tracing::trace!(turn = self.turn, number = self.number, "action resolved");

        if self.number == 1 {
            self.number = 2;
        } else {
            self.number = 1;
            self.turn += 1;
        }

        let index = self.history.len();
        self.history.push(resolved);
        Ok(&self.history[index])
    }

    /// `(winner, loser)` once a robot is dead.
    ///
    /// If both robots fall in the same action, the player who acted wins:
    /// their opponent went down first.
    #[must_use]
    pub fn decision(&self) -> Option<(PlayerId, PlayerId)> {
        let [first, second] = &self.field.players;
        match (first.is_defeated(), second.is_defeated()) {
            (false, false) => None,
            (true, false) => Some((second.id(), first.id())),
            (false, true) => Some((first.id(), second.id())),
            (true, true) => {
                let actor = self.history.last().map_or(first.id(), ResolvedAction::player);
                if actor == first.id() {
                    Some((first.id(), second.id()))
                } else {
                    Some((second.id(), first.id()))
                }
            }
        }
    }

    /// Play until a robot is dead, pulling commands from `source`.
    pub fn run<S, C, D>(mut self, source: &mut S, confirm: &mut C, dice: &mut D) -> DuelOutcome
    where
        S: CommandSource + ?Sized,
        C: Confirm + ?Sized,
        D: Dice + ?Sized,
    {
        tracing::info!(
            first = self.field.players[0].robot().name(),
            second = self.field.players[1].robot().name(),
            "duel started"
        );

        let (winner, loser) = loop {
            if let Some(decision) = self.decision() {
                break decision;
            }
            let (turn, number) = self.slot();
            let command = source
                .next_command(&self.field, turn, number)
                .unwrap_or_else(|| "exit".to_string());
            match self.submit(&command, dice, confirm) {
                Ok(resolved) => source.resolved(resolved),
                Err(error) => {
                    tracing::debug!(%error, "command rejected");
                    source.rejected(&error);
                }
            }
        };

        let turns = self.history.last().map_or(0, ResolvedAction::turn);
        tracing::info!(winner, loser, turns, "duel finished");
        DuelOutcome {
            winner,
            loser,
            turns,
            history: self.history,
        }
    }
}
