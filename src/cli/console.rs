//! Line-based console shared by setup prompts, turn commands and yes/no
//! questions.

use std::cell::RefCell;
use std::io::BufRead;

use robo_duel::{Battlefield, CommandSource, Confirm, EngineError, ResolvedAction};

const RULE: &str = "----------------------------------------------";

/// Reads answers line by line. Scripted input is echoed so the transcript
/// reads like an interactive session.
#[derive(Debug)]
pub(crate) struct Console<R> {
    input: RefCell<R>,
    echo: bool,
}

impl<R: BufRead> Console<R> {
    pub(crate) const fn new(input: R, echo: bool) -> Self {
        Self {
            input: RefCell::new(input),
            echo,
        }
    }

    /// Next line without its terminator, `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than ending the input,
    /// so a garbled line is rejected as a command and the slot is asked
    /// again.
    pub(crate) fn read_line(&self) -> Option<String> {
        let mut bytes = Vec::new();
        match self.input.borrow_mut().read_until(b'\n', &mut bytes) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "input failed, treating it as closed");
                return None;
            }
        }
        let line = String::from_utf8_lossy(&bytes)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        if self.echo {
            println!("> {line}");
        }
        Some(line)
    }

    /// Print `prompt` and read the answer.
    pub(crate) fn ask(&self, prompt: &str) -> Option<String> {
        println!("{prompt}");
        self.read_line()
    }

    /// Turn commands drawn from this console.
    pub(crate) const fn commands(&self) -> Commands<'_, R> {
        Commands { console: self }
    }

    /// Yes/no answers drawn from this console.
    pub(crate) const fn answers(&self) -> Answers<'_, R> {
        Answers { console: self }
    }
}

/// [`CommandSource`] view of a [`Console`].
#[derive(Debug)]
pub(crate) struct Commands<'a, R> {
    console: &'a Console<R>,
}

impl<R: BufRead> CommandSource for Commands<'_, R> {
    fn next_command(&mut self, field: &Battlefield, turn: u32, number: u8) -> Option<String> {
        println!("{RULE}");
        for line in field.status_lines() {
            println!("{line}");
        }
        println!("{RULE}");

        let player = field.active(number);
        let robot = player.robot();
        println!("TURN {turn} - ACTION {number} (PLAYER {})", player.id());
        println!("To move: type \"move dx dy dz\", for example: move 2 1 -1");
        println!("-> {} moves at most {} units", robot.name(), robot.move_limit());
        if turn != 1 {
            println!("To attack the opponent: type \"attack\"");
        }
        println!("To end the game: type \"exit\"");
        println!("{RULE}");
        self.console.read_line()
    }

    fn rejected(&mut self, error: &EngineError) {
        eprintln!("{error}. Try again.");
    }

    fn resolved(&mut self, action: &ResolvedAction) {
        print!("{action}");
    }
}

/// [`Confirm`] view of a [`Console`].
#[derive(Debug)]
pub(crate) struct Answers<'a, R> {
    console: &'a Console<R>,
}

impl<R: BufRead> Confirm for Answers<'_, R> {
    fn confirm(&mut self, question: &str, yes: char) -> bool {
        println!("{question}");
        let answer = self
            .console
            .ask(&format!("Type '{yes}' for yes, anything else for no."));
        answer.is_some_and(|line| line.trim_start().starts_with(yes))
    }
}
