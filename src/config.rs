//! Match configuration: tunable parameters and the robot/weapon roster.
//!
//! Both sources are line based: tokens split on whitespace, blank lines and
//! lines starting with `#` ignored.

mod roster;
mod settings;

pub use roster::Roster;
pub use settings::Settings;

use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Non-blank, non-comment lines with their 1-based line numbers.
fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Read a whole configuration file.
fn read(path: &Path) -> EngineResult<String> {
    std::fs::read_to_string(path).map_err(|err| EngineError::InvalidConfiguration {
        origin: path.display().to_string(),
        line: 0,
        reason: err.to_string(),
    })
}
