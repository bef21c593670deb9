//! Replay command implementation.

use super::{CliError, ReplayFormat};
use robo_duel::history;
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the history cannot be read.
pub(crate) fn execute(path: &Path, format: ReplayFormat) -> Result<(), CliError> {
    let actions = history::load(path)
        .map_err(|e| CliError::new(format!("Failed to load history {}: {e}", path.display())))?;

    match format {
        ReplayFormat::Text => {
            for action in &actions {
                print!("{action}");
                println!();
            }
            println!("{} actions.", actions.len());
        }
        ReplayFormat::Json => {
            for action in &actions {
                println!("{}", serde_json::to_string(action)?);
            }
        }
    }
    Ok(())
}
