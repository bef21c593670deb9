//! Persisted match history.
//!
//! One JSON object per line, one line per resolved action, in slot order.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::game::ResolvedAction;

/// Write `actions` to `path`, replacing any previous file.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if file operations or serialization fail.
pub fn save(path: &Path, actions: &[ResolvedAction]) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    for action in actions {
        serde_json::to_writer(&mut out, action)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    tracing::info!(path = %path.display(), actions = actions.len(), "history saved");
    Ok(())
}

/// Read a history written by [`save`].
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid
/// record.
pub fn load(path: &Path) -> io::Result<Vec<ResolvedAction>> {
    let reader = BufReader::new(File::open(path)?);
    let mut actions = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let action = serde_json::from_str(&line).map_err(|err| {
            io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {err}", index + 1))
        })?;
        actions.push(action);
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::duel::Duel;
    use crate::game::{Arena, ArenaSettings, AutoAnswer, Battlefield, Coord, Player, Robot, Signal};

    fn played() -> Vec<ResolvedAction> {
        let settings = ArenaSettings {
            min_dimension: 1,
            fill_coefficient: 0.0,
        };
        let arena = Arena::new(4, 4, 4, &settings, &[], &mut ScriptedDice::default()).unwrap();
        let mut players = [
            Player::new(1, Robot::new("Tank", 100.0, 10.0).unwrap()).unwrap(),
            Player::new(2, Robot::new("Scout", 100.0, 10.0).unwrap()).unwrap(),
        ];
        players[0].robot_mut().set_position(Coord::new(0, 0, 0));
        players[1].robot_mut().set_position(Coord::new(3, 3, 3));
        let mut duel = Duel::new(Battlefield::new(arena, players));
        let mut dice = ScriptedDice::default();
        for command in ["move 1 0 0", "move 9 0 0", "exit"] {
            duel.submit(command, &mut dice, &mut AutoAnswer(true)).unwrap();
        }
        duel.history().to_vec()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("saves.jsonl");
        let actions = played();

        save(&path, &actions).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        for (a, b) in actions.iter().zip(&loaded) {
            assert_eq!(a.log(), b.log());
            assert_eq!(a.events(), b.events());
        }
        assert_eq!(loaded[2].signal(), Signal::Terminate);
    }

    #[test]
    fn test_save_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.jsonl");
        let actions = played();
        save(&path, &actions).unwrap();
        save(&path, &actions[..1]).unwrap();
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves.jsonl");
        fs::write(&path, "\n{not json}\n").unwrap();
        let err = load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 2"));
    }
}
