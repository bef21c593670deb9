//! Tunable match parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{read, records};
use crate::error::{EngineError, EngineResult};
use crate::game::ArenaSettings;

/// Minimum arena dimension, fill coefficient and history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Every arena dimension must be at least this large.
    pub min_dimension: u32,
    /// Item fill coefficient per unit of volume.
    pub fill_coefficient: f64,
    /// Where the match history is written.
    pub save_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_dimension: 30,
            fill_coefficient: 0.2,
            save_file: PathBuf::from("saves.jsonl"),
        }
    }
}

impl Settings {
    /// Parse the three values, in order, from `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] unless the text holds
    /// exactly three tokens: a positive integer, a finite non-negative
    /// number and a file name.
    pub fn parse(text: &str, origin: &str) -> EngineResult<Self> {
        let invalid = |line: usize, reason: String| EngineError::InvalidConfiguration {
            origin: origin.to_string(),
            line,
            reason,
        };

        let tokens: Vec<(usize, &str)> = records(text)
            .flat_map(|(line, record)| record.split_whitespace().map(move |token| (line, token)))
            .collect();
        let &[(dim_line, dimension), (fill_line, fill), (_, save)] = tokens.as_slice() else {
            return Err(invalid(0, format!("expected 3 values, found {}", tokens.len())));
        };

        let min_dimension = dimension
            .parse::<u32>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| invalid(dim_line, format!("bad minimum dimension {dimension:?}")))?;
        let fill_coefficient = fill
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .ok_or_else(|| invalid(fill_line, format!("bad fill coefficient {fill:?}")))?;

        Ok(Self {
            min_dimension,
            fill_coefficient,
            save_file: PathBuf::from(save),
        })
    }

    /// Load settings from `path`, falling back to the defaults.
    ///
    /// A relative history file is resolved against the directory holding
    /// `path`.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let origin = path.display().to_string();
        let parsed = read(path).and_then(|text| Self::parse(&text, &origin));
        let mut settings = match parsed {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!(%error, "using default settings");
                Self::default()
            }
        };
        if let Some(dir) = path.parent().filter(|_| settings.save_file.is_relative()) {
            settings.save_file = dir.join(&settings.save_file);
        }
        settings
    }

    /// The arena construction parameters.
    #[must_use]
    pub const fn arena(&self) -> ArenaSettings {
        ArenaSettings {
            min_dimension: self.min_dimension,
            fill_coefficient: self.fill_coefficient,
        }
    }
}
