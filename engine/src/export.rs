use crate::{Bracket, Game, Round};
use log::info;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode bracket: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GameRecord<'a> {
    game_id: u32,
    unique_game_id: u32,
    team1: String,
    team2: String,
    winner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
}

impl<'a> From<&'a Game> for GameRecord<'a> {
    fn from(game: &'a Game) -> Self {
        Self {
            game_id: game.game_id,
            unique_game_id: game.unique_game_id,
            team1: game.team1.label(),
            team2: game.team2.label(),
            winner: game.winner.label(),
            region: game.region.as_deref(),
        }
    }
}

/// Rounds as a map so the label order follows play order rather than
/// alphabetical key order.
struct RoundsView<'a>(&'a [Round]);

impl Serialize for RoundsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for round in self.0 {
            let games: Vec<GameRecord<'_>> = round.games.iter().map(GameRecord::from).collect();
            map.serialize_entry(round.kind.label(), &games)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultExporter;

impl ResultExporter {
    pub fn new() -> Self {
        Self
    }

    /// Indented JSON, rounds in play order.
    pub fn to_json(&self, bracket: &Bracket) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&RoundsView(&bracket.rounds))?)
    }

    /// Write the bracket to `path`, creating parent directories as needed.
    pub fn write_json(&self, bracket: &Bracket, path: &Path) -> Result<(), ExportError> {
        let json = self.to_json(bracket)?;
        let io_err = |source| ExportError::Io { path: path.display().to_string(), source };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;
        info!("bracket written to {}", path.display());
        Ok(())
    }
}
