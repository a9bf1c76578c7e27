use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DurationSeconds;
use std::time::Duration;
use uuid::Uuid;

use super::{Category, Difficulty};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Won,
    Lost,
}

/// A won game, as shown on the high score table.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub moves: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub time: Duration,
    /// Milliseconds since the unix epoch.
    pub date: i64,
    pub category: Category,
    #[serde(default)]
    pub playthrough_id: Uuid,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub moves: u32,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub time: Duration,
    pub date: i64,
    pub result: GameOutcome,
    pub category: Category,
    #[serde(default)]
    pub playthrough_id: Uuid,
}

impl HistoryRecord {
    pub fn from_score(score: &ScoreRecord, result: GameOutcome) -> Self {
        Self {
            player_name: score.player_name.clone(),
            difficulty: score.difficulty,
            moves: score.moves,
            time: score.time,
            date: score.date,
            result,
            category: score.category,
            playthrough_id: score.playthrough_id,
        }
    }
}
