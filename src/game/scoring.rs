//! Final score of a won game.
//!
//! `score = round(1000 × combo / (moves + 1 + seconds_spent / 10))`
//!
//! Fewer moves, less time and a longer closing match streak all raise the
//! score. The values used are the ones in effect after the last match.

use std::time::Duration;

use crate::model::{GamePhase, GameSession};

const BASE_POINTS: f64 = 1000.0;
const SECONDS_PER_MOVE: f64 = 10.0;

pub fn calculate_score(moves: u32, time_spent: Duration, combo: f64) -> u32 {
    let divisor = f64::from(moves) + 1.0 + time_spent.as_secs() as f64 / SECONDS_PER_MOVE;
    (BASE_POINTS * combo / divisor).round() as u32
}

/// Score of a finished session; `None` unless it was won.
pub fn final_score(session: &GameSession) -> Option<u32> {
    if session.phase != GamePhase::Won {
        return None;
    }
    Some(calculate_score(
        session.moves,
        session.time_spent(),
        session.combo.value(),
    ))
}
