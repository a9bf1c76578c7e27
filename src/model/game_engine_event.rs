use std::time::Duration;

use uuid::Uuid;

use super::{Category, DailyChallenge, Difficulty, GameSession, PendingFlipBack, SessionId};
use crate::game::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCompletion {
    Won {
        difficulty: Difficulty,
        score: u32,
        new_best: bool,
        moves: u32,
        time_spent: Duration,
        daily_challenge_completed: bool,
        playthrough_id: Uuid,
    },
    Lost {
        difficulty: Difficulty,
        moves: u32,
        playthrough_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    SessionUpdated(GameSession),
    /// The one-second clock for this session should start.
    TimerStarted(SessionId),
    TimerStopped(SessionId),
    /// Deliver `GameEngineCommand::FlipBack(pending)` after `delay`.
    FlipBackScheduled {
        pending: PendingFlipBack,
        delay: Duration,
    },
    GameCompleted(GameCompletion),
    RecordsChanged,
    DailyChallengeChanged(DailyChallenge),
    SettingsChanged(Settings),
    PlayerNameChanged(String),
    CategoryChanged(Category),
}
