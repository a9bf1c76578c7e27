mod best_scores;
mod card;
mod category;
mod combo;
mod countdown;
mod daily_challenge;
mod deck;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_record;
pub mod game_session;

pub use best_scores::BestScores;
pub use card::{Card, CardId};
pub use category::Category;
pub use combo::ComboMultiplier;
pub use countdown::Countdown;
pub use daily_challenge::DailyChallenge;
pub use deck::Deck;
pub use difficulty::Difficulty;
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{GameCompletion, GameEngineEvent};
pub use game_record::{GameOutcome, HistoryRecord, ScoreRecord};
pub use game_session::{
    GamePhase, GameSession, PairOutcome, PendingFlipBack, SessionId, MISMATCH_PENALTY,
};
