use super::{CardId, Category, Difficulty, PendingFlipBack, SessionId};

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    Flip(CardId),
    /// Sent by the front-end once the mismatch delay has elapsed.
    FlipBack(PendingFlipBack),
    /// One elapsed second for the given session.
    Tick(SessionId),
    NewGame(Option<u64>), // deck seed
    ChangeDifficulty(Difficulty),
    ChangeCategory(Category),
    SetPlayerName(String),
    SetMuted(bool),
    InitDisplay,
}
