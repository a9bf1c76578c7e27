pub mod clock;
pub mod game_engine;
pub mod repository;
pub mod scoring;
pub mod settings;
pub mod sound;
pub mod stats_manager;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use game_engine::{GameEngine, FLIP_BACK_DELAY};
pub use repository::{Repository, StorageKey};
pub use scoring::{calculate_score, final_score};
pub use settings::Settings;
pub use sound::{SoundCue, SoundError, SoundPlayer};
pub use stats_manager::StatsManager;
pub use storage::{FileStore, KeyValueStore, MemoryStore, PersistenceError};
