use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use super::storage::{KeyValueStore, PersistenceError};

/// Every record the game keeps between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Scores,
    BestScores,
    History,
    PlayerName,
    Category,
    DailyChallenge,
    Settings,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Scores => "flippy-scores",
            StorageKey::BestScores => "flippy-best-scores",
            StorageKey::History => "flippy-game-history",
            StorageKey::PlayerName => "flippy-player-name",
            StorageKey::Category => "flippy-category",
            StorageKey::DailyChallenge => "flippy-daily-challenge",
            StorageKey::Settings => "flippy-settings",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed JSON access to a [`KeyValueStore`]. Clones share the same store.
#[derive(Clone)]
pub struct Repository {
    store: Rc<RefCell<dyn KeyValueStore>>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Repository")
    }
}

impl Repository {
    pub fn new<S: KeyValueStore + 'static>(store: S) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }

    /// `None` when the key is absent, unreadable or holds something that does
    /// not decode as `T`.
    pub fn try_load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.store.borrow().get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                trace!(target: "storage", "No stored value for {}", key);
                return None;
            }
            Err(err) => {
                warn!(target: "storage", "Could not read {}: {}", key, err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(target: "storage", "Ignoring malformed {}: {}", key, err);
                None
            }
        }
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
        self.try_load(key).unwrap_or_default()
    }

    pub fn save<T: Serialize + ?Sized>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let contents = serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.borrow_mut().set(key.as_str(), &contents)
    }

    pub fn remove(&self, key: StorageKey) -> Result<(), PersistenceError> {
        self.store.borrow_mut().remove(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::MemoryStore;
    use crate::model::{BestScores, Category, Difficulty};

    #[test]
    fn test_missing_keys_load_defaults() {
        let repository = Repository::new(MemoryStore::new());
        let best: BestScores = repository.load(StorageKey::BestScores);
        assert_eq!(best, BestScores::default());
        let name: String = repository.load(StorageKey::PlayerName);
        assert_eq!(name, "");
        assert_eq!(repository.try_load::<Category>(StorageKey::Category), None);
    }

    #[test]
    fn test_malformed_values_load_defaults() {
        let repository = Repository::new(MemoryStore::with_entries([
            ("flippy-scores", "{not json"),
            ("flippy-category", "\"planets\""),
        ]));
        let scores: Vec<crate::model::ScoreRecord> = repository.load(StorageKey::Scores);
        assert!(scores.is_empty());
        assert_eq!(repository.load::<Category>(StorageKey::Category), Category::Animals);
    }

    #[test]
    fn test_save_then_load() {
        let repository = Repository::new(MemoryStore::new());
        let mut best = BestScores::default();
        best.offer(Difficulty::Hard, 77);
        repository.save(StorageKey::BestScores, &best).unwrap();

        let shared = repository.clone();
        assert_eq!(shared.load::<BestScores>(StorageKey::BestScores), best);

        repository.remove(StorageKey::BestScores).unwrap();
        assert_eq!(shared.try_load::<BestScores>(StorageKey::BestScores), None);
    }
}
