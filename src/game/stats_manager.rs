use chrono::NaiveDate;
use log::{info, warn};

use crate::game::repository::{Repository, StorageKey};
use crate::game::storage::PersistenceError;
use crate::model::{BestScores, Category, DailyChallenge, Difficulty, HistoryRecord, ScoreRecord};

pub const SCORE_HISTORY_LIMIT: usize = 30;
pub const GAME_HISTORY_LIMIT: usize = 50;

/// In-memory copy of everything persisted between games: the player's name,
/// chosen category, high score table, game history, best scores and today's
/// challenge. Each record loads independently; a missing or malformed one
/// falls back to its empty value.
#[derive(Debug)]
pub struct StatsManager {
    repository: Repository,
    player_name: String,
    category: Category,
    scores: Vec<ScoreRecord>,
    history: Vec<HistoryRecord>,
    best_scores: BestScores,
    daily_challenge: DailyChallenge,
}

impl StatsManager {
    pub fn load(repository: Repository, today: NaiveDate) -> Self {
        let mut scores: Vec<ScoreRecord> = repository.load(StorageKey::Scores);
        let mut history: Vec<HistoryRecord> = repository.load(StorageKey::History);
        sort_newest_first(&mut scores, |s| s.date, SCORE_HISTORY_LIMIT);
        sort_newest_first(&mut history, |h| h.date, GAME_HISTORY_LIMIT);

        let stored_challenge = repository.try_load(StorageKey::DailyChallenge);
        let manager = Self {
            player_name: repository.load(StorageKey::PlayerName),
            category: repository.load(StorageKey::Category),
            best_scores: repository.load(StorageKey::BestScores),
            daily_challenge: DailyChallenge::for_today(stored_challenge, today),
            scores,
            history,
            repository,
        };
        info!(
            target: "stats",
            "Loaded {} scores and {} history entries",
            manager.scores.len(),
            manager.history.len()
        );
        manager
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Name attached to new records, or `None` while it is blank.
    pub fn recording_name(&self) -> Option<String> {
        let trimmed = self.player_name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) -> Result<(), PersistenceError> {
        self.player_name = name.into();
        self.save_player_name()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) -> Result<(), PersistenceError> {
        self.category = category;
        self.save_all()
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn best_score(&self, difficulty: Difficulty) -> Option<u32> {
        self.best_scores.get(difficulty)
    }

    pub fn daily_challenge(&self) -> DailyChallenge {
        self.daily_challenge
    }

    /// Offers a new best; returns whether it replaced the old one. Persisted
    /// with the next [`StatsManager::save_all`].
    pub fn offer_best_score(&mut self, difficulty: Difficulty, score: u32) -> bool {
        self.best_scores.offer(difficulty, score)
    }

    pub fn record_score(&mut self, record: ScoreRecord) -> Result<(), PersistenceError> {
        self.scores.push(record);
        sort_newest_first(&mut self.scores, |s| s.date, SCORE_HISTORY_LIMIT);
        self.save_all()
    }

    pub fn record_history(&mut self, record: HistoryRecord) -> Result<(), PersistenceError> {
        self.history.push(record);
        sort_newest_first(&mut self.history, |h| h.date, GAME_HISTORY_LIMIT);
        self.save_all()
    }

    /// Marks today's challenge done. Returns `false` if it already was.
    pub fn complete_daily_challenge(&mut self, today: NaiveDate) -> Result<bool, PersistenceError> {
        if self.daily_challenge.is_completed_on(today) {
            return Ok(false);
        }
        self.daily_challenge = DailyChallenge::completed_on(today);
        self.repository
            .save(StorageKey::DailyChallenge, &self.daily_challenge)?;
        Ok(true)
    }

    /// Rolls the challenge over when the calendar day has changed.
    pub fn refresh_daily_challenge(&mut self, today: NaiveDate) -> bool {
        let current = DailyChallenge::for_today(Some(self.daily_challenge), today);
        let changed = current != self.daily_challenge;
        self.daily_challenge = current;
        changed
    }

    fn save_player_name(&self) -> Result<(), PersistenceError> {
        if self.player_name.is_empty() {
            return self.repository.remove(StorageKey::PlayerName);
        }
        self.repository
            .save(StorageKey::PlayerName, &self.player_name)
    }

    /// Writes each record in turn. There is no transaction across keys: a
    /// failure is logged, the remaining keys are still written and the first
    /// error is returned.
    pub fn save_all(&self) -> Result<(), PersistenceError> {
        let results = [
            self.repository.save(StorageKey::Scores, &self.scores),
            self.repository.save(StorageKey::BestScores, &self.best_scores),
            self.repository.save(StorageKey::History, &self.history),
            self.repository.save(StorageKey::Category, &self.category),
            self.save_player_name(),
        ];
        let mut first_error = None;
        for result in results {
            if let Err(err) = result {
                warn!(target: "stats", "Failed to persist stats: {}", err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn sort_newest_first<T>(records: &mut Vec<T>, date: impl Fn(&T) -> i64, limit: usize) {
    records.sort_by_key(|r| std::cmp::Reverse(date(r)));
    records.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::{KeyValueStore, MemoryStore};
    use crate::model::GameOutcome;
    use std::time::Duration;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn score(date: i64) -> ScoreRecord {
        ScoreRecord {
            player_name: "Ada".to_string(),
            difficulty: Difficulty::Easy,
            moves: 8,
            time: Duration::from_secs(40),
            date,
            category: Category::Animals,
            playthrough_id: Uuid::new_v4(),
        }
    }

    fn manager() -> StatsManager {
        StatsManager::load(Repository::new(MemoryStore::new()), today())
    }

    #[test]
    fn test_empty_store_loads_neutral_values() {
        let stats = manager();
        assert_eq!(stats.player_name(), "");
        assert_eq!(stats.recording_name(), None);
        assert_eq!(stats.category(), Category::Animals);
        assert!(stats.scores().is_empty());
        assert!(stats.history().is_empty());
        assert_eq!(stats.best_score(Difficulty::Easy), None);
        assert_eq!(stats.daily_challenge(), DailyChallenge::fresh(today()));
    }

    #[test]
    fn test_each_key_loads_independently() {
        let repository = Repository::new(MemoryStore::with_entries([
            ("flippy-player-name", "\"Grace\""),
            ("flippy-category", "\"vehicles\""),
            ("flippy-best-scores", "garbage"),
            ("flippy-game-history", "[]"),
            ("flippy-daily-challenge", r#"{"date":"2026-10-17","completed":true}"#),
        ]));
        let stats = StatsManager::load(repository, today());
        assert_eq!(stats.player_name(), "Grace");
        assert_eq!(stats.category(), Category::Vehicles);
        assert_eq!(stats.best_score(Difficulty::Easy), None);
        // yesterday's completion does not count today
        assert!(!stats.daily_challenge().completed);
        assert_eq!(stats.daily_challenge().date, today());
    }

    #[test]
    fn test_score_history_is_capped_and_newest_first() {
        let mut stats = manager();
        for date in [5, 40, 1, 33, 12, 7, 29, 18, 2, 36, 24, 9, 31, 15, 26, 3, 38, 20, 11, 34, 6, 22, 27, 14, 39, 8, 17, 30, 4, 25, 13, 37, 21, 10, 35] {
            stats.record_score(score(date)).unwrap();
            assert!(stats.scores().len() <= SCORE_HISTORY_LIMIT);
            assert!(stats.scores().windows(2).all(|w| w[0].date >= w[1].date));
        }
        assert_eq!(stats.scores().len(), SCORE_HISTORY_LIMIT);
        assert_eq!(stats.scores().first().map(|s| s.date), Some(40));
    }

    #[test]
    fn test_game_history_is_capped_at_fifty() {
        let mut stats = manager();
        for date in 0..60 {
            let record = HistoryRecord::from_score(&score(date), GameOutcome::Lost);
            stats.record_history(record).unwrap();
        }
        assert_eq!(stats.history().len(), GAME_HISTORY_LIMIT);
        assert_eq!(stats.history()[0].date, 59);
        assert_eq!(stats.history()[GAME_HISTORY_LIMIT - 1].date, 10);
    }

    #[test]
    fn test_records_survive_reload() {
        let repository = Repository::new(MemoryStore::new());
        let mut stats = StatsManager::load(repository.clone(), today());
        stats.set_player_name("Ada").unwrap();
        stats.offer_best_score(Difficulty::Medium, 150);
        stats.record_score(score(100)).unwrap();
        stats.set_category(Category::Fruits).unwrap();

        let reloaded = StatsManager::load(repository, today());
        assert_eq!(reloaded.player_name(), "Ada");
        assert_eq!(reloaded.category(), Category::Fruits);
        assert_eq!(reloaded.best_score(Difficulty::Medium), Some(150));
        assert_eq!(reloaded.scores().len(), 1);
    }

    #[test]
    fn test_blank_name_is_not_recorded() {
        let mut stats = manager();
        stats.set_player_name("   ").unwrap();
        assert_eq!(stats.recording_name(), None);
        stats.set_player_name("  Ada ").unwrap();
        assert_eq!(stats.recording_name().as_deref(), Some("Ada"));
    }

    #[test]
    fn test_daily_challenge_completes_once_per_day() {
        let repository = Repository::new(MemoryStore::new());
        let mut stats = StatsManager::load(repository.clone(), today());
        assert!(stats.complete_daily_challenge(today()).unwrap());
        assert!(!stats.complete_daily_challenge(today()).unwrap());

        let tomorrow = today().succ_opt().unwrap();
        assert!(stats.refresh_daily_challenge(tomorrow));
        assert!(!stats.daily_challenge().completed);
        assert!(stats.complete_daily_challenge(tomorrow).unwrap());

        let stored: DailyChallenge = repository.try_load(StorageKey::DailyChallenge).unwrap();
        assert_eq!(stored, DailyChallenge::completed_on(tomorrow));
    }

    #[test]
    fn test_daily_challenge_completes_on_a_new_day_without_refresh() {
        let mut stats = manager();
        assert!(stats.complete_daily_challenge(today()).unwrap());
        let tomorrow = today().succ_opt().unwrap();
        assert!(stats.complete_daily_challenge(tomorrow).unwrap());
        assert_eq!(stats.daily_challenge(), DailyChallenge::completed_on(tomorrow));
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_keeps_in_memory_record() {
        let mut stats = StatsManager::load(Repository::new(FailingStore), today());
        let err = stats.record_score(score(1)).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { ref key, .. } if key == "flippy-scores"));
        assert_eq!(stats.scores().len(), 1);
    }
}
