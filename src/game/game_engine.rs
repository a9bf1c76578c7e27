use log::{debug, info, trace, warn};
use rand::RngCore;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

use super::clock::Clock;
use super::repository::Repository;
use super::scoring::final_score;
use super::settings::Settings;
use super::sound::{SoundCue, SoundPlayer};
use super::stats_manager::StatsManager;
use super::storage::PersistenceError;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    CardId, Category, Difficulty, GameCompletion, GameEngineCommand, GameEngineEvent, GameOutcome,
    GamePhase, GameSession, HistoryRecord, PairOutcome, PendingFlipBack, ScoreRecord, SessionId,
};

/// How long a mismatched pair stays visible before it is turned back over.
pub const FLIP_BACK_DELAY: Duration = Duration::from_secs(1);

pub struct GameEngine {
    session: GameSession,
    playthrough_id: Uuid,
    settings: Settings,
    stats: StatsManager,
    repository: Repository,
    clock: Rc<dyn Clock>,
    sound_player: Rc<dyn SoundPlayer>,
    debug_mode: bool,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

fn pick_seed(requested: Option<u64>) -> u64 {
    requested
        .or_else(Settings::seed_from_env)
        .unwrap_or_else(|| rand::rng().next_u64())
}

fn log_persistence_failure(result: Result<(), PersistenceError>) {
    if let Err(err) = result {
        warn!(target: "game_engine", "Could not save records: {}", err);
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        repository: Repository,
        clock: Rc<dyn Clock>,
        sound_player: Rc<dyn SoundPlayer>,
    ) -> Rc<RefCell<Self>> {
        let settings = Settings::load(&repository);
        let stats = StatsManager::load(repository.clone(), clock.today());
        let session = GameSession::new(
            SessionId(1),
            settings.difficulty,
            stats.category(),
            pick_seed(None),
        );
        let engine = Self {
            session,
            playthrough_id: Uuid::new_v4(),
            settings,
            stats,
            repository,
            clock,
            sound_player,
            debug_mode: Settings::is_debug_mode(),
            subscription: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            engine_handler.borrow_mut().handle_command(command.clone());
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &StatsManager {
        &self.stats
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.playthrough_id
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(event);
    }

    fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::Flip(card_id) => self.handle_flip(card_id),
            GameEngineCommand::FlipBack(pending) => self.handle_flip_back(pending),
            GameEngineCommand::Tick(session_id) => self.handle_tick(session_id),
            GameEngineCommand::NewGame(seed) => self.new_game(seed),
            GameEngineCommand::ChangeDifficulty(_)
            | GameEngineCommand::ChangeCategory(_)
            | GameEngineCommand::SetPlayerName(_)
                if self.session.is_playing() =>
            {
                self.reject_setup_change(&command)
            }
            GameEngineCommand::ChangeDifficulty(difficulty) => self.change_difficulty(difficulty),
            GameEngineCommand::ChangeCategory(category) => self.change_category(category),
            GameEngineCommand::SetPlayerName(name) => self.set_player_name(name),
            GameEngineCommand::SetMuted(muted) => self.set_muted(muted),
            GameEngineCommand::InitDisplay => self.sync_display(),
        }
    }

    fn new_game(&mut self, seed: Option<u64>) {
        if self.session.is_playing() {
            self.emit(GameEngineEvent::TimerStopped(self.session.id));
        }
        let seed = pick_seed(seed);
        let id = self.session.id.next();
        info!(
            target: "game_engine",
            "New game {:?}; difficulty: {}; category: {}; seed: {}",
            id, self.settings.difficulty, self.stats.category(), seed
        );
        self.session = GameSession::new(id, self.settings.difficulty, self.stats.category(), seed);
        self.playthrough_id = Uuid::new_v4();
        if self.debug_mode {
            let layout: Vec<&str> = self.session.deck.iter().map(|c| c.symbol.as_str()).collect();
            debug!(target: "game_engine", "Deck layout: {:?}", layout);
        }
        if self.stats.refresh_daily_challenge(self.clock.today()) {
            self.emit(GameEngineEvent::DailyChallengeChanged(
                self.stats.daily_challenge(),
            ));
        }
        self.sync_session();
    }

    fn handle_flip(&mut self, card_id: CardId) {
        let Some(flipped) = self.session.apply_flip(card_id) else {
            return;
        };
        let started = self.session.phase == GamePhase::Idle && flipped.is_playing();
        self.session = flipped;
        self.play(SoundCue::Flip);
        if started {
            self.emit(GameEngineEvent::TimerStarted(self.session.id));
        }

        let Some((resolved, outcome)) = self.session.resolve_pair() else {
            self.sync_session();
            return;
        };
        self.session = resolved;
        self.sync_session();
        match outcome {
            PairOutcome::Matched { completed, .. } => {
                self.play(SoundCue::Match);
                if completed {
                    self.finish_won();
                }
            }
            PairOutcome::Mismatched(pending) => {
                self.emit(GameEngineEvent::FlipBackScheduled {
                    pending,
                    delay: FLIP_BACK_DELAY,
                });
            }
        }
    }

    fn handle_flip_back(&mut self, pending: PendingFlipBack) {
        match self.session.flip_back(pending) {
            Some(next) => {
                self.session = next;
                self.sync_session();
            }
            None => {
                trace!(target: "game_engine", "Dropping stale flip-back {:?}", pending);
            }
        }
    }

    fn handle_tick(&mut self, session_id: SessionId) {
        if session_id != self.session.id || !self.session.is_playing() {
            trace!(target: "game_engine", "Dropping tick for {:?}", session_id);
            return;
        }
        self.session = self.session.tick();
        self.sync_session();
        if self.session.phase == GamePhase::Lost {
            self.finish_lost();
        }
    }

    fn finish_won(&mut self) {
        let Some(score) = final_score(&self.session) else {
            return;
        };
        self.emit(GameEngineEvent::TimerStopped(self.session.id));

        let difficulty = self.session.difficulty;
        let moves = self.session.moves;
        let time_spent = self.session.time_spent();
        let new_best = self.stats.offer_best_score(difficulty, score);
        info!(
            target: "game_engine",
            "Won {} game in {} moves and {}s; score {} (best: {})",
            difficulty, moves, time_spent.as_secs(), score, new_best
        );

        match self.score_record() {
            Some(record) => {
                let history = HistoryRecord::from_score(&record, GameOutcome::Won);
                log_persistence_failure(self.stats.record_score(record));
                log_persistence_failure(self.stats.record_history(history));
            }
            None => log_persistence_failure(self.stats.save_all()),
        }

        let today = self.clock.today();
        let daily_challenge_completed = match self.stats.complete_daily_challenge(today) {
            Ok(completed) => completed,
            Err(err) => {
                warn!(target: "game_engine", "Could not save daily challenge: {}", err);
                true
            }
        };
        if daily_challenge_completed {
            self.emit(GameEngineEvent::DailyChallengeChanged(
                self.stats.daily_challenge(),
            ));
        }

        self.play(SoundCue::Success);
        self.emit(GameEngineEvent::GameCompleted(GameCompletion::Won {
            difficulty,
            score,
            new_best,
            moves,
            time_spent,
            daily_challenge_completed,
            playthrough_id: self.playthrough_id,
        }));
        self.emit(GameEngineEvent::RecordsChanged);
    }

    fn finish_lost(&mut self) {
        self.emit(GameEngineEvent::TimerStopped(self.session.id));
        info!(
            target: "game_engine",
            "Out of time on {} after {} moves",
            self.session.difficulty, self.session.moves
        );
        if let Some(record) = self.score_record() {
            let history = HistoryRecord::from_score(&record, GameOutcome::Lost);
            log_persistence_failure(self.stats.record_history(history));
        }
        self.emit(GameEngineEvent::GameCompleted(GameCompletion::Lost {
            difficulty: self.session.difficulty,
            moves: self.session.moves,
            playthrough_id: self.playthrough_id,
        }));
        self.emit(GameEngineEvent::RecordsChanged);
    }

    /// Record for the current session, or `None` when no player name is set.
    fn score_record(&self) -> Option<ScoreRecord> {
        let player_name = self.stats.recording_name()?;
        Some(ScoreRecord {
            player_name,
            difficulty: self.session.difficulty,
            moves: self.session.moves,
            time: self.session.time_spent(),
            date: self.clock.timestamp_millis(),
            category: self.session.category,
            playthrough_id: self.playthrough_id,
        })
    }

    /// Difficulty, category and player name are fixed while a game runs.
    /// The current values are re-published so controls snap back.
    fn reject_setup_change(&self, command: &GameEngineCommand) {
        debug!(target: "game_engine", "Ignoring {:?} during play", command);
        match command {
            GameEngineCommand::ChangeDifficulty(_) => {
                self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()))
            }
            GameEngineCommand::ChangeCategory(_) => {
                self.emit(GameEngineEvent::CategoryChanged(self.stats.category()))
            }
            _ => self.emit(GameEngineEvent::PlayerNameChanged(
                self.stats.player_name().to_string(),
            )),
        }
    }

    fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        log_persistence_failure(self.settings.save(&self.repository));
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
        self.new_game(None);
    }

    fn change_category(&mut self, category: Category) {
        log_persistence_failure(self.stats.set_category(category));
        self.emit(GameEngineEvent::CategoryChanged(category));
        self.new_game(None);
    }

    fn set_player_name(&mut self, name: String) {
        log_persistence_failure(self.stats.set_player_name(name));
        self.emit(GameEngineEvent::PlayerNameChanged(
            self.stats.player_name().to_string(),
        ));
    }

    fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        log_persistence_failure(self.settings.save(&self.repository));
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
    }

    fn play(&self, cue: SoundCue) {
        if self.settings.muted {
            return;
        }
        if let Err(err) = self.sound_player.play(cue) {
            debug!(target: "sound", "Audio error for {:?}: {}", cue, err);
        }
    }

    fn sync_session(&self) {
        self.emit(GameEngineEvent::SessionUpdated(self.session.clone()));
    }

    fn sync_display(&self) {
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
        self.emit(GameEngineEvent::PlayerNameChanged(
            self.stats.player_name().to_string(),
        ));
        self.emit(GameEngineEvent::CategoryChanged(self.stats.category()));
        self.emit(GameEngineEvent::DailyChallengeChanged(
            self.stats.daily_challenge(),
        ));
        self.emit(GameEngineEvent::RecordsChanged);
        self.sync_session();
    }
}
