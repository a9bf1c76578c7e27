use std::time::Duration;

use log::trace;
use serde::{Deserialize, Serialize};

use super::{CardId, Category, ComboMultiplier, Countdown, Deck, Difficulty};

/// Seconds taken off the clock for every mismatched pair.
pub const MISMATCH_PENALTY: Duration = Duration::from_secs(5);

/// Monotonic identifier of a dealt game. Delayed work (ticks, flip-backs)
/// carries the id of the session it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(&self) -> SessionId {
        SessionId(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Two mismatched cards waiting to be turned face-down again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFlipBack {
    pub session_id: SessionId,
    pub cards: [CardId; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Matched {
        first: CardId,
        second: CardId,
        completed: bool,
    },
    Mismatched(PendingFlipBack),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: SessionId,
    pub difficulty: Difficulty,
    pub category: Category,
    pub deck: Deck,
    pub flipped: Vec<CardId>,
    pub matches: usize,
    pub moves: u32,
    pub countdown: Countdown,
    pub combo: ComboMultiplier,
    pub phase: GamePhase,
}

impl GameSession {
    pub fn new(id: SessionId, difficulty: Difficulty, category: Category, seed: u64) -> Self {
        let deck = Deck::shuffled(category.symbols(), difficulty.pairs(), seed);
        Self::with_deck(id, difficulty, category, deck)
    }

    /// Starts a session over a pre-arranged deck.
    pub fn with_deck(id: SessionId, difficulty: Difficulty, category: Category, deck: Deck) -> Self {
        Self {
            id,
            difficulty,
            category,
            deck,
            flipped: Vec::with_capacity(2),
            matches: 0,
            moves: 0,
            countdown: Countdown::new(difficulty.time_limit()),
            combo: ComboMultiplier::default(),
            phase: GamePhase::Idle,
        }
    }

    pub fn pairs_required(&self) -> usize {
        self.deck.pair_count()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn time_spent(&self) -> Duration {
        self.countdown.time_spent()
    }

    pub fn has_pending_pair(&self) -> bool {
        self.flipped.len() == 2
    }

    pub fn can_flip(&self, card_id: CardId) -> bool {
        !self.is_over()
            && !self.has_pending_pair()
            && self.deck.get(card_id).is_some_and(|card| card.can_flip())
    }

    /// Turns a card face-up. `None` when the flip is not allowed, in which
    /// case the session is left exactly as it was.
    pub fn apply_flip(&self, card_id: CardId) -> Option<GameSession> {
        if !self.can_flip(card_id) {
            trace!(target: "game_session", "Ignoring flip of card {card_id}");
            return None;
        }
        let mut next = self.clone();
        next.deck.get_mut(card_id)?.is_flipped = true;
        next.flipped.push(card_id);
        if next.phase == GamePhase::Idle {
            next.phase = GamePhase::Playing;
        }
        Some(next)
    }

    /// Evaluates the two face-up cards. The flip buffer is always empty in the
    /// returned session; mismatched cards stay face-up until
    /// [`GameSession::flip_back`] is applied.
    pub fn resolve_pair(&self) -> Option<(GameSession, PairOutcome)> {
        let [first, second] = match self.flipped.as_slice() {
            [first, second] => [*first, *second],
            _ => return None,
        };
        let is_match = {
            let a = self.deck.get(first)?;
            let b = self.deck.get(second)?;
            a.pairs_with(b)
        };

        let mut next = self.clone();
        next.moves += 1;
        let outcome = if is_match {
            for id in [first, second] {
                next.deck.get_mut(id)?.is_matched = true;
            }
            next.matches += 1;
            next.combo = next.combo.bumped();
            let completed = next.matches >= next.pairs_required();
            if completed {
                next.phase = GamePhase::Won;
            }
            PairOutcome::Matched {
                first,
                second,
                completed,
            }
        } else {
            next.combo = next.combo.reset();
            next.countdown = next.countdown.penalized(MISMATCH_PENALTY);
            PairOutcome::Mismatched(PendingFlipBack {
                session_id: self.id,
                cards: [first, second],
            })
        };
        next.flipped.clear();
        trace!(target: "game_session", "Resolved pair {first}/{second}: {outcome:?}");
        Some((next, outcome))
    }

    /// One second of play. Only a playing session's clock moves; running out
    /// of time ends the game.
    pub fn tick(&self) -> GameSession {
        let mut next = self.clone();
        if next.phase != GamePhase::Playing {
            return next;
        }
        next.countdown = next.countdown.ticked();
        if next.countdown.is_expired() {
            next.phase = GamePhase::Lost;
            next.flipped.clear();
        }
        next
    }

    /// Turns mismatched cards face-down again. `None` when the request is
    /// stale: it targets another session or its cards are no longer the
    /// face-up, unmatched pair it was scheduled for.
    pub fn flip_back(&self, pending: PendingFlipBack) -> Option<GameSession> {
        if pending.session_id != self.id {
            return None;
        }
        let still_pending = pending.cards.iter().all(|id| {
            self.deck
                .get(*id)
                .is_some_and(|card| card.is_flipped && !card.is_matched)
                && !self.flipped.contains(id)
        });
        if !still_pending {
            return None;
        }
        let mut next = self.clone();
        for id in pending.cards {
            next.deck.get_mut(id)?.is_flipped = false;
        }
        Some(next)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Easy deck laid out as a,a,b,b,c,c,... so pairs sit next to each other.
    pub(crate) fn easy_session(id: u64) -> GameSession {
        let symbols: Vec<&str> = Category::Animals.symbols()[..6]
            .iter()
            .flat_map(|s| [*s, *s])
            .collect();
        GameSession::with_deck(
            SessionId(id),
            Difficulty::Easy,
            Category::Animals,
            Deck::from_symbols(&symbols),
        )
    }

    fn flip_pair(session: &GameSession, a: CardId, b: CardId) -> (GameSession, PairOutcome) {
        let session = session.apply_flip(a).unwrap().apply_flip(b).unwrap();
        session.resolve_pair().unwrap()
    }

    #[test]
    fn test_new_session_is_idle_with_full_clock() {
        let session = GameSession::new(SessionId(1), Difficulty::Easy, Category::Animals, 3);
        assert_eq!(session.phase, GamePhase::Idle);
        assert_eq!(session.deck.len(), 12);
        assert!(session.deck.is_well_formed());
        assert_eq!(session.countdown.remaining_secs(), 90);
        assert_eq!(session.combo.value(), 1.0);
        assert_eq!((session.moves, session.matches), (0, 0));
    }

    #[test]
    fn test_first_flip_starts_play() {
        let session = easy_session(1);
        let next = session.apply_flip(0).unwrap();
        assert_eq!(next.phase, GamePhase::Playing);
        assert!(next.deck.get(0).unwrap().is_flipped);
        assert_eq!(next.flipped, vec![0]);
        // the receiver is untouched
        assert_eq!(session.phase, GamePhase::Idle);
    }

    #[test]
    fn test_third_flip_while_pair_pending_is_ignored() {
        let session = easy_session(1).apply_flip(0).unwrap().apply_flip(2).unwrap();
        assert!(session.has_pending_pair());
        assert_eq!(session.apply_flip(4), None);
    }

    #[test]
    fn test_cannot_flip_same_card_twice() {
        let session = easy_session(1).apply_flip(0).unwrap();
        assert_eq!(session.apply_flip(0), None);
        assert_eq!(session.apply_flip(99), None);
    }

    #[test]
    fn test_match_then_mismatch() {
        let (session, outcome) = flip_pair(&easy_session(1), 0, 1);
        assert_eq!(
            outcome,
            PairOutcome::Matched {
                first: 0,
                second: 1,
                completed: false
            }
        );
        assert_eq!(session.matches, 1);
        assert_eq!(session.moves, 1);
        assert_eq!(session.combo.value(), 1.2);
        assert!(session.flipped.is_empty());

        let (session, outcome) = flip_pair(&session, 2, 4);
        assert_eq!(
            outcome,
            PairOutcome::Mismatched(PendingFlipBack {
                session_id: SessionId(1),
                cards: [2, 4]
            })
        );
        assert_eq!(session.moves, 2);
        assert_eq!(session.combo.value(), 1.0);
        assert_eq!(session.countdown.remaining_secs(), 85);
        assert!(session.flipped.is_empty());
        assert!(session.deck.get(2).unwrap().is_flipped);
        assert!(session.deck.get(4).unwrap().is_flipped);
    }

    #[test]
    fn test_matched_pair_stays_matched() {
        let (session, _) = flip_pair(&easy_session(1), 0, 1);
        assert_eq!(session.apply_flip(0), None);
        assert_eq!(session.apply_flip(1), None);

        let (session, _) = flip_pair(&session, 2, 4);
        let session = session
            .flip_back(PendingFlipBack {
                session_id: SessionId(1),
                cards: [2, 4],
            })
            .unwrap();
        assert!(session.deck.get(0).unwrap().is_matched);
        assert!(session.deck.get(1).unwrap().is_matched);
    }

    #[test]
    fn test_combo_grows_by_consecutive_matches_and_resets() {
        let (session, _) = flip_pair(&easy_session(1), 0, 1);
        let (session, _) = flip_pair(&session, 2, 3);
        assert_eq!(session.combo.value(), 1.4);
        let (session, _) = flip_pair(&session, 4, 6);
        assert_eq!(session.combo.value(), 1.0);
    }

    #[test]
    fn test_flip_back_turns_cards_down() {
        let (session, outcome) = flip_pair(&easy_session(1), 0, 2);
        let PairOutcome::Mismatched(pending) = outcome else {
            panic!("expected a mismatch");
        };
        let session = session.flip_back(pending).unwrap();
        assert!(!session.deck.get(0).unwrap().is_flipped);
        assert!(!session.deck.get(2).unwrap().is_flipped);
        // applying it twice is a no-op
        assert_eq!(session.flip_back(pending), None);
    }

    #[test]
    fn test_flip_back_from_previous_session_is_ignored() {
        let (_, outcome) = flip_pair(&easy_session(1), 0, 2);
        let PairOutcome::Mismatched(pending) = outcome else {
            panic!("expected a mismatch");
        };
        let fresh = easy_session(2).apply_flip(0).unwrap();
        assert_eq!(fresh.flip_back(pending), None);
    }

    #[test]
    fn test_cards_can_be_flipped_while_mismatch_is_showing() {
        let (session, _) = flip_pair(&easy_session(1), 0, 2);
        let session = session.apply_flip(4).unwrap();
        assert_eq!(session.flipped, vec![4]);
        // the mismatched cards themselves stay locked until flipped back
        assert_eq!(session.apply_flip(0), None);
    }

    #[test]
    fn test_all_pairs_wins() {
        let mut session = easy_session(1);
        for pair in 0..6 {
            let (next, outcome) = flip_pair(&session, pair * 2, pair * 2 + 1);
            session = next;
            let completed = matches!(outcome, PairOutcome::Matched { completed: true, .. });
            assert_eq!(completed, pair == 5);
        }
        assert_eq!(session.phase, GamePhase::Won);
        assert_eq!(session.matches, 6);
        assert!(session.is_over());
        assert_eq!(session.apply_flip(0), None);
    }

    #[test]
    fn test_tick_only_while_playing() {
        let idle = easy_session(1);
        assert_eq!(idle.tick().countdown.remaining_secs(), 90);

        let playing = idle.apply_flip(0).unwrap().tick();
        assert_eq!(playing.countdown.remaining_secs(), 89);
    }

    #[test]
    fn test_running_out_of_time_loses() {
        let mut session = easy_session(1).apply_flip(0).unwrap();
        for _ in 0..89 {
            session = session.tick();
        }
        assert_eq!(session.phase, GamePhase::Playing);
        session = session.tick();
        assert_eq!(session.phase, GamePhase::Lost);
        assert_eq!(session.countdown.remaining_secs(), 0);
        assert_eq!(session.tick(), session);
        assert_eq!(session.apply_flip(2), None);
    }
}
