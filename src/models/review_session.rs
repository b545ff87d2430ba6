//! Flashcard review session over the cards that are currently due.
//!
//! Each card is presented front-side first, revealed, then rated. Rating runs
//! the SM-2 update and persists the new state before moving on. The session
//! ends after the last due card; restarting recomputes the due set.

use super::catalogue::PatternFilter;
use super::due::select_due;
use super::quiz::QuizScore;
use super::review_stats::ReviewStats;
use super::sm2::{compute_next, preview_intervals};
use super::{Rating, ReviewCard, ReviewState};
use crate::database::ReviewStore;
use crate::error::{Result, StudyError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing to review for the current filter.
    Empty,
    /// Front or question shown, answer hidden.
    Presenting,
    /// Answer shown, waiting for a rating or "next".
    Revealed,
    Complete,
}

impl SessionPhase {
    pub fn name(self) -> &'static str {
        match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Presenting => "presenting",
            SessionPhase::Revealed => "revealed",
            SessionPhase::Complete => "complete",
        }
    }

    pub(crate) fn invalid(self, action: &'static str) -> StudyError {
        StudyError::InvalidTransition {
            action,
            phase: self.name(),
        }
    }
}

/// What the completion screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub reviewed: usize,
    /// Only set for quiz sessions.
    pub score: Option<QuizScore>,
}

impl SessionSummary {
    /// At least 70% correct, or a flashcard session.
    pub fn is_great(&self) -> bool {
        self.score
            .and_then(|s| s.accuracy_percent())
            .is_none_or(|accuracy| accuracy >= 70)
    }
}

pub struct ReviewSession<S: ReviewStore> {
    all_cards: Vec<ReviewCard>,
    filter: PatternFilter,
    store: S,
    due_cards: Vec<ReviewCard>,
    current_index: usize,
    reviewed: usize,
    phase: SessionPhase,
    /// Recomputed when the session starts and after each rating.
    stats: ReviewStats,
    preview: Option<[i64; 4]>,
}

impl<S: ReviewStore> ReviewSession<S> {
    /// Creates a session over the cards of `all_cards` that pass `filter` and are due at `now`.
    pub fn new(all_cards: Vec<ReviewCard>, filter: PatternFilter, store: S, now: DateTime<Utc>) -> Self {
        let mut session = Self {
            all_cards,
            filter,
            store,
            due_cards: Vec::new(),
            current_index: 0,
            reviewed: 0,
            phase: SessionPhase::Empty,
            stats: ReviewStats::default(),
            preview: None,
        };
        session.start(now);
        session
    }

    fn start(&mut self, now: DateTime<Utc>) {
        let candidates: Vec<ReviewCard> = self
            .all_cards
            .iter()
            .filter(|card| self.filter.accepts(&card.pattern))
            .cloned()
            .collect();

        let states = self.store.load_all();
        self.due_cards = select_due(&candidates, &states, now);
        self.current_index = 0;
        self.reviewed = 0;
        self.phase = if self.due_cards.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Presenting
        };
        self.refresh(&states, now);
        log::debug!(
            "Review session started: {} of {} cards due",
            self.due_cards.len(),
            candidates.len()
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn filter(&self) -> &PatternFilter {
        &self.filter
    }

    /// The card on screen, while presenting or revealed.
    pub fn current_card(&self) -> Option<&ReviewCard> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => self.due_cards.get(self.current_index),
            _ => None,
        }
    }

    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn due_count(&self) -> usize {
        self.due_cards.len()
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviewed
    }

    pub fn reveal(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Presenting {
            return Err(self.phase.invalid("reveal"));
        }
        self.phase = SessionPhase::Revealed;
        Ok(())
    }

    /// Rates the revealed card, persists its next state and moves on.
    /// A failed save is logged; the session still advances.
    pub fn rate(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<ReviewState> {
        if self.phase != SessionPhase::Revealed {
            return Err(self.phase.invalid("rate"));
        }
        let card_id = self.due_cards[self.current_index].id.clone();

        let current = self
            .store
            .load(&card_id)
            .unwrap_or_else(|| ReviewState::new(now));
        let next = compute_next(&current, rating, now);

        if let Err(e) = self.store.save(&card_id, &next) {
            log::warn!("Failed to save review state for '{}': {}", card_id, e);
        }

        self.reviewed += 1;
        self.advance();
        let states = self.store.load_all();
        self.refresh(&states, now);
        Ok(next)
    }

    fn refresh(&mut self, states: &HashMap<String, ReviewState>, now: DateTime<Utc>) {
        self.stats = ReviewStats::from_states(states, now);
        self.preview = self.current_card().map(|card| {
            let state = states
                .get(&card.id)
                .cloned()
                .unwrap_or_else(|| ReviewState::new(now));
            preview_intervals(&state, now)
        });
    }

    fn advance(&mut self) {
        if self.current_index + 1 < self.due_cards.len() {
            self.current_index += 1;
            self.phase = SessionPhase::Presenting;
        } else {
            self.phase = SessionPhase::Complete;
        }
    }

    /// Starts over from a freshly computed due set.
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.start(now);
    }

    /// Changing the pattern filter restarts the session.
    pub fn set_filter(&mut self, filter: PatternFilter, now: DateTime<Utc>) {
        self.filter = filter;
        self.start(now);
    }

    /// Intervals each rating would give the current card.
    pub fn preview_intervals(&self) -> Option<[i64; 4]> {
        self.preview
    }

    pub fn stats(&self) -> ReviewStats {
        self.stats
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            reviewed: self.reviewed,
            score: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryReviewStore;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn card(id: &str, pattern: &str) -> ReviewCard {
        ReviewCard {
            id: id.to_string(),
            problem_id: format!("{}-problem", id),
            problem_title: format!("Problem {}", id),
            pattern: pattern.to_string(),
            front: format!("Q {}", id),
            back: format!("A {}", id),
        }
    }

    fn cards() -> Vec<ReviewCard> {
        vec![
            card("a", "array-hashing"),
            card("b", "two-pointers"),
            card("c", "array-hashing"),
        ]
    }

    /// Store that fails every write.
    struct BrokenStore;

    impl ReviewStore for BrokenStore {
        fn load(&self, _card_id: &str) -> Option<ReviewState> {
            None
        }
        fn load_all(&self) -> HashMap<String, ReviewState> {
            HashMap::new()
        }
        fn save(&mut self, _card_id: &str, _state: &ReviewState) -> Result<()> {
            Err(StudyError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_full_session_persists_each_rating() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, MemoryReviewStore::new(), now());
        assert_eq!(session.phase(), SessionPhase::Presenting);
        assert_eq!(session.due_count(), 3);

        for expected in ["a", "b", "c"] {
            assert_eq!(session.current_card().unwrap().id, expected);
            session.reveal().unwrap();
            assert_eq!(session.phase(), SessionPhase::Revealed);
            let next = session.rate(Rating::Easy, now()).unwrap();
            assert_eq!(next.repetitions, 1);
        }

        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(session.current_card().is_none());
        assert_eq!(session.summary().reviewed, 3);
        assert_eq!(session.store().load_all().len(), 3);
        assert_eq!(session.store().load("b").unwrap().next_review, now() + Duration::days(1));
    }

    #[test]
    fn test_rate_requires_reveal() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, MemoryReviewStore::new(), now());
        assert!(matches!(
            session.rate(Rating::Good, now()),
            Err(StudyError::InvalidTransition { action: "rate", .. })
        ));
        session.reveal().unwrap();
        assert!(session.reveal().is_err());
        assert!(session.store().load_all().is_empty());
    }

    #[test]
    fn test_empty_due_set_never_presents() {
        let mut states = HashMap::new();
        for c in cards() {
            states.insert(
                c.id.clone(),
                ReviewState {
                    next_review: now() + Duration::days(2),
                    ..ReviewState::new(now())
                },
            );
        }
        let mut session = ReviewSession::new(
            cards(),
            PatternFilter::All,
            MemoryReviewStore::with_states(states),
            now(),
        );

        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.current_card().is_none());
        assert!(session.reveal().is_err());
    }

    #[test]
    fn test_restart_recomputes_due_set() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, MemoryReviewStore::new(), now());
        session.reveal().unwrap();
        session.rate(Rating::Good, now()).unwrap();

        session.restart(now());
        // "a" is scheduled for tomorrow now
        assert_eq!(session.due_count(), 2);
        assert_eq!(session.reviewed_count(), 0);
        assert_eq!(session.current_card().unwrap().id, "b");

        session.restart(now() + Duration::days(1));
        assert_eq!(session.due_count(), 3);
    }

    #[test]
    fn test_filter_change_restarts() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, MemoryReviewStore::new(), now());
        session.reveal().unwrap();
        session.rate(Rating::Again, now()).unwrap();
        assert_eq!(session.position(), 1);

        session.set_filter(PatternFilter::Pattern("two-pointers".to_string()), now());
        assert_eq!(session.position(), 0);
        assert_eq!(session.reviewed_count(), 0);
        assert_eq!(session.due_count(), 1);
        assert_eq!(session.current_card().unwrap().id, "b");
        assert_eq!(session.phase(), SessionPhase::Presenting);
    }

    #[test]
    fn test_save_failure_does_not_stop_session() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, BrokenStore, now());
        session.reveal().unwrap();
        assert!(session.rate(Rating::Hard, now()).is_ok());
        assert_eq!(session.position(), 1);
        assert_eq!(session.reviewed_count(), 1);
    }

    #[test]
    fn test_preview_and_stats() {
        let mut session = ReviewSession::new(cards(), PatternFilter::All, MemoryReviewStore::new(), now());
        assert_eq!(session.preview_intervals(), Some([1, 1, 1, 1]));

        session.reveal().unwrap();
        session.rate(Rating::Easy, now()).unwrap();
        let stats = session.stats();
        assert_eq!(stats.total_reviewed, 1);
        assert_eq!(stats.streak, 1);
        assert!(session.summary().is_great());
    }

    /// Memory store that counts full reads.
    struct CountingStore {
        inner: MemoryReviewStore,
        reads: Cell<usize>,
    }

    impl ReviewStore for CountingStore {
        fn load(&self, card_id: &str) -> Option<ReviewState> {
            self.reads.set(self.reads.get() + 1);
            self.inner.load(card_id)
        }
        fn load_all(&self) -> HashMap<String, ReviewState> {
            self.reads.set(self.reads.get() + 1);
            self.inner.load_all()
        }
        fn save(&mut self, card_id: &str, state: &ReviewState) -> Result<()> {
            self.inner.save(card_id, state)
        }
    }

    #[test]
    fn test_stats_and_preview_do_not_hit_the_store() {
        let store = CountingStore {
            inner: MemoryReviewStore::new(),
            reads: Cell::new(0),
        };
        let mut session = ReviewSession::new(cards(), PatternFilter::All, store, now());
        let after_start = session.store().reads.get();

        for _ in 0..10 {
            session.stats();
            session.preview_intervals();
        }
        assert_eq!(session.store().reads.get(), after_start);

        session.reveal().unwrap();
        session.rate(Rating::Good, now()).unwrap();
        // the next card's preview reflects the store after the rating
        assert_eq!(session.stats().total_reviewed, 1);
        assert_eq!(session.preview_intervals(), Some([1, 1, 1, 1]));
        assert_eq!(session.store().reads.get(), after_start + 2);
    }
}
