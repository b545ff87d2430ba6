//! Multiple-choice quiz over a shuffled question set.
//!
//! Selecting an option records the answer and reveals the explanation in one
//! step; "next" moves on. Scores live only as long as the session.

use super::catalogue::PatternFilter;
use super::quiz::{QuizQuestion, QuizScore};
use super::review_session::{SessionPhase, SessionSummary};
use crate::error::{Result, StudyError};
use rand::seq::SliceRandom;

pub struct QuizSession {
    pool: Vec<QuizQuestion>,
    filter: PatternFilter,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    selected: Option<usize>,
    score: QuizScore,
    reviewed: usize,
    phase: SessionPhase,
}

impl QuizSession {
    pub fn new(pool: Vec<QuizQuestion>, filter: PatternFilter) -> Self {
        let mut session = Self {
            pool,
            filter,
            questions: Vec::new(),
            current_index: 0,
            selected: None,
            score: QuizScore::default(),
            reviewed: 0,
            phase: SessionPhase::Empty,
        };
        session.reshuffle();
        session
    }

    /// Rebuilds the question order from the filtered pool and resets the tally.
    pub fn reshuffle(&mut self) {
        let mut questions: Vec<QuizQuestion> = self
            .pool
            .iter()
            .filter(|q| self.filter.accepts(&q.pattern))
            .cloned()
            .collect();
        questions.shuffle(&mut rand::thread_rng());

        self.questions = questions;
        self.current_index = 0;
        self.selected = None;
        self.score = QuizScore::default();
        self.reviewed = 0;
        self.phase = if self.questions.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Presenting
        };
    }

    pub fn restart(&mut self) {
        self.reshuffle();
    }

    pub fn set_filter(&mut self, filter: PatternFilter) {
        self.filter = filter;
        self.reshuffle();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn filter(&self) -> &PatternFilter {
        &self.filter
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            SessionPhase::Presenting | SessionPhase::Revealed => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> QuizScore {
        self.score
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviewed
    }

    /// Answers the current question and reveals the explanation.
    /// Returns whether the answer was correct.
    pub fn select(&mut self, option: usize) -> Result<bool> {
        if self.phase != SessionPhase::Presenting {
            return Err(self.phase.invalid("select an option"));
        }
        let question = &self.questions[self.current_index];
        if option >= question.options.len() {
            return Err(StudyError::OptionOutOfRange {
                index: option,
                len: question.options.len(),
            });
        }

        let correct = question.is_correct(option);
        self.score.record(correct);
        self.selected = Some(option);
        self.phase = SessionPhase::Revealed;
        Ok(correct)
    }

    pub fn next(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Revealed {
            return Err(self.phase.invalid("go to the next question"));
        }
        self.reviewed += 1;
        self.selected = None;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.phase = SessionPhase::Presenting;
        } else {
            self.phase = SessionPhase::Complete;
        }
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            reviewed: self.reviewed,
            score: Some(self.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::problem::Difficulty;

    fn question(id: &str, pattern: &str, correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            problem_id: format!("{}-problem", id),
            difficulty: Difficulty::Easy,
            question: format!("Question {}?", id),
            options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct_index,
            explanation: "because".to_string(),
            pattern: pattern.to_string(),
        }
    }

    fn pool() -> Vec<QuizQuestion> {
        vec![
            question("q1", "array-hashing", 0),
            question("q2", "two-pointers", 1),
            question("q3", "array-hashing", 2),
        ]
    }

    #[test]
    fn test_all_correct_completes_with_full_score() {
        let mut session = QuizSession::new(pool(), PatternFilter::All);
        assert_eq!(session.question_count(), 3);

        while session.phase() == SessionPhase::Presenting {
            let answer = session.current_question().unwrap().correct_index;
            assert!(session.select(answer).unwrap());
            assert_eq!(session.phase(), SessionPhase::Revealed);
            session.next().unwrap();
        }

        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.score(), QuizScore { correct: 3, total: 3 });
        assert_eq!(session.score().accuracy_percent(), Some(100));
        let summary = session.summary();
        assert_eq!(summary.reviewed, 3);
        assert!(summary.is_great());
    }

    #[test]
    fn test_answer_is_locked_once_selected() {
        let mut session = QuizSession::new(pool(), PatternFilter::All);
        let wrong = (session.current_question().unwrap().correct_index + 1) % 3;

        assert!(!session.select(wrong).unwrap());
        assert!(session.select(0).is_err());
        assert_eq!(session.selected_option(), Some(wrong));
        assert_eq!(session.score(), QuizScore { correct: 0, total: 1 });
    }

    #[test]
    fn test_next_requires_answer_and_option_in_range() {
        let mut session = QuizSession::new(pool(), PatternFilter::All);
        assert!(session.next().is_err());
        assert!(matches!(
            session.select(7),
            Err(StudyError::OptionOutOfRange { index: 7, len: 3 })
        ));
        assert_eq!(session.phase(), SessionPhase::Presenting);
    }

    #[test]
    fn test_filter_and_restart_reset_tally() {
        let mut session = QuizSession::new(pool(), PatternFilter::All);
        session.select(0).unwrap();
        session.next().unwrap();

        session.set_filter(PatternFilter::Pattern("array-hashing".to_string()));
        assert_eq!(session.question_count(), 2);
        assert_eq!(session.position(), 0);
        assert_eq!(session.score(), QuizScore::default());
        assert!(session
            .current_question()
            .is_some_and(|q| q.pattern == "array-hashing"));

        session.select(0).unwrap();
        session.restart();
        assert_eq!(session.reviewed_count(), 0);
        assert_eq!(session.phase(), SessionPhase::Presenting);
    }

    #[test]
    fn test_no_questions_is_empty() {
        let session = QuizSession::new(pool(), PatternFilter::Pattern("graphs".to_string()));
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_low_accuracy_is_not_great() {
        let mut session = QuizSession::new(pool(), PatternFilter::All);
        while session.phase() == SessionPhase::Presenting {
            let wrong = (session.current_question().unwrap().correct_index + 1) % 3;
            session.select(wrong).unwrap();
            session.next().unwrap();
        }
        assert!(!session.summary().is_great());
        assert_eq!(session.summary().score.unwrap().wrong(), 3);
    }
}
