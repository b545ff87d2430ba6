pub mod catalogue;
pub mod due;
pub mod flashcard;
pub mod problem;
pub mod progress;
pub mod quiz;
pub mod quiz_session;
pub mod rating;
pub mod review_session;
pub mod review_state;
pub mod review_stats;
pub mod sm2;

pub use catalogue::{Catalogue, PatternFilter};
pub use flashcard::{Flashcard, ReviewCard};
pub use problem::{Pattern, Problem};
pub use quiz::{QuizQuestion, QuizScore};
pub use quiz_session::QuizSession;
pub use rating::Rating;
pub use review_session::{ReviewSession, SessionPhase, SessionSummary};
pub use review_state::{ReviewRecords, ReviewState};
pub use review_stats::ReviewStats;
