pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod runner;
pub mod state;

pub use error::{Result, StudyError};
pub use models::{
    Catalogue, PatternFilter, QuizSession, Rating, ReviewCard, ReviewSession, ReviewState,
    SessionPhase,
};
