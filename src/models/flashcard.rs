//! Flashcard is a pair <front, back> attached to a problem.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// A flashcard together with the problem it belongs to, as shown in review.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewCard {
    pub id: String,
    pub problem_id: String,
    pub problem_title: String,
    pub pattern: String,
    pub front: String,
    pub back: String,
}
