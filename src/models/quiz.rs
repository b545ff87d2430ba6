//! Multiple-choice questions. Quiz answers carry no state between sessions.
use super::problem::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub problem_id: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
    /// Filled from the owning problem when the catalogue is built.
    #[serde(skip)]
    pub pattern: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }

    /// "A" to "Z" for the first 26 options, the 1-based number after that.
    pub fn option_label(option: usize) -> String {
        u8::try_from(option)
            .ok()
            .filter(|n| *n < 26)
            .map(|n| char::from(b'A' + n).to_string())
            .unwrap_or_else(|| (option + 1).to_string())
    }
}

/// Running tally for a quiz session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Rounded percentage, or `None` before any answer.
    pub fn accuracy_percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        Some(((self.correct as f64 / self.total as f64) * 100.0).round() as u32)
    }

    pub fn wrong(&self) -> usize {
        self.total - self.correct
    }
}
