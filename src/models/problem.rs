//! Coding problems and the pattern taxonomy they are grouped by.
use super::{Flashcard, QuizQuestion};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
}

/// One step of the guided walkthrough (understand, brute force, optimal...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStep {
    pub title: String,
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub approach: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub complexity: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub args: serde_json::Value,
    pub expected: serde_json::Value,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub pattern: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub steps: Vec<SolutionStep>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default, rename = "ankiCards")]
    pub flashcards: Vec<Flashcard>,
}

impl Problem {
    /// True when `slug` names this problem by id or by its LeetCode URL.
    pub fn matches_slug(&self, slug: &str) -> bool {
        if self.id == slug {
            return true;
        }
        self.leetcode_url
            .as_deref()
            .map(|url| {
                let marker = format!("/problems/{}", slug);
                url.ends_with(&marker) || url.contains(&format!("{}/", marker))
            })
            .unwrap_or(false)
    }
}

/// Shape of the bundled data files.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProblemsData {
    pub patterns: Vec<Pattern>,
    pub problems: Vec<Problem>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuizData {
    pub questions: Vec<QuizQuestion>,
}
