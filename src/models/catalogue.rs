//! Container for every available problem: the bundled set plus imported ones.
use super::problem::{Pattern, Problem, ProblemsData, QuizData};
use super::{QuizQuestion, ReviewCard};
use crate::error::{Result, StudyError};
use std::collections::{BTreeMap, HashSet};

const BUILTIN_PROBLEMS: &str = include_str!("../../data/problems.json");
const BUILTIN_QUIZ: &str = include_str!("../../data/quiz.json");

/// Restricts review sessions to a single pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PatternFilter {
    #[default]
    All,
    Pattern(String),
}

impl PatternFilter {
    pub fn accepts(&self, pattern: &str) -> bool {
        match self {
            PatternFilter::All => true,
            PatternFilter::Pattern(id) => id == pattern,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    patterns: Vec<Pattern>,
    builtin: Vec<Problem>,
    quiz: Vec<QuizQuestion>,
    problems: Vec<Problem>,
}

impl Catalogue {
    pub fn new(patterns: Vec<Pattern>, builtin: Vec<Problem>, quiz: Vec<QuizQuestion>) -> Self {
        let problems = builtin.clone();
        Self {
            patterns,
            builtin,
            quiz,
            problems,
        }
    }

    /// Loads the problem and quiz data compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let data: ProblemsData = serde_json::from_str(BUILTIN_PROBLEMS)?;
        let quiz: QuizData = serde_json::from_str(BUILTIN_QUIZ)?;
        Ok(Self::new(data.patterns, data.problems, quiz.questions))
    }

    /// Rebuilds the merged list. Custom problems whose id is already taken are skipped.
    pub fn set_custom(&mut self, custom: &[Problem]) {
        let mut seen: HashSet<String> = self.builtin.iter().map(|p| p.id.clone()).collect();
        let mut merged = self.builtin.clone();
        for problem in custom {
            if seen.insert(problem.id.clone()) {
                merged.push(problem.clone());
            }
        }
        self.problems = merged;
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn pattern_name(&self, id: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Problem> {
        self.get_by_id(id)
            .ok_or_else(|| StudyError::ProblemNotFound(id.to_string()))
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.matches_slug(slug))
    }

    pub fn get_by_pattern(&self, pattern: &str) -> Vec<&Problem> {
        self.problems.iter().filter(|p| p.pattern == pattern).collect()
    }

    /// Case-insensitive match on title, pattern or difficulty.
    pub fn search(&self, query: &str) -> Vec<&Problem> {
        if query.is_empty() {
            return self.problems.iter().collect();
        }
        let q = query.to_lowercase();
        self.problems
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&q)
                    || p.pattern.to_lowercase().contains(&q)
                    || p.difficulty.as_str().to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Problem count per pattern id, for every known pattern.
    pub fn pattern_stats(&self) -> BTreeMap<String, usize> {
        self.patterns
            .iter()
            .map(|pattern| (pattern.id.clone(), self.get_by_pattern(&pattern.id).len()))
            .collect()
    }

    pub fn review_cards(&self) -> Vec<ReviewCard> {
        self.problems
            .iter()
            .flat_map(|problem| {
                problem.flashcards.iter().map(move |card| ReviewCard {
                    id: card.id.clone(),
                    problem_id: problem.id.clone(),
                    problem_title: problem.title.clone(),
                    pattern: problem.pattern.clone(),
                    front: card.front.clone(),
                    back: card.back.clone(),
                })
            })
            .collect()
    }

    pub fn card_count_for_pattern(&self, pattern: &str) -> usize {
        self.get_by_pattern(pattern)
            .iter()
            .map(|p| p.flashcards.len())
            .sum()
    }

    /// Quiz questions whose problem is known, tagged with that problem's pattern.
    pub fn quiz_questions(&self) -> Vec<QuizQuestion> {
        self.quiz
            .iter()
            .filter_map(|question| {
                self.get_by_id(&question.problem_id).map(|problem| QuizQuestion {
                    pattern: problem.pattern.clone(),
                    ..question.clone()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::problem::Difficulty;
    use crate::models::Flashcard;

    fn problem(id: &str, pattern: &str, title: &str) -> Problem {
        Problem {
            id: id.to_string(),
            title: title.to_string(),
            pattern: pattern.to_string(),
            difficulty: Difficulty::Easy,
            leetcode_number: None,
            leetcode_url: None,
            description: String::new(),
            starter_code: String::new(),
            steps: Vec::new(),
            test_cases: Vec::new(),
            flashcards: vec![Flashcard {
                id: format!("{}-card", id),
                front: "front".to_string(),
                back: "back".to_string(),
            }],
        }
    }

    fn sample() -> Catalogue {
        Catalogue::new(
            vec![
                Pattern {
                    id: "array-hashing".to_string(),
                    name: "Arrays & Hashing".to_string(),
                },
                Pattern {
                    id: "two-pointers".to_string(),
                    name: "Two Pointers".to_string(),
                },
            ],
            vec![
                problem("two-sum", "array-hashing", "Two Sum"),
                problem("valid-palindrome", "two-pointers", "Valid Palindrome"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_builtin_data_parses() {
        let catalogue = Catalogue::builtin().unwrap();
        assert!(!catalogue.problems().is_empty());
        assert!(!catalogue.review_cards().is_empty());
        // every bundled question points at a bundled problem
        assert_eq!(catalogue.quiz_questions().len(), catalogue.quiz.len());
        for question in catalogue.quiz_questions() {
            assert!(question.correct_index < question.options.len());
            assert!(catalogue.pattern_name(&question.pattern).is_some());
        }
    }

    #[test]
    fn test_custom_problems_do_not_shadow_builtin() {
        let mut catalogue = sample();
        let mut clash = problem("two-sum", "two-pointers", "Imposter");
        clash.flashcards.clear();
        catalogue.set_custom(&[clash, problem("3sum", "two-pointers", "3Sum")]);

        assert_eq!(catalogue.problems().len(), 3);
        assert_eq!(catalogue.get_by_id("two-sum").unwrap().title, "Two Sum");
        assert_eq!(catalogue.get_by_pattern("two-pointers").len(), 2);
        assert_eq!(catalogue.card_count_for_pattern("two-pointers"), 2);
        assert!(catalogue.require("3sum").is_ok());
        assert!(matches!(
            catalogue.require("missing"),
            Err(StudyError::ProblemNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_get_by_slug_matches_id_or_url() {
        let mut catalogue = sample();
        let mut lru = problem("lru", "two-pointers", "LRU Cache");
        lru.leetcode_url = Some("https://leetcode.com/problems/lru-cache/".to_string());
        catalogue.set_custom(&[lru]);

        assert_eq!(catalogue.get_by_slug("two-sum").unwrap().title, "Two Sum");
        assert_eq!(catalogue.get_by_slug("lru-cache").unwrap().id, "lru");
        assert!(catalogue.get_by_slug("lru").is_some());
        assert!(catalogue.get_by_slug("cache").is_none());
        assert!(catalogue.get_by_slug("two").is_none());
    }

    #[test]
    fn test_search() {
        let catalogue = sample();
        assert_eq!(catalogue.search("").len(), 2);
        assert_eq!(catalogue.search("PALIN").len(), 1);
        assert_eq!(catalogue.search("pointers").len(), 1);
        assert_eq!(catalogue.search("easy").len(), 2);
        assert!(catalogue.search("graph").is_empty());
    }

    #[test]
    fn test_pattern_stats_and_cards() {
        let catalogue = sample();
        let stats = catalogue.pattern_stats();
        assert_eq!(stats["array-hashing"], 1);
        assert_eq!(stats["two-pointers"], 1);

        let cards = catalogue.review_cards();
        assert_eq!(cards[0].problem_title, "Two Sum");
        assert_eq!(cards[1].pattern, "two-pointers");
    }

    #[test]
    fn test_pattern_filter() {
        assert!(PatternFilter::All.accepts("anything"));
        let filter = PatternFilter::Pattern("two-pointers".to_string());
        assert!(filter.accepts("two-pointers"));
        assert!(!filter.accepts("array-hashing"));
    }
}
