//! JSON import/export for problems and review history.
//! Also builds a draft problem from a LeetCode URL for the import form.

use crate::database::ReviewStore;
use crate::error::{Result, StudyError};
use crate::models::problem::SolutionStep;
use crate::models::{Problem, ReviewRecords, ReviewState};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Exports a problem to a pretty-printed JSON file.
pub fn export_problem_to_path(problem: &Problem, path: &Path) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(problem)?)?;
    Ok(())
}

/// Imports a problem from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_problem(path: &Path) -> Result<Problem> {
    let contents = fs::read_to_string(path)?;
    let problem: Problem = serde_json::from_str(&contents)?;
    log::info!("Problem '{}' imported from {:?}", problem.title, path);
    Ok(problem)
}

/// Writes every recorded review state, keyed by card id.
pub fn export_review_states(states: &HashMap<String, ReviewState>, path: &Path) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(states)?)?;
    Ok(())
}

/// Reads a review history backup. Unusable records are logged and left out.
pub fn import_review_states(path: &Path) -> Result<HashMap<String, ReviewState>> {
    let contents = fs::read_to_string(path)?;
    let records = ReviewRecords::parse(&contents)?;
    if !records.rejected.is_empty() {
        log::warn!(
            "Skipped {} unusable records in {:?}",
            records.rejected.len(),
            path
        );
    }
    Ok(records.states)
}

/// Writes every usable state of a backup into `store`; returns how many.
pub fn restore_review_states<S: ReviewStore>(path: &Path, store: &mut S) -> Result<usize> {
    let states = import_review_states(path)?;
    for (card_id, state) in &states {
        store.save(card_id, state)?;
    }
    log::info!("Restored review history for {} cards from {:?}", states.len(), path);
    Ok(states.len())
}

/// Extracts the problem slug from a `leetcode.com/problems/<slug>` URL.
pub fn parse_slug(url: &str) -> Option<String> {
    let re = Regex::new(r"leetcode\.com/problems/([^/?#\s]+)").ok()?;
    re.captures(url).map(|caps| caps[1].to_string())
}

/// `two-sum` becomes `Two Sum`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Draft problem for the import form; the rest is filled in by hand.
pub fn draft_from_url(url: &str, pattern: &str) -> Result<Problem> {
    let slug = parse_slug(url).ok_or_else(|| StudyError::InvalidUrl(url.to_string()))?;
    Ok(Problem {
        title: title_from_slug(&slug),
        pattern: pattern.to_string(),
        difficulty: Default::default(),
        leetcode_number: None,
        leetcode_url: Some(format!("https://leetcode.com/problems/{}/", slug)),
        description: String::new(),
        starter_code: "function solution() {\n  // Your code here\n  \n}".to_string(),
        steps: ["Understand the Problem", "Brute Force Approach", "Optimal Approach"]
            .into_iter()
            .map(|title| SolutionStep {
                title: title.to_string(),
                ..Default::default()
            })
            .collect(),
        test_cases: Vec::new(),
        flashcards: Vec::new(),
        id: slug,
    })
}
