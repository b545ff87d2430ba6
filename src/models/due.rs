//! Selection of cards that are due for review.
use super::{ReviewCard, ReviewState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Cards with no recorded state, or whose next review is at or before `now`.
/// Input order is preserved.
pub fn select_due(
    cards: &[ReviewCard],
    states: &HashMap<String, ReviewState>,
    now: DateTime<Utc>,
) -> Vec<ReviewCard> {
    cards
        .iter()
        .filter(|card| states.get(&card.id).is_none_or(|state| state.is_due(now)))
        .cloned()
        .collect()
}
