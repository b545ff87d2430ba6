use super::ReviewState;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewStats {
    pub total_reviewed: usize,
    pub due_today: usize,
    /// Consecutive days, ending today, with at least one review.
    pub streak: u32,
}

impl ReviewStats {
    pub fn from_states(states: &HashMap<String, ReviewState>, now: DateTime<Utc>) -> Self {
        let review_days: HashSet<NaiveDate> = states
            .values()
            .filter_map(|s| s.last_review)
            .map(|at| at.date_naive())
            .collect();

        Self {
            total_reviewed: states.values().filter(|s| s.last_review.is_some()).count(),
            due_today: states.values().filter(|s| s.is_due(now)).count(),
            streak: streak_ending(&review_days, now.date_naive()),
        }
    }
}

fn streak_ending(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}
