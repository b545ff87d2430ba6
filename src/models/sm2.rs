//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! The four UI ratings are collapsed onto the classic 0-5 quality scale
//! (Again=0, Hard=2, Good=4, Easy=5) before the update is applied:
//! - Quality 0-2: repetitions reset to 0 and the card comes back tomorrow
//! - Quality 3-5: interval grows 1 day → 6 days → previous interval × ease
//! - Ease is adjusted after every review and never drops below 1.3

use super::review_state::{MAX_INTERVAL_DAYS, MIN_EASE};
use super::{Rating, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// Computes the state that follows a review of `state` rated `rating` at `now`.
pub fn compute_next(state: &ReviewState, rating: Rating, now: DateTime<Utc>) -> ReviewState {
    let q = rating.quality() as f64;

    let (interval, repetitions) = if q < 3.0 {
        (1, 0)
    } else {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            // Grows with the ease held before this review
            _ => (state.interval as f64 * state.ease).round() as i64,
        };
        (interval.clamp(1, MAX_INTERVAL_DAYS), state.repetitions.saturating_add(1))
    };

    let ease = (state.ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE);

    ReviewState {
        ease,
        interval,
        repetitions,
        next_review: now
            .checked_add_signed(Duration::days(interval))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        last_review: Some(now),
    }
}

/// Intervals in days for Again, Hard, Good and Easy, in that order.
pub fn preview_intervals(state: &ReviewState, now: DateTime<Utc>) -> [i64; 4] {
    Rating::ALL.map(|rating| compute_next(state, rating, now).interval)
}

/// Formats an interval in days as a compact label ("now", "6d", "2w", "3mo", "1y").
pub fn format_interval(days: i64) -> String {
    match days {
        d if d <= 0 => "now".to_string(),
        d if d < 7 => format!("{}d", d),
        d if d < 30 => format!("{}w", d / 7),
        d if d < 365 => format!("{}mo", d / 30),
        d => format!("{}y", d / 365),
    }
}
