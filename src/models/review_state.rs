use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
/// Longest interval a card can be scheduled for, about a century.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Spaced repetition state of one card, keyed by card id in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub ease: f64,
    pub interval: i64,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// State of a card that has never been reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease: DEFAULT_EASE,
            interval: 0,
            repetitions: 0,
            next_review: now,
            last_review: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Whether a stored state can be scheduled from. Loaders treat
    /// anything else as a card without history.
    pub fn is_valid(&self) -> bool {
        self.ease.is_finite()
            && self.ease >= MIN_EASE
            && (0..=MAX_INTERVAL_DAYS).contains(&self.interval)
    }
}

/// A review history document read record by record, so one bad card
/// does not cost the others their history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewRecords {
    pub states: HashMap<String, ReviewState>,
    /// Records that could not be used, kept as they were read.
    pub rejected: Map<String, Value>,
}

impl ReviewRecords {
    /// Fails only when `content` is not a JSON object.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(content)?;
        let mut records = ReviewRecords::default();
        for (card_id, value) in raw {
            match serde_json::from_value::<ReviewState>(value.clone()) {
                Ok(state) if state.is_valid() => {
                    records.states.insert(card_id, state);
                }
                Ok(state) => {
                    log::warn!(
                        "Ignoring out-of-range review state for card '{}' (ease {}, interval {})",
                        card_id,
                        state.ease,
                        state.interval
                    );
                    records.rejected.insert(card_id, value);
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt review state for card '{}': {}", card_id, e);
                    records.rejected.insert(card_id, value);
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_out_of_range_state_is_invalid() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert!(ReviewState::new(now).is_valid());

        let low_ease = ReviewState { ease: 0.5, interval: 10, repetitions: 3, ..ReviewState::new(now) };
        assert!(!low_ease.is_valid());

        let nan_ease = ReviewState { ease: f64::NAN, ..ReviewState::new(now) };
        assert!(!nan_ease.is_valid());

        let huge = ReviewState { interval: 50_000_000, repetitions: 3, ..ReviewState::new(now) };
        assert!(!huge.is_valid());

        let negative = ReviewState { interval: -1, ..ReviewState::new(now) };
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_records_are_parsed_one_by_one() {
        let records = ReviewRecords::parse(
            r#"{
                "good": { "ease": 2.5, "interval": 1, "repetitions": 1,
                          "nextReview": "2024-03-02T09:00:00Z" },
                "bad": { "ease": 2.5, "interval": 1, "repetitions": 1,
                         "nextReview": "garbage" },
                "shrinking": { "ease": 0.5, "interval": 10, "repetitions": 3,
                               "nextReview": "2024-03-02T09:00:00Z" }
            }"#,
        )
        .unwrap();

        assert_eq!(records.states.len(), 1);
        assert_eq!(records.states["good"].interval, 1);
        assert!(records.rejected.contains_key("bad"));
        assert!(records.rejected.contains_key("shrinking"));
        assert!(ReviewRecords::parse("[1, 2]").is_err());
    }
}
