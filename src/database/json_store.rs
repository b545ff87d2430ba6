//! Review state kept in a single JSON file, the whole map rewritten on every save.

use super::store::ReviewStore;
use crate::error::Result;
use crate::models::{ReviewRecords, ReviewState};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonReviewStore {
    path: PathBuf,
    states: HashMap<String, ReviewState>,
    /// Unusable records, written back untouched until the card is reviewed again.
    rejected: Map<String, Value>,
    /// Set when the file exists but is not a JSON object.
    unreadable: bool,
}

impl JsonReviewStore {
    /// Opens the file at `path`. A missing or unreadable file starts empty;
    /// bad records are skipped one by one.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (records, unreadable) = match read_records(&path) {
            Ok(records) => (records, false),
            Err(e) => {
                let exists = path.exists();
                if exists {
                    log::warn!("Ignoring unreadable review file {:?}: {}", path, e);
                }
                (ReviewRecords::default(), exists)
            }
        };
        Self {
            path,
            states: records.states,
            rejected: records.rejected,
            unreadable,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

fn read_records(path: &Path) -> Result<ReviewRecords> {
    let content = fs::read_to_string(path)?;
    ReviewRecords::parse(&content)
}

impl ReviewStore for JsonReviewStore {
    fn load(&self, card_id: &str) -> Option<ReviewState> {
        self.states.get(card_id).cloned()
    }

    fn load_all(&self) -> HashMap<String, ReviewState> {
        self.states.clone()
    }

    fn save(&mut self, card_id: &str, state: &ReviewState) -> Result<()> {
        self.states.insert(card_id.to_string(), state.clone());
        self.rejected.remove(card_id);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.unreadable {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)?;
            log::warn!("Moved unreadable review file to {:?}", backup);
            self.unreadable = false;
        }

        let mut document = self.rejected.clone();
        for (id, state) in &self.states {
            document.insert(id.clone(), serde_json::to_value(state)?);
        }
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_save_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.json");
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut store = JsonReviewStore::open(&path);
        assert!(store.load_all().is_empty());
        store.save("two-sum-1", &ReviewState::new(now)).unwrap();

        let reopened = JsonReviewStore::open(&path);
        assert_eq!(reopened.load("two-sum-1"), Some(ReviewState::new(now)));
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonReviewStore::open(&path);
        assert!(store.load("anything").is_none());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_bad_record_does_not_erase_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(
            &path,
            r#"{ "good": { "ease": 2.6, "interval": 1, "repetitions": 1,
                   "nextReview": "2024-03-02T09:00:00Z" },
                 "bad": { "ease": 2.5, "interval": 1, "repetitions": 1,
                   "nextReview": "garbage" } }"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut store = JsonReviewStore::open(&path);
        assert!(store.load("good").is_some());
        assert!(store.load("bad").is_none());
        store.save("other", &ReviewState::new(now)).unwrap();

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("\"good\""));
        assert!(on_disk.contains("garbage"));
        let reopened = JsonReviewStore::open(&path);
        assert_eq!(reopened.load_all().len(), 2);
        assert_eq!(reopened.load("good").unwrap().interval, 1);
    }

    #[test]
    fn test_reviewing_a_bad_record_replaces_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(
            &path,
            r#"{ "c1": { "ease": 0.5, "interval": 10, "repetitions": 3,
                   "nextReview": "2024-03-02T09:00:00Z" } }"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut store = JsonReviewStore::open(&path);
        assert!(store.load("c1").is_none());
        store.save("c1", &ReviewState::new(now)).unwrap();

        assert_eq!(JsonReviewStore::open(&path).load("c1"), Some(ReviewState::new(now)));
    }

    #[test]
    fn test_unreadable_file_is_kept_aside_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(&path, "{ not json").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut store = JsonReviewStore::open(&path);
        store.save("c1", &ReviewState::new(now)).unwrap();

        let backup = dir.path().join("reviews.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
        assert_eq!(JsonReviewStore::open(&path).load_all().len(), 1);
    }

    #[test]
    fn test_reads_camel_case_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.json");
        fs::write(
            &path,
            r#"{ "c1": { "ease": 2.6, "interval": 1, "repetitions": 1,
                 "nextReview": "2024-03-02T09:00:00Z", "lastReview": null } }"#,
        )
        .unwrap();

        let state = JsonReviewStore::open(&path).load("c1").unwrap();
        assert_eq!(state.interval, 1);
        assert!(state.last_review.is_none());
    }
}
