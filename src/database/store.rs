//! Persistence seam for SM-2 review state.
//!
//! Sessions only see [`ReviewStore`]; the backing store can be SQLite,
//! a JSON file or memory.

use super::db;
use crate::error::Result;
use crate::models::ReviewState;
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait ReviewStore {
    /// Recorded state of a card. Missing or unreadable state is `None`.
    fn load(&self, card_id: &str) -> Option<ReviewState>;

    /// Every recorded state, keyed by card id.
    fn load_all(&self) -> HashMap<String, ReviewState>;

    fn save(&mut self, card_id: &str, state: &ReviewState) -> Result<()>;
}

/// Keeps review state in memory only.
#[derive(Clone, Debug, Default)]
pub struct MemoryReviewStore {
    states: HashMap<String, ReviewState>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(states: HashMap<String, ReviewState>) -> Self {
        Self { states }
    }
}

impl ReviewStore for MemoryReviewStore {
    fn load(&self, card_id: &str) -> Option<ReviewState> {
        self.states.get(card_id).cloned()
    }

    fn load_all(&self) -> HashMap<String, ReviewState> {
        self.states.clone()
    }

    fn save(&mut self, card_id: &str, state: &ReviewState) -> Result<()> {
        self.states.insert(card_id.to_string(), state.clone());
        Ok(())
    }
}

/// Review state in the application's SQLite database.
#[derive(Clone)]
pub struct SqliteReviewStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReviewStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }
}

impl ReviewStore for SqliteReviewStore {
    fn load(&self, card_id: &str) -> Option<ReviewState> {
        self.with_conn(|conn| db::load_review_state(conn, card_id))
            .unwrap_or_else(|e| {
                log::warn!("Failed to load review state for '{}': {}", card_id, e);
                None
            })
    }

    fn load_all(&self) -> HashMap<String, ReviewState> {
        self.with_conn(db::load_all_review_states)
            .unwrap_or_else(|e| {
                log::warn!("Failed to load review states: {}", e);
                HashMap::new()
            })
    }

    fn save(&mut self, card_id: &str, state: &ReviewState) -> Result<()> {
        self.with_conn(|conn| db::save_review_state(conn, card_id, state))
    }
}
