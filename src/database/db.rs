//! Database operations for the study application
//!
//! Handles SQLite initialization, the study clock, SM-2 review state,
//! per-problem progress and imported problems.

use crate::error::Result;
use crate::models::progress::{Language, ProblemProgress, ProblemStatus, ProgressStats};
use crate::models::{Problem, ReviewState};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

/// Opens (or creates) the database file and ensures the schema exists.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_schema(&conn, Utc::now())?;
    Ok(conn)
}

/// In-memory database with the schema applied, clock set to `now`.
pub fn open_in_memory(now: DateTime<Utc>) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn, now)?;
    Ok(conn)
}

/// Creates tables for review state, progress, imported problems and app state.
/// Sets the study clock to `now` if not already initialized.
pub fn create_schema(conn: &Connection, now: DateTime<Utc>) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_states (
            card_id TEXT PRIMARY KEY,
            ease REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            next_review TEXT NOT NULL,
            last_review TEXT
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS progress (
            problem_id TEXT PRIMARY KEY,
            status TEXT NOT NULL DEFAULT 'unseen',
            last_attempted TEXT,
            notes TEXT NOT NULL DEFAULT '',
            code TEXT,
            language TEXT NOT NULL DEFAULT 'javascript',
            bookmarked INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS imported_problems (
            problem_id TEXT PRIMARY KEY,
            problem_data TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![now.to_rfc3339()],
    )?;

    Ok(())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Retrieves the study clock's current date
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    Ok(parse_timestamp(&value).unwrap_or_else(|| {
        log::warn!("Unreadable study clock value '{}', using now", value);
        Utc::now()
    }))
}

/// Advances the study clock by 24 hours so due dates can be exercised
pub fn advance_day(conn: &Connection) -> Result<DateTime<Utc>> {
    let next_day = get_current_date(conn)? + Duration::days(1);
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![next_day.to_rfc3339()],
    )?;
    log::info!("Study clock advanced to {}", next_day.format("%Y-%m-%d"));
    Ok(next_day)
}

type ReviewRow = (String, f64, i64, i64, String, Option<String>);

fn review_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

/// Rows that fail to parse are treated as absent.
fn review_state_from_row(row: ReviewRow) -> Option<(String, ReviewState)> {
    let (card_id, ease, interval, repetitions, next_review, last_review) = row;
    let Some(next_review) = parse_timestamp(&next_review) else {
        log::warn!("Ignoring corrupt review state for card '{}'", card_id);
        return None;
    };
    let state = ReviewState {
        ease,
        interval,
        repetitions: u32::try_from(repetitions).unwrap_or(0),
        next_review,
        last_review: last_review.as_deref().and_then(parse_timestamp),
    };
    if !state.is_valid() {
        log::warn!(
            "Ignoring out-of-range review state for card '{}' (ease {}, interval {})",
            card_id,
            state.ease,
            state.interval
        );
        return None;
    }
    Some((card_id, state))
}

pub fn load_review_state(conn: &Connection, card_id: &str) -> Result<Option<ReviewState>> {
    let row = conn
        .query_row(
            "SELECT card_id, ease, interval_days, repetitions, next_review, last_review
             FROM review_states WHERE card_id = ?1",
            params![card_id],
            review_row,
        )
        .optional()?;

    Ok(row.and_then(review_state_from_row).map(|(_, state)| state))
}

pub fn load_all_review_states(conn: &Connection) -> Result<HashMap<String, ReviewState>> {
    let mut stmt = conn.prepare(
        "SELECT card_id, ease, interval_days, repetitions, next_review, last_review
         FROM review_states",
    )?;

    let rows = stmt
        .query_map([], review_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows.into_iter().filter_map(review_state_from_row).collect())
}

/// Inserts or replaces the SM-2 state of a card
pub fn save_review_state(conn: &Connection, card_id: &str, state: &ReviewState) -> Result<()> {
    conn.execute(
        "INSERT INTO review_states (card_id, ease, interval_days, repetitions, next_review, last_review)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(card_id) DO UPDATE SET
            ease = excluded.ease,
            interval_days = excluded.interval_days,
            repetitions = excluded.repetitions,
            next_review = excluded.next_review,
            last_review = excluded.last_review",
        params![
            card_id,
            state.ease,
            state.interval,
            state.repetitions,
            state.next_review.to_rfc3339(),
            state.last_review.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}

fn ensure_progress_row(conn: &Connection, problem_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO progress (problem_id) VALUES (?1)",
        params![problem_id],
    )?;
    Ok(())
}

fn progress_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, ProblemProgress)> {
    let status: String = row.get(1)?;
    let last_attempted: Option<String> = row.get(2)?;
    let language: String = row.get(5)?;
    Ok((
        row.get(0)?,
        ProblemProgress {
            status: ProblemStatus::parse(&status),
            last_attempted: last_attempted.as_deref().and_then(parse_timestamp),
            notes: row.get(3)?,
            code: row.get(4)?,
            language: Language::parse(&language),
            bookmarked: row.get(6)?,
        },
    ))
}

/// Progress of a problem; never-touched problems get the default
pub fn get_progress(conn: &Connection, problem_id: &str) -> Result<ProblemProgress> {
    let progress = conn
        .query_row(
            "SELECT problem_id, status, last_attempted, notes, code, language, bookmarked
             FROM progress WHERE problem_id = ?1",
            params![problem_id],
            progress_from_row,
        )
        .optional()?;

    Ok(progress.map(|(_, p)| p).unwrap_or_default())
}

pub fn load_all_progress(conn: &Connection) -> Result<HashMap<String, ProblemProgress>> {
    let mut stmt = conn.prepare(
        "SELECT problem_id, status, last_attempted, notes, code, language, bookmarked FROM progress",
    )?;
    let progress = stmt
        .query_map([], progress_from_row)?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;
    Ok(progress)
}

/// Sets the status and stamps the attempt time
pub fn update_status(
    conn: &Connection,
    problem_id: &str,
    status: ProblemStatus,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_progress_row(conn, problem_id)?;
    conn.execute(
        "UPDATE progress SET status = ?1, last_attempted = ?2 WHERE problem_id = ?3",
        params![status.as_str(), now.to_rfc3339(), problem_id],
    )?;
    Ok(())
}

pub fn save_notes(conn: &Connection, problem_id: &str, notes: &str) -> Result<()> {
    ensure_progress_row(conn, problem_id)?;
    conn.execute(
        "UPDATE progress SET notes = ?1 WHERE problem_id = ?2",
        params![notes, problem_id],
    )?;
    Ok(())
}

pub fn save_code(conn: &Connection, problem_id: &str, code: &str, language: Language) -> Result<()> {
    ensure_progress_row(conn, problem_id)?;
    conn.execute(
        "UPDATE progress SET code = ?1, language = ?2 WHERE problem_id = ?3",
        params![code, language.as_str(), problem_id],
    )?;
    Ok(())
}

/// Flips the bookmark flag and returns the new value
pub fn toggle_bookmark(conn: &Connection, problem_id: &str) -> Result<bool> {
    ensure_progress_row(conn, problem_id)?;
    conn.execute(
        "UPDATE progress SET bookmarked = NOT bookmarked WHERE problem_id = ?1",
        params![problem_id],
    )?;
    let bookmarked = conn.query_row(
        "SELECT bookmarked FROM progress WHERE problem_id = ?1",
        params![problem_id],
        |row| row.get(0),
    )?;
    Ok(bookmarked)
}

pub fn progress_stats(conn: &Connection) -> Result<ProgressStats> {
    let progress = load_all_progress(conn)?;
    Ok(ProgressStats::from_statuses(
        progress.values().map(|p| p.status),
    ))
}

/// Stores an imported problem as JSON, replacing any previous import with the same id
pub fn save_imported_problem(conn: &Connection, problem: &Problem) -> Result<()> {
    let data = serde_json::to_string(problem)?;
    conn.execute(
        "INSERT INTO imported_problems (problem_id, problem_data) VALUES (?1, ?2)
         ON CONFLICT(problem_id) DO UPDATE SET problem_data = excluded.problem_data",
        params![problem.id, data],
    )?;
    Ok(())
}

/// Loads imported problems, skipping any whose JSON no longer parses
pub fn load_imported_problems(conn: &Connection) -> Result<Vec<Problem>> {
    let mut stmt =
        conn.prepare("SELECT problem_id, problem_data FROM imported_problems ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, data)| match serde_json::from_str::<Problem>(&data) {
            Ok(problem) => Some(problem),
            Err(e) => {
                log::warn!("Skipping unreadable imported problem '{}': {}", id, e);
                None
            }
        })
        .collect())
}
