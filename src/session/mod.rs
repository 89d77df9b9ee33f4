//! Per-session draft history.
//!
//! Every successful run appends one entry; the display surfaces only show
//! the most recent [`DISPLAY_LIMIT`] drafts, newest first, numbered by their
//! position in the full history. Histories never leak across sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

/// How many drafts the history panel shows.
pub const DISPLAY_LIMIT: usize = 3;

/// One successful run: the question asked and the answer drafted for it.
/// Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub query: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only record of the drafts produced in one session.
#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run. Callers only append after drafting succeeds.
    pub fn append(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.entries.push(HistoryEntry {
            query: query.into(),
            answer: answer.into(),
            created_at: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recently drafted entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// The last [`DISPLAY_LIMIT`] entries, newest first, each paired with its
    /// draft number. Draft numbers count from the start of the session, so
    /// the panel reads "Draft #5, #4, #3" once five drafts exist.
    pub fn recent(&self) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        let total = self.entries.len();
        self.entries
            .iter()
            .rev()
            .take(DISPLAY_LIMIT)
            .enumerate()
            .map(move |(offset, entry)| (total - offset, entry))
    }
}

/// Session histories keyed by id.
///
/// The map lock is synchronous and short-lived. Each history sits behind its
/// own async lock so a caller can hold it across a full pipeline run,
/// serializing runs within one session without blocking the others.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<AsyncMutex<SessionHistory>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the history for `session`, creating an empty one on first touch.
    pub fn history(&self, session: Uuid) -> Arc<AsyncMutex<SessionHistory>> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(sessions.entry(session).or_default())
    }

    /// Number of distinct sessions seen so far.
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
