//! Entry and StatEntry data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entry (used in matches and lookups).
pub type EntryId = Uuid;

/// Points a win is worth in group and round-robin standings.
pub const POINTS_PER_WIN: u32 = 3;

/// A submitted drawing competing in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    /// Display name of whoever submitted the drawing.
    pub author: String,
    /// Opaque image reference: a URL, a data URI, or a `/static/...` path.
    /// Never interpreted by the engine.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry. Title and author are trimmed; a blank author
    /// becomes "Unassigned".
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        let title = title.into().trim().to_string();
        let author = author.into().trim().to_string();
        let author = if author.is_empty() {
            "Unassigned".to_string()
        } else {
            author
        };
        Self {
            id: Uuid::new_v4(),
            title,
            author,
            image: image.into(),
            created_at: Utc::now(),
        }
    }
}

/// An entry plus its standings counters for the current stage.
/// Counters start at zero and are only touched by vote recording.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub entry: Entry,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
}

impl StatEntry {
    /// Wrap an entry with zeroed stats (done whenever a stage begins).
    pub fn new(entry: Entry) -> Self {
        Self {
            entry,
            points: 0,
            wins: 0,
            losses: 0,
            matches_played: 0,
        }
    }

    pub fn id(&self) -> EntryId {
        self.entry.id
    }

    /// Record a won match for this entry.
    pub fn record_win(&mut self) {
        self.points += POINTS_PER_WIN;
        self.wins += 1;
        self.matches_played += 1;
    }

    /// Record a lost match for this entry.
    pub fn record_loss(&mut self) {
        self.losses += 1;
        self.matches_played += 1;
    }
}
