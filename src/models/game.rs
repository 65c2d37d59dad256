//! Match types: fixed-pair matches for group/round-robin play and
//! slot-based matches for the elimination bracket.

use crate::models::entry::EntryId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A single head-to-head match between two known entries.
/// Completion is exactly `winner.is_some()`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub entry1: EntryId,
    pub entry2: EntryId,
    /// None until a vote decides the match.
    pub winner: Option<EntryId>,
}

impl GameMatch {
    pub fn new(entry1: EntryId, entry2: EntryId) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry1,
            entry2,
            winner: None,
        }
    }

    pub fn completed(&self) -> bool {
        self.winner.is_some()
    }

    /// Whether `id` is one of the two participants.
    pub fn has_participant(&self, id: EntryId) -> bool {
        self.entry1 == id || self.entry2 == id
    }
}

/// Lifecycle of a bracket match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// At least one slot still waits on an earlier result.
    Pending,
    /// Both slots filled, no winner yet.
    Ready,
    /// Winner recorded.
    Done,
}

/// A match in the elimination bracket. Rounds past the first start with
/// empty slots that fill as earlier winners propagate up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based round number (1 = first round, last = the final).
    pub round: usize,
    /// Position within the round (0-based).
    pub index: usize,
    pub slot1: Option<EntryId>,
    pub slot2: Option<EntryId>,
    pub winner: Option<EntryId>,
}

impl BracketMatch {
    /// First-round match with both participants known up front.
    pub fn seeded(round: usize, index: usize, entry1: EntryId, entry2: EntryId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            index,
            slot1: Some(entry1),
            slot2: Some(entry2),
            winner: None,
        }
    }

    /// Later-round match awaiting winners from the round below.
    pub fn unseeded(round: usize, index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            index,
            slot1: None,
            slot2: None,
            winner: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            MatchState::Done
        } else if self.slot1.is_some() && self.slot2.is_some() {
            MatchState::Ready
        } else {
            MatchState::Pending
        }
    }

    pub fn has_participant(&self, id: EntryId) -> bool {
        self.slot1 == Some(id) || self.slot2 == Some(id)
    }
}
