//! Tournament session state: entries, stages, phase, and errors.

use crate::models::entry::{Entry, EntryId, StatEntry};
use crate::models::game::{BracketMatch, GameMatch, MatchId, MatchState};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Minimum number of entries before a tournament can start.
pub const MIN_ENTRIES: usize = 4;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// No mix of groups of 3 and 4 adds up to this entry count.
    #[error("No way to split {0} entries into groups of 3 and 4")]
    InvalidPartition(usize),
    /// Vote for a match that already has a winner.
    #[error("Match already has a winner")]
    AlreadyDecided(MatchId),
    /// Vote names an entry that is not in the match.
    #[error("Winner is not part of this match")]
    NotAParticipant(EntryId),
    /// A bracket match was asked to resolve with an empty slot.
    #[error("Bracket match {index} in round {round} is missing a participant")]
    MissingParticipant { round: usize, index: usize },
    /// Phase advance requested while matches still lack a winner.
    #[error("{remaining} match(es) still need a result")]
    UnresolvedMatches { remaining: usize },
    /// The action is not allowed in the current phase.
    #[error("Action not allowed in the {0} phase")]
    WrongPhase(TournamentState),
    /// Fewer entries than the minimum needed to start.
    #[error("Need at least {required} entries to start (have {actual})")]
    NotEnoughEntries { required: usize, actual: usize },
    /// Entry id not present in this tournament.
    #[error("Entry not found")]
    EntryNotFound(EntryId),
    /// Match id not present in the current phase.
    #[error("Match not found")]
    MatchNotFound(MatchId),
    /// Bracket fields must be a power of two; anything else would need a bye.
    #[error("Bracket needs a power-of-two field, got {0}")]
    UnevenBracket(usize),
    /// Entry titles cannot be blank.
    #[error("Entry title cannot be empty")]
    EmptyTitle,
    /// Roster CSV could not be read.
    #[error("Could not parse roster: {0}")]
    InvalidRoster(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament. Phases only ever move forward:
/// Upload -> GroupPhase -> (RoundRobin ->) Brackets.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Collecting entries; titles and authors still editable.
    #[default]
    Upload,
    /// Groups of 3-4 playing round robin within each group.
    GroupPhase,
    /// Qualifier count was not a power of two: everyone plays everyone.
    RoundRobin,
    /// Single elimination down to a champion. Terminal phase.
    Brackets,
}

impl std::fmt::Display for TournamentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TournamentState::Upload => "upload",
            TournamentState::GroupPhase => "group phase",
            TournamentState::RoundRobin => "round robin",
            TournamentState::Brackets => "brackets",
        };
        f.write_str(name)
    }
}

/// One group in the group phase: its standings table and its matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub standings: Vec<StatEntry>,
    pub matches: Vec<GameMatch>,
}

/// Intermediate stage used when the group-phase qualifier count is not a
/// power of two: the whole field plays round robin, then the top slice
/// moves into the bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundRobinStage {
    /// Fresh zeroed stats for the qualified field; group results do not
    /// carry over.
    pub standings: Vec<StatEntry>,
    pub matches: Vec<GameMatch>,
    /// Participant count when the stage began. The bracket cut is the
    /// largest power of two not exceeding this.
    pub field_size: usize,
}

/// Single-elimination bracket. `rounds[0]` is the first round, each later
/// round has half as many matches, and the last round is the final.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Vec<BracketMatch>>,
    /// The match currently up for a vote (None once the final is decided).
    pub current: Option<MatchId>,
    /// Winner of the final. The phase stays Brackets; this is the
    /// tournament-over flag.
    pub champion: Option<EntryId>,
}

impl Bracket {
    /// Locate a match by id as (round index, match index).
    pub fn position_of(&self, id: MatchId) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round.iter().position(|m| m.id == id).map(|i| (r, i))
        })
    }

    /// The match `current` points at.
    pub fn current_match(&self) -> Option<&BracketMatch> {
        let id = self.current?;
        self.all_matches().find(|m| m.id == id)
    }

    /// All matches, first round to final.
    pub fn all_matches(&self) -> impl Iterator<Item = &BracketMatch> {
        self.rounds.iter().flatten()
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// True once the final has a winner.
    pub fn decided(&self) -> bool {
        self.champion.is_some()
    }
}

/// The match currently waiting on a vote, with both entries resolved for
/// display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CurrentMatch {
    pub match_id: MatchId,
    pub entry1: Entry,
    pub entry2: Entry,
    /// Group index when the match belongs to the group phase.
    pub group: Option<usize>,
    /// Bracket round number when the match belongs to the bracket.
    pub round: Option<usize>,
}

/// How far the current phase has progressed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchProgress {
    pub completed: usize,
    /// Matches that have both participants (differs from `total` only in
    /// the bracket, where later rounds fill up as results come in).
    pub playable: usize,
    pub total: usize,
}

/// Full tournament state: entries, current phase, and per-stage data.
/// Stage data is dropped at each phase transition; only the qualified
/// entries carry over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// Every uploaded entry, in upload order. Never shrinks once started;
    /// matches and bracket slots refer into this list by id.
    pub entries: Vec<Entry>,
    pub state: TournamentState,
    /// Group stage data (empty outside GroupPhase).
    pub groups: Vec<Group>,
    /// Round-robin stage data (present only while in RoundRobin).
    pub round_robin: Option<RoundRobinStage>,
    /// Elimination bracket (present from Brackets on).
    pub bracket: Option<Bracket>,
}

impl Tournament {
    /// Create a new tournament in Upload state with no entries.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            entries: Vec::new(),
            state: TournamentState::Upload,
            groups: Vec::new(),
            round_robin: None,
            bracket: None,
        }
    }

    /// Create a tournament with initial entries. Still in Upload until started.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            ..Self::new()
        }
    }

    /// Look up an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Mutable lookup (metadata edits during Upload).
    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Add an entry (only valid in Upload). Title must be non-empty.
    pub fn add_entry(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<EntryId, TournamentError> {
        if self.state != TournamentState::Upload {
            return Err(TournamentError::WrongPhase(self.state));
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TournamentError::EmptyTitle);
        }
        let entry = Entry::new(title, author, image);
        let id = entry.id;
        self.entries.push(entry);
        Ok(id)
    }

    /// Remove an entry by id (only valid in Upload).
    pub fn remove_entry(&mut self, entry_id: EntryId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Upload {
            return Err(TournamentError::WrongPhase(self.state));
        }
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(TournamentError::EntryNotFound(entry_id))?;
        self.entries.remove(idx);
        Ok(())
    }

    /// Rename an entry (only valid in Upload).
    pub fn set_entry_title(
        &mut self,
        entry_id: EntryId,
        title: impl Into<String>,
    ) -> Result<(), TournamentError> {
        if self.state != TournamentState::Upload {
            return Err(TournamentError::WrongPhase(self.state));
        }
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::EmptyTitle);
        }
        let entry = self
            .entry_mut(entry_id)
            .ok_or(TournamentError::EntryNotFound(entry_id))?;
        entry.title = trimmed.to_string();
        Ok(())
    }

    /// Change an entry's author (only valid in Upload). Blank becomes
    /// "Unassigned", matching upload defaults.
    pub fn set_entry_author(
        &mut self,
        entry_id: EntryId,
        author: impl Into<String>,
    ) -> Result<(), TournamentError> {
        if self.state != TournamentState::Upload {
            return Err(TournamentError::WrongPhase(self.state));
        }
        let author = author.into();
        let trimmed = author.trim();
        let entry = self
            .entry_mut(entry_id)
            .ok_or(TournamentError::EntryNotFound(entry_id))?;
        entry.author = if trimmed.is_empty() {
            "Unassigned".to_string()
        } else {
            trimmed.to_string()
        };
        Ok(())
    }

    /// Discard all stage progress and return to Upload with the same
    /// entries. The only way "back"; per-stage data is not recoverable.
    pub fn reset_tournament(&mut self) -> Result<(), TournamentError> {
        if self.state == TournamentState::Upload {
            return Err(TournamentError::WrongPhase(self.state));
        }
        self.groups.clear();
        self.round_robin = None;
        self.bracket = None;
        self.state = TournamentState::Upload;
        Ok(())
    }

    /// The champion entry, once the bracket final is decided.
    pub fn champion(&self) -> Option<&Entry> {
        let id = self.bracket.as_ref()?.champion?;
        self.entry(id)
    }

    /// The match currently waiting on a vote, with entries resolved.
    /// None during Upload and once the champion is decided.
    pub fn current_match(&self) -> Option<CurrentMatch> {
        match self.state {
            TournamentState::Upload => None,
            TournamentState::GroupPhase => {
                self.groups.iter().enumerate().find_map(|(gi, group)| {
                    let m = group.matches.iter().find(|m| !m.completed())?;
                    let (entry1, entry2) = self.pair_for(m)?;
                    Some(CurrentMatch {
                        match_id: m.id,
                        entry1,
                        entry2,
                        group: Some(gi),
                        round: None,
                    })
                })
            }
            TournamentState::RoundRobin => {
                let stage = self.round_robin.as_ref()?;
                let m = stage.matches.iter().find(|m| !m.completed())?;
                let (entry1, entry2) = self.pair_for(m)?;
                Some(CurrentMatch {
                    match_id: m.id,
                    entry1,
                    entry2,
                    group: None,
                    round: None,
                })
            }
            TournamentState::Brackets => {
                let bracket = self.bracket.as_ref()?;
                let m = bracket.current_match()?;
                let entry1 = self.entry(m.slot1?)?.clone();
                let entry2 = self.entry(m.slot2?)?.clone();
                Some(CurrentMatch {
                    match_id: m.id,
                    entry1,
                    entry2,
                    group: None,
                    round: Some(m.round),
                })
            }
        }
    }

    /// Completed/playable/total match counts for the current phase.
    pub fn progress(&self) -> MatchProgress {
        match self.state {
            TournamentState::Upload => MatchProgress::default(),
            TournamentState::GroupPhase => {
                let total = self.groups.iter().map(|g| g.matches.len()).sum();
                let completed = self
                    .groups
                    .iter()
                    .flat_map(|g| &g.matches)
                    .filter(|m| m.completed())
                    .count();
                MatchProgress {
                    completed,
                    playable: total,
                    total,
                }
            }
            TournamentState::RoundRobin => match &self.round_robin {
                Some(stage) => {
                    let total = stage.matches.len();
                    let completed = stage.matches.iter().filter(|m| m.completed()).count();
                    MatchProgress {
                        completed,
                        playable: total,
                        total,
                    }
                }
                None => MatchProgress::default(),
            },
            TournamentState::Brackets => match &self.bracket {
                Some(bracket) => {
                    let mut progress = MatchProgress::default();
                    for m in bracket.all_matches() {
                        progress.total += 1;
                        match m.state() {
                            MatchState::Done => {
                                progress.completed += 1;
                                progress.playable += 1;
                            }
                            MatchState::Ready => progress.playable += 1,
                            MatchState::Pending => {}
                        }
                    }
                    progress
                }
                None => MatchProgress::default(),
            },
        }
    }

    fn pair_for(&self, m: &GameMatch) -> Option<(Entry, Entry)> {
        Some((self.entry(m.entry1)?.clone(), self.entry(m.entry2)?.clone()))
    }
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}
