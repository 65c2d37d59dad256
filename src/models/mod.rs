//! Data structures for the drawing tournament: entries, matches, stages.

mod entry;
mod game;
mod tournament;

pub use entry::{Entry, EntryId, StatEntry, POINTS_PER_WIN};
pub use game::{BracketMatch, GameMatch, MatchId, MatchState};
pub use tournament::{
    Bracket, CurrentMatch, Group, MatchProgress, RoundRobinStage, Tournament, TournamentError,
    TournamentId, TournamentState, MIN_ENTRIES,
};
