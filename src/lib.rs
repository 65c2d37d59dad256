//! Drawing tournament web app: library with models and tournament logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_phase, advance_phase_with_rng, build_bracket, cast_vote, group_qualifiers,
    next_phase_after_groups, parse_roster, partition_entries, prev_power_of_two, rank_standings,
    record_bracket_winner, record_outcome, round_name, round_robin_matches, start_tournament,
    start_tournament_with_rng, GroupPlan, RosterRecord,
};
pub use models::{
    Bracket, BracketMatch, CurrentMatch, Entry, EntryId, GameMatch, Group, MatchId, MatchProgress,
    MatchState, RoundRobinStage, StatEntry, Tournament, TournamentError, TournamentId,
    TournamentState, MIN_ENTRIES, POINTS_PER_WIN,
};
