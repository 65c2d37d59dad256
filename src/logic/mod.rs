//! Tournament logic: partitioning, scheduling, standings, bracket, phases.

mod bracket;
mod groups;
mod phase;
mod roster;
mod schedule;
mod standings;

pub use bracket::{build_bracket, record_bracket_winner, round_name};
pub use groups::{partition_entries, GroupPlan};
pub use phase::{
    advance_phase, advance_phase_with_rng, cast_vote, next_phase_after_groups, prev_power_of_two,
    start_tournament, start_tournament_with_rng,
};
pub use roster::{parse_roster, RosterRecord};
pub use schedule::round_robin_matches;
pub use standings::{group_qualifiers, rank_standings, record_outcome};
