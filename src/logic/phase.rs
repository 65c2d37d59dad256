//! Phase control: starting, voting, and advancing through the phases.

use crate::logic::{bracket, groups, schedule, standings};
use crate::models::{
    Entry, EntryId, Group, MatchId, RoundRobinStage, StatEntry, Tournament, TournamentError,
    TournamentState, MIN_ENTRIES,
};
use rand::Rng;

/// Largest power of two less than or equal to `n` (0 for 0).
pub fn prev_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1usize << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// Which phase follows the group phase for a given qualifier count: an
/// exact power of two goes straight to the bracket, a count strictly
/// between powers plays a round robin first. The fallback arm also picks
/// the bracket, though the first two cover every reachable count.
pub fn next_phase_after_groups(qualifiers: usize) -> TournamentState {
    let cut = prev_power_of_two(qualifiers);
    if qualifiers == cut {
        TournamentState::Brackets
    } else if qualifiers < cut * 2 {
        TournamentState::RoundRobin
    } else {
        TournamentState::Brackets
    }
}

/// Start the tournament: partition the entries into groups and schedule
/// every group's matches. Upload -> GroupPhase.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    start_tournament_with_rng(tournament, &mut rand::thread_rng())
}

/// `start_tournament` with a caller-supplied source of randomness.
pub fn start_tournament_with_rng<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Upload {
        return Err(TournamentError::WrongPhase(tournament.state));
    }
    if tournament.entries.len() < MIN_ENTRIES {
        return Err(TournamentError::NotEnoughEntries {
            required: MIN_ENTRIES,
            actual: tournament.entries.len(),
        });
    }
    let partitioned = groups::partition_entries(&tournament.entries, rng)?;
    tournament.groups = partitioned
        .into_iter()
        .map(|standings| {
            let matches = schedule::round_robin_matches(&standings, rng);
            Group { standings, matches }
        })
        .collect();
    tournament.state = TournamentState::GroupPhase;
    Ok(())
}

/// Record a vote for `winner` in match `match_id`, wherever that match
/// lives in the current phase. Double votes and non-participant winners
/// are rejected with nothing changed.
pub fn cast_vote(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: EntryId,
) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::Upload => Err(TournamentError::WrongPhase(tournament.state)),
        TournamentState::GroupPhase => {
            for group in &mut tournament.groups {
                if let Some(idx) = group.matches.iter().position(|m| m.id == match_id) {
                    return standings::record_outcome(
                        &mut group.standings,
                        &mut group.matches[idx],
                        winner,
                    );
                }
            }
            Err(TournamentError::MatchNotFound(match_id))
        }
        TournamentState::RoundRobin => match tournament.round_robin.as_mut() {
            Some(stage) => match stage.matches.iter().position(|m| m.id == match_id) {
                Some(idx) => standings::record_outcome(
                    &mut stage.standings,
                    &mut stage.matches[idx],
                    winner,
                ),
                None => Err(TournamentError::MatchNotFound(match_id)),
            },
            None => Err(TournamentError::WrongPhase(tournament.state)),
        },
        TournamentState::Brackets => match tournament.bracket.as_mut() {
            Some(b) => bracket::record_bracket_winner(b, match_id, winner),
            None => Err(TournamentError::WrongPhase(tournament.state)),
        },
    }
}

/// Advance out of the current phase once every match has a winner.
/// GroupPhase routes to RoundRobin or Brackets by qualifier count;
/// RoundRobin cuts its ranked field down to the bracket size.
pub fn advance_phase(tournament: &mut Tournament) -> Result<(), TournamentError> {
    advance_phase_with_rng(tournament, &mut rand::thread_rng())
}

/// `advance_phase` with a caller-supplied source of randomness (the
/// round-robin schedule, when one is created, gets shuffled).
pub fn advance_phase_with_rng<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::GroupPhase => advance_from_groups(tournament, rng),
        TournamentState::RoundRobin => advance_from_round_robin(tournament),
        TournamentState::Upload | TournamentState::Brackets => {
            Err(TournamentError::WrongPhase(tournament.state))
        }
    }
}

fn advance_from_groups<R: Rng>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    let remaining = tournament
        .groups
        .iter()
        .flat_map(|g| &g.matches)
        .filter(|m| !m.completed())
        .count();
    if remaining > 0 {
        return Err(TournamentError::UnresolvedMatches { remaining });
    }

    // Qualifiers in group order, ranked within each group.
    let qualified: Vec<Entry> = tournament
        .groups
        .iter()
        .flat_map(|g| standings::group_qualifiers(&g.standings))
        .map(|s| s.entry)
        .collect();
    let next = next_phase_after_groups(qualified.len());
    log::debug!(
        "Group phase done: {} qualifier(s), next phase: {}",
        qualified.len(),
        next
    );

    match next {
        TournamentState::RoundRobin => {
            let standings: Vec<StatEntry> = qualified.into_iter().map(StatEntry::new).collect();
            let matches = schedule::round_robin_matches(&standings, rng);
            tournament.round_robin = Some(RoundRobinStage {
                field_size: standings.len(),
                standings,
                matches,
            });
        }
        _ => {
            tournament.bracket = Some(bracket::build_bracket(&qualified)?);
        }
    }
    tournament.groups.clear();
    tournament.state = next;
    Ok(())
}

fn advance_from_round_robin(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let stage = match tournament.round_robin.as_ref() {
        Some(stage) => stage,
        None => return Err(TournamentError::WrongPhase(tournament.state)),
    };
    let remaining = stage.matches.iter().filter(|m| !m.completed()).count();
    if remaining > 0 {
        return Err(TournamentError::UnresolvedMatches { remaining });
    }

    // Cut to the largest power of two the stage started with, not
    // whatever the upload count was.
    let cut = prev_power_of_two(stage.field_size);
    let field: Vec<Entry> = standings::rank_standings(&stage.standings)
        .into_iter()
        .take(cut)
        .map(|s| s.entry)
        .collect();
    log::debug!(
        "Round robin done: top {} of {} advance to the bracket",
        cut,
        stage.field_size
    );

    tournament.bracket = Some(bracket::build_bracket(&field)?);
    tournament.round_robin = None;
    tournament.state = TournamentState::Brackets;
    Ok(())
}
