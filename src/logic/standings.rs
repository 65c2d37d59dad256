//! Standings: vote recording, ranking, and qualifier selection.

use crate::models::{EntryId, GameMatch, StatEntry, TournamentError};

/// Apply a decided match to the standings: winner +3 points and +1 win,
/// loser +1 loss, both +1 played, and the match marked complete. A second
/// vote on the same match or a winner that is not in the match is
/// rejected with nothing changed.
pub fn record_outcome(
    standings: &mut [StatEntry],
    game: &mut GameMatch,
    winner: EntryId,
) -> Result<(), TournamentError> {
    if game.completed() {
        return Err(TournamentError::AlreadyDecided(game.id));
    }
    if !game.has_participant(winner) {
        return Err(TournamentError::NotAParticipant(winner));
    }
    let loser = if winner == game.entry1 {
        game.entry2
    } else {
        game.entry1
    };
    // Locate both rows before touching either, so a miss changes nothing.
    let winner_idx = standings
        .iter()
        .position(|s| s.id() == winner)
        .ok_or(TournamentError::EntryNotFound(winner))?;
    let loser_idx = standings
        .iter()
        .position(|s| s.id() == loser)
        .ok_or(TournamentError::EntryNotFound(loser))?;
    standings[winner_idx].record_win();
    standings[loser_idx].record_loss();
    game.winner = Some(winner);
    Ok(())
}

/// Standings sorted by points, highest first. The sort is stable and
/// points are the only key: entries on equal points keep their existing
/// order. There is no further tie-break.
pub fn rank_standings(standings: &[StatEntry]) -> Vec<StatEntry> {
    let mut ranked = standings.to_vec();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));
    ranked
}

/// Who advances from a group: the top entry for groups of 3 or fewer,
/// the top two otherwise.
pub fn group_qualifiers(group: &[StatEntry]) -> Vec<StatEntry> {
    let count = if group.len() <= 3 { 1 } else { 2 };
    rank_standings(group).into_iter().take(count).collect()
}
