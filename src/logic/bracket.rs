//! Elimination bracket: build, vote, propagate winners, pick the next match.

use crate::models::{
    Bracket, BracketMatch, Entry, EntryId, MatchId, MatchState, TournamentError,
};

/// Build a bracket over a power-of-two field of 2 or more entries.
/// `field[0]` meets `field[1]` and so on down the list; later rounds
/// start unseeded and fill as winners come in. Any other field size is
/// refused, which is what keeps byes unrepresentable.
pub fn build_bracket(field: &[Entry]) -> Result<Bracket, TournamentError> {
    let n = field.len();
    if n < 2 || !n.is_power_of_two() {
        return Err(TournamentError::UnevenBracket(n));
    }
    let total_rounds = n.trailing_zeros() as usize;

    let mut rounds = Vec::with_capacity(total_rounds);
    let first: Vec<BracketMatch> = field
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| BracketMatch::seeded(1, i, pair[0].id, pair[1].id))
        .collect();
    rounds.push(first);
    for round in 2..=total_rounds {
        let count = 1usize << (total_rounds - round);
        rounds.push((0..count).map(|i| BracketMatch::unseeded(round, i)).collect());
    }

    let current = rounds[0].first().map(|m| m.id);
    Ok(Bracket {
        rounds,
        current,
        champion: None,
    })
}

/// Record a bracket vote: set the winner, send them up to match i/2 of
/// the next round, and move `current` along. Winning the final sets the
/// champion instead.
///
/// A match with an empty slot cannot be resolved; that means propagation
/// went wrong somewhere, so the vote is refused rather than guessed at.
pub fn record_bracket_winner(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: EntryId,
) -> Result<(), TournamentError> {
    let (round_idx, match_idx) = bracket
        .position_of(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let last_round = bracket.rounds.len() - 1;

    let m = &mut bracket.rounds[round_idx][match_idx];
    match m.state() {
        MatchState::Done => return Err(TournamentError::AlreadyDecided(match_id)),
        MatchState::Pending => {
            return Err(TournamentError::MissingParticipant {
                round: m.round,
                index: m.index,
            })
        }
        MatchState::Ready => {}
    }
    if !m.has_participant(winner) {
        return Err(TournamentError::NotAParticipant(winner));
    }
    m.winner = Some(winner);

    if round_idx < last_round {
        // First empty slot wins: which side of the next match an entry
        // lands on follows the completion order of its two feeders.
        let next = &mut bracket.rounds[round_idx + 1][match_idx / 2];
        if next.slot1.is_none() {
            next.slot1 = Some(winner);
        } else {
            next.slot2 = Some(winner);
        }
    } else {
        bracket.champion = Some(winner);
    }

    let next_up = next_ready_match(bracket, round_idx, match_idx);
    bracket.current = next_up;
    Ok(())
}

/// The next votable match after (round_idx, match_idx): the rest of that
/// round in index order, then each later round from its start.
fn next_ready_match(bracket: &Bracket, round_idx: usize, match_idx: usize) -> Option<MatchId> {
    let same_round = bracket.rounds[round_idx]
        .iter()
        .skip(match_idx + 1)
        .find(|m| m.state() == MatchState::Ready);
    if let Some(m) = same_round {
        return Some(m.id);
    }
    bracket.rounds[round_idx + 1..]
        .iter()
        .flatten()
        .find(|m| m.state() == MatchState::Ready)
        .map(|m| m.id)
}

/// Display name for a round (1-based), counted back from the final:
/// "Final", "Semifinal", "Quarterfinal", then plain "Round N".
pub fn round_name(round: usize, total_rounds: usize) -> String {
    if round == total_rounds {
        "Final".to_string()
    } else if round + 1 == total_rounds {
        "Semifinal".to_string()
    } else if round + 2 == total_rounds {
        "Quarterfinal".to_string()
    } else {
        format!("Round {round}")
    }
}
