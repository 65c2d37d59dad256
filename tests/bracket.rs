//! Integration tests for the single-elimination bracket.

use drawing_tournament_web::{
    build_bracket, record_bracket_winner, round_name, Entry, MatchState, TournamentError,
};

fn entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| Entry::new(format!("Drawing {i}"), format!("Author {i}"), ""))
        .collect()
}

#[test]
fn bracket_shape_for_eight() {
    let field = entries(8);
    let bracket = build_bracket(&field).unwrap();
    assert_eq!(bracket.total_rounds(), 3);
    let sizes: Vec<usize> = bracket.rounds.iter().map(|r| r.len()).collect();
    assert_eq!(sizes, vec![4, 2, 1]);
    assert_eq!(bracket.all_matches().count(), 7);

    // Round 1 pairs consecutive entries of the (already shuffled) field.
    for (i, m) in bracket.rounds[0].iter().enumerate() {
        assert_eq!(m.slot1, Some(field[2 * i].id));
        assert_eq!(m.slot2, Some(field[2 * i + 1].id));
        assert_eq!(m.state(), MatchState::Ready);
        assert_eq!((m.round, m.index), (1, i));
    }
    // Later rounds start without participants.
    for m in bracket.rounds.iter().skip(1).flatten() {
        assert_eq!(m.state(), MatchState::Pending);
        assert!(m.slot1.is_none() && m.slot2.is_none());
    }
    assert_eq!(bracket.current, Some(bracket.rounds[0][0].id));
    assert!(bracket.champion.is_none());
}

#[test]
fn uneven_fields_are_rejected() {
    for n in [0usize, 1, 3, 5, 6, 7, 12] {
        let result = build_bracket(&entries(n));
        assert!(matches!(result, Err(TournamentError::UnevenBracket(k)) if k == n));
    }
    assert!(build_bracket(&entries(2)).is_ok());
    assert!(build_bracket(&entries(16)).is_ok());
}

#[test]
fn winners_propagate_and_final_sets_champion() {
    let field = entries(4);
    let mut bracket = build_bracket(&field).unwrap();

    let m0 = bracket.rounds[0][0].id;
    let m1 = bracket.rounds[0][1].id;
    let w0 = field[0].id;
    let w1 = field[3].id;

    record_bracket_winner(&mut bracket, m0, w0).unwrap();
    // First finished feeder takes slot 1 of the final; m1 is up next.
    assert_eq!(bracket.rounds[1][0].slot1, Some(w0));
    assert_eq!(bracket.rounds[1][0].state(), MatchState::Pending);
    assert_eq!(bracket.current, Some(m1));

    record_bracket_winner(&mut bracket, m1, w1).unwrap();
    assert_eq!(bracket.rounds[1][0].slot2, Some(w1));
    assert_eq!(bracket.rounds[1][0].state(), MatchState::Ready);
    let final_id = bracket.rounds[1][0].id;
    assert_eq!(bracket.current, Some(final_id));
    assert!(bracket.champion.is_none());

    record_bracket_winner(&mut bracket, final_id, w1).unwrap();
    assert_eq!(bracket.champion, Some(w1));
    assert!(bracket.decided());
    assert_eq!(bracket.current, None);
}

#[test]
fn pending_matches_cannot_be_resolved() {
    let field = entries(4);
    let mut bracket = build_bracket(&field).unwrap();
    let final_id = bracket.rounds[1][0].id;
    let result = record_bracket_winner(&mut bracket, final_id, field[0].id);
    assert!(matches!(
        result,
        Err(TournamentError::MissingParticipant { round: 2, index: 0 })
    ));
    assert!(bracket.rounds[1][0].winner.is_none());
}

#[test]
fn bracket_votes_are_validated() {
    let field = entries(4);
    let mut bracket = build_bracket(&field).unwrap();
    let m0 = bracket.rounds[0][0].id;

    let result = record_bracket_winner(&mut bracket, m0, field[2].id);
    assert!(matches!(result, Err(TournamentError::NotAParticipant(_))));

    record_bracket_winner(&mut bracket, m0, field[0].id).unwrap();
    let result = record_bracket_winner(&mut bracket, m0, field[1].id);
    assert!(matches!(result, Err(TournamentError::AlreadyDecided(_))));
    assert_eq!(bracket.rounds[0][0].winner, Some(field[0].id));

    let result = record_bracket_winner(&mut bracket, uuid::Uuid::new_v4(), field[0].id);
    assert!(matches!(result, Err(TournamentError::MatchNotFound(_))));
}

#[test]
fn next_match_scans_rest_of_round_then_later_rounds() {
    let field = entries(8);
    let mut bracket = build_bracket(&field).unwrap();
    let round1: Vec<_> = bracket.rounds[0].iter().map(|m| m.id).collect();

    record_bracket_winner(&mut bracket, round1[0], field[0].id).unwrap();
    assert_eq!(bracket.current, Some(round1[1]));
    record_bracket_winner(&mut bracket, round1[1], field[2].id).unwrap();
    // Semifinal 0 is ready at this point, but the rest of round 1 goes first.
    assert_eq!(bracket.current, Some(round1[2]));
    record_bracket_winner(&mut bracket, round1[2], field[4].id).unwrap();
    assert_eq!(bracket.current, Some(round1[3]));
    record_bracket_winner(&mut bracket, round1[3], field[6].id).unwrap();

    let semi0 = bracket.rounds[1][0].id;
    assert_eq!(bracket.current, Some(semi0));
    // Feeder completion order decided the slots.
    assert_eq!(bracket.rounds[1][0].slot1, Some(field[0].id));
    assert_eq!(bracket.rounds[1][0].slot2, Some(field[2].id));
    assert_eq!(bracket.rounds[1][1].slot1, Some(field[4].id));
    assert_eq!(bracket.rounds[1][1].slot2, Some(field[6].id));
}

#[test]
fn round_names_count_back_from_the_final() {
    assert_eq!(round_name(1, 1), "Final");
    assert_eq!(round_name(1, 2), "Semifinal");
    assert_eq!(round_name(2, 2), "Final");
    assert_eq!(round_name(1, 3), "Quarterfinal");
    assert_eq!(round_name(2, 3), "Semifinal");
    assert_eq!(round_name(3, 3), "Final");
    assert_eq!(round_name(1, 4), "Round 1");
    assert_eq!(round_name(2, 4), "Quarterfinal");
}
