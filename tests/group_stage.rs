//! Integration tests for the group phase: partitioning, scheduling, standings.

use drawing_tournament_web::{
    group_qualifiers, partition_entries, rank_standings, record_outcome, round_robin_matches,
    Entry, GroupPlan, StatEntry, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| Entry::new(format!("Drawing {i}"), format!("Author {i}"), ""))
        .collect()
}

fn stat_entries(n: usize) -> Vec<StatEntry> {
    entries(n).into_iter().map(StatEntry::new).collect()
}

#[test]
fn plan_maximizes_groups_of_four() {
    let plan = GroupPlan::for_entries(7).unwrap();
    assert_eq!(plan.groups_of_four, 1);
    assert_eq!(plan.groups_of_three, 1);
    assert_eq!(plan.sizes(), vec![4, 3]);
    assert_eq!(plan.qualifier_count(), 3);

    let plan = GroupPlan::for_entries(11).unwrap();
    assert_eq!((plan.groups_of_four, plan.groups_of_three), (2, 1));

    let plan = GroupPlan::for_entries(12).unwrap();
    assert_eq!((plan.groups_of_four, plan.groups_of_three), (3, 0));
}

#[test]
fn plan_covers_every_count_except_five() {
    for n in 3..=60 {
        let result = GroupPlan::for_entries(n);
        if n == 5 {
            assert!(matches!(result, Err(TournamentError::InvalidPartition(5))));
        } else {
            let plan = result.unwrap();
            assert_eq!(plan.groups_of_four * 4 + plan.groups_of_three * 3, n);
        }
    }
    assert!(GroupPlan::for_entries(0).is_err());
    assert!(GroupPlan::for_entries(2).is_err());
}

#[test]
fn partition_preserves_every_entry() {
    let field = entries(10);
    let mut rng = StdRng::seed_from_u64(7);
    let groups = partition_entries(&field, &mut rng).unwrap();

    let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    assert_eq!(sizes, vec![4, 3, 3]);

    let mut seen = HashSet::new();
    for stat in groups.iter().flatten() {
        assert_eq!(stat.points, 0);
        assert_eq!(stat.wins, 0);
        assert_eq!(stat.losses, 0);
        assert_eq!(stat.matches_played, 0);
        seen.insert(stat.id());
    }
    let expected: HashSet<_> = field.iter().map(|e| e.id).collect();
    assert_eq!(seen, expected);
}

#[test]
fn partition_is_reproducible_with_a_seed() {
    let field = entries(12);
    let a = partition_entries(&field, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = partition_entries(&field, &mut StdRng::seed_from_u64(42)).unwrap();
    let a_ids: Vec<Vec<_>> = a
        .iter()
        .map(|g| g.iter().map(|s| s.id()).collect::<Vec<_>>())
        .collect();
    let b_ids: Vec<Vec<_>> = b
        .iter()
        .map(|g| g.iter().map(|s| s.id()).collect::<Vec<_>>())
        .collect();
    assert_eq!(a_ids, b_ids);
}

#[test]
fn schedule_is_every_pair_once() {
    for m in 2..=8 {
        let participants = stat_entries(m);
        let mut rng = StdRng::seed_from_u64(3);
        let matches = round_robin_matches(&participants, &mut rng);
        assert_eq!(matches.len(), m * (m - 1) / 2);

        let mut pairs = HashSet::new();
        for game in &matches {
            assert_ne!(game.entry1, game.entry2);
            let pair = if game.entry1 < game.entry2 {
                (game.entry1, game.entry2)
            } else {
                (game.entry2, game.entry1)
            };
            assert!(pairs.insert(pair), "pair scheduled twice");
        }
        assert_eq!(pairs.len(), m * (m - 1) / 2);
    }
}

#[test]
fn outcome_updates_winner_and_loser() {
    let mut standings = stat_entries(4);
    let mut rng = StdRng::seed_from_u64(1);
    let mut matches = round_robin_matches(&standings, &mut rng);

    let game = &mut matches[0];
    let winner = game.entry1;
    let loser = game.entry2;
    record_outcome(&mut standings, game, winner).unwrap();

    let w = standings.iter().find(|s| s.id() == winner).unwrap();
    assert_eq!((w.points, w.wins, w.losses, w.matches_played), (3, 1, 0, 1));
    let l = standings.iter().find(|s| s.id() == loser).unwrap();
    assert_eq!((l.points, l.wins, l.losses, l.matches_played), (0, 0, 1, 1));
    assert_eq!(game.winner, Some(winner));
}

#[test]
fn double_vote_is_rejected_without_changes() {
    let mut standings = stat_entries(3);
    let mut matches = round_robin_matches(&standings, &mut StdRng::seed_from_u64(5));
    let game = &mut matches[0];
    let first = game.entry1;
    let second = game.entry2;
    record_outcome(&mut standings, game, first).unwrap();

    let before = standings.clone();
    let result = record_outcome(&mut standings, game, second);
    assert!(matches!(result, Err(TournamentError::AlreadyDecided(_))));
    assert_eq!(standings, before);
    assert_eq!(game.winner, Some(first));
}

#[test]
fn winner_must_be_in_the_match() {
    let mut standings = stat_entries(4);
    let mut matches = round_robin_matches(&standings, &mut StdRng::seed_from_u64(5));
    let outsider = standings
        .iter()
        .map(|s| s.id())
        .find(|id| !matches[0].has_participant(*id))
        .unwrap();
    let before = standings.clone();
    let game = &mut matches[0];
    let result = record_outcome(&mut standings, game, outsider);
    assert!(matches!(result, Err(TournamentError::NotAParticipant(_))));
    assert_eq!(standings, before);
    assert!(game.winner.is_none());
}

#[test]
fn ranking_sorts_by_points_and_keeps_tie_order() {
    let mut standings = stat_entries(4);
    standings[1].record_win();
    standings[2].record_win();
    standings[3].record_win();
    standings[3].record_win();

    let ranked = rank_standings(&standings);
    let ids: Vec<_> = ranked.iter().map(|s| s.id()).collect();
    let original: Vec<_> = standings.iter().map(|s| s.id()).collect();
    // 6 points first, then the two 3-point entries in their original
    // order, then the 0-point entry.
    assert_eq!(ids, vec![original[3], original[1], original[2], original[0]]);
    // Input untouched.
    assert_eq!(
        standings.iter().map(|s| s.id()).collect::<Vec<_>>(),
        original
    );
}

#[test]
fn groups_of_three_send_one_groups_of_four_send_two() {
    let mut three = stat_entries(3);
    three[2].record_win();
    let q = group_qualifiers(&three);
    assert_eq!(q.len(), 1);
    assert_eq!(q[0].id(), three[2].id());

    let mut four = stat_entries(4);
    four[1].record_win();
    four[3].record_win();
    four[3].record_win();
    let q = group_qualifiers(&four);
    assert_eq!(q.len(), 2);
    assert_eq!(q[0].id(), four[3].id());
    assert_eq!(q[1].id(), four[1].id());
}
