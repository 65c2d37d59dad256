//! Match scheduling: every pair plays once, in a shuffled order.

use crate::models::{GameMatch, StatEntry};
use rand::seq::SliceRandom;
use rand::Rng;

/// One match per unordered pair of participants, presented in a random
/// order. The pair set is exact; only the presentation order is shuffled.
pub fn round_robin_matches<R: Rng>(participants: &[StatEntry], rng: &mut R) -> Vec<GameMatch> {
    let mut matches = Vec::new();
    for i in 0..participants.len() {
        for j in (i + 1)..participants.len() {
            matches.push(GameMatch::new(participants[i].id(), participants[j].id()));
        }
    }
    matches.shuffle(rng);
    matches
}
