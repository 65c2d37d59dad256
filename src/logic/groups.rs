//! Group partitioning: split the field into groups of 3 and 4.

use crate::models::{Entry, StatEntry, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// How a field splits into groups: as many groups of 4 as the count
/// allows, groups of 3 for the rest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GroupPlan {
    pub groups_of_four: usize,
    pub groups_of_three: usize,
}

impl GroupPlan {
    /// Find the split for `total` entries, maximizing groups of 4: try the
    /// largest group-of-4 count first and walk down until the remainder
    /// divides into threes. Fails for counts with no 3/4 cover, which are
    /// everything under 3, plus 5.
    pub fn for_entries(total: usize) -> Result<Self, TournamentError> {
        if total < 3 {
            return Err(TournamentError::InvalidPartition(total));
        }
        for groups_of_four in (0..=total / 4).rev() {
            let rest = total - groups_of_four * 4;
            if rest % 3 == 0 {
                return Ok(Self {
                    groups_of_four,
                    groups_of_three: rest / 3,
                });
            }
        }
        Err(TournamentError::InvalidPartition(total))
    }

    pub fn group_count(&self) -> usize {
        self.groups_of_four + self.groups_of_three
    }

    /// Group sizes in order: all the fours, then the threes.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![4; self.groups_of_four];
        sizes.extend(std::iter::repeat(3).take(self.groups_of_three));
        sizes
    }

    /// How many entries will leave the group phase: 2 per group of 4,
    /// 1 per group of 3.
    pub fn qualifier_count(&self) -> usize {
        self.groups_of_four * 2 + self.groups_of_three
    }
}

/// Shuffle the entries and deal them into groups per the plan, wrapping
/// each in zeroed stats.
pub fn partition_entries<R: Rng>(
    entries: &[Entry],
    rng: &mut R,
) -> Result<Vec<Vec<StatEntry>>, TournamentError> {
    let plan = GroupPlan::for_entries(entries.len())?;
    let mut shuffled: Vec<Entry> = entries.to_vec();
    shuffled.shuffle(rng);

    let mut groups = Vec::with_capacity(plan.group_count());
    let mut rest = shuffled.as_slice();
    for size in plan.sizes() {
        let (head, tail) = rest.split_at(size);
        groups.push(head.iter().cloned().map(StatEntry::new).collect());
        rest = tail;
    }
    Ok(groups)
}
