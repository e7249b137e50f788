//! Per-drawing match aggregation.
//!
//! The combo index answers "how many sold tickets contain this subset";
//! a ticket with m matched normals therefore shows up C(m, k) times in the
//! raw row for tier k. This module unfolds those incidence sums into exact
//! per-tier ticket counts, the numbers the payout side actually needs,
//! for every (tier, bonus-matched) bucket, distinct tickets and duplicate
//! copies alike.

use anchor_lang::prelude::*;

use crate::combinatorics::choose;
use crate::combo::TierBuckets;
use crate::constants::{TIER_CELLS, TIER_ROWS};
use crate::error::ErrorCode;
use crate::state::ComboTracker;

/// Exact match counts for one drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchTable {
    /// Distinct tickets per (tier, bonus-matched) bucket, tier 0 included.
    pub tickets: TierBuckets,
    /// Additional identical copies per bucket.
    pub duplicates: TierBuckets,
}

/// Flattened cell index for a (tier, bonus-matched) bucket, used for the
/// tables persisted on the drawing account.
pub const fn tier_cell(tier: u8, bonus_matched: bool) -> usize {
    tier as usize * 2 + bonus_matched as usize
}

impl MatchTable {
    pub fn tickets_flat(&self) -> [u64; TIER_CELLS] {
        let mut flat = [0u64; TIER_CELLS];
        for tier in 0..TIER_ROWS {
            flat[tier * 2] = self.tickets[tier][0];
            flat[tier * 2 + 1] = self.tickets[tier][1];
        }
        flat
    }

    pub fn duplicates_flat(&self) -> [u64; TIER_CELLS] {
        let mut flat = [0u64; TIER_CELLS];
        for tier in 0..TIER_ROWS {
            flat[tier * 2] = self.duplicates[tier][0];
            flat[tier * 2 + 1] = self.duplicates[tier][1];
        }
        flat
    }
}

/// Computes the full match table for a winning selection.
///
/// The binomial unfold factors C(j, k) are computed once per tier pair and
/// reused across both bonus columns and both tables; nothing is re-derived
/// per bonusball candidate. Tier 0 falls out of the tracker's per-bonus
/// sold totals.
pub fn aggregate_matches(
    tracker: &ComboTracker,
    winning_normals: u64,
    winning_bonus: u8,
) -> Result<MatchTable> {
    let (raw_counts, raw_dups) = tracker.raw_tier_counts(winning_normals, winning_bonus)?;
    let tiers = tracker.normal_tiers as usize;

    let mut binom = [[0u128; TIER_ROWS]; TIER_ROWS];
    for j in 1..=tiers {
        for k in 1..=j {
            binom[j][k] = choose(j as u32, k as u32)?;
        }
    }

    let mut tickets = unfold_exact(&raw_counts, &binom, tiers)?;
    let mut duplicates = unfold_exact(&raw_dups, &binom, tiers)?;

    // Tier 0 per column: tickets sold with that bonus status minus
    // everything that matched at least one ball.
    let (sold_all, dups_all) = tracker.sold_totals();
    let (sold_bonus, dups_bonus) = tracker.sold_with_bonus(winning_bonus);
    let sold = [sold_all - sold_bonus, sold_bonus];
    let dup_sold = [dups_all - dups_bonus, dups_bonus];
    for col in 0..2 {
        let matched: u64 = (1..=tiers).map(|k| tickets[k][col]).sum();
        let matched_dups: u64 = (1..=tiers).map(|k| duplicates[k][col]).sum();
        tickets[0][col] = sold[col]
            .checked_sub(matched)
            .ok_or(ErrorCode::InconsistentMatchCounts)?;
        duplicates[0][col] = dup_sold[col]
            .checked_sub(matched_dups)
            .ok_or(ErrorCode::InconsistentMatchCounts)?;
    }

    Ok(MatchTable { tickets, duplicates })
}

/// Top-down unfold: exact[k] = raw[k] - sum_{j>k} C(j, k) * exact[j].
fn unfold_exact(
    raw: &TierBuckets,
    binom: &[[u128; TIER_ROWS]; TIER_ROWS],
    tiers: usize,
) -> Result<TierBuckets> {
    let mut exact: TierBuckets = [[0; 2]; TIER_ROWS];
    for col in 0..2 {
        for k in (1..=tiers).rev() {
            let mut overlap: u128 = 0;
            for j in k + 1..=tiers {
                overlap = overlap
                    .checked_add(binom[j][k].checked_mul(exact[j][col] as u128).ok_or(
                        ErrorCode::MathOverflow,
                    )?)
                    .ok_or(ErrorCode::MathOverflow)?;
            }
            let raw_k = raw[k][col] as u128;
            require!(raw_k >= overlap, ErrorCode::InconsistentMatchCounts);
            exact[k][col] =
                u64::try_from(raw_k - overlap).map_err(|_| error!(ErrorCode::MathOverflow))?;
        }
    }
    Ok(exact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::tests::tracker;
    use crate::ticket::pack;

    #[test]
    fn exact_tiers_from_partial_overlaps() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();

        // One ticket per overlap size 0..=5, all with the winning bonus.
        t.insert(pack(&[10, 11, 12, 13, 14], 5, 30).unwrap(), 4).unwrap(); // 0
        t.insert(pack(&[1, 11, 12, 13, 14], 5, 30).unwrap(), 4).unwrap(); // 1
        t.insert(pack(&[1, 2, 12, 13, 14], 5, 30).unwrap(), 4).unwrap(); // 2
        t.insert(pack(&[1, 2, 3, 13, 14], 5, 30).unwrap(), 4).unwrap(); // 3
        t.insert(pack(&[1, 2, 3, 4, 14], 5, 30).unwrap(), 4).unwrap(); // 4
        t.insert(winning, 4).unwrap(); // 5

        let table = aggregate_matches(&t, winning, 4).unwrap();
        for tier in 0..=5usize {
            assert_eq!(table.tickets[tier][1], 1, "tier {tier} bonus-matched");
            assert_eq!(table.tickets[tier][0], 0, "tier {tier} bonus-unmatched");
        }
        assert_eq!(table.duplicates, [[0; 2]; TIER_ROWS]);
    }

    #[test]
    fn exact_match_only_counts_under_matching_bonus() {
        // 30-ball pool, 5-pick tickets, tiers 1..=5: the winning ticket
        // lands in the bonus-matched bucket only when its stored bonusball
        // equals the winning one.
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[6, 12, 18, 24, 30], 5, 30).unwrap();
        t.insert(winning, 2).unwrap();

        let with_bonus = aggregate_matches(&t, winning, 2).unwrap();
        assert_eq!(with_bonus.tickets[5][1], 1);
        assert_eq!(with_bonus.tickets[5][0], 0);

        let other_bonus = aggregate_matches(&t, winning, 3).unwrap();
        assert_eq!(other_bonus.tickets[5][1], 0);
        assert_eq!(other_bonus.tickets[5][0], 1);
    }

    #[test]
    fn duplicates_follow_their_ticket_tier() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        let three_hit = pack(&[3, 4, 5, 21, 22], 5, 30).unwrap();
        for _ in 0..3 {
            t.insert(three_hit, 8).unwrap();
        }

        let table = aggregate_matches(&t, winning, 8).unwrap();
        assert_eq!(table.tickets[3][1], 1);
        assert_eq!(table.duplicates[3][1], 2);
        for tier in [0usize, 1, 2, 4, 5] {
            assert_eq!(table.tickets[tier][1], 0, "tier {tier}");
            assert_eq!(table.duplicates[tier][1], 0, "tier {tier}");
        }
    }

    #[test]
    fn tier_zero_splits_by_bonus_status() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        t.insert(pack(&[20, 21, 22, 23, 24], 5, 30).unwrap(), 5).unwrap();
        t.insert(pack(&[20, 21, 22, 23, 25], 5, 30).unwrap(), 6).unwrap();
        t.insert(pack(&[20, 21, 22, 23, 26], 5, 30).unwrap(), 6).unwrap();

        let table = aggregate_matches(&t, winning, 5).unwrap();
        assert_eq!(table.tickets[0][1], 1);
        assert_eq!(table.tickets[0][0], 2);
    }

    #[test]
    fn flat_tables_round_trip_cells() {
        let mut table = MatchTable::default();
        table.tickets[3][1] = 7;
        table.duplicates[2][0] = 4;
        let flat = table.tickets_flat();
        assert_eq!(flat[tier_cell(3, true)], 7);
        let dup_flat = table.duplicates_flat();
        assert_eq!(dup_flat[tier_cell(2, false)], 4);
    }

    #[test]
    fn mixed_population_totals_are_conserved() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[2, 4, 6, 8, 10], 5, 30).unwrap();
        let population: [(&[u8], u8, usize); 4] = [
            (&[2, 4, 6, 11, 12], 1, 2),  // tier 3, duplicated once
            (&[2, 13, 14, 15, 16], 1, 1), // tier 1
            (&[17, 18, 19, 20, 21], 2, 1), // tier 0
            (&[2, 4, 6, 8, 10], 1, 1),   // tier 5
        ];
        for (numbers, bonus, copies) in population {
            let mask = pack(numbers, 5, 30).unwrap();
            for _ in 0..copies {
                t.insert(mask, bonus).unwrap();
            }
        }

        let table = aggregate_matches(&t, winning, 1).unwrap();
        let distinct: u64 = (0..TIER_ROWS).map(|k| table.tickets[k][0] + table.tickets[k][1]).sum();
        let copies: u64 = (0..TIER_ROWS)
            .map(|k| table.duplicates[k][0] + table.duplicates[k][1])
            .sum();
        let (sold, dups) = t.sold_totals();
        assert_eq!(distinct, sold);
        assert_eq!(copies, dups);
        assert_eq!(distinct + copies, t.total_tickets);

        assert_eq!(table.tickets[3][1], 1);
        assert_eq!(table.duplicates[3][1], 1);
        assert_eq!(table.tickets[1][1], 1);
        assert_eq!(table.tickets[0][0], 1);
        assert_eq!(table.tickets[5][1], 1);
    }
}
