//! Combo index over the sold-ticket population of one drawing.
//!
//! Every ticket is indexed, at insert time, under each subset of its
//! normal balls (sizes 1..=normal_tiers), keyed by its bonusball. The
//! tier query at reveal then only has to enumerate the subsets of the
//! winning selection, once per tier size and reused across every candidate
//! bonusball, and sum the stored counters. Lookup work is bounded by
//! `normal_tiers * 2^pick_count` and does not grow with tickets sold.

use anchor_lang::prelude::*;

use crate::combinatorics::{choose, subsets_of_size};
use crate::constants::{BONUS_SHIFT, MAX_COMBO_ENTRIES, TIER_ROWS};
use crate::error::ErrorCode;
use crate::state::{BonusTotals, ComboTracker};

/// Per-tier totals split into bonus-unmatched (column 0) and
/// bonus-matched (column 1) buckets, rows indexed by tier.
pub type TierBuckets = [[u64; 2]; TIER_ROWS];

/// Storage key for a (bonusball, subset) counter.
pub fn combo_key(bonusball: u8, subset: u64) -> u64 {
    subset | (bonusball as u64) << BONUS_SHIFT
}

impl ComboTracker {
    /// One-time setup at drawing open. Fixes the matchable tier range
    /// `1..=normal_tiers` used by every insert and query.
    pub fn configure(
        &mut self,
        drawing_id: u64,
        normal_max: u8,
        bonusball_max: u8,
        normal_tiers: u8,
        bump: u8,
    ) {
        self.bump = bump;
        self.drawing_id = drawing_id;
        self.normal_max = normal_max;
        self.bonusball_max = bonusball_max;
        self.normal_tiers = normal_tiers;
        self.total_tickets = 0;
        self.combos.clear();
        self.bonus_totals = vec![BonusTotals::default(); bonusball_max as usize];
    }

    /// True iff this exact (normals, bonusball) combination was already
    /// inserted. The full-size subset of a ticket is the ticket itself, so
    /// presence of the full-size key decides duplicate status.
    pub fn is_duplicate(&self, normals: u64, bonusball: u8) -> bool {
        self.combos.contains_key(&combo_key(bonusball, normals))
    }

    /// Indexes one sold ticket.
    ///
    /// The first copy of a distinct ticket bumps `count` on every subset
    /// key; each further identical copy bumps `dup_count` instead, so
    /// `count` stays "distinct tickets containing this subset" throughout.
    pub fn insert(&mut self, normals: u64, bonusball: u8) -> Result<()> {
        require!(
            bonusball >= 1 && bonusball <= self.bonusball_max,
            ErrorCode::InvalidSelection
        );
        require!(
            normals.count_ones() == self.normal_tiers as u32,
            ErrorCode::InvalidSelection
        );

        let duplicate = self.is_duplicate(normals, bonusball);
        if !duplicate {
            // Worst case every subset of this ticket is a fresh key.
            let new_keys = (1usize << self.normal_tiers) - 1;
            require!(
                self.combos.len() + new_keys <= MAX_COMBO_ENTRIES,
                ErrorCode::TooManyTicketCombos
            );
        }

        for k in 1..=self.normal_tiers as u32 {
            let expected = choose(self.normal_tiers as u32, k)?;
            let mut produced: u128 = 0;
            for subset in subsets_of_size(normals, k) {
                produced += 1;
                let entry = self.combos.entry(combo_key(bonusball, subset)).or_default();
                if duplicate {
                    entry.dup_count =
                        entry.dup_count.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
                } else {
                    entry.count = entry.count.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
                }
            }
            require!(produced == expected, ErrorCode::SubsetCountMismatch);
        }

        let totals = &mut self.bonus_totals[bonusball as usize - 1];
        if duplicate {
            totals.dups = totals.dups.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        } else {
            totals.sold = totals.sold.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        }
        self.total_tickets = self
            .total_tickets
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Raw per-tier subset-incidence sums against a winning selection.
    ///
    /// For each tier k the k-subsets of the winning normals are enumerated
    /// exactly once, checked against the binomial coefficient, and the
    /// enumeration is reused for every candidate bonusball, summing into
    /// bonus-matched / bonus-unmatched columns. A ticket with m matched
    /// normals appears C(m, k) times in row k; the match aggregator
    /// unfolds these into exact per-tier counts.
    pub fn raw_tier_counts(
        &self,
        winning_normals: u64,
        winning_bonus: u8,
    ) -> Result<(TierBuckets, TierBuckets)> {
        require!(
            winning_bonus >= 1 && winning_bonus <= self.bonusball_max,
            ErrorCode::InvalidSelection
        );

        let mut counts: TierBuckets = [[0; 2]; TIER_ROWS];
        let mut dups: TierBuckets = [[0; 2]; TIER_ROWS];
        let pool = winning_normals.count_ones();

        for k in 1..=self.normal_tiers as u32 {
            let subsets: Vec<u64> = subsets_of_size(winning_normals, k).collect();
            require!(
                subsets.len() as u128 == choose(pool, k)?,
                ErrorCode::SubsetCountMismatch
            );

            for bonusball in 1..=self.bonusball_max {
                let col = usize::from(bonusball == winning_bonus);
                for &subset in &subsets {
                    if let Some(c) = self.combos.get(&combo_key(bonusball, subset)) {
                        counts[k as usize][col] += c.count as u64;
                        dups[k as usize][col] += c.dup_count as u64;
                    }
                }
            }
        }
        Ok((counts, dups))
    }

    /// (distinct, duplicate) tickets sold with the given bonusball.
    pub fn sold_with_bonus(&self, bonusball: u8) -> (u64, u64) {
        match self.bonus_totals.get(bonusball as usize - 1) {
            Some(t) => (t.sold, t.dups),
            None => (0, 0),
        }
    }

    /// (distinct, duplicate) tickets sold across all bonusballs.
    pub fn sold_totals(&self) -> (u64, u64) {
        self.bonus_totals
            .iter()
            .fold((0, 0), |(s, d), t| (s + t.sold, d + t.dups))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::ComboCount;
    use crate::ticket::pack;
    use std::collections::BTreeMap;

    pub(crate) fn tracker(normal_max: u8, bonusball_max: u8, normal_tiers: u8) -> ComboTracker {
        let mut t = ComboTracker {
            bump: 0,
            drawing_id: 0,
            normal_max: 0,
            bonusball_max: 0,
            normal_tiers: 0,
            total_tickets: 0,
            combos: BTreeMap::new(),
            bonus_totals: Vec::new(),
        };
        t.configure(0, normal_max, bonusball_max, normal_tiers, 255);
        t
    }

    #[test]
    fn duplicate_detection_is_exact() {
        let mut t = tracker(30, 10, 5);
        let normals = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        assert!(!t.is_duplicate(normals, 7));
        t.insert(normals, 7).unwrap();
        assert!(t.is_duplicate(normals, 7));
        // Same normals under a different bonusball is a distinct ticket.
        assert!(!t.is_duplicate(normals, 8));
    }

    #[test]
    fn identical_tickets_split_into_count_and_dups() {
        let mut t = tracker(30, 10, 5);
        let normals = pack(&[2, 4, 8, 16, 30], 5, 30).unwrap();
        let n = 4;
        for _ in 0..n {
            t.insert(normals, 3).unwrap();
        }
        let (counts, dups) = t.raw_tier_counts(normals, 3).unwrap();
        // Full-size tier: one distinct ticket, n-1 extra copies.
        assert_eq!(counts[5][1], 1);
        assert_eq!(dups[5][1], (n - 1) as u64);
        assert_eq!(counts[5][0], 0);
        assert_eq!(t.sold_with_bonus(3), (1, (n - 1) as u64));
        assert_eq!(t.total_tickets, n as u64);
    }

    #[test]
    fn full_size_counts_reproduce_tickets_sold_per_bonus() {
        let mut t = tracker(30, 10, 5);
        let tickets = [
            ([1u8, 2, 3, 4, 5], 2u8),
            ([1, 2, 3, 4, 6], 2),
            ([7, 8, 9, 10, 11], 2),
            ([1, 2, 3, 4, 5], 9),
        ];
        for (numbers, bonus) in tickets {
            t.insert(pack(&numbers, 5, 30).unwrap(), bonus).unwrap();
        }
        // Summing count over every full-size key of one bonusball gives the
        // distinct tickets sold with that bonusball.
        for bonus in [2u8, 9] {
            let sum: u64 = t
                .combos
                .iter()
                .filter(|(key, _)| {
                    let (mask, b) = crate::ticket::decode_ticket(**key);
                    b == bonus && mask.count_ones() == 5
                })
                .map(|(_, c)| c.count as u64)
                .sum();
            assert_eq!(sum, t.sold_with_bonus(bonus).0);
        }
    }

    #[test]
    fn bonus_buckets_are_separated() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        t.insert(winning, 6).unwrap();
        t.insert(winning, 7).unwrap();

        let (counts, _) = t.raw_tier_counts(winning, 6).unwrap();
        assert_eq!(counts[5][1], 1, "bonus-matched bucket");
        assert_eq!(counts[5][0], 1, "bonus-unmatched bucket");
    }

    #[test]
    fn partial_overlap_lands_in_raw_rows() {
        let mut t = tracker(30, 10, 5);
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        // Shares exactly 3 balls with the winning selection.
        let ticket = pack(&[3, 4, 5, 20, 21], 5, 30).unwrap();
        t.insert(ticket, 1).unwrap();

        let (counts, _) = t.raw_tier_counts(winning, 1).unwrap();
        // C(3, k) incidences per row k, nothing at rows 4 and 5.
        assert_eq!(counts[1][1], 3);
        assert_eq!(counts[2][1], 3);
        assert_eq!(counts[3][1], 1);
        assert_eq!(counts[4][1], 0);
        assert_eq!(counts[5][1], 0);
    }

    #[test]
    fn capacity_back_pressure() {
        let mut t = tracker(30, 10, 5);
        t.combos.insert(combo_key(1, 0b11), ComboCount::default());
        // Fill the map to just under capacity so the next distinct ticket
        // cannot fit its 31 subsets.
        while t.combos.len() < MAX_COMBO_ENTRIES - 30 {
            let filler = t.combos.len() as u64 + 100;
            t.combos.insert(combo_key(10, filler), ComboCount::default());
        }
        let normals = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        assert!(t.insert(normals, 1).is_err());
    }
}
