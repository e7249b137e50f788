//! Ticket number packing.
//!
//! A ticket is a fixed-size selection of normal balls plus one bonusball.
//! The normal balls live in a bit vector (bit `i` set means ball `i` is
//! selected, bit 0 unused) and the whole ticket packs into a single u64
//! with the bonusball in the high byte. Packing is lossless:
//! `unpack(pack(s)) == sorted(s)` for every valid selection.

use anchor_lang::prelude::*;
use solana_program::keccak;

use crate::constants::{BONUS_SHIFT, MAX_NORMAL_BALLS};
use crate::error::ErrorCode;

/// Packs a normal-ball selection into a bit vector.
///
/// Fails with `InvalidSelection` when the count is wrong, a ball is zero,
/// exceeds `max_ball`, or repeats.
pub fn pack(numbers: &[u8], pick_count: u8, max_ball: u8) -> Result<u64> {
    require!(numbers.len() == pick_count as usize, ErrorCode::InvalidSelection);

    let mut mask = 0u64;
    for &n in numbers {
        require!(n >= 1 && n <= max_ball, ErrorCode::InvalidSelection);
        let bit = 1u64 << n;
        require!(mask & bit == 0, ErrorCode::InvalidSelection);
        mask |= bit;
    }
    Ok(mask)
}

/// Unpacks a normal-ball bit vector into ascending ball numbers.
pub fn unpack(mask: u64, max_ball: u8) -> Vec<u8> {
    let mut numbers = Vec::with_capacity(mask.count_ones() as usize);
    for n in 1..=max_ball {
        if mask & (1u64 << n) != 0 {
            numbers.push(n);
        }
    }
    numbers
}

/// Packs normals and bonusball into one ticket code.
pub fn encode_ticket(mask: u64, bonusball: u8) -> u64 {
    mask | (bonusball as u64) << BONUS_SHIFT
}

/// Splits a ticket code back into (normals mask, bonusball).
pub fn decode_ticket(code: u64) -> (u64, u8) {
    let mask = code & ((1u64 << BONUS_SHIFT) - 1);
    let bonusball = (code >> BONUS_SHIFT) as u8;
    (mask, bonusball)
}

/// Number of normal balls a ticket shares with the winning selection.
pub fn matched_tier(ticket_mask: u64, winning_mask: u64) -> u8 {
    (ticket_mask & winning_mask).count_ones() as u8
}

/// Expands a 32-byte randomness seed into a winning selection:
/// `pick_count` distinct normal balls in 1..=max_ball plus one bonusball in
/// 1..=bonus_max. The seed is stretched through keccak as bytes run out, so
/// the derivation is deterministic in the seed alone.
pub fn draw_numbers(seed: &[u8; 32], pick_count: u8, max_ball: u8, bonus_max: u8) -> (u64, u8) {
    debug_assert!(pick_count <= max_ball && max_ball <= MAX_NORMAL_BALLS);

    fn next_byte(block: &mut [u8; 32], cursor: &mut usize) -> u8 {
        if *cursor == block.len() {
            *block = keccak::hashv(&[&block[..]]).0;
            *cursor = 0;
        }
        let b = block[*cursor];
        *cursor += 1;
        b
    }

    let mut block = keccak::hashv(&[seed.as_ref()]).0;
    let mut cursor = 0usize;

    let mut mask = 0u64;
    let mut picked = 0u8;
    while picked < pick_count {
        let ball = next_byte(&mut block, &mut cursor) % max_ball + 1;
        let bit = 1u64 << ball;
        if mask & bit == 0 {
            mask |= bit;
            picked += 1;
        }
    }
    let bonusball = next_byte(&mut block, &mut cursor) % bonus_max + 1;
    (mask, bonusball)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let selections: [&[u8]; 3] = [&[1, 2, 3, 4, 5], &[5, 17, 30, 2, 9], &[30, 29, 28, 27, 26]];
        for numbers in selections {
            let mask = pack(numbers, 5, 30).unwrap();
            let mut sorted = numbers.to_vec();
            sorted.sort_unstable();
            assert_eq!(unpack(mask, 30), sorted);
        }
    }

    #[test]
    fn pack_rejects_bad_selections() {
        assert!(pack(&[1, 2, 3, 4], 5, 30).is_err(), "wrong count");
        assert!(pack(&[0, 2, 3, 4, 5], 5, 30).is_err(), "ball zero");
        assert!(pack(&[1, 2, 3, 4, 31], 5, 30).is_err(), "above max");
        assert!(pack(&[1, 2, 3, 4, 4], 5, 30).is_err(), "duplicate");
    }

    #[test]
    fn ticket_code_round_trip() {
        let mask = pack(&[3, 7, 11, 23, 30], 5, 30).unwrap();
        let code = encode_ticket(mask, 9);
        assert_eq!(decode_ticket(code), (mask, 9));
    }

    #[test]
    fn matched_tier_counts_overlap() {
        let winning = pack(&[1, 2, 3, 4, 5], 5, 30).unwrap();
        let ticket = pack(&[3, 4, 5, 6, 7], 5, 30).unwrap();
        assert_eq!(matched_tier(ticket, winning), 3);
        assert_eq!(matched_tier(winning, winning), 5);
        let miss = pack(&[10, 11, 12, 13, 14], 5, 30).unwrap();
        assert_eq!(matched_tier(miss, winning), 0);
    }

    #[test]
    fn draw_numbers_produces_valid_selection() {
        for i in 0u8..20 {
            let mut seed = [0u8; 32];
            seed[0] = i;
            let (mask, bonusball) = draw_numbers(&seed, 5, 30, 10);
            assert_eq!(mask.count_ones(), 5);
            assert_eq!(mask & 1, 0, "bit 0 must stay clear");
            assert!(unpack(mask, 30).iter().all(|&n| (1..=30).contains(&n)));
            assert!((1..=10).contains(&bonusball));
        }
    }

    #[test]
    fn draw_numbers_is_deterministic() {
        let seed = [7u8; 32];
        assert_eq!(draw_numbers(&seed, 5, 30, 10), draw_numbers(&seed, 5, 30, 10));
    }
}
