//! Drawing settlement math for the LP share ledger.
//!
//! The pool's value per share is tracked by a cumulative multiplicative
//! accumulator in 1e12 fixed point. One precise unit means "no growth
//! yet"; every settled drawing multiplies the previous accumulator by the
//! drawing's value ratio. The accumulator is the only conversion between
//! shares and currency, at any past or future drawing.
//!
//! # Invariants
//! - `accumulator[0] == PRECISE_UNIT`, always, including right after
//!   drawing 0 settles. Drawing 0 has no share-backed capital entering it,
//!   so its result flows into the pool total, not the accumulator.
//! - A drawing entering with `lp_pool_total == 0` resets the accumulator
//!   to one precise unit.
//! - Either the entire accumulator/pool update for a drawing commits, or
//!   nothing does; callers apply the returned snapshot atomically.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOM, PRECISE_UNIT};
use crate::error::ErrorCode;
use crate::state::LpPosition;

/// Everything the per-drawing settlement needs, gathered up front so the
/// computation is a pure function of this snapshot.
#[derive(Clone, Copy, Debug)]
pub struct SettlementInput {
    pub drawing_id: u64,
    /// Pool value that entered the drawing.
    pub lp_pool_total: u64,
    /// Deposits queued during the drawing.
    pub pending_deposits: u64,
    /// Shares committed to exit during the drawing.
    pub pending_withdrawal_shares: u128,
    /// Accumulator of the previous drawing (ignored for drawing 0).
    pub previous_accumulator: u128,
    /// LP earnings for the drawing, supplied by the fee pipeline.
    pub lp_earnings: u64,
    /// Total ticket winnings for the drawing, supplied by the fee pipeline.
    pub user_winnings: u64,
    /// Protocol fee actually being transferred.
    pub protocol_fee: u64,
}

/// Committed result of settling one drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementResult {
    /// Accumulator as of this drawing.
    pub accumulator: u128,
    /// Pool value after earnings, winnings and fee, before flows.
    pub post_draw_lp_value: u64,
    /// Currency owed to exiting LPs at the new accumulator.
    pub withdrawals_due: u64,
    /// Pool value carried into the next drawing.
    pub new_lp_pool_total: u64,
}

/// Floor(a * b / denom) with overflow checks.
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Result<u128> {
    a.checked_mul(b)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(denom)
        .ok_or_else(|| error!(ErrorCode::MathOverflow))
}

/// Currency value of a share amount at a given accumulator.
pub fn shares_to_value(shares: u128, accumulator: u128) -> Result<u64> {
    let value = mul_div_floor(shares, accumulator, PRECISE_UNIT)?;
    u64::try_from(value).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Shares minted for a currency amount at a given accumulator.
pub fn value_to_shares(amount: u64, accumulator: u128) -> Result<u128> {
    require!(accumulator != 0, ErrorCode::MathOverflow);
    mul_div_floor(amount as u128, PRECISE_UNIT, accumulator)
}

/// Protocol fee for a drawing. A fee is taken only when LP earnings exceed
/// user winnings and the surplus clears the configured floor; otherwise
/// the fee is zero and nothing should be transferred or announced.
pub fn protocol_fee_amount(
    lp_earnings: u64,
    user_winnings: u64,
    fee_bps: u16,
    surplus_floor: u64,
) -> Result<u64> {
    if lp_earnings <= user_winnings {
        return Ok(0);
    }
    let surplus = lp_earnings - user_winnings;
    if surplus <= surplus_floor {
        return Ok(0);
    }
    let fee = mul_div_floor(surplus as u128, fee_bps as u128, BPS_DENOM as u128)?;
    u64::try_from(fee).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Settles one drawing against the accumulator ledger.
///
/// `post = lp_pool_total + lp_earnings - user_winnings - protocol_fee`
/// must stay non-negative (`LpInsolvency` otherwise; upstream fee and
/// edge configuration is supposed to make this unreachable, but the
/// ledger defends regardless). Pending withdrawals convert at the *new*
/// accumulator, so exiting LPs participate in the drawing they exit.
pub fn settle(input: &SettlementInput) -> Result<SettlementResult> {
    let gross = input.lp_pool_total as u128 + input.lp_earnings as u128;
    let owed = input.user_winnings as u128 + input.protocol_fee as u128;
    require!(gross >= owed, ErrorCode::LpInsolvency);
    let post = gross - owed;
    let post_draw_lp_value =
        u64::try_from(post).map_err(|_| error!(ErrorCode::MathOverflow))?;

    let accumulator = if input.drawing_id == 0 {
        // Drawing 0 keeps its pre-initialized unit accumulator rather
        // than deriving one from an empty share base.
        PRECISE_UNIT
    } else if input.lp_pool_total == 0 {
        // Pool reset: nothing carried value through this drawing.
        PRECISE_UNIT
    } else {
        mul_div_floor(
            input.previous_accumulator,
            post,
            input.lp_pool_total as u128,
        )?
    };

    let withdrawals_due = shares_to_value(input.pending_withdrawal_shares, accumulator)?;

    let carried = post + input.pending_deposits as u128;
    require!(carried >= withdrawals_due as u128, ErrorCode::LpInsolvency);
    let new_lp_pool_total = u64::try_from(carried - withdrawals_due as u128)
        .map_err(|_| error!(ErrorCode::MathOverflow))?;

    Ok(SettlementResult {
        accumulator,
        post_draw_lp_value,
        withdrawals_due,
        new_lp_pool_total,
    })
}

/// Turns a pending deposit into shares at the accumulator of the drawing
/// it was queued into. Called lazily the next time the position is
/// touched after that drawing settles.
pub fn activate_pending_deposit(
    position: &mut LpPosition,
    settled_accumulator: u128,
) -> Result<()> {
    if position.pending_deposit == 0 {
        return Ok(());
    }
    let minted = value_to_shares(position.pending_deposit, settled_accumulator)?;
    position.shares = position
        .shares
        .checked_add(minted)
        .ok_or(ErrorCode::MathOverflow)?;
    position.pending_deposit = 0;
    position.pending_deposit_drawing = 0;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(drawing_id: u64) -> SettlementInput {
        SettlementInput {
            drawing_id,
            lp_pool_total: 1_000_000,
            pending_deposits: 0,
            pending_withdrawal_shares: 0,
            previous_accumulator: PRECISE_UNIT,
            lp_earnings: 0,
            user_winnings: 0,
            protocol_fee: 0,
        }
    }

    #[test]
    fn five_percent_gain_scales_the_accumulator() {
        let mut i = input(1);
        i.lp_earnings = 50_000;
        let r = settle(&i).unwrap();
        assert_eq!(r.accumulator, PRECISE_UNIT * 1_050_000 / 1_000_000);
        assert_eq!(r.accumulator, 1_050_000_000_000);
        assert_eq!(r.new_lp_pool_total, 1_050_000);
    }

    #[test]
    fn drawing_zero_accumulator_stays_at_one_unit() {
        let mut i = input(0);
        i.lp_earnings = 300_000;
        i.pending_deposits = 500_000;
        // A bogus previous accumulator must not leak into drawing 0.
        i.previous_accumulator = 0;
        let r = settle(&i).unwrap();
        assert_eq!(r.accumulator, PRECISE_UNIT);
        assert_eq!(r.new_lp_pool_total, 1_800_000);
    }

    #[test]
    fn empty_pool_resets_the_accumulator() {
        let mut i = input(3);
        i.lp_pool_total = 0;
        i.previous_accumulator = 2 * PRECISE_UNIT;
        i.pending_deposits = 250_000;
        let r = settle(&i).unwrap();
        assert_eq!(r.accumulator, PRECISE_UNIT);
        assert_eq!(r.new_lp_pool_total, 250_000);
    }

    #[test]
    fn settlement_conserves_value() {
        let mut i = input(2);
        i.previous_accumulator = 1_200_000_000_000;
        i.lp_earnings = 80_000;
        i.user_winnings = 30_000;
        i.protocol_fee = 5_000;
        i.pending_deposits = 40_000;
        i.pending_withdrawal_shares = 100_000;

        let r = settle(&i).unwrap();
        let expected_post = 1_000_000 + 80_000 - 30_000 - 5_000;
        assert_eq!(r.post_draw_lp_value, expected_post);
        let expected_due =
            (i.pending_withdrawal_shares * r.accumulator / PRECISE_UNIT) as u64;
        assert_eq!(r.withdrawals_due, expected_due);
        assert_eq!(
            r.new_lp_pool_total,
            expected_post + 40_000 - expected_due
        );
    }

    #[test]
    fn losses_compound_the_accumulator_down() {
        let mut i = input(1);
        i.lp_earnings = 10_000;
        i.user_winnings = 210_000;
        let r = settle(&i).unwrap();
        assert_eq!(r.accumulator, PRECISE_UNIT * 800_000 / 1_000_000);

        let mut next = input(2);
        next.lp_pool_total = r.new_lp_pool_total;
        next.previous_accumulator = r.accumulator;
        next.user_winnings = 400_000;
        let r2 = settle(&next).unwrap();
        // 0.8 * (400k / 800k) = 0.4 of the original unit.
        assert_eq!(r2.accumulator, PRECISE_UNIT * 2 / 5);
    }

    #[test]
    fn insolvency_is_rejected() {
        let mut i = input(4);
        i.user_winnings = 1_000_001;
        assert!(settle(&i).is_err());
    }

    #[test]
    fn fee_needs_surplus_above_the_floor() {
        // No surplus, no fee.
        assert_eq!(protocol_fee_amount(100, 200, 500, 0).unwrap(), 0);
        // Surplus at the floor still pays nothing.
        assert_eq!(protocol_fee_amount(10_000, 5_000, 500, 5_000).unwrap(), 0);
        // Above the floor: 5% of the surplus.
        assert_eq!(protocol_fee_amount(110_000, 10_000, 500, 50_000).unwrap(), 5_000);
    }

    #[test]
    fn share_conversions_round_trip_at_unit() {
        // At one precise unit a share is worth exactly one currency unit.
        assert_eq!(value_to_shares(1_000, PRECISE_UNIT).unwrap(), 1_000);
        assert_eq!(shares_to_value(1_000, PRECISE_UNIT).unwrap(), 1_000);
        // At 1.05x, shares are worth more on the way out.
        let acc = 1_050_000_000_000u128;
        let shares = value_to_shares(1_000_000, acc).unwrap();
        let back = shares_to_value(shares, acc).unwrap();
        assert!(back == 1_000_000 || back == 999_999); // floor rounding
    }

    #[test]
    fn pending_deposit_activates_at_the_settled_accumulator() {
        let mut position = LpPosition {
            bump: 0,
            owner: Pubkey::default(),
            shares: 0,
            pending_deposit: 500_000,
            pending_deposit_drawing: 2,
            pending_withdrawal_shares: 0,
            pending_withdrawal_drawing: 0,
        };
        activate_pending_deposit(&mut position, 2 * PRECISE_UNIT).unwrap();
        // Twice the unit value per share: half as many shares.
        assert_eq!(position.shares, 250_000);
        assert_eq!(position.pending_deposit, 0);

        // Idempotent once drained.
        activate_pending_deposit(&mut position, PRECISE_UNIT).unwrap();
        assert_eq!(position.shares, 250_000);
    }
}
