use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, TIER_CELLS};
use crate::error::ErrorCode;
use crate::events::{DrawingSettled, ProtocolFeeTaken};
use crate::instructions::transfer_from_vault;
use crate::settlement::{self, SettlementInput};
use crate::state::{Drawing, Lottery};

/// Accounts required to settle a drawing's LP economics.
#[derive(Accounts)]
pub struct SettleDrawing<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
        has_one = authority @ ErrorCode::NotAuthorized,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The drawing being settled.
    #[account(
        mut,
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
        constraint = drawing.id + 1 == lottery.next_drawing_id @ ErrorCode::DrawingMismatch,
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// The previous drawing, supplying the prior accumulator. Absent only
    /// for drawing zero.
    pub previous_drawing: Option<Account<'info, Drawing>>,

    /// Mint of the settlement currency.
    #[account(address = lottery.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// Program-owned vault the protocol fee leaves from.
    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Treasury token account receiving the protocol fee.
    #[account(
        mut,
        constraint = treasury_token_account.owner == lottery.treasury
            @ ErrorCode::NotAuthorized,
    )]
    pub treasury_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Settles one drawing: converts its financial results into the new
/// accumulator and pool total, atomically.
///
/// `user_winnings` and `lp_earnings` arrive as already-computed amounts
/// from the fee pipeline; the ledger applies them, it does not re-derive
/// them. `tier_prizes` is the per-ticket payout for each (tier,
/// bonus-matched) bucket and must account for exactly `user_winnings`
/// across the revealed winner counts.
pub fn process_settle_drawing(
    ctx: Context<SettleDrawing>,
    user_winnings: u64,
    lp_earnings: u64,
    tier_prizes: [u64; TIER_CELLS],
) -> Result<()> {
    let lottery = &mut ctx.accounts.lottery;
    let drawing = &mut ctx.accounts.drawing;

    require!(drawing.numbers_revealed, ErrorCode::NumbersNotRevealed);
    require!(!drawing.settled, ErrorCode::DrawingAlreadySettled);
    require!(lp_earnings <= drawing.ticket_revenue, ErrorCode::InvalidConfig);

    // The prize table and the winner counts must reproduce the winnings
    // total, or claims would drain more (or less) than was reserved.
    let mut owed: u128 = 0;
    for cell in 0..TIER_CELLS {
        let winners =
            drawing.match_counts[cell] as u128 + drawing.dup_match_counts[cell] as u128;
        owed = owed
            .checked_add(
                (tier_prizes[cell] as u128)
                    .checked_mul(winners)
                    .ok_or(ErrorCode::MathOverflow)?,
            )
            .ok_or(ErrorCode::MathOverflow)?;
    }
    require!(owed == user_winnings as u128, ErrorCode::PrizeTableMismatch);

    let protocol_fee = settlement::protocol_fee_amount(
        lp_earnings,
        user_winnings,
        lottery.protocol_fee_bps,
        lottery.fee_surplus_floor,
    )?;

    let previous_accumulator = if drawing.id == 0 {
        // Ignored by the settlement math; drawing zero keeps its unit
        // accumulator.
        0
    } else {
        let previous = ctx
            .accounts
            .previous_drawing
            .as_ref()
            .ok_or(ErrorCode::MissingPriorDrawing)?;
        require!(previous.id + 1 == drawing.id, ErrorCode::DrawingMismatch);
        require!(previous.settled, ErrorCode::NotYetSettled);
        previous.accumulator
    };

    let result = settlement::settle(&SettlementInput {
        drawing_id: drawing.id,
        lp_pool_total: drawing.lp_pool_total,
        pending_deposits: drawing.pending_deposits,
        pending_withdrawal_shares: drawing.pending_withdrawal_shares,
        previous_accumulator,
        lp_earnings,
        user_winnings,
        protocol_fee,
    })?;

    drawing.accumulator = result.accumulator;
    drawing.user_winnings = user_winnings;
    drawing.lp_earnings = lp_earnings;
    drawing.protocol_fee = protocol_fee;
    drawing.tier_prizes = tier_prizes;
    drawing.settled = true;

    lottery.lp_pool_total = result.new_lp_pool_total;
    lottery.drawing_open = false;

    if protocol_fee > 0 {
        transfer_from_vault(
            &ctx.accounts.vault,
            &ctx.accounts.treasury_token_account,
            &ctx.accounts.token_mint,
            lottery,
            &ctx.accounts.token_program,
            protocol_fee,
        )?;
        // Announced only when something actually moved.
        emit!(ProtocolFeeTaken {
            drawing_id: drawing.id,
            amount: protocol_fee,
        });
    }

    emit!(DrawingSettled {
        drawing_id: drawing.id,
        accumulator: result.accumulator,
        post_draw_lp_value: result.post_draw_lp_value,
        new_lp_pool_total: result.new_lp_pool_total,
        user_winnings,
        lp_earnings,
        protocol_fee,
    });
    Ok(())
}
