use anchor_lang::prelude::*;

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, PRECISE_UNIT, TRACKER_SEED};
use crate::error::ErrorCode;
use crate::events::DrawingOpened;
use crate::state::{ComboTracker, Drawing, Lottery};

/// Accounts required to open the next drawing.
///
/// Drawings are strictly sequential: a new one can only open once the
/// previous one has settled, so the pool value carried in the lottery
/// state is always the settled value.
#[derive(Accounts)]
pub struct OpenDrawing<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
        has_one = authority @ ErrorCode::NotAuthorized
    )]
    pub lottery: Account<'info, Lottery>,

    /// Per-drawing state for the new drawing.
    #[account(
        init,
        payer = authority,
        space = 8 + Drawing::INIT_SPACE,
        seeds = [DRAWING_SEED, lottery.next_drawing_id.to_le_bytes().as_ref()],
        bump
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// Combo index for tickets sold into the new drawing.
    #[account(
        init,
        payer = authority,
        space = ComboTracker::SPACE,
        seeds = [TRACKER_SEED, lottery.next_drawing_id.to_le_bytes().as_ref()],
        bump
    )]
    pub tracker: Box<Account<'info, ComboTracker>>,

    pub system_program: Program<'info, System>,
}

/// Opens the next drawing: snapshots the pool value it enters with and
/// sets up its empty combo index.
pub fn process_open_drawing(
    ctx: Context<OpenDrawing>,
    sales_open_slot: u64,
    sales_close_slot: u64,
) -> Result<()> {
    let lottery = &mut ctx.accounts.lottery;
    require!(!lottery.paused, ErrorCode::Paused);
    require!(!lottery.drawing_open, ErrorCode::DrawingAlreadyOpen);
    require!(sales_close_slot > sales_open_slot, ErrorCode::InvalidConfig);

    let id = lottery.next_drawing_id;
    let drawing = &mut ctx.accounts.drawing;
    drawing.bump = ctx.bumps.drawing;
    drawing.id = id;
    drawing.sales_open_slot = sales_open_slot;
    drawing.sales_close_slot = sales_close_slot;
    drawing.lp_pool_total = lottery.lp_pool_total;
    drawing.pending_deposits = 0;
    drawing.pending_withdrawal_shares = 0;
    drawing.ticket_revenue = 0;
    drawing.tickets_sold = 0;
    drawing.randomness_account = Pubkey::default();
    drawing.winning_code = 0;
    drawing.numbers_revealed = false;
    drawing.settled = false;
    // Drawing zero starts, and stays, at one precise unit. Later
    // drawings get their accumulator at settlement and must not be read
    // before the settled flag is set.
    drawing.accumulator = if id == 0 { PRECISE_UNIT } else { 0 };

    ctx.accounts.tracker.configure(
        id,
        lottery.normal_max,
        lottery.bonusball_max,
        lottery.normal_tiers,
        ctx.bumps.tracker,
    );

    lottery.next_drawing_id = id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
    lottery.drawing_open = true;

    emit!(DrawingOpened {
        drawing_id: id,
        lp_pool_total: drawing.lp_pool_total,
        sales_open_slot,
        sales_close_slot,
    });
    Ok(())
}
