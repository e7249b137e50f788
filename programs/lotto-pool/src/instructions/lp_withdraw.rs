use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, LP_POSITION_SEED};
use crate::error::ErrorCode;
use crate::events::{EmergencyWithdrawal, WithdrawFinalized, WithdrawInitiated};
use crate::instructions::{settle_pending_deposit, transfer_from_vault};
use crate::settlement;
use crate::state::{Drawing, Lottery, LpPosition};

/// Accounts required to start a two-phase withdrawal.
#[derive(Accounts)]
pub struct InitiateWithdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The open drawing the withdrawal is queued into.
    #[account(
        mut,
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
        constraint = drawing.id + 1 == lottery.next_drawing_id @ ErrorCode::DrawingMismatch,
        constraint = !drawing.settled @ ErrorCode::DrawingAlreadySettled,
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// Settled drawing holding the accumulator for a leftover pending
    /// deposit, if the position has one.
    pub prior_drawing: Option<Account<'info, Drawing>>,

    #[account(
        mut,
        seeds = [LP_POSITION_SEED, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ ErrorCode::NotAuthorized,
    )]
    pub position: Box<Account<'info, LpPosition>>,
}

/// Accounts required to finalize a withdrawal after its drawing settled.
#[derive(Accounts)]
pub struct FinalizeWithdraw<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The drawing the withdrawal was queued into.
    #[account(
        seeds = [DRAWING_SEED, withdraw_drawing.id.to_le_bytes().as_ref()],
        bump = withdraw_drawing.bump,
    )]
    pub withdraw_drawing: Box<Account<'info, Drawing>>,

    #[account(
        mut,
        seeds = [LP_POSITION_SEED, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ ErrorCode::NotAuthorized,
        constraint = position.pending_withdrawal_drawing == withdraw_drawing.id
            @ ErrorCode::DrawingMismatch,
    )]
    pub position: Box<Account<'info, LpPosition>>,

    /// Mint of the settlement currency.
    #[account(address = lottery.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Accounts required for an emergency LP exit while the pool is paused.
#[derive(Accounts)]
pub struct EmergencyWithdrawLp<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The latest settled drawing; its accumulator prices the exit.
    #[account(
        seeds = [DRAWING_SEED, priced_drawing.id.to_le_bytes().as_ref()],
        bump = priced_drawing.bump,
        constraint = priced_drawing.settled @ ErrorCode::NotYetSettled,
    )]
    pub priced_drawing: Box<Account<'info, Drawing>>,

    /// The still-open drawing, required to roll back capital the position
    /// has queued into it.
    #[account(mut)]
    pub open_drawing: Option<Account<'info, Drawing>>,

    #[account(
        mut,
        seeds = [LP_POSITION_SEED, owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ ErrorCode::NotAuthorized,
    )]
    pub position: Box<Account<'info, LpPosition>>,

    /// Mint of the settlement currency.
    #[account(address = lottery.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Commits shares to exit. The shares leave the active balance now and
/// convert to currency at the accumulator this drawing settles with, so
/// exiting LPs still carry this drawing's result.
pub fn process_initiate_withdraw(ctx: Context<InitiateWithdraw>, shares: u128) -> Result<()> {
    let lottery = &ctx.accounts.lottery;
    require!(!lottery.paused, ErrorCode::Paused);
    require!(shares > 0, ErrorCode::NothingToWithdraw);

    let drawing = &mut ctx.accounts.drawing;
    let position = &mut ctx.accounts.position;
    require!(
        position.pending_withdrawal_shares == 0,
        ErrorCode::WithdrawalAlreadyPending
    );

    settle_pending_deposit(position, drawing.id, &ctx.accounts.prior_drawing)?;
    require!(position.shares >= shares, ErrorCode::InsufficientShares);

    position.shares -= shares;
    position.pending_withdrawal_shares = shares;
    position.pending_withdrawal_drawing = drawing.id;
    drawing.pending_withdrawal_shares = drawing
        .pending_withdrawal_shares
        .checked_add(shares)
        .ok_or(ErrorCode::MathOverflow)?;

    emit!(WithdrawInitiated {
        drawing_id: drawing.id,
        owner: position.owner,
        shares,
    });
    Ok(())
}

/// Releases a previously initiated withdrawal once its drawing settled,
/// at that drawing's accumulator.
pub fn process_finalize_withdraw(ctx: Context<FinalizeWithdraw>) -> Result<()> {
    let drawing = &ctx.accounts.withdraw_drawing;
    let position = &mut ctx.accounts.position;

    let shares = position.pending_withdrawal_shares;
    require!(shares > 0, ErrorCode::NothingToWithdraw);
    require!(drawing.settled, ErrorCode::NotYetSettled);

    let amount = settlement::shares_to_value(shares, drawing.accumulator)?;
    position.pending_withdrawal_shares = 0;
    position.pending_withdrawal_drawing = 0;

    transfer_from_vault(
        &ctx.accounts.vault,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.token_mint,
        &ctx.accounts.lottery,
        &ctx.accounts.token_program,
        amount,
    )?;

    emit!(WithdrawFinalized {
        drawing_id: drawing.id,
        owner: position.owner,
        shares,
        amount,
    });
    Ok(())
}

/// Unwinds an entire LP position outside the two-phase flow.
///
/// Only available while the pool is paused, and only against the latest
/// settled drawing's accumulator, never a stale or default value.
/// Capital still queued into the open drawing is rolled back out of the
/// drawing's pending totals; a withdrawal already priced by the settled
/// drawing is paid alongside the shares.
pub fn process_emergency_withdraw(ctx: Context<EmergencyWithdrawLp>) -> Result<()> {
    let lottery = &mut ctx.accounts.lottery;
    let priced = &ctx.accounts.priced_drawing;
    let position = &mut ctx.accounts.position;
    require!(lottery.paused, ErrorCode::PoolNotPaused);

    // The exit must be priced by the most recent settled drawing.
    let latest_settled = if lottery.drawing_open {
        lottery
            .next_drawing_id
            .checked_sub(2)
            .ok_or(ErrorCode::NotLatestDrawing)?
    } else {
        lottery
            .next_drawing_id
            .checked_sub(1)
            .ok_or(ErrorCode::NotLatestDrawing)?
    };
    require!(priced.id == latest_settled, ErrorCode::NotLatestDrawing);

    let mut payout: u64 = 0;

    // A withdrawal the settled drawing already priced: pay it out here
    // instead of a separate finalize. Its value already left the pool at
    // settlement, so it does not reduce the pool again.
    if position.pending_withdrawal_shares > 0 {
        if position.pending_withdrawal_drawing == priced.id {
            payout = settlement::shares_to_value(
                position.pending_withdrawal_shares,
                priced.accumulator,
            )?;
        } else {
            // Still queued into the open drawing: roll it back into the
            // share balance and settle it with everything else.
            let open = ctx
                .accounts
                .open_drawing
                .as_mut()
                .ok_or(ErrorCode::MissingPriorDrawing)?;
            require!(
                open.id == position.pending_withdrawal_drawing && !open.settled,
                ErrorCode::DrawingMismatch
            );
            open.pending_withdrawal_shares = open
                .pending_withdrawal_shares
                .checked_sub(position.pending_withdrawal_shares)
                .ok_or(ErrorCode::MathOverflow)?;
            position.shares = position
                .shares
                .checked_add(position.pending_withdrawal_shares)
                .ok_or(ErrorCode::MathOverflow)?;
        }
        position.pending_withdrawal_shares = 0;
        position.pending_withdrawal_drawing = 0;
    }

    // A pending deposit either became shares at the settled drawing or is
    // refunded at face value out of the open drawing's queue.
    if position.pending_deposit > 0 {
        if position.pending_deposit_drawing == priced.id {
            settlement::activate_pending_deposit(position, priced.accumulator)?;
        } else {
            let open = ctx
                .accounts
                .open_drawing
                .as_mut()
                .ok_or(ErrorCode::MissingPriorDrawing)?;
            require!(
                open.id == position.pending_deposit_drawing && !open.settled,
                ErrorCode::DrawingMismatch
            );
            open.pending_deposits = open
                .pending_deposits
                .checked_sub(position.pending_deposit)
                .ok_or(ErrorCode::MathOverflow)?;
            payout = payout
                .checked_add(position.pending_deposit)
                .ok_or(ErrorCode::MathOverflow)?;
            position.pending_deposit = 0;
            position.pending_deposit_drawing = 0;
        }
    }

    // Price the share balance at the settled accumulator and take it out
    // of the pool.
    let share_value = settlement::shares_to_value(position.shares, priced.accumulator)?;
    if share_value > 0 {
        lottery.lp_pool_total = lottery
            .lp_pool_total
            .checked_sub(share_value)
            .ok_or(ErrorCode::LpInsolvency)?;
        if let Some(open) = ctx.accounts.open_drawing.as_mut() {
            if !open.settled {
                open.lp_pool_total = open
                    .lp_pool_total
                    .checked_sub(share_value)
                    .ok_or(ErrorCode::LpInsolvency)?;
            }
        }
    }
    position.shares = 0;
    payout = payout
        .checked_add(share_value)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(payout > 0, ErrorCode::NothingToWithdraw);

    transfer_from_vault(
        &ctx.accounts.vault,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.token_mint,
        lottery,
        &ctx.accounts.token_program,
        payout,
    )?;

    emit!(EmergencyWithdrawal {
        owner: position.owner,
        priced_drawing: priced.id,
        amount: payout,
    });
    Ok(())
}
