use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, LP_POSITION_SEED};
use crate::error::ErrorCode;
use crate::events::LpDeposited;
use crate::instructions::{settle_pending_deposit, transfer_to_vault};
use crate::state::{Drawing, Lottery, LpPosition};

/// Accounts required for an LP deposit.
///
/// The deposit is queued against the open drawing and only becomes
/// share-backing at that drawing's settlement. If the position still
/// carries a pending deposit from an earlier, already-settled drawing,
/// that drawing's account is passed in so the pending amount can be
/// converted to shares first.
#[derive(Accounts)]
pub struct LpDeposit<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The open drawing the deposit is queued into.
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

    /// The LP's position, created on first deposit.
    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + LpPosition::INIT_SPACE,
        seeds = [LP_POSITION_SEED, owner.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, LpPosition>>,

    /// Mint of the settlement currency.
    #[account(address = lottery.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// Program-owned vault.
    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Depositor's token account.
    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Queues an LP deposit into the open drawing.
pub fn process_lp_deposit(ctx: Context<LpDeposit>, amount: u64) -> Result<()> {
    let lottery = &ctx.accounts.lottery;
    require!(!lottery.paused, ErrorCode::Paused);
    require!(amount >= lottery.min_lp_deposit, ErrorCode::MinDeposit);

    let drawing = &mut ctx.accounts.drawing;
    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.bump = ctx.bumps.position;
        position.owner = ctx.accounts.owner.key();
    }

    settle_pending_deposit(position, drawing.id, &ctx.accounts.prior_drawing)?;

    transfer_to_vault(
        &ctx.accounts.owner_token_account,
        &ctx.accounts.vault,
        &ctx.accounts.token_mint,
        &ctx.accounts.owner,
        &ctx.accounts.token_program,
        amount,
    )?;

    position.pending_deposit = position
        .pending_deposit
        .checked_add(amount)
        .ok_or(ErrorCode::MathOverflow)?;
    position.pending_deposit_drawing = drawing.id;
    drawing.pending_deposits = drawing
        .pending_deposits
        .checked_add(amount)
        .ok_or(ErrorCode::MathOverflow)?;

    emit!(LpDeposited {
        drawing_id: drawing.id,
        owner: position.owner,
        amount,
    });
    Ok(())
}
