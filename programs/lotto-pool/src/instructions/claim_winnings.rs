use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, TICKET_SEED};
use crate::error::ErrorCode;
use crate::events::PrizeClaimed;
use crate::instructions::transfer_from_vault;
use crate::matching::tier_cell;
use crate::state::{Drawing, Lottery, TicketRecord};
use crate::ticket;

/// Accounts required to claim a ticket's prize.
///
/// Ensures:
/// 1. Only the ticket owner can claim.
/// 2. The drawing has settled, so the prize table is final.
/// 3. Each ticket pays out at most once.
#[derive(Accounts)]
pub struct ClaimWinnings<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The settled drawing the ticket was sold into.
    #[account(
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// The winning ticket record.
    #[account(
        mut,
        seeds = [
            TICKET_SEED,
            ticket.drawing_id.to_le_bytes().as_ref(),
            ticket.index.to_le_bytes().as_ref(),
        ],
        bump = ticket.bump,
        constraint = ticket.owner == owner.key() @ ErrorCode::NotAuthorized,
        constraint = ticket.drawing_id == drawing.id @ ErrorCode::DrawingMismatch,
    )]
    pub ticket: Box<Account<'info, TicketRecord>>,

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

/// Pays a ticket its bucket prize from the settled drawing.
///
/// Steps:
/// 1. Check the drawing has settled.
/// 2. Compute the ticket's tier and bonus status against the winning code.
/// 3. Look up the per-ticket prize for that bucket.
/// 4. Transfer the prize and mark the ticket claimed.
pub fn process_claim_winnings(ctx: Context<ClaimWinnings>) -> Result<()> {
    let drawing = &ctx.accounts.drawing;
    let record = &mut ctx.accounts.ticket;

    require!(drawing.settled, ErrorCode::NotYetSettled);
    require!(!record.claimed, ErrorCode::AlreadyClaimed);

    let (ticket_mask, ticket_bonus) = ticket::decode_ticket(record.code);
    let (winning_mask, winning_bonus) = ticket::decode_ticket(drawing.winning_code);
    let tier = ticket::matched_tier(ticket_mask, winning_mask);
    let bonus_matched = ticket_bonus == winning_bonus;

    let amount = drawing.tier_prizes[tier_cell(tier, bonus_matched)];
    require!(amount > 0, ErrorCode::NoPrizeForTicket);

    record.claimed = true;

    transfer_from_vault(
        &ctx.accounts.vault,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.token_mint,
        &ctx.accounts.lottery,
        &ctx.accounts.token_program,
        amount,
    )?;

    emit!(PrizeClaimed {
        drawing_id: drawing.id,
        ticket_index: record.index,
        owner: record.owner,
        tier,
        bonus_matched,
        amount,
    });
    Ok(())
}
