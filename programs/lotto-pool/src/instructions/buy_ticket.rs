use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, TICKET_SEED, TRACKER_SEED};
use crate::error::ErrorCode;
use crate::events::TicketPurchased;
use crate::instructions::transfer_to_vault;
use crate::state::{ComboTracker, Drawing, Lottery, TicketRecord};
use crate::ticket;

/// Accounts required to buy a lottery ticket.
///
/// Handles:
/// - Sales-window check
/// - Payment transfer into the vault
/// - Ticket record creation
/// - Combo index insertion
#[derive(Accounts)]
pub struct BuyTicket<'info> {
    /// The account paying for the ticket.
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The open drawing the ticket is sold into.
    #[account(
        mut,
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
        constraint = drawing.id + 1 == lottery.next_drawing_id @ ErrorCode::DrawingMismatch,
        constraint = !drawing.settled @ ErrorCode::DrawingAlreadySettled,
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// The drawing's combo index.
    #[account(
        mut,
        seeds = [TRACKER_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = tracker.bump,
    )]
    pub tracker: Box<Account<'info, ComboTracker>>,

    /// Record of the purchased ticket.
    #[account(
        init,
        payer = buyer,
        space = 8 + TicketRecord::INIT_SPACE,
        seeds = [
            TICKET_SEED,
            drawing.id.to_le_bytes().as_ref(),
            drawing.tickets_sold.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub ticket: Box<Account<'info, TicketRecord>>,

    /// Mint of the settlement currency.
    #[account(address = lottery.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// Program-owned vault receiving the ticket price.
    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Buyer's token account paying the ticket price.
    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = buyer,
        associated_token::token_program = token_program,
    )]
    pub buyer_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Buys one ticket for the caller.
///
/// Steps performed:
/// 1. Check the sales window.
/// 2. Pack and validate the selected numbers.
/// 3. Transfer the ticket price into the vault.
/// 4. Index the ticket in the drawing's combo index.
/// 5. Write the immutable ticket record.
pub fn process_buy_ticket(ctx: Context<BuyTicket>, numbers: Vec<u8>, bonusball: u8) -> Result<()> {
    let lottery = &ctx.accounts.lottery;
    let drawing = &mut ctx.accounts.drawing;
    require!(!lottery.paused, ErrorCode::Paused);

    let clock = Clock::get()?;
    if clock.slot < drawing.sales_open_slot || clock.slot > drawing.sales_close_slot {
        return Err(ErrorCode::LotteryNotOpen.into());
    }

    let mask = ticket::pack(&numbers, lottery.normal_tiers, lottery.normal_max)?;
    require!(
        bonusball >= 1 && bonusball <= lottery.bonusball_max,
        ErrorCode::InvalidSelection
    );

    transfer_to_vault(
        &ctx.accounts.buyer_token_account,
        &ctx.accounts.vault,
        &ctx.accounts.token_mint,
        &ctx.accounts.buyer,
        &ctx.accounts.token_program,
        lottery.ticket_price,
    )?;

    let tracker = &mut ctx.accounts.tracker;
    let duplicate = tracker.is_duplicate(mask, bonusball);
    tracker.insert(mask, bonusball)?;

    let index = drawing.tickets_sold;
    let record = &mut ctx.accounts.ticket;
    record.bump = ctx.bumps.ticket;
    record.owner = ctx.accounts.buyer.key();
    record.drawing_id = drawing.id;
    record.index = index;
    record.code = ticket::encode_ticket(mask, bonusball);
    record.claimed = false;

    drawing.tickets_sold = index.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
    drawing.ticket_revenue = drawing
        .ticket_revenue
        .checked_add(lottery.ticket_price)
        .ok_or(ErrorCode::MathOverflow)?;

    emit!(TicketPurchased {
        drawing_id: drawing.id,
        index,
        buyer: record.owner,
        code: record.code,
        duplicate,
    });
    Ok(())
}
