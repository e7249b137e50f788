use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::{BPS_DENOM, LOTTERY_SEED, MAX_BONUS_BALLS, MAX_NORMAL_BALLS, MAX_TIERS};
use crate::error::ErrorCode;
use crate::events::PausedSet;
use crate::state::Lottery;

/// Initial lottery parameters, supplied once at setup.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeParams {
    /// Owner of the account that receives protocol fees.
    pub treasury: Pubkey,
    /// Highest selectable normal ball.
    pub normal_max: u8,
    /// Highest selectable bonusball.
    pub bonusball_max: u8,
    /// Normal balls per ticket (and the number of matchable tiers).
    pub normal_tiers: u8,
    /// Ticket price in the settlement currency's smallest unit.
    pub ticket_price: u64,
    /// Smallest accepted LP deposit.
    pub min_lp_deposit: u64,
    /// Protocol fee in basis points of the drawing surplus.
    pub protocol_fee_bps: u16,
    /// Surplus below which no protocol fee is taken.
    pub fee_surplus_floor: u64,
}

/// Accounts required to initialize the lottery configuration and its
/// settlement-currency vault.
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    /// The account paying for account creation and fees; becomes the
    /// lottery authority.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Mint of the settlement currency.
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// The lottery state account.
    #[account(
        init,
        payer = payer,
        space = 8 + Lottery::INIT_SPACE,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// Program-owned vault holding LP capital, ticket revenue and unpaid
    /// winnings.
    #[account(
        init,
        payer = payer,
        associated_token::mint = token_mint,
        associated_token::authority = lottery,
        associated_token::token_program = token_program,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program interface.
    pub token_program: Interface<'info, TokenInterface>,

    /// Associated token program.
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Accounts for authority-gated toggles.
#[derive(Accounts)]
pub struct AdminOnly<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
        has_one = authority @ ErrorCode::NotAuthorized
    )]
    pub lottery: Account<'info, Lottery>,
}

/// Initializes the lottery state with its ball ranges, pricing and fee
/// parameters, and sets the authority.
pub fn process_initialize_config(
    ctx: Context<InitializeConfig>,
    params: InitializeParams,
) -> Result<()> {
    require!(
        params.normal_tiers >= 1 && params.normal_tiers <= MAX_TIERS,
        ErrorCode::InvalidConfig
    );
    require!(
        params.normal_max >= params.normal_tiers && params.normal_max <= MAX_NORMAL_BALLS,
        ErrorCode::InvalidConfig
    );
    require!(
        params.bonusball_max >= 1 && params.bonusball_max <= MAX_BONUS_BALLS,
        ErrorCode::InvalidConfig
    );
    require!(
        (params.protocol_fee_bps as u64) <= BPS_DENOM,
        ErrorCode::InvalidConfig
    );
    require!(params.ticket_price > 0, ErrorCode::InvalidConfig);

    let lottery = &mut ctx.accounts.lottery;
    lottery.bump = ctx.bumps.lottery;
    lottery.authority = ctx.accounts.payer.key();
    lottery.token_mint = ctx.accounts.token_mint.key();
    lottery.treasury = params.treasury;
    lottery.paused = false;
    lottery.normal_max = params.normal_max;
    lottery.bonusball_max = params.bonusball_max;
    lottery.normal_tiers = params.normal_tiers;
    lottery.ticket_price = params.ticket_price;
    lottery.min_lp_deposit = params.min_lp_deposit;
    lottery.protocol_fee_bps = params.protocol_fee_bps;
    lottery.fee_surplus_floor = params.fee_surplus_floor;
    lottery.next_drawing_id = 0;
    lottery.drawing_open = false;
    lottery.lp_pool_total = 0;
    Ok(())
}

/// Flips the circuit breaker.
pub fn process_set_paused(ctx: Context<AdminOnly>, paused: bool) -> Result<()> {
    ctx.accounts.lottery.paused = paused;
    emit!(PausedSet { paused });
    Ok(())
}
