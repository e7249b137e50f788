use anchor_lang::prelude::*;
use instructions::*;

use crate::constants::TIER_CELLS;

/// Exact binomials and k-subset enumeration over bit-vector sets.
pub mod combinatorics;

/// Per-drawing combo index of the sold-ticket population.
pub mod combo;

/// Program-wide constants: PDA seeds, fixed-point scale, ball limits.
pub mod constants;

/// Custom error types returned by instructions and core math.
pub mod error;

/// Structured events emitted by the instruction handlers.
pub mod events;

/// Instruction handlers for the drawing and LP lifecycle.
pub mod instructions;

/// Exact per-tier match aggregation for a revealed drawing.
pub mod matching;

/// Accumulator ledger math: share pricing and drawing settlement.
pub mod settlement;

/// On-chain state accounts.
pub mod state;

/// Ticket number packing and winning-number derivation.
pub mod ticket;

declare_id!("EdK4hR3ru5nJqxmT4KMk4bskL2B66TwDCin97cRgKK1c");

#[program]
pub mod lotto_pool {
    use super::*;

    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        params: InitializeParams,
    ) -> Result<()> {
        process_initialize_config(ctx, params)
    }

    pub fn set_paused(ctx: Context<AdminOnly>, paused: bool) -> Result<()> {
        process_set_paused(ctx, paused)
    }

    pub fn open_drawing(
        ctx: Context<OpenDrawing>,
        sales_open_slot: u64,
        sales_close_slot: u64,
    ) -> Result<()> {
        process_open_drawing(ctx, sales_open_slot, sales_close_slot)
    }

    pub fn buy_ticket(ctx: Context<BuyTicket>, numbers: Vec<u8>, bonusball: u8) -> Result<()> {
        process_buy_ticket(ctx, numbers, bonusball)
    }

    pub fn lp_deposit(ctx: Context<LpDeposit>, amount: u64) -> Result<()> {
        process_lp_deposit(ctx, amount)
    }

    pub fn lp_initiate_withdraw(ctx: Context<InitiateWithdraw>, shares: u128) -> Result<()> {
        process_initiate_withdraw(ctx, shares)
    }

    pub fn lp_finalize_withdraw(ctx: Context<FinalizeWithdraw>) -> Result<()> {
        process_finalize_withdraw(ctx)
    }

    pub fn lp_emergency_withdraw(ctx: Context<EmergencyWithdrawLp>) -> Result<()> {
        process_emergency_withdraw(ctx)
    }

    pub fn commit_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
        process_commit_randomness(ctx)
    }

    pub fn reveal_winning_numbers(ctx: Context<RevealWinningNumbers>) -> Result<()> {
        process_reveal_winning_numbers(ctx)
    }

    pub fn settle_drawing(
        ctx: Context<SettleDrawing>,
        user_winnings: u64,
        lp_earnings: u64,
        tier_prizes: [u64; TIER_CELLS],
    ) -> Result<()> {
        process_settle_drawing(ctx, user_winnings, lp_earnings, tier_prizes)
    }

    pub fn claim_winnings(ctx: Context<ClaimWinnings>) -> Result<()> {
        process_claim_winnings(ctx)
    }
}
