use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{DRAWING_SEED, LOTTERY_SEED};
use crate::error::ErrorCode;
use crate::state::{Drawing, Lottery};

/// Accounts required to commit a randomness account for a drawing.
///
/// Ensures:
/// 1. Only the lottery authority can commit.
/// 2. The randomness seed is fresh and has not been revealed yet.
#[derive(Accounts)]
pub struct CommitRandomness<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
        has_one = authority @ ErrorCode::NotAuthorized,
    )]
    pub lottery: Account<'info, Lottery>,

    /// The drawing awaiting its winning numbers.
    #[account(
        mut,
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
    )]
    pub drawing: Account<'info, Drawing>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Pins the switchboard randomness account the drawing will be resolved
/// with. Must happen after sales close and before the randomness value is
/// revealed, so the committed seed cannot be chosen against the tickets.
pub fn process_commit_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
    let clock = Clock::get()?;
    let drawing = &mut ctx.accounts.drawing;

    require!(clock.slot > drawing.sales_close_slot, ErrorCode::DrawingNotClosed);
    require!(!drawing.numbers_revealed, ErrorCode::NumbersAlreadyRevealed);

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| ErrorCode::IncorrectRandomnessAccount)?;

    if randomness_data.seed_slot != clock.slot - 1 {
        return Err(ErrorCode::RandomnessAlreadyRevealed.into());
    }

    drawing.randomness_account = ctx.accounts.randomness_account_data.key();
    Ok(())
}
