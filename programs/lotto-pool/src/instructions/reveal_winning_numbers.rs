use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{DRAWING_SEED, LOTTERY_SEED, TRACKER_SEED};
use crate::error::ErrorCode;
use crate::events::WinningNumbersRevealed;
use crate::matching;
use crate::state::{ComboTracker, Drawing, Lottery};
use crate::ticket;

/// Accounts required to reveal a drawing's winning numbers.
///
/// Ensures:
/// 1. Only the lottery authority can reveal.
/// 2. The randomness account matches the committed one.
/// 3. The sales window has closed.
/// 4. Numbers have not already been revealed.
#[derive(Accounts)]
pub struct RevealWinningNumbers<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
        has_one = authority @ ErrorCode::NotAuthorized,
    )]
    pub lottery: Account<'info, Lottery>,

    /// The drawing being resolved.
    #[account(
        mut,
        seeds = [DRAWING_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = drawing.bump,
    )]
    pub drawing: Box<Account<'info, Drawing>>,

    /// The drawing's combo index, read-only from here on.
    #[account(
        seeds = [TRACKER_SEED, drawing.id.to_le_bytes().as_ref()],
        bump = tracker.bump,
    )]
    pub tracker: Box<Account<'info, ComboTracker>>,

    /// The randomness oracle account providing verifiable randomness.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Derives the winning selection from the revealed randomness and runs the
/// match aggregation against the sold-ticket index.
pub fn process_reveal_winning_numbers(ctx: Context<RevealWinningNumbers>) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &ctx.accounts.lottery;
    let drawing = &mut ctx.accounts.drawing;

    require!(clock.slot > drawing.sales_close_slot, ErrorCode::DrawingNotClosed);
    require!(!drawing.numbers_revealed, ErrorCode::NumbersAlreadyRevealed);
    require!(
        drawing.randomness_account != Pubkey::default(),
        ErrorCode::RandomnessNotCommitted
    );
    if ctx.accounts.randomness_account_data.key() != drawing.randomness_account {
        return Err(ErrorCode::IncorrectRandomnessAccount.into());
    }

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| ErrorCode::IncorrectRandomnessAccount)?;
    let revealed_random_value = randomness_data
        .get_value(&clock)
        .map_err(|_| ErrorCode::RandomnessNotResolved)?;

    let (winning_mask, winning_bonus) = ticket::draw_numbers(
        &revealed_random_value,
        lottery.normal_tiers,
        lottery.normal_max,
        lottery.bonusball_max,
    );
    msg!(
        "Winning numbers: {:?} bonus {}",
        ticket::unpack(winning_mask, lottery.normal_max),
        winning_bonus
    );

    let table = matching::aggregate_matches(&ctx.accounts.tracker, winning_mask, winning_bonus)?;

    drawing.winning_code = ticket::encode_ticket(winning_mask, winning_bonus);
    drawing.match_counts = table.tickets_flat();
    drawing.dup_match_counts = table.duplicates_flat();
    drawing.numbers_revealed = true;

    emit!(WinningNumbersRevealed {
        drawing_id: drawing.id,
        winning_code: drawing.winning_code,
    });
    Ok(())
}
