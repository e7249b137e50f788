pub mod admin;
pub mod buy_ticket;
pub mod claim_winnings;
pub mod commit_randomness;
pub mod lp_deposit;
pub mod lp_withdraw;
pub mod open_drawing;
pub mod reveal_winning_numbers;
pub mod settle_drawing;

pub use admin::*;
pub use buy_ticket::*;
pub use claim_winnings::*;
pub use commit_randomness::*;
pub use lp_deposit::*;
pub use lp_withdraw::*;
pub use open_drawing::*;
pub use reveal_winning_numbers::*;
pub use settle_drawing::*;

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::LOTTERY_SEED;
use crate::error::ErrorCode;
use crate::settlement;
use crate::state::{Drawing, Lottery, LpPosition};

/// Transfer from a user's token account into the vault, signed by the user.
pub(crate) fn transfer_to_vault<'info>(
    from: &InterfaceAccount<'info, TokenAccount>,
    vault: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    user: &Signer<'info>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    transfer_checked(
        CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: vault.to_account_info(),
                authority: user.to_account_info(),
            },
        ),
        amount,
        mint.decimals,
    )
}

/// Transfer out of the vault, signed by the lottery state PDA.
pub(crate) fn transfer_from_vault<'info>(
    vault: &InterfaceAccount<'info, TokenAccount>,
    to: &InterfaceAccount<'info, TokenAccount>,
    mint: &InterfaceAccount<'info, Mint>,
    lottery: &Account<'info, Lottery>,
    token_program: &Interface<'info, TokenInterface>,
    amount: u64,
) -> Result<()> {
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &[lottery.bump]]];
    transfer_checked(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault.to_account_info(),
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: lottery.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        mint.decimals,
    )
}

/// Folds a pending deposit from an already-settled drawing into shares
/// before the position is used. Deposits queued into the still-open
/// drawing stay pending.
pub(crate) fn settle_pending_deposit(
    position: &mut LpPosition,
    open_drawing_id: u64,
    prior_drawing: &Option<Account<'_, Drawing>>,
) -> Result<()> {
    if position.pending_deposit == 0 || position.pending_deposit_drawing == open_drawing_id {
        return Ok(());
    }
    let prior = prior_drawing
        .as_ref()
        .ok_or(ErrorCode::MissingPriorDrawing)?;
    require!(
        prior.id == position.pending_deposit_drawing,
        ErrorCode::DrawingMismatch
    );
    require!(prior.settled, ErrorCode::NotYetSettled);
    settlement::activate_pending_deposit(position, prior.accumulator)
}
