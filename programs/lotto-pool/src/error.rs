use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Ticket input errors
    #[msg("Ticket selection is malformed")]
    InvalidSelection,
    #[msg("Ticket sales are not open for this drawing")]
    LotteryNotOpen,

    // Combinatorics errors
    #[msg("Binomial arguments outside the supported range")]
    CombinatoricsPrecondition,
    #[msg("Subset enumeration count disagrees with the binomial coefficient")]
    SubsetCountMismatch,
    #[msg("Tier match counts are internally inconsistent")]
    InconsistentMatchCounts,
    #[msg("Combo index is full for this drawing")]
    TooManyTicketCombos,

    // LP ledger errors
    #[msg("Withdrawal exceeds the LP share balance")]
    InsufficientShares,
    #[msg("Drawing has not been settled yet")]
    NotYetSettled,
    #[msg("Settlement would drive the LP pool negative")]
    LpInsolvency,
    #[msg("A pending withdrawal is already in flight")]
    WithdrawalAlreadyPending,
    #[msg("No pending withdrawal to finalize")]
    NothingToWithdraw,
    #[msg("Deposit is below the configured minimum")]
    MinDeposit,
    #[msg("Prior drawing account required to activate a pending deposit")]
    MissingPriorDrawing,
    #[msg("Drawing account does not match the expected drawing id")]
    DrawingMismatch,
    #[msg("Emergency withdrawals must price against the latest settled drawing")]
    NotLatestDrawing,

    // Drawing lifecycle errors
    #[msg("A drawing is already open")]
    DrawingAlreadyOpen,
    #[msg("Ticket sales have not closed for this drawing")]
    DrawingNotClosed,
    #[msg("Drawing has already been settled")]
    DrawingAlreadySettled,
    #[msg("Winning numbers have not been revealed")]
    NumbersNotRevealed,
    #[msg("Winning numbers were already revealed")]
    NumbersAlreadyRevealed,
    #[msg("Per-tier prizes do not sum to the supplied user winnings")]
    PrizeTableMismatch,

    // Randomness errors
    #[msg("Randomness account does not match the committed account")]
    IncorrectRandomnessAccount,
    #[msg("Randomness was already revealed when committed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness value has not resolved yet")]
    RandomnessNotResolved,
    #[msg("Randomness has not been committed for this drawing")]
    RandomnessNotCommitted,

    // Claim errors
    #[msg("Prize was already claimed for this ticket")]
    AlreadyClaimed,
    #[msg("Ticket did not win a prize")]
    NoPrizeForTicket,

    // Admin / ambient errors
    #[msg("Signer is not the lottery authority")]
    NotAuthorized,
    #[msg("Pool is paused")]
    Paused,
    #[msg("Operation requires the pool to be paused")]
    PoolNotPaused,
    #[msg("Configuration parameters out of bounds")]
    InvalidConfig,
    #[msg("Math overflow")]
    MathOverflow,
}
