use anchor_lang::prelude::*;

#[event]
pub struct DrawingOpened {
    pub drawing_id: u64,
    pub lp_pool_total: u64,
    pub sales_open_slot: u64,
    pub sales_close_slot: u64,
}

#[event]
pub struct TicketPurchased {
    pub drawing_id: u64,
    pub index: u64,
    pub buyer: Pubkey,
    pub code: u64,
    pub duplicate: bool,
}

#[event]
pub struct LpDeposited {
    pub drawing_id: u64,
    pub owner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct WithdrawInitiated {
    pub drawing_id: u64,
    pub owner: Pubkey,
    pub shares: u128,
}

#[event]
pub struct WithdrawFinalized {
    pub drawing_id: u64,
    pub owner: Pubkey,
    pub shares: u128,
    pub amount: u64,
}

#[event]
pub struct EmergencyWithdrawal {
    pub owner: Pubkey,
    pub priced_drawing: u64,
    pub amount: u64,
}

#[event]
pub struct WinningNumbersRevealed {
    pub drawing_id: u64,
    pub winning_code: u64,
}

#[event]
pub struct DrawingSettled {
    pub drawing_id: u64,
    pub accumulator: u128,
    pub post_draw_lp_value: u64,
    pub new_lp_pool_total: u64,
    pub user_winnings: u64,
    pub lp_earnings: u64,
    pub protocol_fee: u64,
}

#[event]
pub struct ProtocolFeeTaken {
    pub drawing_id: u64,
    pub amount: u64,
}

#[event]
pub struct PrizeClaimed {
    pub drawing_id: u64,
    pub ticket_index: u64,
    pub owner: Pubkey,
    pub tier: u8,
    pub bonus_matched: bool,
    pub amount: u64,
}

#[event]
pub struct PausedSet {
    pub paused: bool,
}
