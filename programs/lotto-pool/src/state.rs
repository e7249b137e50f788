use anchor_lang::prelude::*;
use std::collections::BTreeMap;

use crate::constants::{MAX_BONUS_BALLS, MAX_COMBO_ENTRIES, TIER_CELLS};

/// Singleton lottery state: configuration plus the live LP pool value
/// carried from one drawing to the next.
#[account]
#[derive(InitSpace)]
pub struct Lottery {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// The authority allowed to run the drawing lifecycle.
    pub authority: Pubkey,

    /// Mint of the settlement currency held in the vault.
    pub token_mint: Pubkey,

    /// Destination owner for collected protocol fees.
    pub treasury: Pubkey,

    /// Circuit breaker: pauses deposits, purchases and withdrawals.
    pub paused: bool,

    /// Highest normal ball that can be selected (balls are 1-based).
    pub normal_max: u8,

    /// Highest bonusball that can be selected.
    pub bonusball_max: u8,

    /// Normal balls per ticket; also the number of matchable tiers.
    pub normal_tiers: u8,

    /// Price of one ticket in the settlement currency's smallest unit.
    pub ticket_price: u64,

    /// Smallest accepted LP deposit.
    pub min_lp_deposit: u64,

    /// Protocol fee in basis points, applied to the drawing surplus.
    pub protocol_fee_bps: u16,

    /// Surplus below which no protocol fee is taken.
    pub fee_surplus_floor: u64,

    /// Id the next `open_drawing` will create; drawings are sequential.
    pub next_drawing_id: u64,

    /// True while a drawing is open and not yet settled.
    pub drawing_open: bool,

    /// Value backing the LP pool entering the next drawing.
    pub lp_pool_total: u64,
}

/// Per-drawing state. Created at sales open, frozen field by field as the
/// drawing moves through sales -> reveal -> settlement, then read-only for
/// claims and withdrawal finalization.
#[account]
#[derive(InitSpace)]
pub struct Drawing {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Sequential drawing id, starting at zero.
    pub id: u64,

    /// First slot at which tickets can be bought.
    pub sales_open_slot: u64,

    /// Last slot at which tickets can be bought.
    pub sales_close_slot: u64,

    /// LP pool value entering this drawing (snapshot at open).
    pub lp_pool_total: u64,

    /// LP capital queued during this drawing, activated at settlement.
    pub pending_deposits: u64,

    /// Shares committed to exit, paid out at the settled accumulator.
    pub pending_withdrawal_shares: u128,

    /// Ticket revenue collected during the sales window.
    pub ticket_revenue: u64,

    /// Number of tickets sold.
    pub tickets_sold: u64,

    /// The committed switchboard randomness account for this drawing.
    pub randomness_account: Pubkey,

    /// Packed winning selection; zero until revealed.
    pub winning_code: u64,

    /// True once the winning numbers have been derived and stored.
    pub numbers_revealed: bool,

    /// True once the financial settlement has committed.
    pub settled: bool,

    /// Cumulative value-per-share accumulator as of this drawing.
    /// Holds one precise unit for drawing zero from the moment the drawing
    /// is opened; later drawings receive their value at settlement and the
    /// field must not be read before `settled` is set.
    pub accumulator: u128,

    /// Total winnings owed to ticket holders, set at settlement.
    pub user_winnings: u64,

    /// LP earnings applied at settlement.
    pub lp_earnings: u64,

    /// Protocol fee actually transferred at settlement (zero when the
    /// surplus did not clear the configured floor).
    pub protocol_fee: u64,

    /// Exact distinct-ticket counts per (tier, bonus-matched) bucket.
    pub match_counts: [u64; TIER_CELLS],

    /// Extra identical-ticket copies per (tier, bonus-matched) bucket.
    pub dup_match_counts: [u64; TIER_CELLS],

    /// Per-ticket prize for each (tier, bonus-matched) bucket.
    pub tier_prizes: [u64; TIER_CELLS],
}

/// Count pair stored per (bonusball, subset) key.
///
/// `count` goes up once for every distinct ticket containing the subset;
/// `dup_count` goes up once for every additional identical copy of a
/// ticket already on record.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComboCount {
    pub count: u32,
    pub dup_count: u32,
}

/// Sold-ticket totals per bonusball.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusTotals {
    /// Distinct tickets sold with this bonusball.
    pub sold: u64,
    /// Additional identical copies beyond the first.
    pub dups: u64,
}

/// Per-drawing index of sold tickets, keyed by (bonusball, normals subset).
///
/// Mutated only during the sales window; read-only from reveal onward.
/// Query cost at reveal is bounded by the subsets of the winning selection
/// and is independent of how many tickets were sold.
#[account]
pub struct ComboTracker {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Drawing this index belongs to.
    pub drawing_id: u64,

    /// Highest normal ball (copied from the lottery config at open).
    pub normal_max: u8,

    /// Highest bonusball.
    pub bonusball_max: u8,

    /// Normal balls per ticket; fixes the matchable tier range 1..=tiers.
    pub normal_tiers: u8,

    /// Total tickets inserted, duplicates included.
    pub total_tickets: u64,

    /// Count pairs keyed by `bonusball << BONUS_SHIFT | subset_mask`.
    pub combos: BTreeMap<u64, ComboCount>,

    /// Sold/dup totals indexed by `bonusball - 1`.
    pub bonus_totals: Vec<BonusTotals>,
}

impl ComboTracker {
    /// Borsh footprint of one combo entry: u64 key + two u32 counters.
    pub const ENTRY_SIZE: usize = 8 + 4 + 4;

    /// Account space at full capacity. The map and vec serialize as a
    /// u32 length prefix plus their entries.
    pub const SPACE: usize = 8          // discriminator
        + 1                             // bump
        + 8                             // drawing_id
        + 1 + 1 + 1                     // normal_max, bonusball_max, normal_tiers
        + 8                             // total_tickets
        + 4 + MAX_COMBO_ENTRIES * Self::ENTRY_SIZE
        + 4 + MAX_BONUS_BALLS as usize * (8 + 8);
}

/// One liquidity provider's position against the pool.
///
/// Deposits and withdrawals are two-phase: capital queued during a drawing
/// only becomes shares (or currency) once that drawing settles. The
/// position state machine runs Active -> WithdrawInitiated ->
/// Withdrawable -> Withdrawn, with `pending_withdrawal_shares != 0`
/// marking the initiated leg.
#[account]
#[derive(InitSpace)]
pub struct LpPosition {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Owner of the position.
    pub owner: Pubkey,

    /// Active shares backing the pool.
    pub shares: u128,

    /// Deposit waiting for its drawing to settle.
    pub pending_deposit: u64,

    /// Drawing the pending deposit was queued into.
    pub pending_deposit_drawing: u64,

    /// Shares committed to exit, removed from `shares` at initiation.
    pub pending_withdrawal_shares: u128,

    /// Drawing the pending withdrawal was queued into.
    pub pending_withdrawal_drawing: u64,
}

/// Immutable record of one sold ticket.
#[account]
#[derive(InitSpace)]
pub struct TicketRecord {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Buyer and prize claimant.
    pub owner: Pubkey,

    /// Drawing the ticket was sold into.
    pub drawing_id: u64,

    /// Position in the drawing's sales sequence.
    pub index: u64,

    /// Packed normals + bonusball.
    pub code: u64,

    /// Set once the prize for this ticket has been paid.
    pub claimed: bool,
}
