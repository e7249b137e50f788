/// Seed for the singleton lottery state PDA.
pub const LOTTERY_SEED: &[u8] = b"lottery";

/// Seed for per-drawing state PDAs, combined with the drawing id.
pub const DRAWING_SEED: &[u8] = b"drawing";

/// Seed for the per-drawing combo index PDA.
pub const TRACKER_SEED: &[u8] = b"combos";

/// Seed for per-LP position PDAs, combined with the owner key.
pub const LP_POSITION_SEED: &[u8] = b"lp_position";

/// Seed for ticket record PDAs, combined with drawing id and ticket index.
pub const TICKET_SEED: &[u8] = b"ticket";

/// One unit of the value-per-share accumulator (1e12 fixed point).
pub const PRECISE_UNIT: u128 = 1_000_000_000_000;

/// Basis-point denominator for fee math.
pub const BPS_DENOM: u64 = 10_000;

/// Highest normal ball a deployment may configure. Normal balls occupy
/// bits 1..=48 of a ticket code, leaving the high byte for the bonusball.
pub const MAX_NORMAL_BALLS: u8 = 48;

/// Bit offset of the bonusball inside a packed ticket code.
pub const BONUS_SHIFT: u32 = 56;

/// Highest bonusball a deployment may configure.
pub const MAX_BONUS_BALLS: u8 = 32;

/// Hard ceiling on the per-ticket pick count (and therefore on match tiers).
pub const MAX_TIERS: u8 = 6;

/// Rows in a tier table: tiers 0..=MAX_TIERS.
pub const TIER_ROWS: usize = MAX_TIERS as usize + 1;

/// Cells in a flattened tier table: one per (tier, bonus-matched) bucket.
pub const TIER_CELLS: usize = TIER_ROWS * 2;

/// Capacity of a drawing's combo index. Each distinct ticket occupies at
/// most `2^pick_count - 1` entries; the bound keeps the tracker account
/// inside the CPI allocation limit.
pub const MAX_COMBO_ENTRIES: usize = 512;
