//! Market-wide constants.

use near_sdk::NearToken;

/// Attached to owner-gated methods as an explicit-intent signal.
pub const ONE_YOCTO: NearToken = NearToken::from_yoctonear(1);

/// Basis points denominator (10,000 = 100%)
pub const BASIS_POINTS: u16 = 10_000;

/// Default market cut per sale (250 = 2.5%). Retained on the market's own
/// balance; everything else is disbursed through the payout map.
pub const DEFAULT_MARKET_FEE_BPS: u16 = 250;

/// Ceiling on the owner-settable market cut (1000 = 10%).
pub const MAX_MARKET_FEE_BPS: u16 = 1_000;

/// Default floor on offer durations, in hours.
pub const DEFAULT_MIN_OFFER_HOURS: u64 = 24;

/// Offers may not run longer than ~8 years.
pub const MAX_OFFER_HOURS: u64 = 70_000;

/// Nanoseconds per hour.
pub const HOUR_NS: u64 = 3_600 * 1_000_000_000;

// Gas constants (TGas). Kept small enough that a batch of buy-now
// settlements fits inside one call's 300 TGas budget.
pub const TRANSFER_PAYOUT_GAS: u64 = 30;
pub const RESOLVE_SETTLEMENT_GAS: u64 = 40;
