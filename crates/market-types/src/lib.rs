//! Shared types and pure-logic utilities for the NFT market.
//!
//! Everything in this crate is deterministic and free of contract state, so
//! the market contract, the mock token registry, and the integration tests
//! all consume the same definitions of listings, offers, and payout
//! arithmetic.

mod payouts;
mod token;

pub use payouts::{
    MultipliedSafeFraction, OwnershipFractions, Payout, PayoutError, Royalty, RoyaltyArgs,
    SafeFraction, SplitOwners, MAX_LEN_PAYOUT, PAYOUT_DENOMINATOR,
};
pub use token::{SaleArgs, TimeUnit, TokenKey, TokenListing, TokenOffer};
