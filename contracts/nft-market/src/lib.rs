//! NFT Market — listings, escrowed offers, and payout settlement for tokens
//! minted by stores of allowlisted factories.
//!
//! Stores register listings through the NEP-178 approval callbacks; bidders
//! escrow deposits with `make_offer`; settlement transfers ownership through
//! the token registry and disburses proportional payouts.

use near_sdk::store::{IterableMap, IterableSet};
use near_sdk::{near, AccountId, BorshStorageKey, PanicOnDefault};

use market_types::TokenListing;

// --- Modules ---

mod admin;
pub mod constants;
mod errors;
mod events;
mod external;
mod internal;
mod listing;
mod offer;
mod settlement;


pub use constants::*;
pub use errors::MarketError;

// --- Storage Keys ---

#[near]
#[derive(BorshStorageKey)]
pub enum StorageKey {
    Listings,
    Allowlist,
    Banlist,
}

// --- Contract State ---

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct Contract {
    pub owner_id: AccountId,

    /// Key: token key string `"{token_id}:{store_id}"`. At most one listing
    /// per token.
    pub listings: IterableMap<String, TokenListing>,

    /// Factories whose stores may register listings.
    pub allowlist: IterableSet<AccountId>,
    /// Accounts barred from making offers.
    pub banlist: IterableSet<AccountId>,

    /// Global offer id counter; starts at 1, never reused. Mutated only
    /// inside `make_offer`, under the same single-call atomicity as listing
    /// state.
    pub next_offer_id: u64,

    /// Floor on offer durations, in hours. Doubles as the holding period
    /// before an offer may be withdrawn.
    pub min_offer_hours: u64,

    /// The market's retained cut of every sale, in basis points.
    pub fee_bps: u16,
}
