// External contract interfaces for cross-contract calls
//
// `#[ext_contract]` generates helper structs that the compiler flags as
// dead_code even though they are used at runtime for cross-contract calls.
#![allow(dead_code)]

use near_sdk::json_types::{U128, U64};
use near_sdk::{ext_contract, AccountId};

use market_types::{Payout, TokenListing};

/// The slice of the token registry (store) the market consumes.
#[ext_contract(ext_token_registry)]
pub trait TokenRegistry {
    /// Transfer the token to `receiver_id` on behalf of the holder of
    /// `approval_id`, and return the distribution of `balance` computed from
    /// the token's royalty and split configuration (NEP-199). Consumes the
    /// split configuration. Fails the whole call, leaving ownership
    /// untouched, when the approval is stale, the owner changed, or the
    /// recipient count exceeds `max_len_payout`.
    fn nft_transfer_payout(
        &mut self,
        receiver_id: AccountId,
        token_id: U64,
        approval_id: u64,
        balance: U128,
        max_len_payout: u32,
    ) -> Payout;
}

/// Self callback interface
#[ext_contract(ext_self)]
pub trait ExtSelf {
    /// Commit or refund a settlement after the ownership transfer resolves.
    /// `listing` is the locked snapshot taken when the settlement began.
    fn resolve_settlement(
        &mut self,
        token_key: String,
        listing: TokenListing,
        others_keep: U128,
    ) -> U128;
}
