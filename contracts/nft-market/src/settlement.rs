//! Settlement engine: the two-phase commit around the ownership transfer.
//!
//! Phase 1 locks the listing and requests the transfer from the token
//! registry; the cross-contract call is the subsystem's only suspension
//! point. Phase 2, the callback, either disburses the payout map and
//! clears the listing, or refunds the winning bidder in full and unlocks.
//! Fund movement is all-or-nothing; no partial disbursement can occur.

use std::collections::HashMap;

use near_sdk::json_types::{U128, U64};
use near_sdk::{env, near, Gas, NearToken, Promise, PromiseError};

use market_types::{Payout, TokenListing, TokenOffer, MAX_LEN_PAYOUT};

use crate::events;
use crate::external::{ext_self, ext_token_registry};
use crate::*;

impl Contract {
    /// Phase 1. The listing is stored locked, with the winning offer as its
    /// current offer, before the promise is created; nothing can observe
    /// or mutate the token's escrow until the callback resolves.
    pub(crate) fn settle(
        &mut self,
        token_key: String,
        mut listing: TokenListing,
        offer: TokenOffer,
    ) -> Promise {
        let fee = self.fee_amount(offer.price.0);
        // The fee stays on the market's own balance; the remainder is what
        // the registry distributes.
        let others_keep = offer.price.0 - fee;

        let receiver_id = offer.from.clone();
        let token_id = listing.token_id;
        let approval_id = listing.approval_id;
        let store_id = listing.store_id.clone();

        listing.current_offer = Some(offer);
        listing.locked = true;
        self.listings.insert(token_key.clone(), listing.clone());

        // The locked listing snapshot rides along to the callback, so the
        // refund path never depends on state the callback can no longer see.
        ext_token_registry::ext(store_id)
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(Gas::from_tgas(TRANSFER_PAYOUT_GAS))
            .nft_transfer_payout(
                receiver_id,
                U64(token_id),
                approval_id,
                U128(others_keep),
                MAX_LEN_PAYOUT,
            )
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(RESOLVE_SETTLEMENT_GAS))
                    .resolve_settlement(token_key, listing, U128(others_keep)),
            )
    }
}

#[near]
impl Contract {
    /// Phase 2. Only callable by this contract. Must not panic: once the
    /// registry has transferred ownership a panic here would strand the
    /// escrow. Returns the disbursed balance, 0 on refund.
    #[private]
    pub fn resolve_settlement(
        &mut self,
        token_key: String,
        listing: TokenListing,
        others_keep: U128,
        #[callback_result] transfer: Result<Payout, PromiseError>,
    ) -> U128 {
        let Some(offer) = listing.current_offer.clone() else {
            env::log_str("Settlement resolved without a winning offer");
            return U128(0);
        };

        match transfer {
            Ok(payout) => {
                let disbursed = self.disburse(payout, others_keep.0, &listing);
                self.listings.remove(&token_key);
                events::emit_sale(&listing.list_id(), offer.id, &token_key, &disbursed);
                U128(others_keep.0)
            }
            Err(_) => {
                // Registry-side rejection (stale approval, changed owner,
                // payout cap): ownership did not move. Refund the winning
                // bidder and reopen the listing, but only the generation
                // this settlement locked.
                let _ = Promise::new(offer.from.clone())
                    .transfer(NearToken::from_yoctonear(offer.price.0));
                let same_generation = self
                    .listings
                    .get(&token_key)
                    .is_some_and(|stored| stored.approval_id == listing.approval_id);
                if same_generation {
                    let mut reopened = listing;
                    reopened.current_offer = None;
                    reopened.locked = false;
                    self.listings.insert(token_key, reopened);
                }
                U128(0)
            }
        }
    }
}

impl Contract {
    /// Pay out a settled sale. A map the market cannot honor (too many
    /// recipients, or a total above the balance) pays the seller directly
    /// instead; ownership has already moved, so the escrow must go
    /// somewhere.
    fn disburse(
        &self,
        payout: Payout,
        others_keep: u128,
        listing: &TokenListing,
    ) -> HashMap<near_sdk::AccountId, U128> {
        let valid =
            payout.payout.len() as u32 <= MAX_LEN_PAYOUT && payout.total() <= others_keep;
        if !valid {
            env::log_str("Invalid payout from token registry, paying the seller directly");
            let _ = Promise::new(listing.owner_id.clone())
                .transfer(NearToken::from_yoctonear(others_keep));
            return HashMap::from([(listing.owner_id.clone(), U128(others_keep))]);
        }

        for (receiver, amount) in &payout.payout {
            if amount.0 > 0 {
                let _ = Promise::new(receiver.clone())
                    .transfer(NearToken::from_yoctonear(amount.0));
            }
        }
        payout.payout
    }
}
