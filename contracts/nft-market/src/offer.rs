//! Offer ledger: escrowed bids, supersession, withdrawal, and acceptance.
//!
//! The attached deposit IS the escrow; it stays on the market's balance
//! until the offer is outbid, withdrawn, or settled. Supersession is a
//! single atomic transition: old offer removal, refund, and new offer
//! insertion happen within one call, so no window exists where neither the
//! offer nor its refund is visible.

use near_sdk::json_types::U128;
use near_sdk::{env, near, Promise};

use market_types::{TimeUnit, TokenOffer};

use crate::events::{self, NftMakeOfferLog};
use crate::internal::{check_one_yocto, refund_escrow};
use crate::*;

#[near]
impl Contract {
    /// Place offers on one or more listed tokens. The three arrays run in
    /// parallel; the attached deposit must equal the sum of prices. The
    /// whole batch is validated before any state changes, so a bad item
    /// fails the batch atomically and the full deposit is returned.
    ///
    /// Against an autotransfer listing a qualifying offer settles
    /// immediately; no pending offer is recorded. Against an auction
    /// listing the offer supersedes a live current offer only at a strictly
    /// greater price, refunding the previous bidder within the same call.
    #[payable]
    #[handle_result]
    pub fn make_offer(
        &mut self,
        token_key: Vec<String>,
        price: Vec<U128>,
        timeout: Vec<TimeUnit>,
    ) -> Result<(), MarketError> {
        let offerer = env::predecessor_account_id();
        if self.banlist.contains(&offerer) {
            return Err(MarketError::Unauthorized(
                "Account is banned from making offers".into(),
            ));
        }
        if token_key.len() != price.len() || token_key.len() != timeout.len() {
            return Err(MarketError::InvalidInput(
                "Price list doesn't match up with token list".into(),
            ));
        }
        if token_key.is_empty() {
            return Err(MarketError::InvalidInput("Requires token keys".into()));
        }

        let total = price
            .iter()
            .try_fold(0u128, |acc, p| acc.checked_add(p.0))
            .ok_or_else(|| MarketError::InvalidInput("Summed prices overflow".into()))?;
        if env::attached_deposit().as_yoctonear() != total {
            return Err(MarketError::InsufficientDeposit(
                "Summed prices must match the attached deposit".into(),
            ));
        }

        let now = env::block_timestamp();

        // Validate the whole batch before touching any state.
        let mut seen = std::collections::HashSet::new();
        for ((key, price), timeout) in token_key.iter().zip(&price).zip(&timeout) {
            if !seen.insert(key) {
                return Err(MarketError::InvalidInput(
                    "Duplicate token key in batch".into(),
                ));
            }
            let listing = self.listing(key)?;
            if listing.locked {
                return Err(MarketError::token_locked());
            }
            if price.0 < listing.asking_price.0 {
                return Err(MarketError::InvalidInput("Cannot set offer below ask".into()));
            }
            let hours = timeout.hours();
            if hours == 0 {
                return Err(MarketError::InvalidInput(
                    "Cannot set times into the past".into(),
                ));
            }
            if hours >= MAX_OFFER_HOURS {
                return Err(MarketError::InvalidInput(
                    "Cannot set times more than 70,000 hours into the future (~8 years)".into(),
                ));
            }
            if hours < self.min_offer_hours {
                return Err(MarketError::InvalidInput(format!(
                    "Offer duration must be at least {} hours",
                    self.min_offer_hours
                )));
            }
            if !listing.autotransfer {
                if let Some(current) = &listing.current_offer {
                    // Policy: a live offer is superseded only by a strictly
                    // greater price. An expired one may be replaced by any
                    // offer meeting the ask floor.
                    if current.is_active(now) && price.0 <= current.price.0 {
                        return Err(MarketError::InvalidInput(
                            "Offer must exceed the current offer".into(),
                        ));
                    }
                }
            }
        }

        let mut logs = Vec::with_capacity(token_key.len());
        for ((key, price), timeout) in token_key.iter().zip(&price).zip(&timeout) {
            let mut listing = self
                .listings
                .get(key)
                .ok_or_else(MarketError::token_not_listed)?
                .clone();

            let offer = TokenOffer {
                id: self.next_offer_id,
                price: *price,
                from: offerer.clone(),
                timestamp: now,
                timeout: now + timeout.hours() * HOUR_NS,
            };
            self.next_offer_id += 1;
            listing.num_offers += 1;

            logs.push(NftMakeOfferLog {
                offer: offer.clone(),
                list_id: listing.list_id(),
                token_key: key.clone(),
                offer_num: offer.id,
            });

            if listing.autotransfer {
                // The offer is the accept: settlement begins now, and each
                // batch item settles through its own independent promise
                // chain.
                let _ = self.settle(key.clone(), listing, offer);
            } else {
                if let Some(previous) = listing.current_offer.take() {
                    refund_escrow(&previous);
                }
                listing.current_offer = Some(offer);
                self.listings.insert(key.clone(), listing);
            }
        }

        events::emit_make_offer(logs);
        Ok(())
    }

    /// Accept the current offer on an auction listing. Owner only, with an
    /// exact 1 yoctoNEAR intent deposit. An offer past its timeout is not
    /// eligible; expiry is passive and there is no background sweep.
    #[payable]
    #[handle_result]
    pub fn accept_and_transfer(&mut self, token_key: String) -> Result<Promise, MarketError> {
        check_one_yocto()?;
        let caller = env::predecessor_account_id();

        let listing = self.listing(&token_key)?.clone();
        if listing.locked {
            return Err(MarketError::token_locked());
        }
        if caller != listing.owner_id {
            return Err(MarketError::only_owner("the listing owner"));
        }
        let offer = listing
            .current_offer
            .clone()
            .ok_or_else(MarketError::no_current_offer)?;
        if !offer.is_active(env::block_timestamp()) {
            return Err(MarketError::InvalidState(
                "Cannot accept an expired offer".into(),
            ));
        }

        Ok(self.settle(token_key, listing, offer))
    }

    /// Reclaim an escrowed offer. The maker may withdraw once the market's
    /// minimum offer duration has elapsed since the offer was made, or at
    /// any time after the offer expired.
    #[handle_result]
    pub fn withdraw_offer(&mut self, token_key: String) -> Result<(), MarketError> {
        let caller = env::predecessor_account_id();
        let mut listing = self.listing(&token_key)?.clone();
        if listing.locked {
            return Err(MarketError::token_locked());
        }
        let offer = listing
            .current_offer
            .take()
            .ok_or_else(MarketError::no_current_offer)?;
        if offer.from != caller {
            return Err(MarketError::only_owner("the offer maker"));
        }

        let now = env::block_timestamp();
        let held_long_enough = now >= offer.timestamp + self.min_offer_hours * HOUR_NS;
        if !held_long_enough && offer.is_active(now) {
            return Err(MarketError::InvalidState(format!(
                "Offers may be withdrawn only after {} hours",
                self.min_offer_hours
            )));
        }

        refund_escrow(&offer);
        events::emit_withdraw_offer(&listing.list_id(), offer.id);
        self.listings.insert(token_key, listing);
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Fails, rather than returning null, when no offer is current.
    #[handle_result]
    pub fn get_current_offer(&self, token_key: String) -> Result<TokenOffer, MarketError> {
        self.listing(&token_key)?
            .current_offer
            .clone()
            .ok_or_else(MarketError::no_current_offer)
    }
}
