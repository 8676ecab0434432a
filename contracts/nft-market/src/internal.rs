// Internal helper functions for the market

use near_sdk::{env, AccountId, NearToken, Promise};

use market_types::{TokenListing, TokenOffer};

use crate::*;

/// Check exactly one yoctoNEAR is attached (explicit-intent signal).
pub(crate) fn check_one_yocto() -> Result<(), MarketError> {
    if env::attached_deposit() != ONE_YOCTO {
        return Err(MarketError::one_yocto());
    }
    Ok(())
}

/// A store is admitted through the account that deployed it: its direct
/// parent when it is a subaccount, otherwise the store account itself.
pub(crate) fn allowlist_gate_account(store_id: &AccountId) -> AccountId {
    store_id
        .as_str()
        .split_once('.')
        .and_then(|(_, parent)| parent.parse().ok())
        .unwrap_or_else(|| store_id.clone())
}

/// Return an offer's escrowed deposit to its maker in full.
pub(crate) fn refund_escrow(offer: &TokenOffer) {
    let _ = Promise::new(offer.from.clone()).transfer(NearToken::from_yoctonear(offer.price.0));
}

impl Contract {
    pub(crate) fn check_contract_owner(&self, caller: &AccountId) -> Result<(), MarketError> {
        if caller != &self.owner_id {
            return Err(MarketError::only_owner("the market owner"));
        }
        Ok(())
    }

    /// The market's cut of a sale price; truncating.
    pub(crate) fn fee_amount(&self, price: u128) -> u128 {
        price * self.fee_bps as u128 / BASIS_POINTS as u128
    }

    pub(crate) fn listing(&self, token_key: &str) -> Result<&TokenListing, MarketError> {
        self.listings
            .get(token_key)
            .ok_or_else(MarketError::token_not_listed)
    }
}
