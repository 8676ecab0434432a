//! Listing registry: approval-driven listing, revocation, and views.
//!
//! Listings are never created by direct calls from token owners. The store
//! notifies the market through the NEP-178 approval callbacks; the approval
//! message carries the sale terms. Revocation is fire-and-forget: unknown
//! token keys fall through silently.

use near_sdk::json_types::U64;
use near_sdk::{env, near, serde_json, AccountId};

use market_types::{SaleArgs, TokenKey, TokenListing};

use crate::events::{self, NftListLog, NftUnlistLog};
use crate::internal::{allowlist_gate_account, refund_escrow};
use crate::*;

#[near]
impl Contract {
    /// NEP-178 approval receiver. The predecessor is the store that granted
    /// the approval; `msg` carries the sale terms as [`SaleArgs`] JSON.
    #[handle_result]
    pub fn nft_on_approve(
        &mut self,
        token_id: U64,
        owner_id: AccountId,
        approval_id: u64,
        msg: String,
    ) -> Result<(), MarketError> {
        let store_id = env::predecessor_account_id();
        let args: SaleArgs = serde_json::from_str(&msg)
            .map_err(|_| MarketError::InvalidInput("Invalid sale arguments".into()))?;

        let (unlisted, listed) =
            self.internal_list(token_id.0, owner_id, store_id, approval_id, &args)?;
        if let Some(unlisted) = unlisted {
            events::emit_unlist(vec![unlisted]);
        }
        events::emit_list(vec![listed]);
        Ok(())
    }

    /// Batch counterpart of `nft_on_approve`: one unlist event for every
    /// replaced listing, then one list event for the whole batch.
    #[handle_result]
    pub fn nft_on_batch_approve(
        &mut self,
        tokens: Vec<U64>,
        approvals: Vec<U64>,
        owner_id: AccountId,
        msg: String,
    ) -> Result<(), MarketError> {
        if tokens.len() != approvals.len() {
            return Err(MarketError::InvalidInput(
                "Approval list doesn't match up with token list".into(),
            ));
        }
        if tokens.is_empty() {
            return Err(MarketError::InvalidInput("Requires token IDs".into()));
        }
        let store_id = env::predecessor_account_id();
        let args: SaleArgs = serde_json::from_str(&msg)
            .map_err(|_| MarketError::InvalidInput("Invalid sale arguments".into()))?;

        let mut unlisted = Vec::new();
        let mut listed = Vec::with_capacity(tokens.len());
        for (token_id, approval_id) in tokens.iter().zip(approvals.iter()) {
            let (old, new) = self.internal_list(
                token_id.0,
                owner_id.clone(),
                store_id.clone(),
                approval_id.0,
                &args,
            )?;
            if let Some(old) = old {
                unlisted.push(old);
            }
            listed.push(new);
        }

        if !unlisted.is_empty() {
            events::emit_unlist(unlisted);
        }
        events::emit_list(listed);
        Ok(())
    }

    /// Revocation path, called by the store (predecessor). Removes each
    /// named listing; refunds any live offer first. Unknown token keys and
    /// locked listings fall through without failing the call.
    #[handle_result]
    pub fn unlist(&mut self, token_ids: Vec<U64>) -> Result<(), MarketError> {
        let store_id = env::predecessor_account_id();
        let mut unlisted = Vec::new();
        for token_id in token_ids {
            let key = TokenKey::new(token_id.0, store_id.clone()).to_string();
            let Some(listing) = self.listings.get(&key) else {
                continue;
            };
            if listing.locked {
                continue;
            }
            if let Some(offer) = &listing.current_offer {
                refund_escrow(offer);
            }
            unlisted.push(NftUnlistLog {
                list_id: listing.list_id(),
            });
            self.listings.remove(&key);
        }
        if !unlisted.is_empty() {
            events::emit_unlist(unlisted);
        }
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Fails, rather than returning null, when the token is not listed,
    /// so callers can tell "not listed" from "listed with nothing set".
    #[handle_result]
    pub fn get_token(&self, token_key: String) -> Result<TokenListing, MarketError> {
        self.listing(&token_key).cloned()
    }
}

// ── Internal implementation ──────────────────────────────────────────────────

impl Contract {
    /// Insert or replace the listing for one token. Replacement refunds the
    /// old listing's offer and reports its list id for the unlist event.
    pub(crate) fn internal_list(
        &mut self,
        token_id: u64,
        owner_id: AccountId,
        store_id: AccountId,
        approval_id: u64,
        args: &SaleArgs,
    ) -> Result<(Option<NftUnlistLog>, NftListLog), MarketError> {
        let gate = allowlist_gate_account(&store_id);
        if !self.allowlist.contains(&gate) {
            return Err(MarketError::Unauthorized(format!(
                "Factory {} is not allowlisted",
                gate
            )));
        }

        let key = TokenKey::new(token_id, store_id.clone()).to_string();
        let unlisted = match self.listings.get(&key) {
            Some(previous) if previous.locked => return Err(MarketError::token_locked()),
            Some(previous) => {
                if let Some(offer) = &previous.current_offer {
                    refund_escrow(offer);
                }
                Some(NftUnlistLog {
                    list_id: previous.list_id(),
                })
            }
            None => None,
        };

        let listing = TokenListing::new(
            token_id,
            owner_id,
            store_id.clone(),
            approval_id,
            args.autotransfer,
            args.price,
        );
        let listed = NftListLog {
            list_id: listing.list_id(),
            price: args.price.0.to_string(),
            token_key: key.clone(),
            owner_id: listing.owner_id.to_string(),
            autotransfer: args.autotransfer,
            approval_id: approval_id.to_string(),
            token_id: token_id.to_string(),
            store_id: store_id.to_string(),
        };
        self.listings.insert(key, listing);

        Ok((unlisted, listed))
    }
}
