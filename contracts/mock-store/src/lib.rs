//! Minimal mock token registry (store) for integration testing.
//!
//! Implements only the surface the market consumes:
//! - nft_approve / nft_batch_approve (grant approvals, notify the market)
//! - nft_revoke (drop an approval, fire-and-forget unlist)
//! - set_split_owners (single-use sale splits)
//! - nft_transfer_payout (NEP-199 transfer + payout computation)
//!
//! Royalties are fixed at mint. Payouts are computed with the shared
//! `market_types` arithmetic, so integration tests exercise the same
//! calculator the production registry would embed.

use std::collections::HashMap;

use near_sdk::json_types::{U128, U64};
use near_sdk::store::LookupMap;
use near_sdk::{
    env, ext_contract, near, AccountId, Gas, NearToken, PanicOnDefault, Promise,
};

use market_types::{OwnershipFractions, Payout, Royalty, RoyaltyArgs, SplitOwners};

const APPROVAL_CALLBACK_GAS: u64 = 150;

#[near(serializers = [borsh])]
pub struct MockToken {
    owner_id: AccountId,
    approvals: HashMap<AccountId, u64>,
    royalty: Option<Royalty>,
    split_owners: Option<SplitOwners>,
}

/// The market's approval-driven listing surface.
#[ext_contract(ext_market)]
pub trait Market {
    fn nft_on_approve(&mut self, token_id: U64, owner_id: AccountId, approval_id: u64, msg: String);
    fn nft_on_batch_approve(
        &mut self,
        tokens: Vec<U64>,
        approvals: Vec<U64>,
        owner_id: AccountId,
        msg: String,
    );
    fn unlist(&mut self, token_ids: Vec<U64>);
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockStore {
    tokens: LookupMap<u64, MockToken>,
    next_approval_id: u64,
    /// Test helper: transfers of this token fail. Per-token because a panic
    /// rolls back any in-call attempt to disarm a one-shot flag.
    fail_transfers_of: Option<u64>,
}

#[near]
impl MockStore {
    #[init]
    pub fn new() -> Self {
        Self {
            tokens: LookupMap::new(b"t"),
            next_approval_id: 0,
            fail_transfers_of: None,
        }
    }

    // =========================================================================
    // Minting (test helper)
    // =========================================================================

    pub fn mint(&mut self, token_id: U64, owner_id: AccountId, royalty: Option<RoyaltyArgs>) {
        let royalty = royalty.map(|args| match Royalty::new(args) {
            Ok(royalty) => royalty,
            Err(e) => env::panic_str(&e.to_string()),
        });
        self.tokens.insert(
            token_id.0,
            MockToken {
                owner_id,
                approvals: HashMap::new(),
                royalty,
                split_owners: None,
            },
        );
    }

    // =========================================================================
    // NEP-178 Approvals
    // =========================================================================

    #[payable]
    pub fn nft_approve(
        &mut self,
        token_id: U64,
        account_id: AccountId,
        msg: Option<String>,
    ) -> Option<Promise> {
        let approval_id = self.next_approval_id;
        self.next_approval_id += 1;

        let token = self.token_mut(token_id.0);
        assert_eq!(
            env::predecessor_account_id(),
            token.owner_id,
            "Only the token owner can approve"
        );
        let owner_id = token.owner_id.clone();
        token.approvals.insert(account_id.clone(), approval_id);

        msg.map(|msg| {
            ext_market::ext(account_id)
                .with_static_gas(Gas::from_tgas(APPROVAL_CALLBACK_GAS))
                .nft_on_approve(token_id, owner_id, approval_id, msg)
        })
    }

    #[payable]
    pub fn nft_batch_approve(
        &mut self,
        token_ids: Vec<U64>,
        account_id: AccountId,
        msg: String,
    ) -> Promise {
        let caller = env::predecessor_account_id();
        let mut approvals = Vec::with_capacity(token_ids.len());
        let mut owner_id = caller.clone();
        for token_id in &token_ids {
            let approval_id = self.next_approval_id;
            self.next_approval_id += 1;

            let token = self.token_mut(token_id.0);
            assert_eq!(caller, token.owner_id, "Only the token owner can approve");
            owner_id = token.owner_id.clone();
            token.approvals.insert(account_id.clone(), approval_id);
            approvals.push(U64(approval_id));
        }

        ext_market::ext(account_id)
            .with_static_gas(Gas::from_tgas(APPROVAL_CALLBACK_GAS))
            .nft_on_batch_approve(token_ids, approvals, owner_id, msg)
    }

    #[payable]
    pub fn nft_revoke(&mut self, token_id: U64, account_id: AccountId) -> Promise {
        let caller = env::predecessor_account_id();
        let token = self.token_mut(token_id.0);
        assert_eq!(caller, token.owner_id, "Only the token owner can revoke");
        token.approvals.remove(&account_id);

        // Fire-and-forget: the market drops the listing if it has one.
        ext_market::ext(account_id)
            .with_static_gas(Gas::from_tgas(APPROVAL_CALLBACK_GAS))
            .unlist(vec![token_id])
    }

    // =========================================================================
    // Splits
    // =========================================================================

    #[payable]
    pub fn set_split_owners(
        &mut self,
        token_ids: Vec<U64>,
        split_between: HashMap<AccountId, u32>,
    ) {
        let splits = match SplitOwners::new(split_between) {
            Ok(splits) => splits,
            Err(e) => env::panic_str(&e.to_string()),
        };
        let caller = env::predecessor_account_id();
        for token_id in token_ids {
            let token = self.token_mut(token_id.0);
            assert_eq!(caller, token.owner_id, "Only the token owner can set splits");
            assert!(
                token.split_owners.is_none(),
                "Cannot overwrite split owners"
            );
            token.split_owners = Some(splits.clone());
        }
    }

    // =========================================================================
    // NEP-199 Transfer with payout
    // =========================================================================

    /// Transfer the token and return the payout for `balance`. Consumes the
    /// split configuration. Panics on a stale approval, a payout cap
    /// violation, or when the failure switch is armed; the panic fails the
    /// whole call and ownership stays untouched.
    #[payable]
    pub fn nft_transfer_payout(
        &mut self,
        receiver_id: AccountId,
        token_id: U64,
        approval_id: u64,
        balance: U128,
        max_len_payout: u32,
    ) -> Payout {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );

        if self.fail_transfers_of == Some(token_id.0) {
            env::panic_str("MockStore: Simulated transfer failure");
        }

        let caller = env::predecessor_account_id();
        let token = self.token_mut(token_id.0);
        match token.approvals.get(&caller) {
            Some(&granted) if granted == approval_id => {}
            _ => env::panic_str("Approval is not valid for this token"),
        }

        let owner_id = token.owner_id.clone();
        let fractions = match OwnershipFractions::new(
            &owner_id,
            &token.royalty,
            &token.split_owners,
            max_len_payout,
        ) {
            Ok(fractions) => fractions,
            Err(e) => env::panic_str(&e.to_string()),
        };

        token.owner_id = receiver_id;
        token.approvals.clear();
        token.split_owners = None;

        fractions.into_payout(balance.0)
    }

    // =========================================================================
    // Test helpers and views
    // =========================================================================

    /// Arm the failure switch: transfers of `token_id` panic, exercising the
    /// market's refund path.
    pub fn set_fail_transfer(&mut self, token_id: U64) {
        self.fail_transfers_of = Some(token_id.0);
    }

    pub fn nft_token_owner(&self, token_id: U64) -> AccountId {
        self.token(token_id.0).owner_id.clone()
    }

    pub fn get_token_royalty(&self, token_id: U64) -> Option<Royalty> {
        self.token(token_id.0).royalty.clone()
    }

    pub fn get_split_owners(&self, token_id: U64) -> Option<SplitOwners> {
        self.token(token_id.0).split_owners.clone()
    }
}

impl MockStore {
    fn token(&self, token_id: u64) -> &MockToken {
        match self.tokens.get(&token_id) {
            Some(token) => token,
            None => env::panic_str("No such token"),
        }
    }

    fn token_mut(&mut self, token_id: u64) -> &mut MockToken {
        match self.tokens.get_mut(&token_id) {
            Some(token) => token,
            None => env::panic_str("No such token"),
        }
    }
}
