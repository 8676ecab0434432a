use std::collections::HashMap;

use near_sdk::json_types::U128;
use near_sdk::PromiseError;

use market_types::{Payout, TokenListing};

use crate::tests::test_utils::*;
use crate::*;

/// An auction listing with an accepted offer, locked for settlement.
/// Returns the contract, the token key, and the locked listing snapshot as
/// it was handed to the settlement callback.
fn market_mid_settlement() -> (Contract, String, TokenListing) {
    let mut contract = allowlisted_market();
    let key = list_token(&mut contract, 0, 0, NEAR, false);
    place_offer(&mut contract, bob(), &key, 2 * NEAR, 24).unwrap();
    set_caller(alice(), 1);
    contract.accept_and_transfer(key.clone()).unwrap();
    let snapshot = contract.get_token(key.clone()).unwrap();
    (contract, key, snapshot)
}

fn others_keep() -> u128 {
    // 2 NEAR minus the 2.5% market cut
    2 * NEAR - 2 * NEAR * 25 / 1_000
}

#[test]
fn successful_settlement_clears_the_listing() {
    let (mut contract, key, snapshot) = market_mid_settlement();

    let payout = Payout {
        payout: HashMap::from([(alice(), U128(others_keep()))]),
    };
    set_caller(market(), 0);
    let disbursed =
        contract.resolve_settlement(key.clone(), snapshot, U128(others_keep()), Ok(payout));

    assert_eq!(disbursed, U128(others_keep()));
    assert!(contract.get_token(key).is_err());
}

#[test]
fn failed_transfer_refunds_and_reopens() {
    let (mut contract, key, snapshot) = market_mid_settlement();

    set_caller(market(), 0);
    let disbursed = contract.resolve_settlement(
        key.clone(),
        snapshot,
        U128(others_keep()),
        Err(PromiseError::Failed),
    );
    assert_eq!(disbursed, U128(0));

    // The listing survives, unlocked, with its offer cleared; the offer
    // count is preserved because the listing was never cleared.
    let listing = contract.get_token(key).unwrap();
    assert!(!listing.locked);
    assert!(listing.current_offer.is_none());
    assert_eq!(listing.num_offers, 1);
}

#[test]
fn reopened_listing_accepts_new_offers() {
    let (mut contract, key, snapshot) = market_mid_settlement();
    set_caller(market(), 0);
    contract.resolve_settlement(
        key.clone(),
        snapshot,
        U128(others_keep()),
        Err(PromiseError::Failed),
    );

    place_offer(&mut contract, carol(), &key, 2 * NEAR, 24).unwrap();
    // the global counter moved on; nothing is reused
    assert_eq!(contract.get_current_offer(key).unwrap().id, 2);
}

#[test]
fn overdrawn_payout_falls_back_to_the_seller() {
    let (mut contract, key, snapshot) = market_mid_settlement();

    // A registry map claiming more than the balance: rounding may lose
    // value, never gain it. The market pays the seller directly instead.
    let payout = Payout {
        payout: HashMap::from([(bob(), U128(others_keep() + 1))]),
    };
    set_caller(market(), 0);
    let disbursed =
        contract.resolve_settlement(key.clone(), snapshot, U128(others_keep()), Ok(payout));

    assert_eq!(disbursed, U128(others_keep()));
    assert!(contract.get_token(key).is_err());
}

#[test]
fn oversized_payout_falls_back_to_the_seller() {
    let (mut contract, key, snapshot) = market_mid_settlement();

    let payout = Payout {
        payout: (0..=market_types::MAX_LEN_PAYOUT)
            .map(|i| {
                let account: near_sdk::AccountId =
                    format!("payee{}.test.near", i).parse().unwrap();
                (account, U128(1))
            })
            .collect(),
    };
    set_caller(market(), 0);
    contract.resolve_settlement(key.clone(), snapshot, U128(others_keep()), Ok(payout));
    assert!(contract.get_token(key).is_err());
}

#[test]
fn failure_refund_survives_a_vanished_listing() {
    let (mut contract, key, snapshot) = market_mid_settlement();

    // The listing is gone by the time the callback lands. The refund is
    // driven by the snapshot, so it still happens; nothing is reinserted.
    contract.listings.remove(&key);
    set_caller(market(), 0);
    let disbursed = contract.resolve_settlement(
        key.clone(),
        snapshot,
        U128(others_keep()),
        Err(PromiseError::Failed),
    );
    assert_eq!(disbursed, U128(0));
    assert!(contract.get_token(key).is_err());
}
