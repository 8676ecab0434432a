use crate::tests::test_utils::*;
use crate::*;

#[test]
fn new_sets_defaults() {
    let contract = new_market();
    assert_eq!(contract.get_owner(), &owner());
    assert_eq!(contract.next_offer_id, 1);
    assert_eq!(contract.get_min_offer_hours(), DEFAULT_MIN_OFFER_HOURS);
    assert_eq!(contract.get_market_fee(), DEFAULT_MARKET_FEE_BPS);
    assert!(contract.get_allowlist().is_empty());
    assert!(contract.get_banlist().is_empty());
}

// --- Allowlist ---

#[test]
fn allowlist_add_and_remove() {
    let mut contract = new_market();

    set_caller(owner(), 1);
    contract.update_allowlist(factory(), true).unwrap();
    assert_eq!(contract.get_allowlist(), vec![factory()]);

    set_caller(owner(), 1);
    contract.update_allowlist(factory(), false).unwrap();
    assert!(contract.get_allowlist().is_empty());
}

#[test]
fn allowlist_requires_owner() {
    let mut contract = new_market();
    set_caller(alice(), 1);
    let err = contract.update_allowlist(factory(), true).unwrap_err();
    assert!(matches!(err, MarketError::Unauthorized(_)));
}

#[test]
fn allowlist_requires_exact_intent_deposit() {
    let mut contract = new_market();

    set_caller(owner(), 0);
    let err = contract.update_allowlist(factory(), true).unwrap_err();
    assert!(matches!(err, MarketError::InsufficientDeposit(_)));

    set_caller(owner(), 2);
    let err = contract.update_allowlist(factory(), true).unwrap_err();
    assert!(matches!(err, MarketError::InsufficientDeposit(_)));
}

// --- Banlist ---

#[test]
fn banlist_add_and_remove() {
    let mut contract = new_market();

    set_caller(owner(), 1);
    contract.update_banlist(bob(), true).unwrap();
    assert_eq!(contract.get_banlist(), vec![bob()]);

    set_caller(owner(), 1);
    contract.update_banlist(bob(), false).unwrap();
    assert!(contract.get_banlist().is_empty());
}

// --- Config ---

#[test]
fn min_offer_hours_is_owner_gated_and_bounded() {
    let mut contract = new_market();

    set_caller(alice(), 1);
    assert!(matches!(
        contract.set_min_offer_hours(0).unwrap_err(),
        MarketError::Unauthorized(_)
    ));

    set_caller(owner(), 1);
    contract.set_min_offer_hours(0).unwrap();
    assert_eq!(contract.get_min_offer_hours(), 0);

    set_caller(owner(), 1);
    assert!(matches!(
        contract.set_min_offer_hours(MAX_OFFER_HOURS).unwrap_err(),
        MarketError::InvalidInput(_)
    ));
}

#[test]
fn market_fee_is_capped() {
    let mut contract = new_market();

    set_caller(owner(), 1);
    contract.set_market_fee(100).unwrap();
    assert_eq!(contract.get_market_fee(), 100);

    set_caller(owner(), 1);
    assert!(matches!(
        contract.set_market_fee(MAX_MARKET_FEE_BPS + 1).unwrap_err(),
        MarketError::InvalidInput(_)
    ));
}

#[test]
fn fee_amount_truncates() {
    let contract = new_market();
    // 2.5% of 2 NEAR
    assert_eq!(contract.fee_amount(2 * NEAR), 2 * NEAR * 25 / 1_000);
    // too small to divide: fee rounds down to zero
    assert_eq!(contract.fee_amount(39), 0);
}

#[test]
fn ownership_transfer() {
    let mut contract = new_market();

    set_caller(owner(), 1);
    assert!(matches!(
        contract.transfer_ownership(owner()).unwrap_err(),
        MarketError::InvalidInput(_)
    ));

    set_caller(owner(), 1);
    contract.transfer_ownership(alice()).unwrap();
    assert_eq!(contract.get_owner(), &alice());

    // the old owner is now locked out
    set_caller(owner(), 1);
    assert!(matches!(
        contract.update_allowlist(factory(), true).unwrap_err(),
        MarketError::Unauthorized(_)
    ));
}
