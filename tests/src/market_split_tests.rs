use std::collections::HashMap;

use near_sdk::AccountId;
use serde_json::{json, Value};

use market_types::{OwnershipFractions, Royalty, RoyaltyArgs, SplitOwners, MAX_LEN_PAYOUT};

use crate::utils::*;

/// Splits direct the owner's proceeds of exactly one sale, then clear: the
/// next sale pays the new owner in full.
#[tokio::test]
async fn splits_are_single_use() -> anyhow::Result<()> {
    let MarketFixture {
        worker,
        market,
        store,
        ..
    } = setup_market().await?;
    let alice = create_user(&worker, "alice").await?;
    let bob = create_user(&worker, "bob").await?;
    let carol = create_user(&worker, "carol").await?;
    let dave = create_user(&worker, "dave").await?;

    mint(&store, 0, &alice, None).await?;

    // alice routes 60/40 of her proceeds to herself and bob
    alice
        .call(store.id(), "set_split_owners")
        .args_json(json!({
            "token_ids": ["0"],
            "split_between": split_json(&[(&alice, 6_000), (&bob, 4_000)]),
        }))
        .max_gas()
        .transact()
        .await?
        .into_result()?;

    approve_listing(&alice, &store, &market, 0, YOCTO_PER_NEAR, true).await?;
    let key = token_key(0, &store);

    // ------------------------ first sale consumes it -------------------------
    let alice_before = balance(&alice).await?;
    let bob_before = balance(&bob).await?;

    make_offer(&carol, &market, &[key.clone()], &[YOCTO_PER_NEAR], &[24])
        .await?
        .into_result()?;

    let net = YOCTO_PER_NEAR - YOCTO_PER_NEAR * 25 / 1_000;
    assert_diff_exact(
        alice_before,
        balance(&alice).await?,
        (net * 6 / 10) as i128,
        "60% split share",
    );
    assert_diff_exact(
        bob_before,
        balance(&bob).await?,
        (net * 4 / 10) as i128,
        "40% split share",
    );

    // cleared on the registry
    let splits: Value = store
        .view("get_split_owners")
        .args_json(json!({ "token_id": "0" }))
        .await?
        .json()?;
    assert_eq!(splits, Value::Null, "split configuration must be consumed");

    // -------------------- second sale: owner-only payout ---------------------
    approve_listing(&carol, &store, &market, 0, YOCTO_PER_NEAR, true).await?;

    let alice_before = balance(&alice).await?;
    let bob_before = balance(&bob).await?;
    let carol_before = balance(&carol).await?;

    make_offer(&dave, &market, &[key], &[YOCTO_PER_NEAR], &[24])
        .await?
        .into_result()?;

    assert_diff_exact(alice_before, balance(&alice).await?, 0, "no stale split for alice");
    assert_diff_exact(bob_before, balance(&bob).await?, 0, "no stale split for bob");
    assert_diff_exact(
        carol_before,
        balance(&carol).await?,
        net as i128,
        "new owner keeps the whole net price",
    );
    Ok(())
}

/// Royalty off the top, split over the remainder, in one sale.
#[tokio::test]
async fn royalty_and_split_compose() -> anyhow::Result<()> {
    let MarketFixture {
        worker,
        market,
        store,
        ..
    } = setup_market().await?;
    let seller = create_user(&worker, "seller").await?;
    let roy_a = create_user(&worker, "roy-a").await?;
    let roy_b = create_user(&worker, "roy-b").await?;
    let split_c = create_user(&worker, "split-c").await?;
    let split_d = create_user(&worker, "split-d").await?;
    let buyer = create_user(&worker, "buyer").await?;

    // 20% royalty 75/25 between a/b; the remainder splits 75/25 between c/d.
    mint(
        &store,
        0,
        &seller,
        Some(royalty_json(&[(&roy_a, 7_500), (&roy_b, 2_500)], 2_000)),
    )
    .await?;
    seller
        .call(store.id(), "set_split_owners")
        .args_json(json!({
            "token_ids": ["0"],
            "split_between": split_json(&[(&split_c, 7_500), (&split_d, 2_500)]),
        }))
        .max_gas()
        .transact()
        .await?
        .into_result()?;
    approve_listing(&seller, &store, &market, 0, YOCTO_PER_NEAR, true).await?;

    let a_before = balance(&roy_a).await?;
    let b_before = balance(&roy_b).await?;
    let c_before = balance(&split_c).await?;
    let d_before = balance(&split_d).await?;
    let seller_before = balance(&seller).await?;

    let result = make_offer(
        &buyer,
        &market,
        &[token_key(0, &store)],
        &[YOCTO_PER_NEAR],
        &[24],
    )
    .await?
    .into_result()?;

    // Cross-check the on-chain distribution against the shared calculator.
    let net = YOCTO_PER_NEAR - YOCTO_PER_NEAR * 25 / 1_000; // 0.975 NEAR
    let as_account = |a: &near_workspaces::Account| -> AccountId { a.id().as_str().parse().unwrap() };
    let royalty = Royalty::new(RoyaltyArgs {
        split_between: HashMap::from([(as_account(&roy_a), 7_500), (as_account(&roy_b), 2_500)]),
        percentage: 2_000,
    })
    .unwrap();
    let splits = SplitOwners::new(HashMap::from([
        (as_account(&split_c), 7_500),
        (as_account(&split_d), 2_500),
    ]))
    .unwrap();
    let expected = OwnershipFractions::new(
        &as_account(&seller),
        &Some(royalty),
        &Some(splits),
        MAX_LEN_PAYOUT,
    )
    .unwrap()
    .into_payout(net);
    let share = |account: &near_workspaces::Account| -> i128 {
        expected.payout[&as_account(account)].0 as i128
    };

    assert_diff_exact(a_before, balance(&roy_a).await?, share(&roy_a), "royalty a");
    assert_diff_exact(b_before, balance(&roy_b).await?, share(&roy_b), "royalty b");
    assert_diff_exact(c_before, balance(&split_c).await?, share(&split_c), "split c");
    assert_diff_exact(d_before, balance(&split_d).await?, share(&split_d), "split d");
    // the owner's share went to the split owners instead
    assert_diff_exact(seller_before, balance(&seller).await?, 0, "seller superseded by splits");

    // the sale event carries the full four-way payout map
    let events = parse_events(result.logs());
    let sold = events_of(&events, "nft_sold");
    assert_eq!(sold.len(), 1);
    let payout = sold[0]["data"]["payout"].as_object().unwrap();
    assert_eq!(payout.len(), 4);
    assert_eq!(payout[roy_a.id().as_str()], share(&roy_a).to_string());
    assert_eq!(payout[split_c.id().as_str()], share(&split_c).to_string());
    Ok(())
}
