//! NEP-297 JSON event logs.
//!
//! Every state-changing operation emits one event; batched operations emit a
//! single event carrying an array of per-item records. Payload integers are
//! stringified where indexers expect strings.

use std::collections::HashMap;

use near_sdk::json_types::U128;
use near_sdk::serde::Serialize;
use near_sdk::{env, serde_json, AccountId};

use market_types::TokenOffer;

pub(crate) const STANDARD: &str = "nft_market";
pub(crate) const VERSION: &str = "0.1.0";
const PREFIX: &str = "EVENT_JSON:";

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct EventLog<T: Serialize> {
    standard: &'static str,
    version: &'static str,
    event: &'static str,
    data: T,
}

fn emit<T: Serialize>(event: &'static str, data: T) {
    let log = EventLog {
        standard: STANDARD,
        version: VERSION,
        event,
        data,
    };
    env::log_str(&format!(
        "{}{}",
        PREFIX,
        serde_json::to_string(&log).expect("event serialization failed")
    ));
}

// ── Listings ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub(crate) struct NftListLog {
    pub list_id: String,
    pub price: String,
    pub token_key: String,
    pub owner_id: String,
    pub autotransfer: bool,
    pub approval_id: String,
    pub token_id: String,
    pub store_id: String,
}

pub(crate) fn emit_list(listings: Vec<NftListLog>) {
    emit("nft_list", listings);
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub(crate) struct NftUnlistLog {
    pub list_id: String,
}

pub(crate) fn emit_unlist(listings: Vec<NftUnlistLog>) {
    emit("nft_unlist", listings);
}

// ── Offers ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub(crate) struct NftMakeOfferLog {
    pub offer: TokenOffer,
    pub list_id: String,
    pub token_key: String,
    pub offer_num: u64,
}

pub(crate) fn emit_make_offer(offers: Vec<NftMakeOfferLog>) {
    emit("nft_make_offer", offers);
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct NftWithdrawOfferLog {
    list_id: String,
    offer_num: u64,
}

pub(crate) fn emit_withdraw_offer(list_id: &str, offer_num: u64) {
    emit(
        "nft_withdraw_offer",
        NftWithdrawOfferLog {
            list_id: list_id.to_string(),
            offer_num,
        },
    );
}

// ── Sales ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct NftSaleLog<'a> {
    list_id: &'a str,
    offer_num: u64,
    token_key: &'a str,
    payout: &'a HashMap<AccountId, U128>,
}

pub(crate) fn emit_sale(
    list_id: &str,
    offer_num: u64,
    token_key: &str,
    payout: &HashMap<AccountId, U128>,
) {
    emit(
        "nft_sold",
        NftSaleLog {
            list_id,
            offer_num,
            token_key,
            payout,
        },
    );
}

// ── Allowlist / banlist ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct ListUpdateLog {
    account_id: String,
    state: bool,
}

pub(crate) fn emit_allowlist_update(account_id: &AccountId, state: bool) {
    emit(
        "update_allowlist",
        ListUpdateLog {
            account_id: account_id.to_string(),
            state,
        },
    );
}

pub(crate) fn emit_banlist_update(account_id: &AccountId, state: bool) {
    emit(
        "update_banlist",
        ListUpdateLog {
            account_id: account_id.to_string(),
            state,
        },
    );
}
