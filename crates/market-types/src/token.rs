use std::fmt;
use std::str::FromStr;

use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

/// Unique identifier of a token across all stores: `"{token_id}:{store_id}"`.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenKey {
    pub token_id: u64,
    pub store_id: AccountId,
}

impl TokenKey {
    pub fn new(token_id: u64, store_id: AccountId) -> Self {
        Self { token_id, store_id }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.token_id, self.store_id)
    }
}

impl FromStr for TokenKey {
    type Err = ParseTokenKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, store) = s.split_once(':').ok_or(ParseTokenKeyError)?;
        Ok(Self {
            token_id: id.parse().map_err(|_| ParseTokenKeyError)?,
            store_id: store.parse().map_err(|_| ParseTokenKeyError)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseTokenKeyError;

impl fmt::Display for ParseTokenKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "token key must have the form \"token_id:store_id\"")
    }
}

/// A token listed for sale on the market.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug)]
pub struct TokenListing {
    pub token_id: u64,
    pub owner_id: AccountId,
    /// `Store` that originated this token.
    pub store_id: AccountId,
    /// If `autotransfer` is enabled, a qualifying offer settles immediately
    /// instead of waiting for the owner to accept. Enabling it does not
    /// retroactively trigger on a held `current_offer`.
    pub autotransfer: bool,
    pub asking_price: U128,
    /// The approval credential that lets the market move the token. Also
    /// disambiguates re-listings of the same token in event logs.
    pub approval_id: u64,
    /// The current offer, if any. It may have timed out; an expired offer
    /// cannot be accepted but is not proactively removed.
    pub current_offer: Option<TokenOffer>,
    /// Offers made against this listing so far.
    pub num_offers: u64,
    /// Set while a settlement is in flight; blocks every mutation of the
    /// listing until the settlement callback resolves.
    pub locked: bool,
}

impl TokenListing {
    /// Input validation happens at the market level, not here.
    pub fn new(
        token_id: u64,
        owner_id: AccountId,
        store_id: AccountId,
        approval_id: u64,
        autotransfer: bool,
        asking_price: U128,
    ) -> Self {
        Self {
            token_id,
            owner_id,
            store_id,
            approval_id,
            autotransfer,
            asking_price,
            current_offer: None,
            num_offers: 0,
            locked: false,
        }
    }

    pub fn token_key(&self) -> TokenKey {
        TokenKey::new(self.token_id, self.store_id.clone())
    }

    /// Unique across re-listings of the same token, because each re-listing
    /// carries a fresh approval id.
    pub fn list_id(&self) -> String {
        format!("{}:{}:{}", self.token_id, self.approval_id, self.store_id)
    }
}

/// An escrowed bid against a listing.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug)]
pub struct TokenOffer {
    /// Drawn from the market's global offer counter; never reused.
    pub id: u64,
    /// yoctoNEAR, held in escrow by the market until resolution. Stringified
    /// on the JSON boundary.
    pub price: U128,
    pub from: AccountId,
    /// When the offer was made (ns since epoch).
    pub timestamp: u64,
    /// Absolute expiry (ns since epoch).
    pub timeout: u64,
}

impl TokenOffer {
    /// An offer is active if it has yet to time out.
    pub fn is_active(&self, now: u64) -> bool {
        now < self.timeout
    }
}

/// Offer timeout duration. Other denominations were dropped for simplicity;
/// the enum remains so the wire format stays extensible.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Hours(u64),
}

impl TimeUnit {
    pub fn hours(&self) -> u64 {
        match self {
            TimeUnit::Hours(n) => *n,
        }
    }
}

/// The approval message a token registry forwards when an owner lists.
#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct SaleArgs {
    pub price: U128,
    pub autotransfer: bool,
}
