use near_sdk::store::{IterableMap, IterableSet};
use near_sdk::{env, near, AccountId};

use crate::events;
use crate::internal::check_one_yocto;
use crate::*;

#[near]
impl Contract {
    // --- Init ---

    #[init]
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            owner_id,
            listings: IterableMap::new(StorageKey::Listings),
            allowlist: IterableSet::new(StorageKey::Allowlist),
            banlist: IterableSet::new(StorageKey::Banlist),
            next_offer_id: 1,
            min_offer_hours: DEFAULT_MIN_OFFER_HOURS,
            fee_bps: DEFAULT_MARKET_FEE_BPS,
        }
    }

    // --- Admin ---

    /// Owner only.
    #[payable]
    #[handle_result]
    pub fn update_allowlist(
        &mut self,
        account_id: AccountId,
        state: bool,
    ) -> Result<(), MarketError> {
        check_one_yocto()?;
        self.check_contract_owner(&env::predecessor_account_id())?;
        if state {
            self.allowlist.insert(account_id.clone());
        } else {
            self.allowlist.remove(&account_id);
        }
        events::emit_allowlist_update(&account_id, state);
        Ok(())
    }

    /// Owner only.
    #[payable]
    #[handle_result]
    pub fn update_banlist(
        &mut self,
        account_id: AccountId,
        state: bool,
    ) -> Result<(), MarketError> {
        check_one_yocto()?;
        self.check_contract_owner(&env::predecessor_account_id())?;
        if state {
            self.banlist.insert(account_id.clone());
        } else {
            self.banlist.remove(&account_id);
        }
        events::emit_banlist_update(&account_id, state);
        Ok(())
    }

    /// Owner only. Governs both the duration floor on new offers and the
    /// holding period before withdrawal.
    #[payable]
    #[handle_result]
    pub fn set_min_offer_hours(&mut self, min_offer_hours: u64) -> Result<(), MarketError> {
        check_one_yocto()?;
        self.check_contract_owner(&env::predecessor_account_id())?;
        if min_offer_hours >= MAX_OFFER_HOURS {
            return Err(MarketError::InvalidInput(format!(
                "Minimum offer duration must be below {} hours",
                MAX_OFFER_HOURS
            )));
        }
        self.min_offer_hours = min_offer_hours;
        Ok(())
    }

    /// Owner only.
    #[payable]
    #[handle_result]
    pub fn set_market_fee(&mut self, fee_bps: u16) -> Result<(), MarketError> {
        check_one_yocto()?;
        self.check_contract_owner(&env::predecessor_account_id())?;
        if fee_bps > MAX_MARKET_FEE_BPS {
            return Err(MarketError::InvalidInput(
                "Market fee cannot exceed 10%".into(),
            ));
        }
        self.fee_bps = fee_bps;
        Ok(())
    }

    /// Owner only.
    #[payable]
    #[handle_result]
    pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), MarketError> {
        check_one_yocto()?;
        self.check_contract_owner(&env::predecessor_account_id())?;
        if new_owner == self.owner_id {
            return Err(MarketError::InvalidInput(
                "New owner must differ from current owner".into(),
            ));
        }
        self.owner_id = new_owner;
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn get_allowlist(&self) -> Vec<AccountId> {
        self.allowlist.iter().cloned().collect()
    }

    pub fn get_banlist(&self) -> Vec<AccountId> {
        self.banlist.iter().cloned().collect()
    }

    pub fn get_min_offer_hours(&self) -> u64 {
        self.min_offer_hours
    }

    pub fn get_market_fee(&self) -> u16 {
        self.fee_bps
    }

    pub fn get_owner(&self) -> &AccountId {
        &self.owner_id
    }
}
