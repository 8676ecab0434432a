//! Typed error handling for the market contract.
//!
//! Uses `#[derive(near_sdk::FunctionError)]` from the NEAR SDK to enable
//! `#[handle_result]` on public methods. When a method returns
//! `Err(MarketError::Xxx)`, the SDK calls `env::panic_str()` with the
//! Display message — same on-wire behaviour as raw panics, but with
//! structured, testable code.

use near_sdk_macros::NearSchema;

#[derive(NearSchema, near_sdk::FunctionError)]
#[abi(borsh, json)]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum MarketError {
    /// Caller lacks permission (wrong owner, store not allowlisted, etc.)
    Unauthorized(String),
    /// Invalid parameters, IDs, or data from the caller.
    InvalidInput(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Operation not allowed given current listing state.
    InvalidState(String),
    /// Attached deposit does not match what the method requires.
    InsufficientDeposit(String),
    /// Internal invariant violation (should never happen).
    InternalError(String),
}

impl std::fmt::Display for MarketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Self::InsufficientDeposit(msg) => write!(f, "Insufficient deposit: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

// ── Factory helpers for common errors ────────────────────────────────────────

impl MarketError {
    pub fn token_not_listed() -> Self {
        Self::NotFound("Token is not listed".into())
    }
    pub fn no_current_offer() -> Self {
        Self::NotFound("No current offer for this token".into())
    }
    pub fn token_locked() -> Self {
        Self::InvalidState("Token is locked by a settlement in flight".into())
    }
    pub fn one_yocto() -> Self {
        Self::InsufficientDeposit("Requires attached deposit of exactly 1 yoctoNEAR".into())
    }
    pub fn only_owner(what: &str) -> Self {
        Self::Unauthorized(format!("Only {} can perform this action", what))
    }
}
