//! Proportional payout arithmetic for token sales.
//!
//! A sale balance is divided between royalty holders (perpetual, set at
//! mint) and split owners (single-use, set by the current owner), with the
//! post-royalty remainder going to the owner when no splits are set. All
//! division truncates: rounding may lose value, never gain it, and the lost
//! dust is not reassigned to any party.

use std::collections::HashMap;
use std::fmt;

use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

/// Implied denominator of [`SafeFraction`] numerators.
pub const PAYOUT_DENOMINATOR: u32 = 10_000;

/// Implied denominator of [`MultipliedSafeFraction`] numerators.
const MULTIPLIED_DENOMINATOR: u128 = 100_000_000;

/// Maximum number of distinct payout recipients (royalties + splits) a
/// settlement will process.
pub const MAX_LEN_PAYOUT: u32 = 50;

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayoutError {
    /// A numerator outside `0..=10_000`.
    InvalidFraction(u32),
    /// A royalty percentage of zero or above the denominator.
    InvalidPercentage(u32),
    /// A royalty or split mapping with no recipients.
    EmptyRecipients,
    /// Recipient numerators that do not add up to the full denominator.
    BadNumeratorSum(u32),
    /// More recipients than the caller-visible cap allows. Failing closed
    /// here is what prevents a silently truncated recipient list.
    TooManyRecipients { count: usize, max: u32 },
    /// The royalty percentage left a negative owner remainder.
    Underflow,
}

impl fmt::Display for PayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidFraction(n) => {
                write!(f, "{} must be between 0 and {}", n, PAYOUT_DENOMINATOR)
            }
            Self::InvalidPercentage(n) => {
                write!(f, "percentage {} must be between 1 and {}", n, PAYOUT_DENOMINATOR)
            }
            Self::EmptyRecipients => write!(f, "recipient mapping is empty"),
            Self::BadNumeratorSum(sum) => {
                write!(f, "fractions add to {}, must add to {}", sum, PAYOUT_DENOMINATOR)
            }
            Self::TooManyRecipients { count, max } => {
                write!(f, "payout too long: {} recipients exceed the cap of {}", count, max)
            }
            Self::Underflow => write!(f, "payout remainder would be negative"),
        }
    }
}

// ── Fractions ────────────────────────────────────────────────────────────────

/// A fraction with numerator in `0..=10_000` over an implied denominator of
/// 10,000. The upper bound keeps fraction multiplication free of overflow.
#[near(serializers = [borsh, json])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafeFraction {
    pub numerator: u32,
}

impl SafeFraction {
    pub fn new(numerator: u32) -> Result<Self, PayoutError> {
        if numerator > PAYOUT_DENOMINATOR {
            return Err(PayoutError::InvalidFraction(numerator));
        }
        Ok(Self { numerator })
    }

    /// Fractionalize a balance. Divides first so the multiplication cannot
    /// overflow; the division truncates.
    pub fn multiply_balance(&self, value: u128) -> u128 {
        value / PAYOUT_DENOMINATOR as u128 * self.numerator as u128
    }
}

/// The product of two [`SafeFraction`]s; denominator 10^8.
#[near(serializers = [borsh, json])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultipliedSafeFraction {
    pub numerator: u32,
}

impl std::ops::Mul for SafeFraction {
    type Output = MultipliedSafeFraction;

    fn mul(self, rhs: Self) -> Self::Output {
        MultipliedSafeFraction {
            numerator: self.numerator * rhs.numerator,
        }
    }
}

impl From<SafeFraction> for MultipliedSafeFraction {
    fn from(f: SafeFraction) -> Self {
        MultipliedSafeFraction {
            numerator: f.numerator * PAYOUT_DENOMINATOR,
        }
    }
}

impl std::ops::Add for MultipliedSafeFraction {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        MultipliedSafeFraction {
            numerator: self.numerator + rhs.numerator,
        }
    }
}

impl MultipliedSafeFraction {
    /// Fractionalize a balance; truncating, as for [`SafeFraction`].
    pub fn multiply_balance(&self, value: u128) -> u128 {
        value / MULTIPLIED_DENOMINATOR * self.numerator as u128
    }
}

// ── Royalties and splits ─────────────────────────────────────────────────────

/// Permanent partial ownership of a token's sale revenues. Recipient
/// numerators must add to 10,000. Once set, the royalty never changes for
/// the life of the token.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct Royalty {
    /// Relative shares of the overall royalty percentage.
    pub split_between: HashMap<AccountId, SafeFraction>,
    /// The overall percentage taken off the top of every sale.
    pub percentage: SafeFraction,
}

/// Unparsed pre-image of a [`Royalty`], as accepted at mint time.
#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct RoyaltyArgs {
    pub split_between: HashMap<AccountId, u32>,
    pub percentage: u32,
}

impl Royalty {
    pub fn new(args: RoyaltyArgs) -> Result<Self, PayoutError> {
        if args.split_between.is_empty() {
            return Err(PayoutError::EmptyRecipients);
        }
        if args.percentage == 0 || args.percentage > PAYOUT_DENOMINATOR {
            return Err(PayoutError::InvalidPercentage(args.percentage));
        }

        let mut sum: u32 = 0;
        let mut split_between = HashMap::with_capacity(args.split_between.len());
        for (account, numerator) in args.split_between {
            if numerator == 0 {
                return Err(PayoutError::InvalidFraction(numerator));
            }
            let fraction = SafeFraction::new(numerator)?;
            sum += fraction.numerator;
            split_between.insert(account, fraction);
        }
        if sum != PAYOUT_DENOMINATOR {
            return Err(PayoutError::BadNumeratorSum(sum));
        }

        Ok(Self {
            split_between,
            percentage: SafeFraction::new(args.percentage)?,
        })
    }
}

/// Division of the owner's share of the *next* sale. Cleared by the registry
/// as soon as one sale consumes it; the new owner may set a fresh one.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOwners {
    pub split_between: HashMap<AccountId, SafeFraction>,
}

impl SplitOwners {
    pub fn new(split_between: HashMap<AccountId, u32>) -> Result<Self, PayoutError> {
        if split_between.is_empty() {
            return Err(PayoutError::EmptyRecipients);
        }
        let mut sum: u32 = 0;
        let mut parsed = HashMap::with_capacity(split_between.len());
        for (account, numerator) in split_between {
            if numerator == 0 {
                return Err(PayoutError::InvalidFraction(numerator));
            }
            let fraction = SafeFraction::new(numerator)?;
            sum += fraction.numerator;
            parsed.insert(account, fraction);
        }
        if sum != PAYOUT_DENOMINATOR {
            return Err(PayoutError::BadNumeratorSum(sum));
        }
        Ok(Self { split_between: parsed })
    }
}

// ── Payout computation ───────────────────────────────────────────────────────

/// Whom to pay. Generated from [`OwnershipFractions`].
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct Payout {
    pub payout: HashMap<AccountId, U128>,
}

impl Payout {
    /// Sum of all payout amounts. Saturates instead of panicking so a
    /// hostile registry response cannot abort a settlement callback.
    pub fn total(&self) -> u128 {
        self.payout
            .values()
            .fold(0u128, |acc, v| acc.saturating_add(v.0))
    }
}

/// The relative share of a sale each account receives, combined from a
/// token's royalty, its split owners, and its owner.
#[derive(Clone, Debug)]
pub struct OwnershipFractions {
    pub fractions: HashMap<AccountId, MultipliedSafeFraction>,
}

impl OwnershipFractions {
    /// Build the fraction map for one sale.
    ///
    /// Royalty holders receive `royalty.percentage` off the top, divided by
    /// their relative shares. The remainder goes to the split owners when
    /// set, otherwise to `owner_id`. An account present in both mappings
    /// receives the sum of both shares under a single entry.
    ///
    /// Fails closed when royalty plus split recipients exceed
    /// `max_len_payout`; a capped recipient list is never silently
    /// truncated.
    pub fn new(
        owner_id: &AccountId,
        royalty: &Option<Royalty>,
        split_owners: &Option<SplitOwners>,
        max_len_payout: u32,
    ) -> Result<Self, PayoutError> {
        let royalty_len = royalty.as_ref().map(|r| r.split_between.len()).unwrap_or(0);
        let split_len = split_owners
            .as_ref()
            .map(|s| s.split_between.len())
            .unwrap_or(1);
        let count = royalty_len + split_len;
        if count > max_len_payout as usize {
            return Err(PayoutError::TooManyRecipients {
                count,
                max: max_len_payout,
            });
        }

        let mut fractions: HashMap<AccountId, MultipliedSafeFraction> = HashMap::new();
        let remainder = match royalty {
            Some(royalty) => {
                for (receiver, &share) in &royalty.split_between {
                    fractions.insert(receiver.clone(), royalty.percentage * share);
                }
                let kept = PAYOUT_DENOMINATOR
                    .checked_sub(royalty.percentage.numerator)
                    .ok_or(PayoutError::Underflow)?;
                SafeFraction::new(kept)?
            }
            None => SafeFraction::new(PAYOUT_DENOMINATOR)?,
        };

        match split_owners {
            Some(split_owners) => {
                for (receiver, &share) in &split_owners.split_between {
                    let abs = remainder * share;
                    match fractions.get(receiver) {
                        Some(&existing) => fractions.insert(receiver.clone(), abs + existing),
                        None => fractions.insert(receiver.clone(), abs),
                    };
                }
            }
            None => {
                let abs = MultipliedSafeFraction::from(remainder);
                match fractions.get(owner_id) {
                    Some(&existing) => fractions.insert(owner_id.clone(), abs + existing),
                    None => fractions.insert(owner_id.clone(), abs),
                };
            }
        }

        Ok(Self { fractions })
    }

    pub fn into_payout(self, balance: u128) -> Payout {
        Payout {
            payout: self
                .fractions
                .into_iter()
                .map(|(account, fraction)| (account, U128(fraction.multiply_balance(balance))))
                .collect(),
        }
    }
}
