//! Currency abstraction for listing and auction payments
//!
//! A record pays either in the native ledger asset or in a designated token
//! contract. Both move through `token::Client`; `Native` resolves to the
//! native-asset contract address captured at marketplace initialization.

use soroban_sdk::{contracttype, Address, Env};

use crate::{storage, MarketError};

/// The unit of payment attached to a listing or auction.
///
/// Immutable once attached to a record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Currency {
    /// The native ledger asset
    Native,
    /// A specific token contract
    Custom(Address),
}

impl Currency {
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native)
    }

    /// Resolve the token contract that moves this currency.
    ///
    /// # Errors
    /// * `NotInitialized` - If `Native` is used before the marketplace has
    ///   been initialized with a native-asset address
    pub fn token_address(&self, e: &Env) -> Result<Address, MarketError> {
        match self {
            Currency::Native => {
                storage::get_native_token(e).ok_or(MarketError::NotInitialized)
            }
            Currency::Custom(address) => Ok(address.clone()),
        }
    }
}
