//! Escrow/transfer gateway
//!
//! Every external asset or money movement goes through this module. A
//! collaborator rejection is mapped to a typed error and returned upward;
//! a failed invocation is discarded by the host wholesale, so no local
//! mutation can outlive a failed transfer.

use soroban_sdk::{contractclient, token, Address, Env};

use crate::MarketError;

/// Client interface of the collection (NFT ledger) collaborator.
#[contractclient(name = "CollectionClient")]
pub trait CollectionInterface {
    /// Current owner of a token
    fn owner_of(env: Env, token_id: u32) -> Address;

    /// Collection owner; receives the royalty share of each sale
    fn owner(env: Env) -> Address;

    /// Current royalty percentage in basis points (0-10000)
    fn royalty_bps(env: Env) -> u32;

    /// Transfer authorized by the current owner
    fn transfer(env: Env, from: Address, to: Address, token_id: u32);

    /// Transfer authorized by an approved operator
    fn transfer_from(env: Env, operator: Address, from: Address, to: Address, token_id: u32);
}

/// Read the current owner of an NFT.
pub fn nft_owner(e: &Env, collection: &Address, token_id: u32) -> Result<Address, MarketError> {
    match CollectionClient::new(e, collection).try_owner_of(&token_id) {
        Ok(Ok(owner)) => Ok(owner),
        _ => Err(MarketError::CollectionNotFound),
    }
}

/// Read the collection owner, the royalty recipient at settlement time.
pub fn collection_owner(e: &Env, collection: &Address) -> Result<Address, MarketError> {
    match CollectionClient::new(e, collection).try_owner() {
        Ok(Ok(owner)) => Ok(owner),
        _ => Err(MarketError::CollectionNotFound),
    }
}

/// Read the collection royalty percentage, frozen into records at creation.
pub fn collection_royalty(e: &Env, collection: &Address) -> Result<u32, MarketError> {
    match CollectionClient::new(e, collection).try_royalty_bps() {
        Ok(Ok(bps)) => Ok(bps),
        _ => Err(MarketError::CollectionNotFound),
    }
}

/// Pull an NFT from its owner into marketplace custody.
///
/// The marketplace acts as the approved operator; the seller must have
/// granted approval beforehand.
pub fn pull_nft(
    e: &Env,
    collection: &Address,
    from: &Address,
    token_id: u32,
) -> Result<(), MarketError> {
    let contract = e.current_contract_address();
    match CollectionClient::new(e, collection).try_transfer_from(
        &contract, from, &contract, &token_id,
    ) {
        Ok(_) => Ok(()),
        Err(_) => Err(MarketError::ExternalTransferFailed),
    }
}

/// Release a custodied NFT to `to` (buyer, winner, or creator on cancel).
pub fn push_nft(
    e: &Env,
    collection: &Address,
    to: &Address,
    token_id: u32,
) -> Result<(), MarketError> {
    let contract = e.current_contract_address();
    match CollectionClient::new(e, collection).try_transfer(&contract, to, &token_id) {
        Ok(_) => Ok(()),
        Err(_) => Err(MarketError::ExternalTransferFailed),
    }
}

/// Move `amount` of a payment token from `from` to `to`.
///
/// Zero-amount legs (e.g. a 0% royalty) are skipped. Under-balance or
/// under-allowance surfaces as the token contract's rejection.
pub fn charge(
    e: &Env,
    payment_token: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), MarketError> {
    if amount == 0 {
        return Ok(());
    }
    match token::Client::new(e, payment_token).try_transfer(from, to, &amount) {
        Ok(_) => Ok(()),
        Err(_) => Err(MarketError::ExternalTransferFailed),
    }
}

/// Pay `amount` out of the marketplace's own escrow balance.
pub fn payout(
    e: &Env,
    payment_token: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), MarketError> {
    let contract = e.current_contract_address();
    charge(e, payment_token, &contract, to, amount)
}
