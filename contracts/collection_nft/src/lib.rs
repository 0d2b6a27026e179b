#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String,
};


// ============================================================================
// Error Types
// ============================================================================

/// Collection contract errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum NftError {
    /// Contract has not been initialized
    NotInitialized = 1,
    /// Contract has already been initialized
    AlreadyInitialized = 2,
    /// Token with the given token_id does not exist
    TokenNotFound = 3,
    /// `from` is not the owner of the token
    NotOwner = 4,
    /// Caller is neither the owner nor an approved operator
    NotAuthorized = 5,
    /// Royalty percentage exceeds the basis-point scale (10000)
    RoyaltyTooHigh = 6,
}

// ============================================================================
// Data Types
// ============================================================================

/// Royalty percentages are expressed in basis points out of this denominator.
pub const ROYALTY_DENOMINATOR: u32 = 10_000;

/// Storage keys
#[contracttype]
pub enum DataKey {
    /// Collection owner; also the royalty recipient
    Admin,
    /// Collection display name
    Name,
    /// Collection metadata URI
    Uri,
    /// Royalty in basis points (0-10000)
    RoyaltyBps,
    /// Counter for generating sequential token IDs
    TokenCounter,
    /// Total number of minted tokens
    TotalSupply,
    /// Token owner (token_id -> Address)
    Owner(u32),
    /// Per-token approved operator (token_id -> Address)
    Approved(u32),
    /// Operator approved for every token of an owner ((owner, operator) -> bool)
    OperatorAll(Address, Address),
    /// Number of tokens held (owner -> u32)
    Balance(Address),
}

// ============================================================================
// Storage Module
// ============================================================================

mod storage {
    use super::*;

    pub fn set_admin(e: &Env, admin: &Address) {
        e.storage().instance().set(&DataKey::Admin, admin);
    }

    pub fn get_admin(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::Admin)
    }

    pub fn has_admin(e: &Env) -> bool {
        e.storage().instance().has(&DataKey::Admin)
    }

    pub fn next_token_id(e: &Env) -> u32 {
        let count: u32 = e
            .storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0);
        let next = count + 1;
        e.storage().instance().set(&DataKey::TokenCounter, &next);
        next
    }

    pub fn set_owner(e: &Env, token_id: u32, owner: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), owner);
    }

    pub fn get_owner(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Owner(token_id))
    }

    pub fn set_approved(e: &Env, token_id: u32, operator: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Approved(token_id), operator);
    }

    pub fn get_approved(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Approved(token_id))
    }

    pub fn clear_approved(e: &Env, token_id: u32) {
        e.storage().persistent().remove(&DataKey::Approved(token_id));
    }

    pub fn set_operator_all(e: &Env, owner: &Address, operator: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::OperatorAll(owner.clone(), operator.clone()), &true);
    }

    pub fn is_operator_all(e: &Env, owner: &Address, operator: &Address) -> bool {
        e.storage()
            .persistent()
            .get(&DataKey::OperatorAll(owner.clone(), operator.clone()))
            .unwrap_or(false)
    }

    pub fn add_balance(e: &Env, owner: &Address, delta: i32) {
        let balance: u32 = e
            .storage()
            .persistent()
            .get(&DataKey::Balance(owner.clone()))
            .unwrap_or(0);
        let updated = (balance as i32 + delta) as u32;
        e.storage()
            .persistent()
            .set(&DataKey::Balance(owner.clone()), &updated);
    }

    pub fn get_balance(e: &Env, owner: &Address) -> u32 {
        e.storage()
            .persistent()
            .get(&DataKey::Balance(owner.clone()))
            .unwrap_or(0)
    }

    pub fn increment_total_supply(e: &Env) {
        let supply: u32 = e
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        e.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(supply + 1));
    }

    pub fn get_total_supply(e: &Env) -> u32 {
        e.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    pub fn set_royalty_bps(e: &Env, bps: u32) {
        e.storage().instance().set(&DataKey::RoyaltyBps, &bps);
    }

    pub fn get_royalty_bps(e: &Env) -> u32 {
        e.storage()
            .instance()
            .get(&DataKey::RoyaltyBps)
            .unwrap_or(0)
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct CollectionNft;

#[contractimpl]
impl CollectionNft {
    /// Initialize the collection
    ///
    /// # Arguments
    /// * `admin` - Collection owner; receives royalties on marketplace sales
    /// * `name` - Collection display name
    /// * `uri` - Collection metadata URI
    /// * `royalty_bps` - Royalty in basis points (0-10000)
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If the collection has already been initialized
    /// * `RoyaltyTooHigh` - If `royalty_bps` exceeds 10000
    pub fn initialize(
        e: Env,
        admin: Address,
        name: String,
        uri: String,
        royalty_bps: u32,
    ) -> Result<(), NftError> {
        if storage::has_admin(&e) {
            return Err(NftError::AlreadyInitialized);
        }
        if royalty_bps > ROYALTY_DENOMINATOR {
            return Err(NftError::RoyaltyTooHigh);
        }

        admin.require_auth();

        storage::set_admin(&e, &admin);
        e.storage().instance().set(&DataKey::Name, &name);
        e.storage().instance().set(&DataKey::Uri, &uri);
        storage::set_royalty_bps(&e, royalty_bps);
        e.storage().instance().set(&DataKey::TokenCounter, &0u32);
        e.storage().instance().set(&DataKey::TotalSupply, &0u32);

        Ok(())
    }

    // ========================================================================
    // Collection Metadata
    // ========================================================================

    /// Get the collection owner (royalty recipient)
    pub fn owner(e: Env) -> Result<Address, NftError> {
        storage::get_admin(&e).ok_or(NftError::NotInitialized)
    }

    pub fn name(e: Env) -> Result<String, NftError> {
        e.storage()
            .instance()
            .get(&DataKey::Name)
            .ok_or(NftError::NotInitialized)
    }

    pub fn uri(e: Env) -> Result<String, NftError> {
        e.storage()
            .instance()
            .get(&DataKey::Uri)
            .ok_or(NftError::NotInitialized)
    }

    /// Current royalty percentage in basis points
    pub fn royalty_bps(e: Env) -> u32 {
        storage::get_royalty_bps(&e)
    }

    /// Update the collection royalty (owner only)
    ///
    /// Open listings and auctions keep the percentage captured at their
    /// creation time; this only affects records created afterwards.
    pub fn set_royalty(e: Env, royalty_bps: u32) -> Result<(), NftError> {
        let admin = storage::get_admin(&e).ok_or(NftError::NotInitialized)?;
        admin.require_auth();

        if royalty_bps > ROYALTY_DENOMINATOR {
            return Err(NftError::RoyaltyTooHigh);
        }

        storage::set_royalty_bps(&e, royalty_bps);

        e.events()
            .publish((symbol_short!("RoyaltSet"),), royalty_bps);

        Ok(())
    }

    // ========================================================================
    // Minting
    // ========================================================================

    /// Mint a new token to `to` (owner only)
    ///
    /// # Returns
    /// The sequential token_id of the newly minted token
    pub fn mint(e: Env, to: Address) -> Result<u32, NftError> {
        let admin = storage::get_admin(&e).ok_or(NftError::NotInitialized)?;
        admin.require_auth();

        let token_id = storage::next_token_id(&e);

        storage::set_owner(&e, token_id, &to);
        storage::add_balance(&e, &to, 1);
        storage::increment_total_supply(&e);

        e.events()
            .publish((symbol_short!("Mint"), token_id), to);

        Ok(token_id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get the owner of a token
    pub fn owner_of(e: Env, token_id: u32) -> Result<Address, NftError> {
        storage::get_owner(&e, token_id).ok_or(NftError::TokenNotFound)
    }

    /// Number of tokens held by `owner`
    pub fn balance_of(e: Env, owner: Address) -> u32 {
        storage::get_balance(&e, &owner)
    }

    pub fn total_supply(e: Env) -> u32 {
        storage::get_total_supply(&e)
    }

    /// Operator approved for a single token, if any
    pub fn get_approved(e: Env, token_id: u32) -> Option<Address> {
        storage::get_approved(&e, token_id)
    }

    pub fn is_approved_for_all(e: Env, owner: Address, operator: Address) -> bool {
        storage::is_operator_all(&e, &owner, &operator)
    }

    // ========================================================================
    // Approvals & Transfers
    // ========================================================================

    /// Approve an operator for one token, or for every token of `owner`
    ///
    /// # Arguments
    /// * `owner` - The token holder granting approval
    /// * `operator` - The address allowed to move the token(s)
    /// * `token_id` - The token to approve (ignored when `allow_all`)
    /// * `allow_all` - Grant the operator every token of `owner`
    pub fn approve(
        e: Env,
        owner: Address,
        operator: Address,
        token_id: u32,
        allow_all: bool,
    ) -> Result<(), NftError> {
        owner.require_auth();

        if allow_all {
            storage::set_operator_all(&e, &owner, &operator);
        } else {
            let current = storage::get_owner(&e, token_id).ok_or(NftError::TokenNotFound)?;
            if current != owner {
                return Err(NftError::NotOwner);
            }
            storage::set_approved(&e, token_id, &operator);
        }

        e.events().publish(
            (symbol_short!("Approve"), token_id),
            (owner, operator, allow_all),
        );

        Ok(())
    }

    /// Transfer a token, authorized by the current owner
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotOwner` - If `from` is not the current owner
    pub fn transfer(e: Env, from: Address, to: Address, token_id: u32) -> Result<(), NftError> {
        from.require_auth();

        let owner = storage::get_owner(&e, token_id).ok_or(NftError::TokenNotFound)?;
        if owner != from {
            return Err(NftError::NotOwner);
        }

        Self::move_token(&e, &from, &to, token_id);

        Ok(())
    }

    /// Transfer a token on behalf of its owner, authorized by an operator
    ///
    /// The operator must hold a per-token approval or an operator-wide
    /// approval from `from`. The per-token approval is consumed by the
    /// transfer.
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotOwner` - If `from` is not the current owner
    /// * `NotAuthorized` - If the operator holds no matching approval
    pub fn transfer_from(
        e: Env,
        operator: Address,
        from: Address,
        to: Address,
        token_id: u32,
    ) -> Result<(), NftError> {
        operator.require_auth();

        let owner = storage::get_owner(&e, token_id).ok_or(NftError::TokenNotFound)?;
        if owner != from {
            return Err(NftError::NotOwner);
        }

        let approved = operator == from
            || storage::get_approved(&e, token_id) == Some(operator.clone())
            || storage::is_operator_all(&e, &from, &operator);
        if !approved {
            return Err(NftError::NotAuthorized);
        }

        Self::move_token(&e, &from, &to, token_id);

        Ok(())
    }
}

impl CollectionNft {
    fn move_token(e: &Env, from: &Address, to: &Address, token_id: u32) {
        storage::clear_approved(e, token_id);
        storage::set_owner(e, token_id, to);
        storage::add_balance(e, from, -1);
        storage::add_balance(e, to, 1);

        e.events().publish(
            (symbol_short!("Transfer"), token_id),
            (from.clone(), to.clone()),
        );
    }
}
