//! Integration Test Harness
//!
//! This module provides a reusable test harness that:
//! - Boots a Soroban Env with a deterministic ledger clock
//! - Deploys the marketplace, a royalty-bearing collection, and two
//!   payment tokens (one standing in for the native asset)
//! - Creates test accounts (admin/seller/buyer/bidders/attacker)
//! - Seeds token balances
//! - Provides typed contract clients and time advancement helpers

use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String,
};

use collection_nft::{CollectionNft, CollectionNftClient};
use marketplace::{Currency, Marketplace, MarketplaceClient};

/// Reference sale price used across flows
pub const PRICE: i128 = 1000;

/// Reference price plus the 1% platform fee surcharge
pub const PRICE_WITH_FEE: i128 = 1010;

/// Minimum increment between successive bids
pub const MIN_BID_STEP: i128 = 1;

/// Collection royalty used by the harness (5%)
pub const ROYALTY_BPS: u32 = 500;

/// Balance every test account starts with, in both payment tokens
pub const INITIAL_BALANCE: i128 = 1_000_000;

/// Test accounts container
pub struct TestAccounts {
    pub admin: Address,
    pub fee_recipient: Address,
    pub collection_owner: Address,
    pub seller: Address,
    pub buyer: Address,
    pub bidder1: Address,
    pub bidder2: Address,
    pub attacker: Address,
}

impl TestAccounts {
    pub fn new(e: &Env) -> Self {
        Self {
            admin: Address::generate(e),
            fee_recipient: Address::generate(e),
            collection_owner: Address::generate(e),
            seller: Address::generate(e),
            buyer: Address::generate(e),
            bidder1: Address::generate(e),
            bidder2: Address::generate(e),
            attacker: Address::generate(e),
        }
    }
}

/// Main test harness structure
pub struct TestHarness {
    pub env: Env,
    pub accounts: TestAccounts,
    pub market: MarketplaceClient<'static>,
    pub market_address: Address,
    pub collection: CollectionNftClient<'static>,
    pub collection_address: Address,
    pub native: Address,
    pub token: Address,
}

impl TestHarness {
    /// Create a new test harness with all contracts deployed and initialized
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        env.ledger().set(LedgerInfo {
            timestamp: 1704067200, // Jan 1, 2024 00:00:00 UTC
            protocol_version: 21,
            sequence_number: 1,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 1000,
            min_persistent_entry_ttl: 1000,
            max_entry_ttl: 10000,
        });

        let accounts = TestAccounts::new(&env);

        let native_issuer = Address::generate(&env);
        let native = env.register_stellar_asset_contract(native_issuer);
        let token_issuer = Address::generate(&env);
        let token = env.register_stellar_asset_contract(token_issuer);

        let market_address = env.register_contract(None, Marketplace);
        let market = MarketplaceClient::new(&env, &market_address);
        market.initialize(&accounts.admin, &native, &accounts.fee_recipient);

        let collection_address = env.register_contract(None, CollectionNft);
        let collection = CollectionNftClient::new(&env, &collection_address);
        collection.initialize(
            &accounts.collection_owner,
            &String::from_str(&env, "Harness Collection"),
            &String::from_str(&env, "ipfs://harness"),
            &ROYALTY_BPS,
        );

        let harness = TestHarness {
            env,
            accounts,
            market,
            market_address,
            collection,
            collection_address,
            native,
            token,
        };

        for who in [
            &harness.accounts.seller,
            &harness.accounts.buyer,
            &harness.accounts.bidder1,
            &harness.accounts.bidder2,
            &harness.accounts.attacker,
        ] {
            harness.fund(who, INITIAL_BALANCE);
        }

        harness
    }

    /// Mint `amount` of both payment tokens to `who`
    pub fn fund(&self, who: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.native).mint(who, &amount);
        StellarAssetClient::new(&self.env, &self.token).mint(who, &amount);
    }

    /// Balance of `who` in the custom payment token
    pub fn token_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(who)
    }

    /// Balance of `who` in the native asset
    pub fn native_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.native).balance(who)
    }

    /// The custom-token currency used in most flows
    pub fn custom_currency(&self) -> Currency {
        Currency::Custom(self.token.clone())
    }

    /// Mint an NFT to `owner` and approve the marketplace as operator
    pub fn mint_nft(&self, owner: &Address) -> u32 {
        let token_id = self.collection.mint(owner);
        self.collection
            .approve(owner, &self.market_address, &token_id, &false);
        token_id
    }

    /// Advance the ledger clock by `delta` seconds
    pub fn advance_time(&self, delta: u64) {
        self.env.ledger().with_mut(|li| li.timestamp += delta);
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    /// List an NFT owned by `seller` at the reference price, custom token
    pub fn list(&self, seller: &Address) -> (u64, u32) {
        let token_id = self.mint_nft(seller);
        let listing_id = self.market.list_nft(
            seller,
            &self.collection_address,
            &token_id,
            &PRICE,
            &self.custom_currency(),
        );
        (listing_id, token_id)
    }

    /// List an NFT for auction opening in 3000s and closing in 8000s
    pub fn list_auction(&self, seller: &Address) -> (u64, u32) {
        let token_id = self.mint_nft(seller);
        let now = self.now();
        let auction_id = self.market.list_nft_for_auction(
            seller,
            &self.collection_address,
            &token_id,
            &PRICE,
            &MIN_BID_STEP,
            &self.custom_currency(),
            &(now + 3000),
            &(now + 8000),
        );
        (auction_id, token_id)
    }
}
