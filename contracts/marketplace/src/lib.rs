#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Vec,
};

pub mod currency;
pub mod escrow;
pub mod fees;

pub use currency::Currency;
pub use escrow::{CollectionClient, CollectionInterface};
pub use fees::{SaleSplit, BPS_DENOMINATOR, PLATFORM_FEE_BPS};


// ============================================================================
// Error Types
// ============================================================================

/// Settlement engine errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketError {
    /// Marketplace not initialized
    NotInitialized = 1,
    /// Already initialized
    AlreadyInitialized = 2,
    /// Listing id unknown
    ListingNotFound = 3,
    /// Auction id unknown
    AuctionNotFound = 4,
    /// Caller lacks the required role for this record
    Unauthorized = 5,
    /// Listing is not on sale
    ListingNotOnSale = 6,
    /// Auction is not waiting to start
    AuctionNotWaiting = 7,
    /// Auction is not in progress
    AuctionNotInProgress = 8,
    /// Price must be strictly positive
    InvalidPrice = 9,
    /// Minimum bid step must be strictly positive
    InvalidBidStep = 10,
    /// Auction window is empty or starts in the past
    InvalidTimeRange = 11,
    /// Auction start time has not elapsed yet
    AuctionNotStartedYet = 12,
    /// Auction end time has not elapsed yet
    AuctionNotEnded = 13,
    /// Auction end time has already passed
    AuctionAlreadyEnded = 14,
    /// Bid below the start price or the current price plus the bid step
    BidTooLow = 15,
    /// Creator may not buy or bid on their own record
    CannotTradeOwnItem = 16,
    /// Attached native payment below the charged total
    InsufficientPayment = 17,
    /// Token already has an active listing or auction
    TokenAlreadyListed = 18,
    /// Checked arithmetic overflowed
    ArithmeticOverflow = 19,
    /// Asset or money transfer rejected by the collaborator contract
    ExternalTransferFailed = 20,
    /// Collection contract rejected a metadata read
    CollectionNotFound = 21,
}

// ============================================================================
// Data Types
// ============================================================================

/// A fixed-price sale offer for one NFT
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    /// Sequential index; equals the listing count at creation, never reused
    pub id: u64,
    pub creator: Address,
    pub collection: Address,
    pub token_id: u32,
    pub price: i128,
    pub currency: Currency,
    pub status: ListingStatus,
    /// Royalty in basis points, frozen at listing time
    pub royalty_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ListingStatus {
    OnSale,
    Sold,
    Cancelled,
}

/// A timed ascending-bid sale offer for one NFT
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Auction {
    pub id: u64,
    pub creator: Address,
    pub collection: Address,
    pub token_id: u32,
    pub start_price: i128,
    pub min_bid_step: i128,
    pub currency: Currency,
    pub start_time: u64,
    pub end_time: u64,
    /// Highest accepted bid; 0 until the first bid lands
    pub current_price: i128,
    pub current_bidder: Option<Address>,
    pub status: AuctionStatus,
    /// Royalty in basis points, frozen at auction creation
    pub royalty_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuctionStatus {
    WaitingAuction,
    InAuction,
    Ended,
    Cancelled,
}

/// One accepted bid in an auction's append-only bid ledger
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BidRecord {
    pub bidder: Address,
    pub amount: i128,
    pub placed_at: u64,
}

/// Storage keys
#[contracttype]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Native-asset contract used for `Currency::Native` payments
    NativeToken,
    /// Recipient of the platform fee surcharge
    FeeRecipient,
    /// Total number of listings ever created
    ListingCount,
    /// Total number of auctions ever created
    AuctionCount,
    /// Listing records (id -> Listing)
    Listing(u64),
    /// Auction records (id -> Auction)
    Auction(u64),
    /// Append-only bid ledger per auction (id -> Vec<BidRecord>)
    Bids(u64),
    /// Double-booking guard for tokens under active sale
    ActiveToken(Address, u32),
}

// ============================================================================
// Storage Module
// ============================================================================

pub(crate) mod storage {
    use super::*;

    pub fn has_admin(e: &Env) -> bool {
        e.storage().instance().has(&DataKey::Admin)
    }

    pub fn set_admin(e: &Env, admin: &Address) {
        e.storage().instance().set(&DataKey::Admin, admin);
    }

    pub fn get_admin(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::Admin)
    }

    pub fn set_native_token(e: &Env, token: &Address) {
        e.storage().instance().set(&DataKey::NativeToken, token);
    }

    pub fn get_native_token(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::NativeToken)
    }

    pub fn set_fee_recipient(e: &Env, recipient: &Address) {
        e.storage().instance().set(&DataKey::FeeRecipient, recipient);
    }

    pub fn get_fee_recipient(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::FeeRecipient)
    }

    pub fn get_listing_count(e: &Env) -> u64 {
        e.storage().instance().get(&DataKey::ListingCount).unwrap_or(0)
    }

    pub fn set_listing_count(e: &Env, count: u64) {
        e.storage().instance().set(&DataKey::ListingCount, &count);
    }

    pub fn get_listing(e: &Env, id: u64) -> Option<Listing> {
        e.storage().persistent().get(&DataKey::Listing(id))
    }

    pub fn set_listing(e: &Env, id: u64, listing: &Listing) {
        e.storage().persistent().set(&DataKey::Listing(id), listing);
    }

    pub fn get_auction_count(e: &Env) -> u64 {
        e.storage().instance().get(&DataKey::AuctionCount).unwrap_or(0)
    }

    pub fn set_auction_count(e: &Env, count: u64) {
        e.storage().instance().set(&DataKey::AuctionCount, &count);
    }

    pub fn get_auction(e: &Env, id: u64) -> Option<Auction> {
        e.storage().persistent().get(&DataKey::Auction(id))
    }

    pub fn set_auction(e: &Env, id: u64, auction: &Auction) {
        e.storage().persistent().set(&DataKey::Auction(id), auction);
    }

    pub fn get_bids(e: &Env, id: u64) -> Vec<BidRecord> {
        e.storage()
            .persistent()
            .get(&DataKey::Bids(id))
            .unwrap_or(Vec::new(e))
    }

    pub fn push_bid(e: &Env, id: u64, bid: &BidRecord) {
        let mut bids = get_bids(e, id);
        bids.push_back(bid.clone());
        e.storage().persistent().set(&DataKey::Bids(id), &bids);
    }

    pub fn is_token_active(e: &Env, collection: &Address, token_id: u32) -> bool {
        e.storage()
            .persistent()
            .get(&DataKey::ActiveToken(collection.clone(), token_id))
            .unwrap_or(false)
    }

    pub fn mark_token_active(e: &Env, collection: &Address, token_id: u32) {
        e.storage()
            .persistent()
            .set(&DataKey::ActiveToken(collection.clone(), token_id), &true);
    }

    pub fn clear_token_active(e: &Env, collection: &Address, token_id: u32) {
        e.storage()
            .persistent()
            .remove(&DataKey::ActiveToken(collection.clone(), token_id));
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct Marketplace;

#[contractimpl]
impl Marketplace {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the settlement engine
    ///
    /// # Arguments
    /// * `admin` - Admin address
    /// * `native_token` - Native-asset contract backing `Currency::Native`
    /// * `fee_recipient` - Recipient of the platform fee surcharge
    pub fn initialize(
        e: Env,
        admin: Address,
        native_token: Address,
        fee_recipient: Address,
    ) -> Result<(), MarketError> {
        if storage::has_admin(&e) {
            return Err(MarketError::AlreadyInitialized);
        }

        admin.require_auth();

        storage::set_admin(&e, &admin);
        storage::set_native_token(&e, &native_token);
        storage::set_fee_recipient(&e, &fee_recipient);
        storage::set_listing_count(&e, 0);
        storage::set_auction_count(&e, 0);

        Ok(())
    }

    pub fn get_admin(e: Env) -> Result<Address, MarketError> {
        storage::get_admin(&e).ok_or(MarketError::NotInitialized)
    }

    pub fn get_fee_recipient(e: Env) -> Result<Address, MarketError> {
        storage::get_fee_recipient(&e).ok_or(MarketError::NotInitialized)
    }

    /// Update the platform fee recipient (admin only)
    pub fn set_fee_recipient(e: Env, recipient: Address) -> Result<(), MarketError> {
        let admin = storage::get_admin(&e).ok_or(MarketError::NotInitialized)?;
        admin.require_auth();

        storage::set_fee_recipient(&e, &recipient);

        e.events()
            .publish((symbol_short!("FeeRecpt"),), recipient);

        Ok(())
    }

    /// Engine-visible clock: the ledger timestamp gating every auction
    /// transition. Advanceable in tests, sourced from the host in production.
    pub fn timestamp(e: Env) -> u64 {
        e.ledger().timestamp()
    }

    // ========================================================================
    // Listing Store
    // ========================================================================

    /// List an NFT for sale at a fixed price
    ///
    /// Pulls the NFT into marketplace custody; the creator must have
    /// approved the marketplace on the collection contract beforehand.
    /// The collection's current royalty percentage is frozen into the
    /// listing.
    ///
    /// # Returns
    /// The new listing id, equal to the pre-call listing count
    pub fn list_nft(
        e: Env,
        creator: Address,
        collection: Address,
        token_id: u32,
        price: i128,
        currency: Currency,
    ) -> Result<u64, MarketError> {
        creator.require_auth();

        if price <= 0 {
            return Err(MarketError::InvalidPrice);
        }

        Self::reserve_token(&e, &creator, &collection, token_id)?;
        let royalty_bps = escrow::collection_royalty(&e, &collection)?;
        escrow::pull_nft(&e, &collection, &creator, token_id)?;

        let listing_id = storage::get_listing_count(&e);
        let listing = Listing {
            id: listing_id,
            creator: creator.clone(),
            collection: collection.clone(),
            token_id,
            price,
            currency,
            status: ListingStatus::OnSale,
            royalty_bps,
        };

        storage::set_listing(&e, listing_id, &listing);
        storage::set_listing_count(
            &e,
            listing_id
                .checked_add(1)
                .ok_or(MarketError::ArithmeticOverflow)?,
        );

        e.events().publish(
            (symbol_short!("ListNFT"), listing_id),
            (creator, collection, token_id, price),
        );

        Ok(listing_id)
    }

    /// Cancel a listing and return the NFT to its creator
    pub fn cancel_listing(e: Env, creator: Address, listing_id: u64) -> Result<(), MarketError> {
        creator.require_auth();

        let mut listing =
            storage::get_listing(&e, listing_id).ok_or(MarketError::ListingNotFound)?;

        if listing.creator != creator {
            return Err(MarketError::Unauthorized);
        }
        if listing.status != ListingStatus::OnSale {
            return Err(MarketError::ListingNotOnSale);
        }

        escrow::push_nft(&e, &listing.collection, &creator, listing.token_id)?;

        listing.status = ListingStatus::Cancelled;
        storage::set_listing(&e, listing_id, &listing);
        storage::clear_token_active(&e, &listing.collection, listing.token_id);

        e.events()
            .publish((symbol_short!("ListCncl"), listing_id), creator);

        Ok(())
    }

    /// Buy a listed NFT
    ///
    /// # Arguments
    /// * `payment` - Amount the buyer attaches; for `Native` currency it
    ///   must cover price plus platform fee, for custom tokens the token
    ///   allowance governs and `payment` is ignored
    pub fn buy_nft(
        e: Env,
        buyer: Address,
        listing_id: u64,
        payment: i128,
    ) -> Result<(), MarketError> {
        buyer.require_auth();

        let listing = storage::get_listing(&e, listing_id).ok_or(MarketError::ListingNotFound)?;

        let split = Self::check_purchase(&buyer, &listing)?;

        if listing.currency.is_native() && payment < split.total_charged {
            return Err(MarketError::InsufficientPayment);
        }

        Self::settle_purchase(&e, &buyer, &listing, &split)?;

        e.events().publish(
            (symbol_short!("BuyNFT"), listing_id),
            (buyer, split.total_charged),
        );

        Ok(())
    }

    /// Buy several listings in one atomic operation
    ///
    /// Every id is validated before any value moves; one invalid id fails
    /// the whole batch with zero committed effects. For `Native` currency
    /// the attached `payment` must cover the sum of charged totals.
    pub fn buy_batch(
        e: Env,
        buyer: Address,
        listing_ids: Vec<u64>,
        payment: i128,
    ) -> Result<(), MarketError> {
        buyer.require_auth();

        // Validate every id and accumulate the native total before touching
        // any asset or balance.
        let mut native_total: i128 = 0;
        for listing_id in listing_ids.iter() {
            let listing =
                storage::get_listing(&e, listing_id).ok_or(MarketError::ListingNotFound)?;
            let split = Self::check_purchase(&buyer, &listing)?;

            if listing.currency.is_native() {
                native_total = native_total
                    .checked_add(split.total_charged)
                    .ok_or(MarketError::ArithmeticOverflow)?;
            }
        }

        if payment < native_total {
            return Err(MarketError::InsufficientPayment);
        }

        for listing_id in listing_ids.iter() {
            let listing =
                storage::get_listing(&e, listing_id).ok_or(MarketError::ListingNotFound)?;
            // Re-derive the split; a duplicate id in the batch shows up here
            // as an already-sold listing and aborts the invocation.
            let split = Self::check_purchase(&buyer, &listing)?;
            Self::settle_purchase(&e, &buyer, &listing, &split)?;
        }

        e.events()
            .publish((symbol_short!("BuyBatch"),), (buyer, listing_ids));

        Ok(())
    }

    /// Total number of listings ever created
    pub fn get_listing_count(e: Env) -> u64 {
        storage::get_listing_count(&e)
    }

    /// Listing by sequential index; `None` past the end, never a default
    pub fn get_listing_by_index(e: Env, index: u64) -> Option<Listing> {
        storage::get_listing(&e, index)
    }

    // ========================================================================
    // Auction Store
    // ========================================================================

    /// List an NFT for a timed ascending-bid auction
    ///
    /// The NFT is custodied immediately; bidding only opens once the
    /// creator starts the auction after `start_time`.
    pub fn list_nft_for_auction(
        e: Env,
        creator: Address,
        collection: Address,
        token_id: u32,
        start_price: i128,
        min_bid_step: i128,
        currency: Currency,
        start_time: u64,
        end_time: u64,
    ) -> Result<u64, MarketError> {
        creator.require_auth();

        if start_price <= 0 {
            return Err(MarketError::InvalidPrice);
        }
        if min_bid_step <= 0 {
            return Err(MarketError::InvalidBidStep);
        }
        if end_time <= start_time || start_time < e.ledger().timestamp() {
            return Err(MarketError::InvalidTimeRange);
        }

        Self::reserve_token(&e, &creator, &collection, token_id)?;
        let royalty_bps = escrow::collection_royalty(&e, &collection)?;
        escrow::pull_nft(&e, &collection, &creator, token_id)?;

        let auction_id = storage::get_auction_count(&e);
        let auction = Auction {
            id: auction_id,
            creator: creator.clone(),
            collection: collection.clone(),
            token_id,
            start_price,
            min_bid_step,
            currency,
            start_time,
            end_time,
            current_price: 0,
            current_bidder: None,
            status: AuctionStatus::WaitingAuction,
            royalty_bps,
        };

        storage::set_auction(&e, auction_id, &auction);
        storage::set_auction_count(
            &e,
            auction_id
                .checked_add(1)
                .ok_or(MarketError::ArithmeticOverflow)?,
        );

        e.events().publish(
            (symbol_short!("AucList"), auction_id),
            (creator, collection, token_id, start_price),
        );

        Ok(auction_id)
    }

    /// Open an auction for bidding (creator only, after `start_time`)
    pub fn start_auction(e: Env, creator: Address, auction_id: u64) -> Result<(), MarketError> {
        creator.require_auth();

        let mut auction =
            storage::get_auction(&e, auction_id).ok_or(MarketError::AuctionNotFound)?;

        if auction.creator != creator {
            return Err(MarketError::Unauthorized);
        }
        if auction.status != AuctionStatus::WaitingAuction {
            return Err(MarketError::AuctionNotWaiting);
        }
        if e.ledger().timestamp() < auction.start_time {
            return Err(MarketError::AuctionNotStartedYet);
        }

        auction.status = AuctionStatus::InAuction;
        storage::set_auction(&e, auction_id, &auction);

        e.events()
            .publish((symbol_short!("AucStart"), auction_id), creator);

        Ok(())
    }

    /// Cancel an auction that has not started and return the NFT
    pub fn cancel_auction(e: Env, creator: Address, auction_id: u64) -> Result<(), MarketError> {
        creator.require_auth();

        let mut auction =
            storage::get_auction(&e, auction_id).ok_or(MarketError::AuctionNotFound)?;

        if auction.creator != creator {
            return Err(MarketError::Unauthorized);
        }
        if auction.status != AuctionStatus::WaitingAuction {
            return Err(MarketError::AuctionNotWaiting);
        }

        escrow::push_nft(&e, &auction.collection, &creator, auction.token_id)?;

        auction.status = AuctionStatus::Cancelled;
        storage::set_auction(&e, auction_id, &auction);
        storage::clear_token_active(&e, &auction.collection, auction.token_id);

        e.events()
            .publish((symbol_short!("AucCncl"), auction_id), creator);

        Ok(())
    }

    /// Place a bid on a running auction
    ///
    /// The bid plus platform fee is escrowed by the marketplace; the
    /// previous bidder's full escrow is refunded in the same operation, so
    /// no bidder's funds are ever stuck mid-auction.
    pub fn bid_nft(
        e: Env,
        bidder: Address,
        auction_id: u64,
        amount: i128,
    ) -> Result<(), MarketError> {
        bidder.require_auth();

        let mut auction =
            storage::get_auction(&e, auction_id).ok_or(MarketError::AuctionNotFound)?;

        if auction.status != AuctionStatus::InAuction {
            return Err(MarketError::AuctionNotInProgress);
        }
        let now = e.ledger().timestamp();
        if now >= auction.end_time {
            return Err(MarketError::AuctionAlreadyEnded);
        }
        if bidder == auction.creator {
            return Err(MarketError::CannotTradeOwnItem);
        }

        if amount < auction.start_price {
            return Err(MarketError::BidTooLow);
        }
        if auction.current_bidder.is_some() {
            let min_bid = auction
                .current_price
                .checked_add(auction.min_bid_step)
                .ok_or(MarketError::ArithmeticOverflow)?;
            if amount < min_bid {
                return Err(MarketError::BidTooLow);
            }
        }

        let payment_token = auction.currency.token_address(&e)?;
        let escrowed = fees::total_charged(amount)?;
        escrow::charge(
            &e,
            &payment_token,
            &bidder,
            &e.current_contract_address(),
            escrowed,
        )?;

        if let Some(previous) = auction.current_bidder.clone() {
            let refund = fees::total_charged(auction.current_price)?;
            escrow::payout(&e, &payment_token, &previous, refund)?;
        }

        auction.current_price = amount;
        auction.current_bidder = Some(bidder.clone());
        storage::set_auction(&e, auction_id, &auction);
        storage::push_bid(
            &e,
            auction_id,
            &BidRecord {
                bidder: bidder.clone(),
                amount,
                placed_at: now,
            },
        );

        e.events()
            .publish((symbol_short!("BidPlace"), auction_id), (bidder, amount));

        Ok(())
    }

    /// Settle an ended auction
    ///
    /// With bids: only the winning bidder may claim; the escrowed winning
    /// bid is split between creator, collection owner, and fee recipient,
    /// and the NFT goes to the winner. With zero bids: only the creator may
    /// claim, recovering the NFT.
    pub fn claim_nft(e: Env, caller: Address, auction_id: u64) -> Result<(), MarketError> {
        caller.require_auth();

        let mut auction =
            storage::get_auction(&e, auction_id).ok_or(MarketError::AuctionNotFound)?;

        if auction.status != AuctionStatus::InAuction {
            return Err(MarketError::AuctionNotInProgress);
        }
        if e.ledger().timestamp() < auction.end_time {
            return Err(MarketError::AuctionNotEnded);
        }

        match auction.current_bidder.clone() {
            Some(winner) => {
                if caller != winner {
                    return Err(MarketError::Unauthorized);
                }

                let split = fees::compute_split(auction.current_price, auction.royalty_bps)?;
                let payment_token = auction.currency.token_address(&e)?;
                let royalty_recipient = escrow::collection_owner(&e, &auction.collection)?;
                let fee_recipient =
                    storage::get_fee_recipient(&e).ok_or(MarketError::NotInitialized)?;

                escrow::payout(&e, &payment_token, &auction.creator, split.seller_amount)?;
                escrow::payout(&e, &payment_token, &royalty_recipient, split.royalty_amount)?;
                escrow::payout(&e, &payment_token, &fee_recipient, split.platform_amount)?;
                escrow::push_nft(&e, &auction.collection, &winner, auction.token_id)?;

                auction.status = AuctionStatus::Ended;
                storage::set_auction(&e, auction_id, &auction);
                storage::clear_token_active(&e, &auction.collection, auction.token_id);

                e.events().publish(
                    (symbol_short!("AucClaim"), auction_id),
                    (winner, auction.current_price),
                );
            }
            None => {
                // No bids were ever placed: the creator reclaims the NFT.
                if caller != auction.creator {
                    return Err(MarketError::Unauthorized);
                }

                escrow::push_nft(&e, &auction.collection, &auction.creator, auction.token_id)?;

                auction.status = AuctionStatus::Ended;
                storage::set_auction(&e, auction_id, &auction);
                storage::clear_token_active(&e, &auction.collection, auction.token_id);

                e.events()
                    .publish((symbol_short!("AucNoBid"), auction_id), caller);
            }
        }

        Ok(())
    }

    /// Total number of auctions ever created
    pub fn get_auction_count(e: Env) -> u64 {
        storage::get_auction_count(&e)
    }

    /// Auction by sequential index; `None` past the end
    pub fn get_auction_by_index(e: Env, index: u64) -> Option<Auction> {
        storage::get_auction(&e, index)
    }

    /// Append-only bid ledger of an auction, oldest first
    pub fn get_auction_bids(e: Env, auction_id: u64) -> Vec<BidRecord> {
        storage::get_bids(&e, auction_id)
    }
}

impl Marketplace {
    /// Guard a token against double-booking and verify the creator owns it.
    fn reserve_token(
        e: &Env,
        creator: &Address,
        collection: &Address,
        token_id: u32,
    ) -> Result<(), MarketError> {
        if storage::is_token_active(e, collection, token_id) {
            return Err(MarketError::TokenAlreadyListed);
        }
        let owner = escrow::nft_owner(e, collection, token_id)?;
        if owner != *creator {
            return Err(MarketError::Unauthorized);
        }
        storage::mark_token_active(e, collection, token_id);
        Ok(())
    }

    /// Eligibility checks shared by `buy_nft` and `buy_batch`.
    fn check_purchase(buyer: &Address, listing: &Listing) -> Result<SaleSplit, MarketError> {
        if listing.status != ListingStatus::OnSale {
            return Err(MarketError::ListingNotOnSale);
        }
        if *buyer == listing.creator {
            return Err(MarketError::CannotTradeOwnItem);
        }
        fees::compute_split(listing.price, listing.royalty_bps)
    }

    /// Move money and asset for one purchase and mark the listing sold.
    fn settle_purchase(
        e: &Env,
        buyer: &Address,
        listing: &Listing,
        split: &SaleSplit,
    ) -> Result<(), MarketError> {
        let payment_token = listing.currency.token_address(e)?;
        let royalty_recipient = escrow::collection_owner(e, &listing.collection)?;
        let fee_recipient = storage::get_fee_recipient(e).ok_or(MarketError::NotInitialized)?;

        escrow::charge(e, &payment_token, buyer, &listing.creator, split.seller_amount)?;
        escrow::charge(e, &payment_token, buyer, &royalty_recipient, split.royalty_amount)?;
        escrow::charge(e, &payment_token, buyer, &fee_recipient, split.platform_amount)?;
        escrow::push_nft(e, &listing.collection, buyer, listing.token_id)?;

        let mut sold = listing.clone();
        sold.status = ListingStatus::Sold;
        storage::set_listing(e, listing.id, &sold);
        storage::clear_token_active(e, &listing.collection, listing.token_id);

        Ok(())
    }
}
