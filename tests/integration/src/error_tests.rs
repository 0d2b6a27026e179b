//! Error scenarios and hostile-caller tests.
//!
//! Every path here must fail closed: an attacker who is not the record
//! creator or winning bidder gets a contract error, and a failed call
//! leaves balances and custody exactly as they were.

use soroban_sdk::Vec;

use marketplace::{Currency, ListingStatus};

use crate::harness::{TestHarness, PRICE, PRICE_WITH_FEE};

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_attacker_cannot_cancel_listing() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let (listing_id, _) = h.list(&seller);

    h.market
        .cancel_listing(&h.accounts.attacker, &listing_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_attacker_cannot_start_auction() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);

    h.market.start_auction(&h.accounts.attacker, &auction_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_attacker_cannot_claim_won_auction() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let bidder = h.accounts.bidder1.clone();

    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);
    h.market.start_auction(&seller, &auction_id);
    h.market.bid_nft(&bidder, &auction_id, &PRICE);
    h.advance_time(5000);

    h.market.claim_nft(&h.accounts.attacker, &auction_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn test_attacker_cannot_reclaim_bidless_auction() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);
    h.market.start_auction(&seller, &auction_id);
    h.advance_time(5000);

    h.market.claim_nft(&h.accounts.attacker, &auction_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #18)")]
fn test_token_cannot_be_listed_twice() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    let (_, token_id) = h.list(&seller);
    h.market.list_nft_for_auction(
        &seller,
        &h.collection_address,
        &token_id,
        &PRICE,
        &1,
        &h.custom_currency(),
        &(h.now() + 3000),
        &(h.now() + 8000),
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #17)")]
fn test_native_purchase_underpaid() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    let token_id = h.mint_nft(&seller);
    let listing_id = h.market.list_nft(
        &seller,
        &h.collection_address,
        &token_id,
        &PRICE,
        &Currency::Native,
    );

    h.market
        .buy_nft(&h.accounts.buyer, &listing_id, &(PRICE_WITH_FEE - 1));
}

#[test]
fn test_failed_purchase_leaves_no_trace() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let poor = h.accounts.buyer.clone();

    // Drain the buyer below the charged total.
    let drain = h.token_balance(&poor) - 100;
    let sink = h.accounts.attacker.clone();
    soroban_sdk::token::Client::new(&h.env, &h.token).transfer(&poor, &sink, &drain);

    let (listing_id, token_id) = h.list(&seller);
    let seller_before = h.token_balance(&seller);

    let result = h.market.try_buy_nft(&poor, &listing_id, &0);
    assert!(result.is_err());

    // Nothing moved: listing still open, NFT still in custody.
    assert_eq!(h.token_balance(&seller), seller_before);
    assert_eq!(h.token_balance(&poor), 100);
    assert_eq!(h.collection.owner_of(&token_id), h.market_address);
    let listing = h.market.get_listing_by_index(&listing_id).unwrap();
    assert_eq!(listing.status, ListingStatus::OnSale);
}

#[test]
fn test_failed_batch_commits_nothing() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let buyer = h.accounts.buyer.clone();

    let (first, token_a) = h.list(&seller);
    let (second, token_b) = h.list(&seller);
    let buyer_before = h.token_balance(&buyer);

    // Second id bought out from under the batch by someone else.
    h.market.buy_nft(&h.accounts.bidder1, &second, &0);

    let ids = Vec::from_array(&h.env, [first, second]);
    let result = h.market.try_buy_batch(&buyer, &ids, &0);
    assert!(result.is_err());

    assert_eq!(h.token_balance(&buyer), buyer_before);
    assert_eq!(h.collection.owner_of(&token_a), h.market_address);
    assert_eq!(h.collection.owner_of(&token_b), h.accounts.bidder1);
    let listing = h.market.get_listing_by_index(&first).unwrap();
    assert_eq!(listing.status, ListingStatus::OnSale);
}

#[test]
#[should_panic(expected = "Error(Contract, #15)")]
fn test_stale_bid_rejected() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);
    h.market.start_auction(&seller, &auction_id);

    h.market.bid_nft(&h.accounts.bidder1, &auction_id, &PRICE);
    // Matching the current price is not enough to take the lead.
    h.market.bid_nft(&h.accounts.bidder2, &auction_id, &PRICE);
}

#[test]
#[should_panic(expected = "Error(Contract, #14)")]
fn test_bid_after_close_rejected() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);
    h.market.start_auction(&seller, &auction_id);
    h.advance_time(5000);

    h.market.bid_nft(&h.accounts.bidder1, &auction_id, &PRICE);
}

#[test]
fn test_bid_with_insufficient_funds_rejected_cleanly() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();
    let poor = h.accounts.bidder1.clone();

    let drain = h.token_balance(&poor) - 100;
    soroban_sdk::token::Client::new(&h.env, &h.token).transfer(
        &poor,
        &h.accounts.attacker,
        &drain,
    );

    let (auction_id, _) = h.list_auction(&seller);
    h.advance_time(3000);
    h.market.start_auction(&seller, &auction_id);

    let result = h.market.try_bid_nft(&poor, &auction_id, &PRICE);
    assert!(result.is_err());

    let auction = h.market.get_auction_by_index(&auction_id).unwrap();
    assert_eq!(auction.current_bidder, None);
    assert_eq!(auction.current_price, 0);
    assert_eq!(h.market.get_auction_bids(&auction_id).len(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #20)")]
fn test_listing_without_approval_fails() {
    let h = TestHarness::new();
    let seller = h.accounts.seller.clone();

    // Mint without granting the marketplace operator approval.
    let token_id = h.collection.mint(&seller);
    h.market.list_nft(
        &seller,
        &h.collection_address,
        &token_id,
        &PRICE,
        &h.custom_currency(),
    );
}
