//! Fee and royalty split calculator
//!
//! Pure, checked integer arithmetic. The platform fee is a fixed surcharge
//! added on top of the sale price; the royalty is carved out of the price
//! itself, so `seller + royalty + platform == total_charged` always holds.

use crate::MarketError;

/// Platform fee surcharge in basis points (1%: price 1000 -> total 1010)
pub const PLATFORM_FEE_BPS: i128 = 100;

/// Basis-point denominator shared by the platform fee and royalties
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Payment split for a single sale
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SaleSplit {
    /// Price minus the royalty carve-out, paid to the record creator
    pub seller_amount: i128,
    /// Royalty carve-out, paid to the collection owner
    pub royalty_amount: i128,
    /// Fee surcharge, paid to the platform fee recipient
    pub platform_amount: i128,
    /// Full amount the buyer or bidder is charged
    pub total_charged: i128,
}

/// Split a sale price into seller, royalty, and platform amounts.
///
/// `royalty_bps` is trusted to be pre-validated (0-10000) at collection
/// setup; values above the denominator are rejected there, not here.
///
/// # Errors
/// * `ArithmeticOverflow` - If any intermediate computation overflows i128
pub fn compute_split(price: i128, royalty_bps: u32) -> Result<SaleSplit, MarketError> {
    let platform_amount = price
        .checked_mul(PLATFORM_FEE_BPS)
        .ok_or(MarketError::ArithmeticOverflow)?
        / BPS_DENOMINATOR;

    let total_charged = price
        .checked_add(platform_amount)
        .ok_or(MarketError::ArithmeticOverflow)?;

    let royalty_amount = price
        .checked_mul(royalty_bps as i128)
        .ok_or(MarketError::ArithmeticOverflow)?
        / BPS_DENOMINATOR;

    let seller_amount = price
        .checked_sub(royalty_amount)
        .ok_or(MarketError::ArithmeticOverflow)?;

    Ok(SaleSplit {
        seller_amount,
        royalty_amount,
        platform_amount,
        total_charged,
    })
}

/// The full amount charged for a price: `price + platform fee`.
///
/// Used for bid escrow and batch totals where the royalty breakdown is not
/// needed yet.
pub fn total_charged(price: i128) -> Result<i128, MarketError> {
    let fee = price
        .checked_mul(PLATFORM_FEE_BPS)
        .ok_or(MarketError::ArithmeticOverflow)?
        / BPS_DENOMINATOR;

    price.checked_add(fee).ok_or(MarketError::ArithmeticOverflow)
}
