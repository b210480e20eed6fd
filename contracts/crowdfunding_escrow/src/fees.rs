//! # Fee accounting
//!
//! Fees are expressed in basis points (1 bps = 0.01%) and computed with
//! integer floor division on the full raised amount:
//!
//! | Fee      | Rate       | Applies when              |
//! |----------|------------|---------------------------|
//! | Platform | 200 bps    | every withdrawal          |
//! | Success  | 50 bps     | `raised > goal` only      |
//!
//! The success fee is charged on the whole raised amount, not on the excess.

use crate::types::FeeBreakdown;

pub const PLATFORM_FEE_BPS: u32 = 200;
pub const SUCCESS_FEE_BPS: u32 = 50;
pub const BASIS_POINTS: u32 = 10_000;

/// `amount * bps / 10_000`, floored, for non-negative `amount`.
///
/// Split on the basis-point quotient so the product never exceeds `amount`
/// and any `i128` balance is representable.
pub fn bps_of(amount: i128, bps: u32) -> i128 {
    let bps = bps as i128;
    let base = BASIS_POINTS as i128;
    amount / base * bps + amount % base * bps / base
}

/// Split `raised` into the fee taken by the platform and the creator's payout.
pub fn compute_fees(raised: i128, goal: i128) -> FeeBreakdown {
    let platform_fee = bps_of(raised, PLATFORM_FEE_BPS);
    let success_fee = if raised > goal {
        bps_of(raised, SUCCESS_FEE_BPS)
    } else {
        0
    };
    let total_fee = platform_fee + success_fee;

    FeeBreakdown {
        platform_fee,
        success_fee,
        total_fee,
        creator_amount: raised - total_fee,
    }
}
