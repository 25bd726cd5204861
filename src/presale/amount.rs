//! Conversion between user-entered SOL amounts and lamports.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{Error, Result};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Lamports are 10^-9 SOL, so no amount may carry more fractional digits
const SOL_DECIMALS: u32 = 9;

/// Parse a SOL amount such as `"0.25"` into lamports.
///
/// Parsing is exact; the input must be a plain positive decimal with at most
/// nine fractional digits that fits in a `u64` of lamports.
pub fn sol_to_lamports(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidAmount("amount is empty".to_string()));
    }

    // from_str would round digits past the 28th instead of failing
    let sol = Decimal::from_str_exact(trimmed)
        .map_err(|e| Error::InvalidAmount(format!("'{}' is not a valid amount: {}", trimmed, e)))?
        .normalize();
    if sol.is_sign_negative() || sol.is_zero() {
        return Err(Error::InvalidAmount(format!("{} SOL must be greater than zero", trimmed)));
    }
    if sol.scale() > SOL_DECIMALS {
        return Err(Error::InvalidAmount(format!(
            "{} SOL has more than {} decimal places",
            trimmed, SOL_DECIMALS
        )));
    }

    sol.checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .and_then(|lamports| lamports.to_u64())
        .ok_or_else(|| Error::InvalidAmount(format!("{} SOL is too large", trimmed)))
}

/// Exact SOL value of `lamports`
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from_i128_with_scale(lamports as i128, SOL_DECIMALS).normalize()
}
