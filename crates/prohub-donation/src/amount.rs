// Amount Helpers
//
// User-entered decimal amounts are converted to smallest token units without
// going through floating point. Fractional digits beyond the token's
// precision are truncated, which is floor for non-negative input.

use crate::constants::BASIS_POINTS_DENOMINATOR;
use crate::errors::DonationError;

/// Fee and net donation derived from one requested amount.
///
/// `fee + net == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub total: u64,
    pub fee: u64,
    pub net: u64,
}

// Parse a positive decimal amount into smallest units.
// Rejects empty, signed, non-numeric, zero and overflowing input.
pub fn parse_token_amount(input: &str, decimals: u8) -> Result<u64, DonationError> {
    let invalid = || DonationError::InvalidAmount(input.to_string());
    let trimmed = input.trim();

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale = 10u64.checked_pow(decimals as u32).ok_or_else(invalid)?;

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(scale))
            .ok_or_else(invalid)?
    };

    // Keep only as many fractional digits as the token carries, right-padded
    let kept: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(decimals as usize)
        .collect();
    let fraction_units = if kept.is_empty() {
        0
    } else {
        kept.parse::<u64>().map_err(|_| invalid())?
    };

    let units = whole_units.checked_add(fraction_units).ok_or_else(invalid)?;
    if units == 0 {
        return Err(invalid());
    }

    Ok(units)
}

// Split a total into platform fee and net donation.
// Returns None when the fee rate exceeds 100%.
pub fn split_fee(total: u64, fee_basis_points: u16) -> Option<FeeSplit> {
    if fee_basis_points as u64 > BASIS_POINTS_DENOMINATOR {
        return None;
    }

    // Product fits in u128; the quotient is <= total so it fits back in u64
    let fee = (total as u128 * fee_basis_points as u128 / BASIS_POINTS_DENOMINATOR as u128) as u64;
    let net = total.checked_sub(fee)?;

    Some(FeeSplit { total, fee, net })
}

pub fn to_ui_amount(units: u64, decimals: u8) -> f64 {
    units as f64 / 10f64.powi(decimals as i32)
}

// Render smallest units as a decimal string without trailing zeros.
pub fn format_ui_amount(units: u64, decimals: u8) -> String {
    if decimals == 0 {
        return units.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let whole = units as u128 / scale;
    let fraction = units as u128 % scale;

    let digits = format!("{:0width$}", fraction, width = decimals as usize);
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, digits)
    }
}
