//! Safe arithmetic helpers - no unwrap, no panics, no as casts

/// Basis-point denominator (10_000 = 100%)
pub const BPS_DENOM: u128 = 10_000;

/// Full scale in basis points
pub const BPS_FULL: u16 = 10_000;

/// Fixed-point scale for price-per-share values (1e6)
pub const UNIT: u128 = 1_000_000;

/// Add u128 with saturation at MAX
pub fn add_u128(a: u128, b: u128) -> u128 {
    a.saturating_add(b)
}

/// Subtract u128 with saturation at 0
pub fn sub_u128(a: u128, b: u128) -> u128 {
    a.saturating_sub(b)
}

/// Multiply u128 with saturation
pub fn mul_u128(a: u128, b: u128) -> u128 {
    a.saturating_mul(b)
}

/// Divide u128 (returns 0 if divisor is 0)
pub fn div_u128(a: u128, b: u128) -> u128 {
    if b == 0 {
        0
    } else {
        a / b
    }
}

/// Minimum of two u128
pub fn min_u128(a: u128, b: u128) -> u128 {
    if a < b { a } else { b }
}

/// Maximum of two u128
pub fn max_u128(a: u128, b: u128) -> u128 {
    if a > b { a } else { b }
}

/// floor(a * b / denom); None on overflow or zero denominator
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    a.checked_mul(b).map(|p| p / denom)
}

/// ceil(a * b / denom); None on overflow or zero denominator
pub fn mul_div_ceil(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let p = a.checked_mul(b)?;
    let q = p / denom;
    if p % denom == 0 {
        Some(q)
    } else {
        Some(q + 1)
    }
}

/// floor(amount * bps / 10_000)
pub fn bps_floor(amount: u128, bps: u16) -> Option<u128> {
    mul_div_floor(amount, bps as u128, BPS_DENOM)
}

/// ceil(amount * bps / 10_000) - the protocol-favorable direction for fees
pub fn bps_ceil(amount: u128, bps: u16) -> Option<u128> {
    mul_div_ceil(amount, bps as u128, BPS_DENOM)
}

/// Minimum acceptable output after a slippage tolerance:
/// floor(amount * (10_000 - slippage_bps) / 10_000)
pub fn min_out(amount: u128, slippage_bps: u16) -> Option<u128> {
    let keep = BPS_FULL.saturating_sub(slippage_bps);
    mul_div_floor(amount, keep as u128, BPS_DENOM)
}

/// Saturating variants for the model transitions (total functions)
pub fn mul_div_floor_sat(a: u128, b: u128, denom: u128) -> u128 {
    match mul_div_floor(a, b, denom) {
        Some(v) => v,
        None => 0,
    }
}

pub fn mul_div_ceil_sat(a: u128, b: u128, denom: u128) -> u128 {
    match mul_div_ceil(a, b, denom) {
        Some(v) => v,
        None => 0,
    }
}
