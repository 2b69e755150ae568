//! Fixed-point quantity, price and fraction helpers.
//!
//! ## Overview
//!
//! Resource quantities, prices and minimum-acceptable fractions are all
//! stored as `u64` scaled by 10^8. Splitting an offer is then an exact
//! subtraction, so the quantity handed to a requester plus the remainder
//! re-offered to the market always add back up to the original offer.
//!
//! ## Examples
//!
//! ```
//! use commodity_clearing::types::quantity::{to_fixed, from_fixed, units};
//!
//! let q = to_fixed("12.5").unwrap();
//! assert_eq!(q, 1_250_000_000);
//! assert_eq!(from_fixed(q), "12.50000000");
//! assert_eq!(units(10), 1_000_000_000);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point values: 10^8
pub const SCALE: u64 = 100_000_000;

/// Default threshold below which a split remainder is not re-offered.
///
/// 100 raw units is 1e-6 of a whole unit.
pub const DEFAULT_EPSILON: u64 = 100;

/// A fraction of exactly 1.0 in fixed-point.
pub const FULL_FRACTION: u64 = SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Whole units to fixed-point, saturating at `u64::MAX`.
#[inline]
pub fn units(whole: u64) -> u64 {
    whole.saturating_mul(SCALE)
}

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if the string does not parse, is negative, or does not
/// fit in a `u64` once scaled.
///
/// ```
/// use commodity_clearing::types::quantity::to_fixed;
///
/// assert_eq!(to_fixed("1"), Some(100_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-2"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding to 8 places.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Render with all 8 decimal places.
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Render with trailing zeros trimmed, for log lines.
///
/// ```
/// use commodity_clearing::types::quantity::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(1_500_000_000), "15");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    fixed_to_decimal(value).normalize().to_string()
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Multiply two fixed-point values, keeping the result scaled by 10^8.
///
/// Used for notional value (price x quantity) and for applying a
/// fraction to a quantity. Returns `None` on overflow.
///
/// ```
/// use commodity_clearing::types::quantity::{checked_mul, to_fixed};
///
/// let half = to_fixed("0.5").unwrap();
/// let ten = to_fixed("10").unwrap();
/// assert_eq!(checked_mul(ten, half), to_fixed("5"));
/// ```
pub fn checked_mul(a: u64, b: u64) -> Option<u64> {
    let result = fixed_to_decimal(a).checked_mul(fixed_to_decimal(b))?;
    decimal_to_fixed(result)
}

/// True if `quantity` is at or below the negligible threshold.
#[inline]
pub fn is_negligible(quantity: u64, epsilon: u64) -> bool {
    quantity <= epsilon
}

// ============================================================================
// Unit Tests
// ============================================================================
