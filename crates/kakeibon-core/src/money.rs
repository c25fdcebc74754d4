//! # Money Module
//!
//! Rounding primitives and amount text handling.
//!
//! ## Why Integer Ratios?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    1100 / 1.1 = 999.9999999999999  → floor = 999  ❌ WRONG!             │
//! │                                                                         │
//! │  OUR SOLUTION: exact ratios                                             │
//! │    1100 × 100 / 110 = 1000         → floor = 1000 ✅                    │
//! │                                                                         │
//! │  Tax math is done as numerator / denominator in i128 and rounded       │
//! │  once, per the transaction's RoundingPolicy.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are whole yen (`i64`). There is no minor unit.

use crate::types::RoundingPolicy;

// =============================================================================
// Rounding
// =============================================================================

/// Rounds a real value to a whole amount using `policy`.
///
/// - `RoundDown` → floor
/// - `RoundHalfUp` → nearest, ties away from zero
/// - `RoundUp` → ceiling
///
/// Non-finite values yield `0`; out-of-range values saturate.
///
/// ## Example
/// ```rust
/// use kakeibon_core::money::apply_rounding;
/// use kakeibon_core::RoundingPolicy;
///
/// assert_eq!(apply_rounding(100.5, RoundingPolicy::RoundDown), 100);
/// assert_eq!(apply_rounding(100.5, RoundingPolicy::RoundHalfUp), 101);
/// assert_eq!(apply_rounding(100.1, RoundingPolicy::RoundUp), 101);
/// ```
pub fn apply_rounding(value: f64, policy: RoundingPolicy) -> i64 {
    if !value.is_finite() {
        return 0;
    }

    let rounded = match policy {
        RoundingPolicy::RoundDown => value.floor(),
        RoundingPolicy::RoundHalfUp => value.round(),
        RoundingPolicy::RoundUp => value.ceil(),
    };

    rounded as i64
}

/// Rounds `numerator / denominator` to a whole amount without floating point.
///
/// This is the exact counterpart of [`apply_rounding`] used by the tax
/// engine. A zero denominator yields `0`; a negative denominator is
/// normalised by flipping both signs.
///
/// ## Example
/// ```rust
/// use kakeibon_core::money::round_ratio;
/// use kakeibon_core::RoundingPolicy;
///
/// // 333 × 10 / 100 = 33.3
/// assert_eq!(round_ratio(3330, 100, RoundingPolicy::RoundDown), 33);
/// assert_eq!(round_ratio(3330, 100, RoundingPolicy::RoundUp), 34);
/// // 335 × 10 / 100 = 33.5
/// assert_eq!(round_ratio(3350, 100, RoundingPolicy::RoundHalfUp), 34);
/// ```
pub fn round_ratio(numerator: i128, denominator: i128, policy: RoundingPolicy) -> i64 {
    if denominator == 0 {
        return 0;
    }

    let (num, den) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    let quotient = match policy {
        RoundingPolicy::RoundDown => num.div_euclid(den),
        RoundingPolicy::RoundUp => -((-num).div_euclid(den)),
        RoundingPolicy::RoundHalfUp => {
            // (2|n| + d) / 2d is |n|/d + 1/2 floored
            let magnitude = (2 * num.abs() + den) / (2 * den);
            if num < 0 {
                -magnitude
            } else {
                magnitude
            }
        }
    };

    saturate(quotient)
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Amount Text
// =============================================================================

/// Parses an amount typed into a form field.
///
/// Thousands separators are removed, surrounding whitespace is ignored and
/// the leading integer is taken, so `"1,000"` is `1000` and `"12abc"` is
/// `12`. Text with no leading digits (including the empty string) is
/// `None`.
///
/// ## Example
/// ```rust
/// use kakeibon_core::money::parse_amount;
///
/// assert_eq!(parse_amount("1,000"), Some(1000));
/// assert_eq!(parse_amount(" -250 "), Some(-250));
/// assert_eq!(parse_amount("abc"), None);
/// ```
pub fn parse_amount(text: &str) -> Option<i64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();

    let (negative, digits) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses an amount for the tax engine: anything unparseable is `0`.
#[inline]
pub fn coerce_amount(text: &str) -> i64 {
    parse_amount(text).unwrap_or(0)
}

/// Formats an amount with `,` thousands separators.
///
/// ## Example
/// ```rust
/// use kakeibon_core::money::format_amount;
///
/// assert_eq!(format_amount(1_000_000), "1,000,000");
/// assert_eq!(format_amount(-1000), "-1,000");
/// assert_eq!(format_amount(999), "999");
/// ```
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        grouped.push('-');
    }

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================
