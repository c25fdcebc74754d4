//! # Aggregation Helpers
//!
//! Client-side arithmetic for the aggregation and dashboard screens. The
//! backend returns one row per group; the footer, the chart labels and the
//! trend period list are computed here.
//!
//! ## Footer
//! ```text
//! ┌──────────────┬──────────────┬───────┬──────────┐
//! │ group        │ total        │ count │ average  │
//! ├──────────────┼──────────────┼───────┼──────────┤
//! │ Food         │     +12,000  │     4 │   3,000  │
//! │ Refund       │      -1,000  │     1 │  -1,000  │
//! ├──────────────┼──────────────┼───────┼──────────┤
//! │ Total        │     +11,000  │     5 │   2,200  │  ← summarize(rows)
//! └──────────────┴──────────────┴───────┴──────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{format_amount, round_ratio};
use crate::types::RoundingPolicy;

// =============================================================================
// Types
// =============================================================================

/// One group of an aggregation result, as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregationRow {
    pub group_name: String,
    pub total_amount: i64,
    pub count: i64,
    pub avg_amount: i64,
}

/// The footer row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregationSummary {
    pub total_amount: i64,
    pub count: i64,
    pub average: i64,
}

/// A calendar month, `month` in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

// =============================================================================
// Footer
// =============================================================================

/// Sums the rows into the footer.
pub fn summarize(rows: &[AggregationRow]) -> AggregationSummary {
    let (total_amount, count) = rows.iter().fold((0i64, 0i64), |(total, count), row| {
        (
            total.saturating_add(row.total_amount),
            count.saturating_add(row.count),
        )
    });

    AggregationSummary {
        total_amount,
        count,
        average: average_amount(total_amount, count),
    }
}

/// `total / count` rounded to the nearest integer with ties toward positive
/// infinity (`-2.5` → `-2`). No rows average to 0.
pub fn average_amount(total: i64, count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    let (total, count) = (total as i128, count as i128);
    (2 * total + count).div_euclid(2 * count) as i64
}

/// Total column text: non-negative amounts carry a `+`.
///
/// ```rust
/// use kakeibon_core::aggregation::format_signed_amount;
///
/// assert_eq!(format_signed_amount(12000), "+12,000");
/// assert_eq!(format_signed_amount(0), "+0");
/// assert_eq!(format_signed_amount(-1000), "-1,000");
/// ```
pub fn format_signed_amount(amount: i64) -> String {
    if amount >= 0 {
        format!("+{}", format_amount(amount))
    } else {
        format_amount(amount)
    }
}

// =============================================================================
// Chart Labels
// =============================================================================

/// Compact axis label: `¥1.3M`, `¥12K`, or the full amount below 1,000.
pub fn format_amount_short(amount: i64) -> String {
    let amount_wide = amount as i128;

    if amount >= 1_000_000 {
        let tenths = round_ratio(amount_wide * 10, 1_000_000, RoundingPolicy::RoundHalfUp);
        format!("¥{}.{}M", tenths / 10, tenths % 10)
    } else if amount >= 1_000 {
        let thousands = round_ratio(amount_wide, 1_000, RoundingPolicy::RoundHalfUp);
        format!("¥{thousands}K")
    } else {
        format!("¥{}", format_amount(amount))
    }
}

// =============================================================================
// Periods
// =============================================================================

/// ISO-8601 week number (1-53) of `date`.
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// The `count` months ending at `year`/`month`, oldest first, rolling back
/// across year boundaries.
///
/// ```rust
/// use kakeibon_core::aggregation::{trend_periods, YearMonth};
///
/// let periods = trend_periods(2024, 2, 3);
/// assert_eq!(
///     periods,
///     vec![
///         YearMonth { year: 2023, month: 12 },
///         YearMonth { year: 2024, month: 1 },
///         YearMonth { year: 2024, month: 2 },
///     ]
/// );
/// ```
pub fn trend_periods(year: i32, month: u32, count: u32) -> Vec<YearMonth> {
    let end = i64::from(year) * 12 + i64::from(month) - 1;

    (0..i64::from(count))
        .rev()
        .map(|back| {
            let index = end - back;
            YearMonth {
                year: index.div_euclid(12) as i32,
                month: index.rem_euclid(12) as u32 + 1,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
