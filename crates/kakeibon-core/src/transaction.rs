//! # Transaction Form Rules
//!
//! Checks for the transaction header form and the conversions between the
//! `datetime-local` input format and the stored SQLite format.
//!
//! ## Required Accounts by Category
//! ```text
//! ┌──────────────┬──────────────┬──────────────┐
//! │ category1    │ from account │ to account   │
//! ├──────────────┼──────────────┼──────────────┤
//! │ EXPENSE      │ required     │ -            │
//! │ INCOME       │ -            │ required     │
//! │ TRANSFER     │ required     │ required     │
//! │ (other)      │ -            │ -            │
//! └──────────────┴──────────────┴──────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TransactionFormError;
use crate::types::RoundingPolicy;

/// Account code meaning "no account selected".
pub const NO_ACCOUNT: &str = "NONE";

const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SQLITE_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_LOCAL_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Types
// =============================================================================

/// Top-level category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Income,
    Transfer,
    Other,
}

impl CategoryKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "EXPENSE" => CategoryKind::Expense,
            "INCOME" => CategoryKind::Income,
            "TRANSFER" => CategoryKind::Transfer,
            _ => CategoryKind::Other,
        }
    }

    /// Lower-case name used in error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
            CategoryKind::Transfer => "transfer",
            CategoryKind::Other => "other",
        }
    }

    const fn needs_from_account(&self) -> bool {
        matches!(self, CategoryKind::Expense | CategoryKind::Transfer)
    }

    const fn needs_to_account(&self) -> bool {
        matches!(self, CategoryKind::Income | CategoryKind::Transfer)
    }
}

/// The transaction header form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionForm {
    /// `datetime-local` value, `YYYY-MM-DDTHH:MM`.
    pub transaction_date: Option<String>,
    pub category1_code: Option<String>,
    pub from_account_code: Option<String>,
    pub to_account_code: Option<String>,
    pub total_amount: Option<i64>,
    #[serde(default)]
    #[ts(type = "number")]
    pub tax_rounding_type: RoundingPolicy,
    pub memo: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn is_account_selected(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(str::trim)
        .is_some_and(|v| !v.is_empty() && v != NO_ACCOUNT)
}

/// Validates the header form, reporting every failure at once.
///
/// A zero total and an empty memo are both accepted.
///
/// ```rust
/// use kakeibon_core::transaction::{validate_transaction_form, TransactionForm};
/// use kakeibon_core::error::TransactionFormError;
///
/// let form = TransactionForm {
///     transaction_date: Some("2024-03-01T09:30".into()),
///     category1_code: Some("EXPENSE".into()),
///     from_account_code: Some("NONE".into()),
///     total_amount: Some(0),
///     ..Default::default()
/// };
/// assert_eq!(
///     validate_transaction_form(&form),
///     Err(vec![TransactionFormError::FromAccountRequired("expense")])
/// );
/// ```
pub fn validate_transaction_form(form: &TransactionForm) -> Result<(), Vec<TransactionFormError>> {
    let mut errors = Vec::new();

    match form.transaction_date.as_deref().map(str::trim) {
        None | Some("") => errors.push(TransactionFormError::DateRequired),
        Some(date) => {
            if let Err(err) = parse_datetime_local(date) {
                errors.push(err);
            }
        }
    }

    if !is_present(&form.category1_code) {
        errors.push(TransactionFormError::CategoryRequired);
    }

    if form.total_amount.is_none() {
        errors.push(TransactionFormError::AmountRequired);
    }

    let kind = CategoryKind::from_code(form.category1_code.as_deref().unwrap_or("").trim());
    if kind.needs_from_account() && !is_account_selected(&form.from_account_code) {
        errors.push(TransactionFormError::FromAccountRequired(kind.label()));
    }
    if kind.needs_to_account() && !is_account_selected(&form.to_account_code) {
        errors.push(TransactionFormError::ToAccountRequired(kind.label()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Date Conversion
// =============================================================================

fn invalid(value: &str) -> TransactionFormError {
    TransactionFormError::InvalidDate(value.to_string())
}

fn parse_datetime_local(value: &str) -> Result<NaiveDateTime, TransactionFormError> {
    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_SECONDS_FORMAT))
        .map_err(|_| invalid(value))
}

/// Stored `YYYY-MM-DD HH:MM:SS` → `datetime-local` `YYYY-MM-DDTHH:MM`.
///
/// A date-only value gets midnight. Empty input yields an empty string.
pub fn to_datetime_local(stored: &str) -> Result<String, TransactionFormError> {
    let stored = stored.trim();
    if stored.is_empty() {
        return Ok(String::new());
    }

    let parsed = NaiveDateTime::parse_from_str(stored, SQLITE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(stored, SQLITE_MINUTE_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(stored, DATETIME_LOCAL_SECONDS_FORMAT))
        .or_else(|_| {
            NaiveDate::parse_from_str(stored, DATE_FORMAT)
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| invalid(stored))?;

    Ok(parsed.format(DATETIME_LOCAL_FORMAT).to_string())
}

/// `datetime-local` `YYYY-MM-DDTHH:MM` → stored `YYYY-MM-DD HH:MM:SS`.
///
/// Empty input yields an empty string.
pub fn to_sqlite_datetime(local: &str) -> Result<String, TransactionFormError> {
    let local = local.trim();
    if local.is_empty() {
        return Ok(String::new());
    }

    let parsed = parse_datetime_local(local)?;
    Ok(parsed.format(SQLITE_FORMAT).to_string())
}

/// Trims the memo; a blank memo is stored as `NULL`.
pub fn normalize_memo(memo: Option<&str>) -> Option<String> {
    memo.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
