//! # Domain Types
//!
//! Small value types shared across the screens.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │ RoundingPolicy  │   │   EntityKind    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  percent (u32)  │   │  RoundDown   0  │   │  Account        │       │
//! │  │  10 = 10%       │   │  RoundHalfUp 1  │   │  Category       │       │
//! │  └─────────────────┘   │  RoundUp     2  │   │  Shop ...       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Consumption tax rate as a whole percentage.
///
/// KakeiBon only deals in whole-percent rates (8%, 10%), so the rate is an
/// unsigned integer. Being unsigned also keeps `100 + rate` strictly positive
/// for the reverse calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a whole percentage.
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0
    }

    /// Zero tax rate (tax-exempt items).
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_percent(crate::DEFAULT_TAX_RATE_PERCENT)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Rounding Policy
// =============================================================================

/// How a fractional tax amount becomes a whole currency unit.
///
/// The backend stores this on the transaction header as the integer
/// `tax_rounding_type`:
///
/// | code | variant       | rule                           |
/// |------|---------------|--------------------------------|
/// | 0    | `RoundDown`   | floor                          |
/// | 1    | `RoundHalfUp` | nearest, ties away from zero   |
/// | 2    | `RoundUp`     | ceiling                        |
///
/// Unknown codes fall back to `RoundDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RoundingPolicy {
    #[default]
    RoundDown,
    RoundHalfUp,
    RoundUp,
}

impl RoundingPolicy {
    /// Maps a backend `tax_rounding_type` code to a policy.
    ///
    /// ```rust
    /// use kakeibon_core::RoundingPolicy;
    ///
    /// assert_eq!(RoundingPolicy::from_code(1), RoundingPolicy::RoundHalfUp);
    /// assert_eq!(RoundingPolicy::from_code(999), RoundingPolicy::RoundDown);
    /// ```
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => RoundingPolicy::RoundHalfUp,
            2 => RoundingPolicy::RoundUp,
            _ => RoundingPolicy::RoundDown,
        }
    }

    /// Returns the backend code for this policy.
    pub const fn code(&self) -> i64 {
        match self {
            RoundingPolicy::RoundDown => 0,
            RoundingPolicy::RoundHalfUp => 1,
            RoundingPolicy::RoundUp => 2,
        }
    }
}

impl From<i64> for RoundingPolicy {
    fn from(code: i64) -> Self {
        RoundingPolicy::from_code(code)
    }
}

impl From<RoundingPolicy> for i64 {
    fn from(policy: RoundingPolicy) -> Self {
        policy.code()
    }
}

// =============================================================================
// Last Edited Field
// =============================================================================

/// Which amount field the user typed into most recently.
///
/// Decides which side is recomputed when the tax rate changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LastEdited {
    Excluding,
    Including,
    #[default]
    None,
}

// =============================================================================
// Entity Kind
// =============================================================================

/// Master-data entities with add/edit/delete screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Category,
    Shop,
    Manufacturer,
    Product,
}

impl EntityKind {
    /// Label of the identifying field, as shown in error messages.
    pub const fn field_label(&self) -> &'static str {
        match self {
            EntityKind::Account => "Account code",
            EntityKind::Category => "Category name",
            EntityKind::Shop => "Shop name",
            EntityKind::Manufacturer => "Manufacturer name",
            EntityKind::Product => "Product name",
        }
    }

    /// Translation key for the inline "name is empty" message, for the
    /// screens that have one.
    pub const fn empty_name_key(&self) -> Option<&'static str> {
        match self {
            EntityKind::Shop => Some("shop_mgmt.empty_name"),
            EntityKind::Manufacturer => Some("manufacturer_mgmt.empty_name"),
            EntityKind::Product => Some("product_mgmt.empty_name"),
            EntityKind::Account | EntityKind::Category => None,
        }
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Role stored on a user row as an integer code.
///
/// | code | variant   |
/// |------|-----------|
/// | 0    | `Admin`   |
/// | 1    | `User`    |
/// | 999  | `Visitor` |
///
/// Unknown codes are treated as `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum UserRole {
    Admin,
    User,
    Visitor,
}

impl UserRole {
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => UserRole::Admin,
            999 => UserRole::Visitor,
            _ => UserRole::User,
        }
    }

    pub const fn code(&self) -> i64 {
        match self {
            UserRole::Admin => 0,
            UserRole::User => 1,
            UserRole::Visitor => 999,
        }
    }

    /// The admin account cannot be deleted from the user screen.
    pub const fn can_be_deleted(&self) -> bool {
        !matches!(self, UserRole::Admin)
    }

    /// Backend command that saves an edited user of this role.
    pub const fn update_command(&self) -> &'static str {
        match self {
            UserRole::Admin => "update_admin_user_info",
            UserRole::User | UserRole::Visitor => "update_general_user_info",
        }
    }
}

impl From<i64> for UserRole {
    fn from(code: i64) -> Self {
        UserRole::from_code(code)
    }
}

impl From<UserRole> for i64 {
    fn from(role: UserRole) -> Self {
        role.code()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percent() {
        let rate = TaxRate::from_percent(8);
        assert_eq!(rate.percent(), 8);
        assert!(!rate.is_zero());
        assert!(TaxRate::zero().is_zero());
        assert_eq!(rate.to_string(), "8%");
    }

    #[test]
    fn test_tax_rate_default_is_standard_rate() {
        assert_eq!(TaxRate::default().percent(), 10);
    }

    #[test]
    fn test_rounding_policy_codes() {
        assert_eq!(RoundingPolicy::from_code(0), RoundingPolicy::RoundDown);
        assert_eq!(RoundingPolicy::from_code(1), RoundingPolicy::RoundHalfUp);
        assert_eq!(RoundingPolicy::from_code(2), RoundingPolicy::RoundUp);

        for policy in [
            RoundingPolicy::RoundDown,
            RoundingPolicy::RoundHalfUp,
            RoundingPolicy::RoundUp,
        ] {
            assert_eq!(RoundingPolicy::from_code(policy.code()), policy);
        }
    }

    #[test]
    fn test_unknown_rounding_code_falls_back_to_floor() {
        for code in [-1, 3, 999] {
            assert_eq!(RoundingPolicy::from_code(code), RoundingPolicy::RoundDown);
        }
    }

    #[test]
    fn test_rounding_policy_serde_uses_backend_codes() {
        let policy: RoundingPolicy = serde_json::from_str("2").unwrap();
        assert_eq!(policy, RoundingPolicy::RoundUp);
        assert_eq!(serde_json::to_string(&RoundingPolicy::RoundHalfUp).unwrap(), "1");
    }

    #[test]
    fn test_last_edited_default() {
        assert_eq!(LastEdited::default(), LastEdited::None);
    }

    #[test]
    fn test_user_role_codes() {
        assert_eq!(UserRole::from_code(0), UserRole::Admin);
        assert_eq!(UserRole::from_code(1), UserRole::User);
        assert_eq!(UserRole::from_code(999), UserRole::Visitor);
        assert_eq!(UserRole::from_code(42), UserRole::User);
        let role: UserRole = serde_json::from_str("0").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_admin_is_not_deletable_and_routes_to_admin_command() {
        assert!(!UserRole::Admin.can_be_deleted());
        assert!(UserRole::User.can_be_deleted());
        assert_eq!(UserRole::Admin.update_command(), "update_admin_user_info");
        assert_eq!(UserRole::User.update_command(), "update_general_user_info");
    }

    #[test]
    fn test_entity_empty_name_keys() {
        assert_eq!(EntityKind::Shop.empty_name_key(), Some("shop_mgmt.empty_name"));
        assert_eq!(EntityKind::Product.empty_name_key(), Some("product_mgmt.empty_name"));
        assert_eq!(EntityKind::Account.empty_name_key(), None);
    }
}
