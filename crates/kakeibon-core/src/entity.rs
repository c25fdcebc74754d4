//! # Master-Data Forms
//!
//! Submit-time rules for the account, shop, manufacturer and product forms.
//! Each validator returns the cleaned values ready for the backend command.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────┬──────────────────┐
//! │ form         │ required                             │ optional         │
//! ├──────────────┼──────────────────────────────────────┼──────────────────┤
//! │ account      │ code, name, template, initial balance│ -                │
//! │ shop         │ name                                 │ memo             │
//! │ manufacturer │ name                                 │ memo             │
//! │ product      │ name                                 │ memo             │
//! └──────────────┴──────────────────────────────────────┴──────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::parse_amount;
use crate::transaction::normalize_memo;
use crate::types::EntityKind;
use crate::validation::validate_entity_name;

// =============================================================================
// Account Form
// =============================================================================

/// Account form values as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountForm {
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub template_code: Option<String>,
    /// Raw text of the initial balance input.
    pub initial_balance: Option<String>,
}

/// A validated account, in the shape `add_account`/`update_account` take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    pub account_code: String,
    pub account_name: String,
    pub template_code: String,
    pub initial_balance: i64,
}

fn required(value: &Option<String>, field: &'static str, errors: &mut Vec<ValidationError>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            errors.push(ValidationError::Missing { field });
            String::new()
        }
    }
}

impl AccountForm {
    /// Validates every field, reporting all failures in form order.
    ///
    /// ```rust
    /// use kakeibon_core::entity::AccountForm;
    ///
    /// let form = AccountForm {
    ///     account_code: Some(" CASH ".into()),
    ///     account_name: Some("Wallet".into()),
    ///     template_code: Some("ASSET".into()),
    ///     initial_balance: Some("5000".into()),
    /// };
    /// let account = form.validate().unwrap();
    /// assert_eq!(account.account_code, "CASH");
    /// assert_eq!(account.initial_balance, 5000);
    /// ```
    pub fn validate(&self) -> Result<AccountInput, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let account_code = required(&self.account_code, "Account code", &mut errors);
        let account_name = required(&self.account_name, "Account name", &mut errors);
        let template_code = required(&self.template_code, "Template", &mut errors);

        let initial_balance = self.initial_balance.as_deref().and_then(parse_amount);
        if initial_balance.is_none() {
            errors.push(ValidationError::NotANumber {
                field: "Initial balance",
            });
        }

        match initial_balance {
            Some(initial_balance) if errors.is_empty() => Ok(AccountInput {
                account_code,
                account_name,
                template_code,
                initial_balance,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Named Entity Forms
// =============================================================================

/// Name + memo form shared by the shop, manufacturer and product screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntityForm {
    pub name: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntityInput {
    pub name: String,
    /// `None` when the memo was blank; stored as `NULL`.
    pub memo: Option<String>,
}

impl NamedEntityForm {
    pub fn validate(&self, kind: EntityKind) -> Result<NamedEntityInput, ValidationError> {
        let name = validate_entity_name(kind, self.name.as_deref().unwrap_or(""))?;
        Ok(NamedEntityInput {
            name,
            memo: normalize_memo(self.memo.as_deref()),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
