//! # Error Types
//!
//! Domain-specific error types for kakeibon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError               - Umbrella for Rust callers                    │
//! │  ├── CredentialError     - Username / password rules (UI messages)      │
//! │  ├── ValidationError     - Entity-name rules                            │
//! │  ├── TransactionFormError- Transaction form rules                       │
//! │  ├── ModalError          - Invalid modal transitions                    │
//! │  └── BackendError        - Structured error from the native backend     │
//! │                                                                         │
//! │  Flow: rule error → ValidationResult { valid, message } → form         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Credential messages are the exact text the forms display

use thiserror::Error;

use crate::backend::BackendError;

// =============================================================================
// Core Error
// =============================================================================

/// Errors surfaced by the stateful components (modal, editor, i18n).
///
/// The pure rules return their own narrower error types; this enum lets a
/// caller propagate any of them with `?`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    TransactionForm(#[from] TransactionFormError),

    #[error(transparent)]
    Modal(#[from] ModalError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A detail editor operation ran before `open_new`/`open_existing`.
    #[error("No detail is being edited")]
    NoActiveDetail,
}

// =============================================================================
// Credential Error
// =============================================================================

/// Username and password rule failures.
///
/// The `Display` text of each variant is shown verbatim next to the form
/// field, so it must not change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Username cannot be empty!")]
    UsernameEmpty,

    #[error("Password cannot be empty!")]
    PasswordEmpty,

    #[error("Password must be at least {min} characters long!")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match!")]
    PasswordMismatch,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for master data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    ///
    /// `field` is the human label, e.g. "Shop name".
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// A form field the screen marks as required was left blank.
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
}

// =============================================================================
// Transaction Form Error
// =============================================================================

/// Transaction header form failures. Several can be reported at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionFormError {
    #[error("Transaction date is required")]
    DateRequired,

    #[error("Transaction date has invalid format: {0}")]
    InvalidDate(String),

    #[error("Category is required")]
    CategoryRequired,

    #[error("Total amount is required")]
    AmountRequired,

    #[error("From account is required for {0}")]
    FromAccountRequired(&'static str),

    #[error("To account is required for {0}")]
    ToAccountRequired(&'static str),
}

// =============================================================================
// Modal Error
// =============================================================================

/// Rejected modal transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("Modal is already open")]
    AlreadyOpen,

    #[error("Modal is not open")]
    NotOpen,

    #[error("A save is already in progress")]
    Busy,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_messages() {
        assert_eq!(
            CredentialError::UsernameEmpty.to_string(),
            "Username cannot be empty!"
        );
        assert_eq!(
            CredentialError::PasswordEmpty.to_string(),
            "Password cannot be empty!"
        );
        assert_eq!(
            CredentialError::PasswordTooShort { min: 16 }.to_string(),
            "Password must be at least 16 characters long!"
        );
        assert_eq!(
            CredentialError::PasswordMismatch.to_string(),
            "Passwords do not match!"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Shop name".to_string(),
        };
        assert_eq!(err.to_string(), "Shop name cannot be empty");
        assert_eq!(
            ValidationError::Missing { field: "Template" }.to_string(),
            "Template is required"
        );
        assert_eq!(
            ValidationError::NotANumber { field: "Initial balance" }.to_string(),
            "Initial balance must be a number"
        );
    }

    #[test]
    fn test_transaction_form_messages() {
        assert_eq!(
            TransactionFormError::FromAccountRequired("expense").to_string(),
            "From account is required for expense"
        );
        assert_eq!(
            TransactionFormError::ToAccountRequired("transfer").to_string(),
            "To account is required for transfer"
        );
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = CredentialError::PasswordMismatch.into();
        assert!(matches!(core_err, CoreError::Credential(_)));
        assert_eq!(core_err.to_string(), "Passwords do not match!");

        let core_err: CoreError = ModalError::NotOpen.into();
        assert!(matches!(core_err, CoreError::Modal(ModalError::NotOpen)));
    }
}
