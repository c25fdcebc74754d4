//! # kakeibon-core: Pure Rules for the KakeiBon Screens
//!
//! This crate holds the logic the KakeiBon management screens share, as pure
//! functions and small state machines with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KakeiBon Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens (WebView)                            │   │
//! │  │  Users ─ Accounts ─ Categories ─ Shops ─ Products ─ Details     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ input / change / submit events         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ kakeibon-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    tax    │  │validation │  │   modal   │  │   i18n    │  │   │
//! │  │   │ Forward / │  │ password  │  │ Closed ⇄  │  │  key→text │  │   │
//! │  │   │ Reverse   │  │ username  │  │   Open    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Backend::invoke(command, args)         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               Native backend (Tauri commands)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TaxRate, RoundingPolicy, EntityKind, UserRole)
//! - [`money`] - Rounding primitives and amount parsing/formatting
//! - [`tax`] - Tax-excluded / tax-included reconciliation
//! - [`validation`] - Credential and entity-name rules, user update payload
//! - [`entity`] - Account and name/memo master-data forms
//! - [`transaction`] - Transaction form rules and date conversion
//! - [`modal`] - Modal dialog state machine with focus trap
//! - [`backend`] - The RPC contract with the native backend
//! - [`i18n`] - Translation table client
//! - [`detail`] - Transaction-detail editor controller
//! - [`aggregation`] - Footer totals, chart labels and report periods
//! - [`config`] - Core configuration
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kakeibon_core::tax::calculate_from_including;
//! use kakeibon_core::{RoundingPolicy, TaxRate};
//!
//! let reverse = calculate_from_including(1100, TaxRate::from_percent(10), RoundingPolicy::RoundDown);
//! assert_eq!(reverse.excluding, 1000);
//! assert_eq!(reverse.tax, 100);
//! assert!(reverse.discrepancy.is_none());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod backend;
pub mod config;
pub mod detail;
pub mod entity;
pub mod error;
pub mod i18n;
pub mod modal;
pub mod money;
pub mod tax;
pub mod transaction;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use backend::{Backend, BackendError, BackendErrorKind};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult, CredentialError, ValidationError};
pub use types::*;
pub use validation::ValidationResult;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length, counted in UTF-16 code units.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Language used when the backend does not report one.
pub const DEFAULT_LANGUAGE: &str = "ja";

/// Tax rate pre-selected for new detail rows.
pub const DEFAULT_TAX_RATE_PERCENT: u32 = 10;
