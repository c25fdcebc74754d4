//! # Detail Editor
//!
//! Controller behind the transaction-detail screen. One editor exists per
//! mounted screen; it owns the modal and the amount state of the detail row
//! being edited.
//!
//! ```text
//! load(backend, id) ─► rounding policy from the transaction header
//!        │
//!        ▼
//! open_new(rate) / open_existing(amounts) ─► Modal::Open { DetailSession }
//!        │
//!        ├── input_excluding / input_including / change_rate
//!        │        └── TaxAmountState (forward / reverse)
//!        │
//!        └── save(backend) ─► add_transaction_detail | update_transaction_detail
//!                 Ok  → Closed
//!                 Err → stays Open
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use ts_rs::TS;

use crate::backend::{invoke_typed, Backend};
use crate::error::{CoreError, CoreResult};
use crate::modal::{Modal, ModalMode, ModalOptions};
use crate::money::coerce_amount;
use crate::tax::{RoundingDiscrepancy, TaxAmountState};
use crate::types::{RoundingPolicy, TaxRate};

/// Amounts of one detail row as exchanged with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DetailAmounts {
    /// `None` for a row that has not been saved yet.
    pub detail_id: Option<i64>,
    pub amount_excluding_tax: i64,
    pub amount_including_tax: i64,
    pub tax_amount: i64,
    pub tax_rate: TaxRate,
}

impl DetailAmounts {
    fn from_state(detail_id: Option<i64>, state: &TaxAmountState) -> Self {
        DetailAmounts {
            detail_id,
            amount_excluding_tax: state.excluding_tax.unwrap_or(0),
            amount_including_tax: state.including_tax.unwrap_or(0),
            tax_amount: state.tax_amount,
            tax_rate: state.tax_rate,
        }
    }
}

/// The part of the transaction header the editor needs.
#[derive(Debug, Deserialize)]
struct TransactionHeader {
    #[serde(default)]
    tax_rounding_type: RoundingPolicy,
}

/// What the modal carries while a detail row is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    pub detail_id: Option<i64>,
    pub amounts: TaxAmountState,
}

#[derive(Debug)]
pub struct DetailEditor {
    transaction_id: i64,
    rounding: RoundingPolicy,
    modal: Modal<DetailSession>,
}

impl DetailEditor {
    /// Creates an editor for a transaction whose rounding policy is known.
    pub fn new(transaction_id: i64, rounding: RoundingPolicy) -> Self {
        DetailEditor {
            transaction_id,
            rounding,
            modal: Modal::new(ModalOptions::default()),
        }
    }

    /// Reads the transaction header and creates the editor for it.
    pub fn load<B: Backend + ?Sized>(backend: &B, transaction_id: i64) -> CoreResult<Self> {
        let header: TransactionHeader = invoke_typed(
            backend,
            "get_transaction_header",
            json!({ "transactionId": transaction_id }),
        )?;

        info!(transaction_id, rounding = ?header.tax_rounding_type, "detail editor loaded");
        Ok(DetailEditor::new(transaction_id, header.tax_rounding_type))
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Opens the form for a new detail row.
    pub fn open_new(&mut self, default_rate: TaxRate) -> CoreResult<()> {
        let session = DetailSession {
            detail_id: None,
            amounts: TaxAmountState::new(default_rate),
        };
        self.modal.open(ModalMode::Add, session, None)?;
        Ok(())
    }

    /// Opens the form on a saved detail row.
    pub fn open_existing(&mut self, amounts: &DetailAmounts) -> CoreResult<()> {
        let session = DetailSession {
            detail_id: amounts.detail_id,
            amounts: TaxAmountState::seeded(
                amounts.amount_excluding_tax,
                amounts.amount_including_tax,
                amounts.tax_rate,
            ),
        };
        self.modal.open(ModalMode::Edit, session, None)?;
        Ok(())
    }

    /// The user typed into the tax-excluded field.
    pub fn input_excluding(&mut self, text: &str) -> CoreResult<&TaxAmountState> {
        let value = parse_input(text);
        let rounding = self.rounding;
        let amounts = self.amounts_mut()?;
        amounts.edit_excluding(value, rounding);
        Ok(amounts)
    }

    /// The user typed into the tax-included field.
    pub fn input_including(&mut self, text: &str) -> CoreResult<&TaxAmountState> {
        let value = parse_input(text);
        let rounding = self.rounding;
        let amounts = self.amounts_mut()?;
        amounts.edit_including(value, rounding);
        Ok(amounts)
    }

    pub fn change_rate(&mut self, rate: TaxRate) -> CoreResult<&TaxAmountState> {
        let rounding = self.rounding;
        let amounts = self.amounts_mut()?;
        amounts.change_rate(rate, rounding);
        Ok(amounts)
    }

    /// Current amount state, if a row is open.
    pub fn state(&self) -> Option<&TaxAmountState> {
        self.modal.context().map(|session| &session.amounts)
    }

    /// Rounding mismatch to show next to the including field.
    pub fn warning(&self) -> Option<RoundingDiscrepancy> {
        self.state().and_then(|state| state.rounding_discrepancy)
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Saves the open row. The form closes only when the backend accepts it.
    pub fn save<B: Backend + ?Sized>(&mut self, backend: &B) -> CoreResult<DetailAmounts> {
        if !self.modal.is_open() {
            return Err(CoreError::NoActiveDetail);
        }

        let transaction_id = self.transaction_id;
        self.modal.save(|mode, session| -> CoreResult<DetailAmounts> {
            let detail = DetailAmounts::from_state(session.detail_id, &session.amounts);
            match (mode, detail.detail_id) {
                (ModalMode::Edit, Some(detail_id)) => {
                    backend.invoke(
                        "update_transaction_detail",
                        json!({ "detailId": detail_id, "detail": detail }),
                    )?;
                    debug!(transaction_id, detail_id, "detail updated");
                }
                _ => {
                    backend.invoke(
                        "add_transaction_detail",
                        json!({ "transactionId": transaction_id, "detail": detail }),
                    )?;
                    debug!(transaction_id, "detail added");
                }
            }
            Ok(detail)
        })
    }

    /// Discards the open row.
    pub fn close(&mut self) {
        self.modal.close();
    }

    fn amounts_mut(&mut self) -> CoreResult<&mut TaxAmountState> {
        self.modal
            .context_mut()
            .map(|session| &mut session.amounts)
            .ok_or(CoreError::NoActiveDetail)
    }
}

/// Empty text leaves the field empty; anything else coerces, with junk as 0.
fn parse_input(text: &str) -> Option<i64> {
    if text.trim().is_empty() {
        None
    } else {
        Some(coerce_amount(text))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
