//! # Quote Drafts
//!
//! The payload the editor submits for create and update, and the rules that
//! turn it into a validated header.
//!
//! ## Header Resolution
//! ```text
//! ┌──────────────┬───────────────────────────┬──────────────────────────────┐
//! │ Field        │ Create (None ⇒ …)         │ Update (None ⇒ …)            │
//! ├──────────────┼───────────────────────────┼──────────────────────────────┤
//! │ issuerId     │ Required error            │ keep persisted value         │
//! │ number       │ suggested next number     │ keep persisted value         │
//! │ date         │ today                     │ keep persisted value         │
//! │ paymentNote  │ default disclaimer        │ keep persisted value         │
//! │ counterparty │ unlinked                  │ unlinked (always overwrites) │
//! └──────────────┴───────────────────────────┴──────────────────────────────┘
//! ```
//!
//! A supplied value goes through the same rules in both cases.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::reconcile::{normalize_items, NormalizedItem};
use crate::types::{Counterparties, NewQuote, QuoteHeader};
use crate::validation::{
    validate_issuer_id, validate_number, validate_payment_note, ValidationResult,
};

// =============================================================================
// Draft Types
// =============================================================================

/// A quote as submitted by the editor.
///
/// Every header field is optional; see the module docs for what a missing
/// value means on create and on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDraft {
    /// Set by the edit form. Must match the quote being updated.
    pub id: Option<String>,

    pub number: Option<i64>,

    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,

    pub issuer_id: Option<String>,

    #[serde(flatten)]
    pub counterparties: Counterparties,

    pub payment_note: Option<String>,

    /// Candidate rows, blank padding included.
    #[serde(default)]
    pub items: Vec<LineItemDraft>,
}

/// One candidate row of the editor grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemDraft {
    /// Identity of the persisted row this one edits, if any.
    pub id: Option<String>,

    pub detail: Option<String>,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    #[serde(default)]
    #[ts(as = "String")]
    pub unit_price: Decimal,

    /// Zero means "use the row position".
    #[serde(default)]
    pub order: i64,
}

fn default_quantity() -> i64 {
    1
}

impl Default for LineItemDraft {
    fn default() -> Self {
        LineItemDraft {
            id: None,
            detail: None,
            quantity: default_quantity(),
            unit_price: Decimal::ZERO,
            order: 0,
        }
    }
}

impl LineItemDraft {
    /// An empty editor row at the given 1-based position.
    pub fn blank(position: i64) -> Self {
        LineItemDraft {
            order: position,
            ..LineItemDraft::default()
        }
    }

    /// Whether normalization will discard this row.
    pub fn is_blank(&self) -> bool {
        self.detail.as_deref().map_or(true, |d| d.trim().is_empty()) || self.quantity <= 0
    }
}

/// Values used for header fields a create draft leaves unset.
#[derive(Debug, Clone, Copy)]
pub struct QuoteDefaults<'a> {
    pub number: i64,
    pub date: NaiveDate,
    pub payment_note: &'a str,
}

// =============================================================================
// Draft Operations
// =============================================================================

impl QuoteDraft {
    /// Parses a JSON draft (the editor's submit payload).
    ///
    /// ## Errors
    /// [`ValidationError::InvalidFormat`] for malformed JSON or field values
    /// such as `"date": "2024-13-40"`.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
            field: "draft".to_string(),
            reason: e.to_string(),
        })
    }

    /// Appends blank rows until the draft has at least `min_rows` items.
    ///
    /// ```rust
    /// use medilife_core::draft::QuoteDraft;
    ///
    /// let mut draft = QuoteDraft::default();
    /// draft.pad_rows(5);
    /// assert_eq!(draft.items.len(), 5);
    /// assert_eq!(draft.items[4].order, 5);
    /// ```
    pub fn pad_rows(&mut self, min_rows: usize) {
        while self.items.len() < min_rows {
            let position = self.items.len() as i64 + 1;
            self.items.push(LineItemDraft::blank(position));
        }
    }

    /// Runs item normalization (trim, positional order, blank filtering) and
    /// the survivor rules.
    pub fn normalized_items(&self) -> ValidationResult<Vec<NormalizedItem>> {
        normalize_items(&self.items)
    }

    /// Resolves a create draft into a quote ready to be persisted.
    ///
    /// Item identities in the draft are ignored: every survivor is new.
    pub fn to_new_quote(&self, defaults: &QuoteDefaults<'_>) -> ValidationResult<NewQuote> {
        let issuer_id = validate_issuer_id(self.issuer_id.as_deref().unwrap_or_default())?;
        let number = validate_number(self.number.unwrap_or(defaults.number))?;
        let date = self.date.unwrap_or(defaults.date);
        let payment_note = validate_payment_note(
            self.payment_note.as_deref().unwrap_or(defaults.payment_note),
        )?;

        let items = self
            .normalized_items()?
            .into_iter()
            .map(|item| item.fields)
            .collect();

        Ok(NewQuote {
            header: QuoteHeader {
                number,
                issuer_id,
                date,
                counterparties: clean_counterparties(&self.counterparties),
                payment_note,
            },
            items,
        })
    }

    /// Applies an update draft's header fields over the persisted header.
    pub fn to_updated_header(&self, current: &QuoteHeader) -> ValidationResult<QuoteHeader> {
        let issuer_id = match self.issuer_id.as_deref() {
            Some(issuer_id) => validate_issuer_id(issuer_id)?,
            None => current.issuer_id.clone(),
        };

        let number = match self.number {
            Some(number) => validate_number(number)?,
            None => current.number,
        };

        let payment_note = match self.payment_note.as_deref() {
            Some(note) => validate_payment_note(note)?,
            None => current.payment_note.clone(),
        };

        Ok(QuoteHeader {
            number,
            issuer_id,
            date: self.date.unwrap_or(current.date),
            counterparties: clean_counterparties(&self.counterparties),
            payment_note,
        })
    }
}

/// Blank references mean "unlinked".
fn clean_counterparties(refs: &Counterparties) -> Counterparties {
    let clean = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Counterparties {
        provider_id: clean(&refs.provider_id),
        institution_id: clean(&refs.institution_id),
        patient_id: clean(&refs.patient_id),
        physician_id: clean(&refs.physician_id),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
