//! # Domain Types
//!
//! Core domain types for quote composition.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │     Quote       │   │    LineItem     │   │   NewQuote      │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │◄──│  quote_id       │   │  header         │        │
//! │  │  header         │   │  fields         │   │  items (fields) │        │
//! │  │  items          │   │  audit          │   │  (no ids yet)   │        │
//! │  │  audit          │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  QuoteHeader = number + issuer_id + date + counterparties + note        │
//! │  ItemFields  = detail + quantity + unit_price + order                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, assigned by storage, used for relations
//! - `(issuer_id, number)`: business key printed on the document
//!
//! `total` is never a field: it is recomputed from the items every time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::{LineItemDraft, QuoteDraft};
use crate::money::Money;

// =============================================================================
// Counterparties
// =============================================================================

/// Optional parties a quote is addressed to or refers to.
///
/// Each reference is an identity in the excluded record screens; any number
/// of them may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Counterparties {
    /// Health insurer / provider ("prestador").
    pub provider_id: Option<String>,
    pub institution_id: Option<String>,
    pub patient_id: Option<String>,
    pub physician_id: Option<String>,
}

// =============================================================================
// Audit Info
// =============================================================================

/// Creation / modification metadata.
///
/// Filled by the storage layer's audit hook, never by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuditInfo {
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    #[ts(as = "Option<String>")]
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

// =============================================================================
// Quote Header
// =============================================================================

/// Every quote field except identity, items and audit data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteHeader {
    /// Document number, unique per issuer.
    pub number: i64,

    /// Issuing party ("empresa").
    pub issuer_id: String,

    /// Calendar date printed on the document.
    #[ts(as = "String")]
    pub date: NaiveDate,

    #[serde(flatten)]
    pub counterparties: Counterparties,

    /// Payment conditions / validity disclaimer.
    pub payment_note: Option<String>,
}

// =============================================================================
// Line Items
// =============================================================================

/// The editable values of one priced row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemFields {
    /// Trimmed, non-empty description.
    pub detail: String,

    /// Always >= 1.
    pub quantity: i64,

    pub unit_price: Money,

    /// Display position. Only the relative ordering matters.
    pub order: i64,
}

impl ItemFields {
    /// quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A persisted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: String,

    /// Owning quote (back-reference).
    pub quote_id: String,

    #[serde(flatten)]
    pub fields: ItemFields,

    pub audit: AuditInfo,
}

impl LineItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.fields.line_total()
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A persisted quote with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub id: String,

    #[serde(flatten)]
    pub header: QuoteHeader,

    pub items: Vec<LineItem>,

    pub audit: AuditInfo,
}

impl Quote {
    /// Sum of the line totals. An empty quote totals zero.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Items sorted by display order. Ties keep their stored sequence.
    pub fn items_in_order(&self) -> Vec<&LineItem> {
        let mut items: Vec<&LineItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.fields.order);
        items
    }

    /// Turns the quote back into an editable draft (the edit form payload).
    ///
    /// Every header field is set, so submitting the draft unchanged is a
    /// no-op update.
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            id: Some(self.id.clone()),
            number: Some(self.header.number),
            date: Some(self.header.date),
            issuer_id: Some(self.header.issuer_id.clone()),
            counterparties: self.header.counterparties.clone(),
            payment_note: Some(self.header.payment_note.clone().unwrap_or_default()),
            items: self
                .items_in_order()
                .into_iter()
                .map(|item| LineItemDraft {
                    id: Some(item.id.clone()),
                    detail: Some(item.fields.detail.clone()),
                    quantity: item.fields.quantity,
                    unit_price: item.fields.unit_price.to_decimal(),
                    order: item.fields.order,
                })
                .collect(),
        }
    }

    /// Export row for listings and spreadsheet writers.
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            id: self.id.clone(),
            number: self.header.number,
            date: self.header.date,
            issuer_id: self.header.issuer_id.clone(),
            counterparties: self.header.counterparties.clone(),
            item_count: self.items.len(),
            total: self.total(),
            audit: self.audit.clone(),
        }
    }
}

/// A validated quote that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub header: QuoteHeader,
    pub items: Vec<ItemFields>,
}

impl NewQuote {
    pub fn total(&self) -> Money {
        self.items.iter().map(ItemFields::line_total).sum()
    }
}

// =============================================================================
// Quote Summary
// =============================================================================

/// One row of the quote listing / export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteSummary {
    pub id: String,
    pub number: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub issuer_id: String,
    #[serde(flatten)]
    pub counterparties: Counterparties,
    pub item_count: usize,
    pub total: Money,
    pub audit: AuditInfo,
}

// =============================================================================
// Unit Tests
// =============================================================================
