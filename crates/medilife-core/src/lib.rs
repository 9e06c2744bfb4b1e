//! # medilife-core: Pure Quote Composition Logic
//!
//! This crate holds the rules for composing a "presupuesto" (a priced quote
//! for medical supplies): numeral rendering, draft normalization, line item
//! reconciliation, numbering and totals. Everything here is a pure function.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medilife Quotes                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │               Editor / print view (not in this workspace)       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ QuoteDraft / PrintableQuote            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │         medilife-db: QuoteService, AuditedStore, repository     │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ medilife-core (THIS CRATE) ★                    │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌───────┐   │    │
//! │  │   │  words  │ │  draft  │ │ reconcile │ │  types  │ │ print │   │    │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └─────────┘ └───────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • NO CURRENT USER             │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`words`] - Spanish numeral and legal total rendering
//! - [`money`] - Money type in integer centavos
//! - [`types`] - Quote, LineItem, headers, summaries
//! - [`draft`] - Editor payload and header resolution
//! - [`reconcile`] - Item normalization and the insert/update/delete plan
//! - [`numbering`] - Suggested quote numbers
//! - [`print`] - Printable snapshot
//! - [`settings`] - Draft tunables
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use medilife_core::draft::{LineItemDraft, QuoteDraft};
//! use medilife_core::reconcile::normalize_items;
//!
//! let mut draft = QuoteDraft::default();
//! draft.items.push(LineItemDraft {
//!     detail: Some("Placa de titanio".into()),
//!     unit_price: "2500".parse().unwrap(),
//!     ..LineItemDraft::default()
//! });
//! draft.pad_rows(5);
//!
//! // padding rows never survive normalization
//! assert_eq!(normalize_items(&draft.items).unwrap().len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod numbering;
pub mod print;
pub mod reconcile;
pub mod settings;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{LineItemDraft, QuoteDefaults, QuoteDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use print::{PrintableLine, PrintableQuote};
pub use reconcile::{ItemUpdate, NormalizedItem, ReconcilePlan};
pub use settings::QuoteSettings;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum characters in a line item detail.
pub const MAX_DETAIL_LEN: usize = 400;

/// Maximum characters in a payment note.
pub const MAX_PAYMENT_NOTE_LEN: usize = 1000;

/// Payment note stored when a new quote does not bring one.
pub const DEFAULT_PAYMENT_NOTE: &str =
    "* El presupuesto tendra validez por 15 días al momento de ser emitido";

/// Rows the editor shows at minimum, so operators can add items without
/// asking for more rows.
pub const MIN_EDITOR_ROWS: usize = 5;
