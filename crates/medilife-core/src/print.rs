//! # Printable Quote
//!
//! Read-only snapshot handed to the rendering layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  PRESUPUESTO N° 42                         Fecha 02/06/2025 │
//! │  Empresa / Prestador / Institución / Paciente / Médico      │
//! │  ─────────────────────────────────────────────────────────  │
//! │  #  Detalle                 Cant.   P. Unit.      Subtotal  │
//! │  1  Placa de titanio           1    2500.00       2500.00   │
//! │  2  Tornillo cortical          4      12.50         50.00   │
//! │  ─────────────────────────────────────────────────────────  │
//! │                                          TOTAL    2550.00   │
//! │  SON PESOS: DOS MIL QUINIENTOS CINCUENTA PESOS CON 00/100   │
//! │  * El presupuesto tendra validez por 15 días ...            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `total_words` is produced here on demand and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Counterparties, Quote};

/// One printed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PrintableLine {
    /// 1-based row number on the document.
    pub position: usize,
    pub detail: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything the print view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PrintableQuote {
    pub quote_id: String,
    pub number: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub issuer_id: String,
    #[serde(flatten)]
    pub counterparties: Counterparties,
    pub payment_note: Option<String>,
    pub items: Vec<PrintableLine>,
    pub total: Money,
    /// Legal total phrase, e.g. `"MIL PESOS CON 00/100"`.
    pub total_words: String,
}

impl PrintableQuote {
    /// Builds the snapshot: items in display order, total, total in words.
    ///
    /// ## Errors
    /// [`CoreError::InvalidAmount`](crate::CoreError::InvalidAmount) if the
    /// total is negative, which stored quotes cannot produce.
    pub fn from_quote(quote: &Quote) -> CoreResult<Self> {
        let items: Vec<PrintableLine> = quote
            .items_in_order()
            .into_iter()
            .enumerate()
            .map(|(index, item)| PrintableLine {
                position: index + 1,
                detail: item.fields.detail.clone(),
                quantity: item.fields.quantity,
                unit_price: item.fields.unit_price,
                line_total: item.line_total(),
            })
            .collect();

        let total: Money = items.iter().map(|line| line.line_total).sum();

        Ok(PrintableQuote {
            quote_id: quote.id.clone(),
            number: quote.header.number,
            date: quote.header.date,
            issuer_id: quote.header.issuer_id.clone(),
            counterparties: quote.header.counterparties.clone(),
            payment_note: quote.header.payment_note.clone(),
            items,
            total,
            total_words: total.to_words()?,
        })
    }

    /// JSON for the rendering layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
