//! # Line Item Reconciliation
//!
//! Turns a submitted, possibly sparse list of editor rows into the exact set
//! of inserts, updates and deletes that makes the persisted items match it.
//!
//! ## Pipeline
//! ```text
//! submitted rows (blank padding included)
//!      │
//!      ▼  normalize_items
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ 1. trim detail, order 0 ⇒ 1-based row position (before filtering)       │
//! │ 2. drop rows with blank detail or quantity <= 0                         │
//! │    survivors: detail length, unit price, order rules                    │
//! │    line totals and their sum must fit in centavos                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//!      │  Vec<NormalizedItem>
//!      ▼  plan(existing, incoming)
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ 3. split survivors: with identity / new                                 │
//! │ 4. persisted ids not claimed by a survivor      ──► deletes             │
//! │ 5. claimed ids with different values            ──► updates             │
//! │    claimed ids with identical values            ──► unchanged           │
//! │    ids that match no persisted item (stale)     ──► skipped             │
//! │ 6. survivors without identity                   ──► inserts             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clearing a row's detail therefore deletes it: the row is filtered in
//! step 2 and its identity is not claimed in step 4.

use std::collections::HashMap;

use crate::draft::LineItemDraft;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ItemFields, LineItem};
use crate::validation::{
    item_field, validate_detail, validate_order, validate_unit_price, ValidationResult,
};

/// A surviving row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedItem {
    /// Identity of the persisted row this one claims.
    pub id: Option<String>,
    pub fields: ItemFields,
}

/// Normalizes editor rows (steps 1-2) and validates the survivors.
///
/// ## Example
/// ```rust
/// use medilife_core::draft::LineItemDraft;
/// use medilife_core::reconcile::normalize_items;
///
/// let rows = vec![
///     LineItemDraft::blank(0),
///     LineItemDraft { detail: Some(" Placa ".into()), ..LineItemDraft::default() },
/// ];
/// let items = normalize_items(&rows).unwrap();
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].fields.detail, "Placa");
/// assert_eq!(items[0].fields.order, 2);
/// ```
pub fn normalize_items(rows: &[LineItemDraft]) -> ValidationResult<Vec<NormalizedItem>> {
    let mut survivors = Vec::with_capacity(rows.len());
    let mut total = Money::zero();

    for (index, row) in rows.iter().enumerate() {
        let position = index as i64 + 1;
        let order = if row.order == 0 { position } else { row.order };
        let detail = row.detail.as_deref().unwrap_or_default().trim();

        if detail.is_empty() || row.quantity <= 0 {
            continue;
        }

        validate_detail(index, detail)?;
        let unit_price = validate_unit_price(index, row.unit_price)?;
        validate_order(index, order)?;

        // Every later total must fit in centavos.
        total = unit_price
            .checked_multiply_quantity(row.quantity)
            .ok_or_else(|| too_large(item_field(index, "line_total")))?
            .checked_add(total)
            .ok_or_else(|| too_large("total".to_string()))?;

        let id = row
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        survivors.push(NormalizedItem {
            id,
            fields: ItemFields {
                detail: detail.to_string(),
                quantity: row.quantity,
                unit_price,
                order,
            },
        });
    }

    Ok(survivors)
}

fn too_large(field: String) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Reconcile Plan
// =============================================================================

/// New values for a persisted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub id: String,
    pub fields: ItemFields,
}

/// Changes needed to make a quote's persisted items match a draft.
///
/// Applied by the storage adapter in one transaction with the header update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Persisted items no survivor claims.
    pub deletes: Vec<String>,

    /// Claimed items whose values change.
    pub updates: Vec<ItemUpdate>,

    /// Survivors without identity, in submitted order.
    pub inserts: Vec<ItemFields>,

    /// Claimed items whose values are already current.
    pub unchanged: Vec<String>,

    /// Identities that match no persisted item of this quote. Ignored.
    pub skipped: Vec<String>,
}

impl ReconcilePlan {
    /// True when applying the plan writes nothing.
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }
}

/// Diffs normalized survivors against the persisted items (steps 3-6).
///
/// When several survivors claim the same identity, the last one wins, the
/// same as applying them one after the other.
pub fn plan(existing: &[LineItem], incoming: Vec<NormalizedItem>) -> ReconcilePlan {
    let persisted: HashMap<&str, &LineItem> =
        existing.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut claimed: HashMap<String, ItemFields> = HashMap::new();
    let mut plan = ReconcilePlan::default();

    for item in incoming {
        match item.id {
            Some(id) if persisted.contains_key(id.as_str()) => {
                claimed.insert(id, item.fields);
            }
            Some(id) => plan.skipped.push(id),
            None => plan.inserts.push(item.fields),
        }
    }

    for current in existing {
        match claimed.remove(&current.id) {
            Some(fields) if fields == current.fields => plan.unchanged.push(current.id.clone()),
            Some(fields) => plan.updates.push(ItemUpdate {
                id: current.id.clone(),
                fields,
            }),
            None => plan.deletes.push(current.id.clone()),
        }
    }

    plan
}

// =============================================================================
// Unit Tests
// =============================================================================
