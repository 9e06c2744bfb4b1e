//! # Quote Service
//!
//! The quote lifecycle: drafts in, persisted quotes and printable snapshots
//! out.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Nuevo presupuesto"                                                    │
//! │     blank_draft()  → suggested number, today, 5 blank rows              │
//! │     create(draft)  → Quote            | Rejected { error, draft }       │
//! │                                       | DuplicateNumber                 │
//! │                                                                         │
//! │  "Editar"                                                               │
//! │     edit_draft(id) → persisted rows in order + blank padding            │
//! │     update(id, draft) → reconciled Quote | Rejected | NotFound          │
//! │                                                                         │
//! │  "Imprimir"                                                             │
//! │     render_for_print(id) → PrintableQuote (total + total in words)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Updates are last-writer-wins: two operators editing the same quote
//! overwrite each other's rows.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, info, warn};

use medilife_core::numbering::next_number;
use medilife_core::reconcile;
use medilife_core::{
    CoreError, PrintableQuote, Quote, QuoteDefaults, QuoteDraft, QuoteHeader, QuoteSettings,
    QuoteSummary, ValidationError,
};

use crate::error::DbError;
use crate::store::QuoteStore;

// =============================================================================
// Service Error
// =============================================================================

/// What a caller of the quote service sees.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The draft failed validation. It comes back exactly as submitted so the
    /// editor can show it again.
    #[error("Draft rejected: {error}")]
    Rejected {
        error: ValidationError,
        draft: Box<QuoteDraft>,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Core(CoreError::QuoteNotFound(_)))
    }

    pub fn is_duplicate_number(&self) -> bool {
        matches!(self, ServiceError::Core(CoreError::DuplicateNumber { .. }))
    }

    /// The rejected draft, if this is a validation failure.
    pub fn rejected_draft(&self) -> Option<&QuoteDraft> {
        match self {
            ServiceError::Rejected { draft, .. } => Some(draft),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn rejected(draft: &QuoteDraft) -> impl FnOnce(ValidationError) -> ServiceError + '_ {
    move |error| ServiceError::Rejected {
        error,
        draft: Box::new(draft.clone()),
    }
}

fn not_found(id: &str) -> ServiceError {
    CoreError::QuoteNotFound(id.to_string()).into()
}

/// A unique violation on a quote write can only be the business key. A
/// missing row means the quote was deleted under us.
fn write_error(err: DbError, header: &QuoteHeader) -> ServiceError {
    if let DbError::NotFound { id, .. } = &err {
        return not_found(id);
    }
    if err.is_unique_violation() {
        warn!(
            issuer_id = %header.issuer_id,
            number = header.number,
            "Quote number already taken"
        );
        return CoreError::DuplicateNumber {
            issuer_id: header.issuer_id.clone(),
            number: header.number,
        }
        .into();
    }
    err.into()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Quote Service
// =============================================================================

/// Drives the quote lifecycle over a [`QuoteStore`].
#[derive(Debug, Clone)]
pub struct QuoteService<S> {
    store: S,
    settings: QuoteSettings,
}

impl<S: QuoteStore> QuoteService<S> {
    pub fn new(store: S, settings: QuoteSettings) -> Self {
        QuoteService { store, settings }
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Suggested number for a new quote. Reserves nothing.
    pub async fn next_number(&self) -> ServiceResult<i64> {
        let max = self.store.max_number().await?;
        Ok(next_number(max))
    }

    /// The create form: suggested number, today, default note, blank rows.
    pub async fn blank_draft(&self, issuer_id: Option<&str>) -> ServiceResult<QuoteDraft> {
        let mut draft = QuoteDraft {
            number: Some(self.next_number().await?),
            date: Some(today()),
            issuer_id: issuer_id.map(str::to_string),
            payment_note: Some(self.settings.default_payment_note.clone()),
            ..QuoteDraft::default()
        };
        draft.pad_rows(self.settings.editor_rows);
        Ok(draft)
    }

    /// The edit form: persisted values, rows in order, blank padding.
    pub async fn edit_draft(&self, id: &str) -> ServiceResult<QuoteDraft> {
        let quote = self.get(id).await?;
        let mut draft = quote.to_draft();
        draft.pad_rows(self.settings.editor_rows);
        Ok(draft)
    }

    /// Creates a quote from a draft.
    ///
    /// ## Errors
    /// - `Rejected` when the draft breaks a rule
    /// - `DuplicateNumber` when `(issuer, number)` is taken; never renumbered
    pub async fn create(&self, draft: QuoteDraft) -> ServiceResult<Quote> {
        let number = match draft.number {
            Some(number) => number,
            None => self.next_number().await?,
        };

        let defaults = QuoteDefaults {
            number,
            date: today(),
            payment_note: &self.settings.default_payment_note,
        };
        let new_quote = draft.to_new_quote(&defaults).map_err(rejected(&draft))?;

        let quote = self
            .store
            .insert(&new_quote)
            .await
            .map_err(|e| write_error(e, &new_quote.header))?;

        info!(
            id = %quote.id,
            number = quote.header.number,
            items = quote.items.len(),
            "Quote created"
        );
        Ok(quote)
    }

    /// Applies a draft to a persisted quote: header overwrite plus item
    /// reconciliation.
    ///
    /// Submitting the same draft twice leaves the same items and total.
    ///
    /// ## Errors
    /// - `NotFound` when `id` does not resolve, or the draft carries another id
    /// - `Rejected` when the draft breaks a rule
    /// - `DuplicateNumber` when renumbering onto a taken number
    pub async fn update(&self, id: &str, draft: QuoteDraft) -> ServiceResult<Quote> {
        if draft.id.as_deref().is_some_and(|draft_id| draft_id != id) {
            return Err(not_found(id));
        }

        let current = self.get(id).await?;

        let header = draft
            .to_updated_header(&current.header)
            .map_err(rejected(&draft))?;
        let items = draft.normalized_items().map_err(rejected(&draft))?;

        let plan = reconcile::plan(&current.items, items);
        for stale in &plan.skipped {
            debug!(quote_id = %id, item_id = %stale, "Skipping unknown line item identity");
        }

        if plan.is_noop() && header == current.header {
            debug!(quote_id = %id, "Quote unchanged");
            return Ok(current);
        }

        self.store
            .update(id, &header, &plan)
            .await
            .map_err(|e| write_error(e, &header))?;

        info!(
            id = %id,
            deleted = plan.deletes.len(),
            updated = plan.updates.len(),
            inserted = plan.inserts.len(),
            "Quote updated"
        );
        self.get(id).await
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Quote> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }

    /// Deletes a quote and its items.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        info!(id = %id, "Quote deleted");
        Ok(())
    }

    /// Listing rows, newest date first, then highest number.
    pub async fn list(&self) -> ServiceResult<Vec<QuoteSummary>> {
        let quotes = self.store.list().await?;
        Ok(quotes.iter().map(Quote::summary).collect())
    }

    /// Printable snapshot with the total in words. Nothing is stored.
    pub async fn render_for_print(&self, id: &str) -> ServiceResult<PrintableQuote> {
        let quote = self.get(id).await?;
        Ok(PrintableQuote::from_quote(&quote)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{NamedUser, SystemUser};
    use crate::error::DbResult;
    use medilife_core::{NewQuote, ReconcilePlan};
    use crate::{Database, DbConfig};
    use medilife_core::{LineItemDraft, DEFAULT_PAYMENT_NOTE, MIN_EDITOR_ROWS};

    async fn service() -> QuoteService<crate::AuditedStore<SystemUser>> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.quote_service(SystemUser, QuoteSettings::default())
    }

    fn row(detail: &str, quantity: i64, price: &str) -> LineItemDraft {
        LineItemDraft {
            detail: Some(detail.to_string()),
            quantity,
            unit_price: price.parse().unwrap(),
            ..LineItemDraft::default()
        }
    }

    fn draft(items: Vec<LineItemDraft>) -> QuoteDraft {
        QuoteDraft {
            issuer_id: Some("emp-1".to_string()),
            items,
            ..QuoteDraft::default()
        }
    }

    #[tokio::test]
    async fn test_blank_draft() {
        let service = service().await;
        let blank = service.blank_draft(Some("emp-1")).await.unwrap();

        assert_eq!(blank.number, Some(1));
        assert_eq!(blank.date, Some(today()));
        assert_eq!(blank.payment_note.as_deref(), Some(DEFAULT_PAYMENT_NOTE));
        assert_eq!(blank.items.len(), MIN_EDITOR_ROWS);
        assert!(blank.items.iter().enumerate().all(|(i, r)| r.order == i as i64 + 1));
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let service = service().await;
        let quote = service.create(draft(vec![row("Placa", 1, "10")])).await.unwrap();

        assert_eq!(quote.header.number, 1);
        assert_eq!(quote.header.date, today());
        assert_eq!(quote.header.payment_note.as_deref(), Some(DEFAULT_PAYMENT_NOTE));
        assert_eq!(quote.audit.created_by.as_deref(), Some("system"));
        assert_eq!(service.next_number().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejected_draft_comes_back_unmodified() {
        let service = service().await;
        let bad = QuoteDraft {
            issuer_id: None,
            items: vec![row("  Placa  ", 1, "10"), LineItemDraft::blank(0)],
            ..QuoteDraft::default()
        };

        let err = service.create(bad.clone()).await.unwrap_err();
        assert!(matches!(
            &err,
            ServiceError::Rejected {
                error: ValidationError::Required { .. },
                ..
            }
        ));
        assert_eq!(err.rejected_draft(), Some(&bad));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_id_mismatch_is_not_found() {
        let service = service().await;
        let quote = service.create(draft(vec![])).await.unwrap();

        let mut edit = quote.to_draft();
        edit.id = Some("other".to_string());
        assert!(service.update(&quote.id, edit).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_stamps_modification() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db.quote_service(NamedUser::new("ana"), QuoteSettings::default());

        let quote = service.create(draft(vec![row("Placa", 1, "10")])).await.unwrap();
        assert_eq!(quote.audit.modified_at, None);

        let mut edit = quote.to_draft();
        edit.items[0].quantity = 3;
        let updated = service.update(&quote.id, edit).await.unwrap();

        assert_eq!(updated.audit.modified_by.as_deref(), Some("ana"));
        assert_eq!(updated.items[0].audit.modified_by.as_deref(), Some("ana"));
        assert_eq!(updated.total().cents(), 3_000);
    }

    #[tokio::test]
    async fn test_unchanged_update_writes_nothing() {
        let service = service().await;
        let quote = service.create(draft(vec![row("Placa", 1, "10")])).await.unwrap();

        let again = service.update(&quote.id, quote.to_draft()).await.unwrap();
        assert_eq!(again.header, quote.header);
        assert_eq!(again.items.len(), 1);
        assert_eq!(again.items[0].id, quote.items[0].id);
        assert_eq!(again.audit.modified_at, None);
    }

    /// Finds the quote, then loses it before the write lands.
    struct VanishingStore(Quote);

    #[async_trait::async_trait]
    impl QuoteStore for VanishingStore {
        async fn get(&self, _id: &str) -> DbResult<Option<Quote>> {
            Ok(Some(self.0.clone()))
        }

        async fn max_number(&self) -> DbResult<Option<i64>> {
            Ok(Some(self.0.header.number))
        }

        async fn list(&self) -> DbResult<Vec<Quote>> {
            Ok(vec![self.0.clone()])
        }

        async fn insert(&self, _quote: &NewQuote) -> DbResult<Quote> {
            Ok(self.0.clone())
        }

        async fn update(&self, id: &str, _: &QuoteHeader, _: &ReconcilePlan) -> DbResult<()> {
            Err(DbError::not_found("Quote", id))
        }

        async fn delete(&self, _id: &str) -> DbResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_update_of_vanished_quote_is_not_found() {
        let quote = service().await.create(draft(vec![])).await.unwrap();
        let vanishing = QuoteService::new(VanishingStore(quote.clone()), QuoteSettings::default());

        let mut edit = quote.to_draft();
        edit.payment_note = Some("Contado".to_string());

        let err = vanishing.update(&quote.id, edit).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, ServiceError::Core(CoreError::QuoteNotFound(ref id)) if *id == quote.id));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let service = service().await;
        assert!(service.delete("nope").await.unwrap_err().is_not_found());
        assert!(service.render_for_print("nope").await.unwrap_err().is_not_found());
    }
}
