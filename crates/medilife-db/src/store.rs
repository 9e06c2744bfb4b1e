//! # Quote Store
//!
//! The storage seam the quote service depends on.
//!
//! The service never writes through [`QuoteRepository`](crate::QuoteRepository)
//! directly; it is handed a store, normally
//! [`AuditedStore`](crate::AuditedStore), so every write is stamped.

use async_trait::async_trait;

use medilife_core::{NewQuote, Quote, QuoteHeader, ReconcilePlan};

use crate::error::DbResult;

/// Storage operations needed by the quote lifecycle.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Loads a quote with its items.
    async fn get(&self, id: &str) -> DbResult<Option<Quote>>;

    /// Highest number across every issuer, `None` when empty.
    async fn max_number(&self) -> DbResult<Option<i64>>;

    /// Every quote with its items, newest date first, then highest number.
    async fn list(&self) -> DbResult<Vec<Quote>>;

    /// Persists a new quote and its items in one transaction.
    ///
    /// A taken `(issuer_id, number)` fails with
    /// [`DbError::UniqueViolation`](crate::DbError::UniqueViolation).
    async fn insert(&self, quote: &NewQuote) -> DbResult<Quote>;

    /// Overwrites the header and applies the item plan in one transaction.
    async fn update(&self, id: &str, header: &QuoteHeader, plan: &ReconcilePlan) -> DbResult<()>;

    /// Deletes a quote and, by cascade, its items. `false` if absent.
    async fn delete(&self, id: &str) -> DbResult<bool>;
}
