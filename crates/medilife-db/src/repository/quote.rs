//! # Quote Repository
//!
//! Database operations for quotes and their line items.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quote Writes                                      │
//! │                                                                         │
//! │  insert(new_quote, stamp)                                               │
//! │     BEGIN                                                               │
//! │     ├── INSERT quotes            (UNIQUE issuer_id, number)             │
//! │     └── INSERT quote_items × n                                          │
//! │     COMMIT                                                              │
//! │                                                                         │
//! │  apply_update(id, header, plan, stamp)                                  │
//! │     BEGIN                                                               │
//! │     ├── UPDATE quotes            (0 rows ⇒ NotFound, rollback)          │
//! │     ├── DELETE quote_items       plan.deletes                           │
//! │     ├── UPDATE quote_items       plan.updates                           │
//! │     └── INSERT quote_items       plan.inserts                           │
//! │     COMMIT                                                              │
//! │                                                                         │
//! │  delete(id)                                                             │
//! │     └── DELETE quotes            (items go with ON DELETE CASCADE)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::audit::AuditStamp;
use crate::error::{DbError, DbResult};
use medilife_core::{
    AuditInfo, Counterparties, ItemFields, LineItem, Money, NewQuote, Quote, QuoteHeader,
    ReconcilePlan,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct QuoteRow {
    id: String,
    number: i64,
    issuer_id: String,
    date: NaiveDate,
    provider_id: Option<String>,
    institution_id: Option<String>,
    patient_id: Option<String>,
    physician_id: Option<String>,
    payment_note: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<String>,
}

impl QuoteRow {
    fn into_quote(self, items: Vec<LineItem>) -> Quote {
        Quote {
            id: self.id,
            header: QuoteHeader {
                number: self.number,
                issuer_id: self.issuer_id,
                date: self.date,
                counterparties: Counterparties {
                    provider_id: self.provider_id,
                    institution_id: self.institution_id,
                    patient_id: self.patient_id,
                    physician_id: self.physician_id,
                },
                payment_note: self.payment_note,
            },
            items,
            audit: AuditInfo {
                created_at: self.created_at,
                created_by: self.created_by,
                modified_at: self.modified_at,
                modified_by: self.modified_by,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    quote_id: String,
    detail: String,
    quantity: i64,
    #[sqlx(rename = "unit_price_cents")]
    unit_price: Money,
    item_order: i64,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<String>,
}

impl From<ItemRow> for LineItem {
    fn from(row: ItemRow) -> Self {
        LineItem {
            id: row.id,
            quote_id: row.quote_id,
            fields: ItemFields {
                detail: row.detail,
                quantity: row.quantity,
                unit_price: row.unit_price,
                order: row.item_order,
            },
            audit: AuditInfo {
                created_at: row.created_at,
                created_by: row.created_by,
                modified_at: row.modified_at,
                modified_by: row.modified_by,
            },
        }
    }
}

fn created(stamp: &AuditStamp) -> AuditInfo {
    AuditInfo {
        created_at: stamp.at(),
        created_by: Some(stamp.by().to_string()),
        modified_at: None,
        modified_by: None,
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Gets a quote with its items by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quote>> {
        let row = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT
                id, number, issuer_id, date,
                provider_id, institution_id, patient_id, physician_id,
                payment_note,
                created_at, created_by, modified_at, modified_by
            FROM quotes
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(&row.id).await?;
                Ok(Some(row.into_quote(items)))
            }
            None => Ok(None),
        }
    }

    /// Gets a quote's items in display order (ties in insertion order).
    pub async fn get_items(&self, quote_id: &str) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT
                id, quote_id, detail, quantity, unit_price_cents, item_order,
                created_at, created_by, modified_at, modified_by
            FROM quote_items
            WHERE quote_id = ?1
            ORDER BY item_order ASC, rowid ASC
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    /// Highest quote number across every issuer.
    pub async fn max_number(&self) -> DbResult<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(number) FROM quotes")
            .fetch_one(&self.pool)
            .await?;

        Ok(max)
    }

    /// Counts persisted quotes.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Every quote with items, newest date first, then highest number.
    pub async fn list(&self) -> DbResult<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT
                id, number, issuer_id, date,
                provider_id, institution_id, patient_id, physician_id,
                payment_note,
                created_at, created_by, modified_at, modified_by
            FROM quotes
            ORDER BY date DESC, number DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT
                id, quote_id, detail, quantity, unit_price_cents, item_order,
                created_at, created_by, modified_at, modified_by
            FROM quote_items
            ORDER BY item_order ASC, rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_quote: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in item_rows {
            items_by_quote
                .entry(row.quote_id.clone())
                .or_default()
                .push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_quote.remove(&row.id).unwrap_or_default();
                row.into_quote(items)
            })
            .collect())
    }

    /// Inserts a new quote and its items.
    ///
    /// ## Returns
    /// The persisted quote with generated identities.
    pub async fn insert(&self, quote: &NewQuote, stamp: &AuditStamp) -> DbResult<Quote> {
        let id = Uuid::new_v4().to_string();
        let header = &quote.header;

        debug!(
            id = %id,
            issuer_id = %header.issuer_id,
            number = header.number,
            items = quote.items.len(),
            "Inserting quote"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, number, issuer_id, date,
                provider_id, institution_id, patient_id, physician_id,
                payment_note,
                created_at, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&id)
        .bind(header.number)
        .bind(&header.issuer_id)
        .bind(header.date)
        .bind(&header.counterparties.provider_id)
        .bind(&header.counterparties.institution_id)
        .bind(&header.counterparties.patient_id)
        .bind(&header.counterparties.physician_id)
        .bind(&header.payment_note)
        .bind(stamp.at())
        .bind(stamp.by())
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(quote.items.len());
        for fields in &quote.items {
            items.push(insert_item(&mut tx, &id, fields, stamp).await?);
        }

        tx.commit().await?;

        Ok(Quote {
            id,
            header: header.clone(),
            items,
            audit: created(stamp),
        })
    }

    /// Overwrites a quote's header and applies a reconciliation plan.
    ///
    /// Deleted and updated items are matched on both their id and the quote
    /// id, so a plan can never touch another quote's rows.
    pub async fn apply_update(
        &self,
        id: &str,
        header: &QuoteHeader,
        plan: &ReconcilePlan,
        stamp: &AuditStamp,
    ) -> DbResult<()> {
        debug!(
            id = %id,
            deletes = plan.deletes.len(),
            updates = plan.updates.len(),
            inserts = plan.inserts.len(),
            skipped = plan.skipped.len(),
            "Updating quote"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE quotes SET
                number = ?2,
                issuer_id = ?3,
                date = ?4,
                provider_id = ?5,
                institution_id = ?6,
                patient_id = ?7,
                physician_id = ?8,
                payment_note = ?9,
                modified_at = ?10,
                modified_by = ?11
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(header.number)
        .bind(&header.issuer_id)
        .bind(header.date)
        .bind(&header.counterparties.provider_id)
        .bind(&header.counterparties.institution_id)
        .bind(&header.counterparties.patient_id)
        .bind(&header.counterparties.physician_id)
        .bind(&header.payment_note)
        .bind(stamp.at())
        .bind(stamp.by())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quote", id));
        }

        for item_id in &plan.deletes {
            sqlx::query("DELETE FROM quote_items WHERE id = ?1 AND quote_id = ?2")
                .bind(item_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        for update in &plan.updates {
            sqlx::query(
                r#"
                UPDATE quote_items SET
                    detail = ?3,
                    quantity = ?4,
                    unit_price_cents = ?5,
                    item_order = ?6,
                    modified_at = ?7,
                    modified_by = ?8
                WHERE id = ?1 AND quote_id = ?2
                "#,
            )
            .bind(&update.id)
            .bind(id)
            .bind(&update.fields.detail)
            .bind(update.fields.quantity)
            .bind(update.fields.unit_price)
            .bind(update.fields.order)
            .bind(stamp.at())
            .bind(stamp.by())
            .execute(&mut *tx)
            .await?;
        }

        for fields in &plan.inserts {
            insert_item(&mut tx, id, fields, stamp).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a quote and its items.
    ///
    /// ## Returns
    /// `false` when no quote had this ID.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting quote");

        let result = sqlx::query("DELETE FROM quotes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_item(
    conn: &mut SqliteConnection,
    quote_id: &str,
    fields: &ItemFields,
    stamp: &AuditStamp,
) -> DbResult<LineItem> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO quote_items (
            id, quote_id, detail, quantity, unit_price_cents, item_order,
            created_at, created_by
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&id)
    .bind(quote_id)
    .bind(&fields.detail)
    .bind(fields.quantity)
    .bind(fields.unit_price)
    .bind(fields.order)
    .bind(stamp.at())
    .bind(stamp.by())
    .execute(&mut *conn)
    .await?;

    Ok(LineItem {
        id,
        quote_id: quote_id.to_string(),
        fields: fields.clone(),
        audit: created(stamp),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
