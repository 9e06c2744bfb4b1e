//! # Audit Stamping
//!
//! Every write records when it happened and who did it. The stamp is made
//! here, around the store, so the quote rules never see a clock or a user.
//!
//! ## Decorator
//! ```text
//! QuoteService ──► AuditedStore<U> ──► QuoteRepository ──► SQLite
//!                   │
//!                   ├── insert:  created_at / created_by on quote + items
//!                   └── update:  modified_at / modified_by on quote and
//!                                on changed items; created_* on new items
//! ```
//!
//! The acting user comes from a [`CurrentUser`]; a missing or blank name
//! is stamped as `"system"`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use medilife_core::{NewQuote, Quote, QuoteHeader, ReconcilePlan};

use crate::error::DbResult;
use crate::repository::quote::QuoteRepository;
use crate::store::QuoteStore;

/// Name stamped when no user is known.
pub const SYSTEM_USER: &str = "system";

// =============================================================================
// Current User
// =============================================================================

/// Identity collaborator: who is acting right now.
pub trait CurrentUser: Send + Sync {
    /// Display name of the acting user, if any.
    fn display_name(&self) -> Option<String>;
}

/// No interactive user (batch jobs, seeding).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUser;

impl CurrentUser for SystemUser {
    fn display_name(&self) -> Option<String> {
        None
    }
}

/// A fixed user name, e.g. the logged-in operator.
#[derive(Debug, Clone)]
pub struct NamedUser(pub String);

impl NamedUser {
    pub fn new(name: impl Into<String>) -> Self {
        NamedUser(name.into())
    }
}

impl CurrentUser for NamedUser {
    fn display_name(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

// =============================================================================
// Audit Stamp
// =============================================================================

/// When and by whom a write happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    at: DateTime<Utc>,
    by: String,
}

impl AuditStamp {
    pub(crate) fn new(at: DateTime<Utc>, by: impl Into<String>) -> Self {
        AuditStamp { at, by: by.into() }
    }

    /// Stamp for `user`, now.
    pub(crate) fn now(user: &dyn CurrentUser) -> Self {
        let by = user
            .display_name()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| SYSTEM_USER.to_string());

        AuditStamp::new(Utc::now(), by)
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn by(&self) -> &str {
        &self.by
    }
}

// =============================================================================
// Audited Store
// =============================================================================

/// [`QuoteStore`] over a [`QuoteRepository`] that stamps every write.
#[derive(Debug, Clone)]
pub struct AuditedStore<U> {
    repository: QuoteRepository,
    user: U,
}

impl<U: CurrentUser> AuditedStore<U> {
    pub fn new(repository: QuoteRepository, user: U) -> Self {
        AuditedStore { repository, user }
    }

    fn stamp(&self) -> AuditStamp {
        let stamp = AuditStamp::now(&self.user);
        debug!(by = %stamp.by(), "Audit stamp");
        stamp
    }
}

#[async_trait]
impl<U: CurrentUser> QuoteStore for AuditedStore<U> {
    async fn get(&self, id: &str) -> DbResult<Option<Quote>> {
        self.repository.get_by_id(id).await
    }

    async fn max_number(&self) -> DbResult<Option<i64>> {
        self.repository.max_number().await
    }

    async fn list(&self) -> DbResult<Vec<Quote>> {
        self.repository.list().await
    }

    async fn insert(&self, quote: &NewQuote) -> DbResult<Quote> {
        self.repository.insert(quote, &self.stamp()).await
    }

    async fn update(&self, id: &str, header: &QuoteHeader, plan: &ReconcilePlan) -> DbResult<()> {
        self.repository
            .apply_update(id, header, plan, &self.stamp())
            .await
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        self.repository.delete(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
