//! # medilife-db: Quote Persistence and Lifecycle
//!
//! SQLite storage for quotes, the audit hook that stamps every write, and the
//! service that runs create / update / delete / print over them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quote Data Flow                                  │
//! │                                                                         │
//! │  Editor submits QuoteDraft                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  medilife-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐    │    │
//! │  │   │ QuoteService │──►│ AuditedStore │──►│ QuoteRepository  │    │    │
//! │  │   │ (service.rs) │   │  (audit.rs)  │   │ (repository/)    │    │    │
//! │  │   └──────┬───────┘   └──────────────┘   └────────┬─────────┘    │    │
//! │  │          │ medilife-core rules                   │ SqlitePool   │    │
//! │  │          ▼                                       ▼ (pool.rs)    │    │
//! │  │   normalize, reconcile, number, print      migrations (embed)   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database                             │    │
//! │  │                  quotes ──< quote_items                         │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL for quotes and line items
//! - [`store`] - The storage seam used by the service
//! - [`audit`] - Audit stamping decorator and current user
//! - [`service`] - Quote lifecycle
//! - [`config`] - Environment configuration
//!
//! ## Usage
//!
//! ```rust,no_run
//! use medilife_core::{QuoteDraft, QuoteSettings};
//! use medilife_db::{Database, DbConfig, NamedUser};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DbConfig::new("./medilife.db")).await?;
//! let quotes = db.quote_service(NamedUser::new("mgarcia"), QuoteSettings::default());
//!
//! let mut draft = quotes.blank_draft(Some("emp-1")).await?;
//! draft.items[0].detail = Some("Placa de titanio".into());
//! let quote = quotes.create(draft).await?;
//!
//! let printable = quotes.render_for_print(&quote.id).await?;
//! println!("{}", printable.total_words);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::{AuditStamp, AuditedStore, CurrentUser, NamedUser, SystemUser, SYSTEM_USER};
pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::quote::QuoteRepository;
pub use service::{QuoteService, ServiceError, ServiceResult};
pub use store::QuoteStore;
