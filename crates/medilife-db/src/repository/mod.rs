//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AuditedStore (QuoteStore)                                              │
//! │       │                                                                 │
//! │       │  repository.insert(&new_quote, &stamp)                          │
//! │       ▼                                                                 │
//! │  QuoteRepository                                                        │
//! │  ├── get_by_id / get_items / list                                       │
//! │  ├── max_number / count                                                 │
//! │  ├── insert / apply_update                                              │
//! │  └── delete                                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod quote;
