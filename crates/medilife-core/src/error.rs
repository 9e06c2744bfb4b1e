//! # Error Types
//!
//! Domain-specific error types for medilife-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medilife-core errors (this file)                                       │
//! │  ├── CoreError        - Quote domain outcomes                           │
//! │  └── ValidationError  - Draft header / line item rule failures          │
//! │                                                                         │
//! │  medilife-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── ServiceError     - What the caller of the quote service sees       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are retried automatically. A `DuplicateNumber` in particular
//! goes back to the operator, who picks a different number.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Quote domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Draft failed a header or line item rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Quote identity does not resolve to a persisted quote.
    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    /// The `(issuer, number)` pair is already taken.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator A opens "new quote"  → suggested number 42
    /// Operator B opens "new quote"  → suggested number 42
    /// Operator A saves              → OK
    /// Operator B saves              → DuplicateNumber { issuer, 42 }
    ///      │
    ///      ▼
    /// UI shows the form again so B can renumber by hand
    /// ```
    #[error("Quote number {number} already exists for issuer {issuer_id}")]
    DuplicateNumber { issuer_id: String, number: i64 },

    /// Amount cannot be rendered as a legal total (negative or out of range).
    #[error("Invalid amount for currency rendering: {amount}")]
    InvalidAmount { amount: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for quote drafts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable amount or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
