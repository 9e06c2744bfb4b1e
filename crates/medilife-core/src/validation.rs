//! # Validation Module
//!
//! Field rules for quote drafts.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Editor form                                                   │
//! │  └── Required markers, max lengths                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Draft import (serde)                                          │
//! │  └── Type validation: dates, decimals, integers                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                   │
//! │  └── Header rules + rules on surviving line items                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                             │
//! │  ├── UNIQUE (issuer_id, number)                                         │
//! │  └── CHECK constraints on quote_items                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes: details are Spanish text
//! ("Prótesis", "Tornillo de 3,5 mm").

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_DETAIL_LEN, MAX_PAYMENT_NOTE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Field path for a submitted item (`items[3].detail`).
///
/// `index` is the 0-based position in the submitted list, blank rows
/// included, so the path points at the row the operator sees.
pub fn item_field(index: usize, name: &str) -> String {
    format!("items[{}].{}", index, name)
}

// =============================================================================
// Header Validators
// =============================================================================

/// Validates the issuing party reference.
///
/// ## Returns
/// The trimmed identity.
///
/// ## Example
/// ```rust
/// use medilife_core::validation::validate_issuer_id;
///
/// assert_eq!(validate_issuer_id("  emp-1 ").unwrap(), "emp-1");
/// assert!(validate_issuer_id("   ").is_err());
/// ```
pub fn validate_issuer_id(issuer_id: &str) -> ValidationResult<String> {
    let issuer_id = issuer_id.trim();

    if issuer_id.is_empty() {
        return Err(ValidationError::Required {
            field: "issuer_id".to_string(),
        });
    }

    Ok(issuer_id.to_string())
}

/// Validates a quote number.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_number(number: i64) -> ValidationResult<i64> {
    if number <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "number".to_string(),
        });
    }

    Ok(number)
}

/// Validates a payment note.
///
/// ## Rules
/// - Blank (empty after trimming) is stored as no note
/// - At most [`MAX_PAYMENT_NOTE_LEN`] characters
///
/// The note is otherwise kept verbatim, line breaks included.
pub fn validate_payment_note(note: &str) -> ValidationResult<Option<String>> {
    if note.trim().is_empty() {
        return Ok(None);
    }

    if note.chars().count() > MAX_PAYMENT_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: "payment_note".to_string(),
            max: MAX_PAYMENT_NOTE_LEN,
        });
    }

    Ok(Some(note.to_string()))
}

// =============================================================================
// Line Item Validators
// =============================================================================
// Applied to items that survived normalization only. Blank rows never get
// here, so a detail is never checked for emptiness.

/// Validates an already trimmed, non-empty detail.
pub fn validate_detail(index: usize, detail: &str) -> ValidationResult<()> {
    if detail.chars().count() > MAX_DETAIL_LEN {
        return Err(ValidationError::TooLong {
            field: item_field(index, "detail"),
            max: MAX_DETAIL_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price and converts it to [`Money`].
///
/// ## Rules
/// - Must be non-negative (zero is allowed: bonified items)
/// - Rounded to centavos, half away from zero
///
/// ## Example
/// ```rust
/// use medilife_core::validation::validate_unit_price;
/// use rust_decimal::Decimal;
///
/// let price = validate_unit_price(0, Decimal::new(1999, 2)).unwrap();
/// assert_eq!(price.cents(), 1999);
/// assert!(validate_unit_price(0, Decimal::new(-1, 0)).is_err());
/// ```
pub fn validate_unit_price(index: usize, unit_price: Decimal) -> ValidationResult<Money> {
    let out_of_range = || ValidationError::OutOfRange {
        field: item_field(index, "unit_price"),
        min: 0,
        max: i64::MAX,
    };

    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(out_of_range());
    }

    let money = Money::from_decimal(unit_price).ok_or_else(out_of_range)?;
    if money.is_negative() {
        return Err(out_of_range());
    }

    Ok(money)
}

/// Validates a display order (after zero has been replaced by the position).
pub fn validate_order(index: usize, order: i64) -> ValidationResult<()> {
    if order < 0 {
        return Err(ValidationError::MustBePositive {
            field: item_field(index, "order"),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
