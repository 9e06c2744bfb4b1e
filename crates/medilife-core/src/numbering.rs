//! # Quote Numbering
//!
//! The suggested number for a new draft: highest persisted number across
//! every issuer, plus one.
//!
//! The suggestion reserves nothing. Uniqueness is scoped per issuer and
//! enforced when the quote is persisted, where a collision comes back as
//! [`CoreError::DuplicateNumber`](crate::CoreError::DuplicateNumber).

/// Next number given the current maximum (`None` when no quote exists).
///
/// ```rust
/// use medilife_core::numbering::next_number;
///
/// assert_eq!(next_number(None), 1);
/// assert_eq!(next_number(Some(41)), 42);
/// ```
pub fn next_number(max_existing: Option<i64>) -> i64 {
    match max_existing {
        Some(max) if max > 0 => max.saturating_add(1),
        _ => 1,
    }
}
