//! Quote composition settings.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_PAYMENT_NOTE, MIN_EDITOR_ROWS};

/// Tunables for drafts.
///
/// ## Example
/// ```rust
/// use medilife_core::settings::QuoteSettings;
///
/// let settings = QuoteSettings::default()
///     .payment_note("Contado anticipado")
///     .editor_rows(8);
/// assert_eq!(settings.editor_rows, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Note stored when a create draft carries none.
    pub default_payment_note: String,

    /// Minimum rows an editor draft is padded to. Never below
    /// [`MIN_EDITOR_ROWS`].
    pub editor_rows: usize,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            default_payment_note: DEFAULT_PAYMENT_NOTE.to_string(),
            editor_rows: MIN_EDITOR_ROWS,
        }
    }
}

impl QuoteSettings {
    /// Set the default payment note.
    pub fn payment_note(mut self, note: impl Into<String>) -> Self {
        self.default_payment_note = note.into();
        self
    }

    /// Set the editor row count (clamped to [`MIN_EDITOR_ROWS`]).
    pub fn editor_rows(mut self, rows: usize) -> Self {
        self.editor_rows = rows.max(MIN_EDITOR_ROWS);
        self
    }
}
