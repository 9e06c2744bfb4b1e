//! # Numeral Words
//!
//! Spanish rendering of integers and peso amounts for the printed legal
//! total ("SON PESOS: ...").
//!
//! ## Decomposition
//! ```text
//! 2_345_678_901
//!   │
//!   ├── / 1_000_000_000 = 2    → "dos mil millones"   (1 → "mil millones")
//!   ├── / 1_000_000     = 345  → "trescientos cuarenta y cinco millones"
//!   │                                                   (1 → "un millón")
//!   ├── / 1_000         = 678  → "seiscientos setenta y ocho mil"
//!   │                                                   (1 → "mil")
//!   └── remainder       = 901  → "novecientos uno"
//! ```
//!
//! Each 1-999 chunk goes through three range tables: hundreds
//! ("cien" / "ciento"), tens (10-15 irregular, "dieci-", "veinti-",
//! "treinta y ...") and units.
//!
//! The fused forms are written without accents ("dieciseis", "veintidos") and
//! chunk multipliers are not apocopated ("veintiuno mil"), matching the
//! documents already printed by the system.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

const UNITS: [&str; 10] = [
    "", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve",
];

const TEENS: [&str; 6] = ["diez", "once", "doce", "trece", "catorce", "quince"];

const TENS: [&str; 7] = [
    "treinta",
    "cuarenta",
    "cincuenta",
    "sesenta",
    "setenta",
    "ochenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

/// Scale chunks, largest first: (size, label when the chunk is 1, label otherwise).
const SCALES: [(u64, &str, &str); 3] = [
    (1_000_000_000, "mil millones", "mil millones"),
    (1_000_000, "un millón", "millones"),
    (1_000, "mil", "mil"),
];

/// Renders an integer in Spanish words.
///
/// ## Example
/// ```rust
/// use medilife_core::words::integer_to_words;
///
/// assert_eq!(integer_to_words(0), "cero");
/// assert_eq!(integer_to_words(101), "ciento uno");
/// assert_eq!(integer_to_words(2_000_000), "dos millones");
/// assert_eq!(integer_to_words(-15), "menos quince");
/// ```
pub fn integer_to_words(n: i64) -> String {
    if n < 0 {
        return format!("menos {}", unsigned_to_words(n.unsigned_abs()));
    }
    unsigned_to_words(n as u64)
}

/// Renders a peso amount as the legal total phrase.
///
/// ## Rules
/// - Rounded to 2 decimals, midpoints away from zero
/// - Whole pesos in words, centavos as two digits over 100
/// - Whole phrase upper-cased
///
/// ## Errors
/// [`CoreError::InvalidAmount`] for negative amounts (a printed total is never
/// negative) and for whole parts beyond `u64`.
///
/// ## Example
/// ```rust
/// use medilife_core::words::currency_to_words;
/// use rust_decimal::Decimal;
///
/// let phrase = currency_to_words(Decimal::new(12345, 1)).unwrap(); // 1234.5
/// assert_eq!(phrase, "MIL DOSCIENTOS TREINTA Y CUATRO PESOS CON 50/100");
/// ```
pub fn currency_to_words(amount: Decimal) -> CoreResult<String> {
    let invalid = || CoreError::InvalidAmount {
        amount: amount.to_string(),
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid());
    }

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.floor();
    let hundredths = ((rounded - whole) * Decimal::ONE_HUNDRED)
        .round()
        .to_u8()
        .ok_or_else(invalid)?;
    let pesos = whole.to_u64().ok_or_else(invalid)?;

    let mut words = unsigned_to_words(pesos);
    if words.trim().is_empty() {
        words = "cero".to_string();
    }

    Ok(format!("{} PESOS CON {:02}/100", words, hundredths).to_uppercase())
}

impl Money {
    /// Renders this amount as the legal total phrase.
    ///
    /// ```rust
    /// use medilife_core::Money;
    ///
    /// assert_eq!(Money::zero().to_words().unwrap(), "CERO PESOS CON 00/100");
    /// ```
    pub fn to_words(&self) -> CoreResult<String> {
        currency_to_words(self.to_decimal())
    }
}

fn unsigned_to_words(n: u64) -> String {
    if n == 0 {
        return "cero".to_string();
    }

    let mut rest = n;
    let mut parts: Vec<String> = Vec::new();

    for (size, one, many) in SCALES {
        let chunk = rest / size;
        rest %= size;

        match chunk {
            0 => {}
            1 => parts.push(one.to_string()),
            _ => parts.push(format!("{} {}", unsigned_to_words(chunk), many)),
        }
    }

    if rest > 0 {
        parts.push(hundreds(rest as u16));
    }

    parts.join(" ")
}

/// 1-999.
fn hundreds(n: u16) -> String {
    if n < 100 {
        return tens(n);
    }

    let (h, rest) = (usize::from(n / 100), n % 100);
    let word = match (h, rest) {
        (1, 0) => "cien",
        _ => HUNDREDS[h],
    };

    if rest == 0 {
        word.to_string()
    } else {
        format!("{} {}", word, tens(rest))
    }
}

/// 0-99. Zero renders as the empty string.
fn tens(n: u16) -> String {
    let n = usize::from(n);
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=15 => TEENS[n - 10].to_string(),
        16..=19 => format!("dieci{}", UNITS[n - 10]),
        20 => "veinte".to_string(),
        21..=29 => format!("veinti{}", UNITS[n - 20]),
        _ => {
            let ten = TENS[n / 10 - 3];
            match n % 10 {
                0 => ten.to_string(),
                unit => format!("{} y {}", ten, UNITS[unit]),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_regression_fixtures() {
        let fixtures: &[(i64, &str)] = &[
            (0, "cero"),
            (1, "uno"),
            (15, "quince"),
            (16, "dieciseis"),
            (20, "veinte"),
            (21, "veintiuno"),
            (30, "treinta"),
            (100, "cien"),
            (101, "ciento uno"),
            (200, "doscientos"),
            (1000, "mil"),
            (1001, "mil uno"),
            (2000, "dos mil"),
            (1_000_000, "un millón"),
            (2_000_000, "dos millones"),
            (1_000_000_000, "mil millones"),
        ];

        for (n, expected) in fixtures {
            assert_eq!(integer_to_words(*n), *expected, "n = {}", n);
        }
    }

    #[test]
    fn test_tens_ranges() {
        assert_eq!(integer_to_words(10), "diez");
        assert_eq!(integer_to_words(19), "diecinueve");
        assert_eq!(integer_to_words(22), "veintidos");
        assert_eq!(integer_to_words(29), "veintinueve");
        assert_eq!(integer_to_words(34), "treinta y cuatro");
        assert_eq!(integer_to_words(99), "noventa y nueve");
    }

    #[test]
    fn test_hundreds_ranges() {
        assert_eq!(integer_to_words(115), "ciento quince");
        assert_eq!(integer_to_words(500), "quinientos");
        assert_eq!(integer_to_words(777), "setecientos setenta y siete");
        assert_eq!(integer_to_words(999), "novecientos noventa y nueve");
    }

    #[test]
    fn test_scale_chunks() {
        assert_eq!(integer_to_words(21_000), "veintiuno mil");
        assert_eq!(integer_to_words(100_000), "cien mil");
        assert_eq!(integer_to_words(1_000_001), "un millón uno");
        assert_eq!(integer_to_words(1_001_000), "un millón mil");
        assert_eq!(
            integer_to_words(2_345_678_901),
            "dos mil millones trescientos cuarenta y cinco millones \
             seiscientos setenta y ocho mil novecientos uno"
        );
        assert_eq!(
            integer_to_words(999_999_999_999),
            "novecientos noventa y nueve mil millones \
             novecientos noventa y nueve millones \
             novecientos noventa y nueve mil novecientos noventa y nueve"
        );
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(integer_to_words(-1), "menos uno");
        assert_eq!(integer_to_words(-2000), "menos dos mil");
        assert!(integer_to_words(i64::MIN).starts_with("menos "));
    }

    #[test]
    fn test_currency_fixtures() {
        assert_eq!(
            currency_to_words(dec("1234.5")).unwrap(),
            "MIL DOSCIENTOS TREINTA Y CUATRO PESOS CON 50/100"
        );
        assert_eq!(currency_to_words(Decimal::ZERO).unwrap(), "CERO PESOS CON 00/100");
    }

    #[test]
    fn test_currency_rounding() {
        assert_eq!(currency_to_words(dec("0.005")).unwrap(), "CERO PESOS CON 01/100");
        assert_eq!(currency_to_words(dec("0.994")).unwrap(), "CERO PESOS CON 99/100");
        assert_eq!(currency_to_words(dec("0.995")).unwrap(), "UNO PESOS CON 00/100");
        assert_eq!(
            currency_to_words(dec("1000000.10")).unwrap(),
            "UN MILLÓN PESOS CON 10/100"
        );
    }

    #[test]
    fn test_currency_rejects_negative() {
        let err = currency_to_words(dec("-0.01")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_money_to_words() {
        let total = Money::from_cents(200_075);
        assert_eq!(total.to_words().unwrap(), "DOS MIL PESOS CON 75/100");
    }
}
