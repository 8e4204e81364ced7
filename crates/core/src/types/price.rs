//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept exactly as the Shop API reports them. The storefront
//! does not rescale minor units, so a variant priced `100` displays as
//! `100 USD`.

use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount as reported by the Shop API.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Formats as `"{amount} {code}"`, e.g. `100 USD`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.normalize(), self.currency_code)
    }
}

/// A currency code as the Shop API reports it.
///
/// Any code is accepted. Channels can be priced in currencies the storefront
/// has never heard of and their listings still show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(Cow<'static, str>);

impl CurrencyCode {
    pub const USD: Self = Self(Cow::Borrowed("USD"));
    pub const EUR: Self = Self(Cow::Borrowed("EUR"));

    /// Normalize a code to trimmed upper case. Blank codes become USD.
    #[must_use]
    pub fn new(code: &str) -> Self {
        let code = code.trim();
        if code.is_empty() {
            return Self::USD;
        }
        Self(Cow::Owned(code.to_ascii_uppercase()))
    }

    /// The code text.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::USD
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(100, 0), CurrencyCode::USD);
        assert_eq!(price.to_string(), "100 USD");

        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::EUR);
        assert_eq!(price.to_string(), "19.99 EUR");
    }

    #[test]
    fn test_price_display_drops_trailing_zeros() {
        let price = Price::new(Decimal::new(20000, 2), CurrencyCode::USD);
        assert_eq!(price.to_string(), "200 USD");
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::new(Decimal::ONE, CurrencyCode::USD).is_positive());
        assert!(!Price::new(Decimal::ZERO, CurrencyCode::USD).is_positive());
        assert!(!Price::new(Decimal::NEGATIVE_ONE, CurrencyCode::USD).is_positive());
    }

    #[test]
    fn test_any_currency_code_is_kept() {
        assert_eq!(CurrencyCode::new("usd"), CurrencyCode::USD);
        assert_eq!(CurrencyCode::new(" GBP ").code(), "GBP");
        assert_eq!(CurrencyCode::new("JPY").code(), "JPY");
        assert_eq!(CurrencyCode::new("  "), CurrencyCode::USD);

        let price = Price::new(Decimal::new(1500, 0), CurrencyCode::new("chf"));
        assert_eq!(price.to_string(), "1500 CHF");
    }

    #[test]
    fn test_currency_code_serializes_as_text() {
        let json = serde_json::to_string(&CurrencyCode::new("JPY")).unwrap();
        assert_eq!(json, "\"JPY\"");
        let parsed: CurrencyCode = serde_json::from_str("\"SEK\"").unwrap();
        assert_eq!(parsed.code(), "SEK");
    }
}
