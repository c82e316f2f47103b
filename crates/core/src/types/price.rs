//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
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

    /// Create a price in Brazilian reais, the store's currency.
    #[must_use]
    pub const fn brl(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::BRL)
    }

    /// Format for display, rounded to two decimal places.
    ///
    /// ```
    /// use codeburger_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::brl(Decimal::new(123_450, 2));
    /// assert_eq!(price.display(), "R$ 1.234,50");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let grouped = group_thousands(whole, GROUP_SEPARATOR);

        format!(
            "{sign}{}{grouped}{DECIMAL_SEPARATOR}{fraction}",
            self.currency_code.symbol()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// pt-BR number formatting.
const GROUP_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// ISO 4217 currency codes the store prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
}

impl CurrencyCode {
    /// Display prefix, including the separating space.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
        }
    }
}

fn group_thousands(whole: &str, sep: char) -> String {
    let len = whole.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_brl() {
        assert_eq!(Price::brl(Decimal::new(1990, 2)).display(), "R$ 19,90");
        assert_eq!(Price::brl(Decimal::new(5, 0)).display(), "R$ 5,00");
        assert_eq!(
            Price::brl(Decimal::new(123_456_789, 2)).display(),
            "R$ 1.234.567,89"
        );
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::brl(Decimal::new(19_999, 3)).display(), "R$ 20,00");
    }

    #[test]
    fn test_price_deserializes_with_iso_code() {
        let price: Price =
            serde_json::from_str(r#"{"amount":"32.50","currency_code":"BRL"}"#).unwrap();
        assert_eq!(price, Price::new(Decimal::new(3250, 2), CurrencyCode::BRL));
        assert_eq!(price.display(), "R$ 32,50");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::brl(Decimal::new(-250, 2)).display(), "-R$ 2,50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0", '.'), "0");
        assert_eq!(group_thousands("999", '.'), "999");
        assert_eq!(group_thousands("1000", '.'), "1.000");
        assert_eq!(group_thousands("1234567", GROUP_SEPARATOR), "1.234.567");
    }
}
