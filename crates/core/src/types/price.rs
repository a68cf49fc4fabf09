//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are BRL; the store is single-vendor and the backend quotes
//! every price in the same currency. Using `Decimal` keeps line subtotals
//! and cart totals exact, which float math does not.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in BRL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount in reais.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount in reais.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display, e.g. `R$ 1.234,56`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let negative = rounded.is_sign_negative();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

        // Group the integer digits in threes with '.' separators (pt-BR)
        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*c);
        }

        let cents = format!("{frac_part:0<2}");
        let sign = if negative { "-" } else { "" };
        format!("{sign}R$ {grouped},{cents}")
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_times() {
        let unit = Price::from_cents(1050);
        assert_eq!(unit.times(3), Price::from_cents(3150));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(Price::from_cents(123_456).display(), "R$ 1.234,56");
        assert_eq!(Price::from_cents(900).display(), "R$ 9,00");
        assert_eq!(Price::from_cents(0).display(), "R$ 0,00");
        assert_eq!(Price::from_cents(100_000_000).display(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::from_cents(-1050).display(), "-R$ 10,50");
    }

    #[test]
    fn test_serde_as_string() {
        // serde-with-str keeps decimal amounts exact on the wire
        let price = Price::from_cents(1999);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
