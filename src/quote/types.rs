//! Bookmaker quote types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// One bookmaker's decimal price for one outcome of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Match identifier (e.g. "Arsenal vs Chelsea").
    #[serde(rename = "match", alias = "Match")]
    pub match_name: String,
    /// Bookmaker offering the price.
    #[serde(alias = "Bookmaker")]
    pub bookmaker: String,
    /// Outcome being priced (team name, "Draw", ...).
    #[serde(alias = "Outcome")]
    pub outcome: String,
    /// Decimal (European) price: payout multiple on a winning stake.
    #[serde(alias = "Price")]
    pub price: Decimal,
}

impl Quote {
    /// Create a new quote.
    pub fn new(
        match_name: impl Into<String>,
        bookmaker: impl Into<String>,
        outcome: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            bookmaker: bookmaker.into(),
            outcome: outcome.into(),
            price,
        }
    }

    /// Reject prices outside the decimal-odds domain.
    ///
    /// Non-positive prices have no implied probability; prices in `(0, 1]`
    /// imply a probability of at least 100% and never return a profit.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.price <= Decimal::ZERO {
            return Err(QuoteError::NonPositivePrice {
                match_name: self.match_name.clone(),
                bookmaker: self.bookmaker.clone(),
                outcome: self.outcome.clone(),
                price: self.price,
            });
        }
        if self.price <= Decimal::ONE {
            return Err(QuoteError::SubUnitPrice {
                match_name: self.match_name.clone(),
                bookmaker: self.bookmaker.clone(),
                outcome: self.outcome.clone(),
                price: self.price,
            });
        }
        Ok(())
    }

    /// Implied probability `1 / price`, `None` for non-positive prices.
    pub fn implied_probability(&self) -> Option<Decimal> {
        if self.price <= Decimal::ZERO {
            return None;
        }
        Decimal::ONE.checked_div(self.price)
    }
}

/// A quote that was excluded from detection, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedQuote {
    /// Zero-based index of the record in the input batch.
    pub index: usize,
    /// Why it was rejected.
    pub error: QuoteError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_accepts_positive_price() {
        let quote = Quote::new("A vs B", "Unibet", "A", dec!(1.01));
        assert!(quote.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_and_negative_prices() {
        let zero = Quote::new("A vs B", "Unibet", "A", dec!(0));
        let negative = Quote::new("A vs B", "Unibet", "A", dec!(-2.5));

        assert!(matches!(
            zero.validate(),
            Err(QuoteError::NonPositivePrice { .. })
        ));
        assert!(negative.validate().is_err());
        assert_eq!(zero.implied_probability(), None);
    }

    #[test]
    fn validate_rejects_prices_at_or_below_one() {
        let even = Quote::new("A vs B", "Unibet", "A", dec!(1.0));
        let below = Quote::new("A vs B", "Unibet", "A", dec!(0.5));

        assert!(matches!(
            even.validate(),
            Err(QuoteError::SubUnitPrice { .. })
        ));
        assert!(matches!(
            below.validate(),
            Err(QuoteError::SubUnitPrice { .. })
        ));
    }

    #[test]
    fn implied_probability_is_reciprocal() {
        let quote = Quote::new("A vs B", "Unibet", "A", dec!(2.5));
        assert_eq!(quote.implied_probability(), Some(dec!(0.4)));
    }

    #[test]
    fn deserializes_capitalized_keys() {
        let json = r#"{"Match":"A vs B","Bookmaker":"Betfair","Outcome":"Draw","Price":3.4}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();

        assert_eq!(quote.match_name, "A vs B");
        assert_eq!(quote.outcome, "Draw");
        assert_eq!(quote.price, dec!(3.4));
    }
}
