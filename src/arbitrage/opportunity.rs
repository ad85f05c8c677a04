//! Arbitrage opportunity and leg types.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::QuoteError;
use crate::quote::Quote;

/// Decimal places kept on reported edges and stakes.
pub const DISPLAY_DP: u32 = 2;

static LEG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<outcome>[^@]+?)\s*@\s*(?P<price>\S+)\s+\((?P<bookmaker>.*)\)\s*$")
        .expect("leg pattern is valid")
});

/// Round half away from zero to [`DISPLAY_DP`] places.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Best available price for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Outcome covered by this leg.
    pub outcome: String,
    /// Best decimal price found for the outcome.
    pub price: Decimal,
    /// Bookmaker offering that price.
    pub bookmaker: String,
}

impl Leg {
    /// Implied probability `1 / price`, `None` for non-positive prices.
    pub fn implied_probability(&self) -> Option<Decimal> {
        if self.price <= Decimal::ZERO {
            return None;
        }
        Decimal::ONE.checked_div(self.price)
    }
}

impl From<&Quote> for Leg {
    fn from(quote: &Quote) -> Self {
        Self {
            outcome: quote.outcome.clone(),
            price: quote.price,
            bookmaker: quote.bookmaker.clone(),
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.outcome, self.price, self.bookmaker)
    }
}

impl FromStr for Leg {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LEG_PATTERN
            .captures(s)
            .ok_or_else(|| QuoteError::InvalidLeg(s.to_string()))?;

        let price = Decimal::from_str(&caps["price"])
            .map_err(|_| QuoteError::InvalidLeg(s.to_string()))?;
        if price <= Decimal::ONE {
            return Err(QuoteError::InvalidLeg(s.to_string()));
        }

        Ok(Self {
            outcome: caps["outcome"].to_string(),
            price,
            bookmaker: caps["bookmaker"].to_string(),
        })
    }
}

/// Parse a `"; "`-joined details string back into legs.
pub fn parse_details(details: &str) -> Result<Vec<Leg>, QuoteError> {
    details
        .split(';')
        .filter(|segment| !segment.trim().is_empty())
        .map(Leg::from_str)
        .collect()
}

/// Detected arbitrage opportunity for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Match the legs belong to.
    #[serde(rename = "match")]
    pub match_name: String,
    /// `(1 - sum of implied probabilities) * 100`, rounded to 2 dp.
    pub edge_percent: Decimal,
    /// One leg per distinct outcome, in first-seen outcome order.
    pub legs: SmallVec<[Leg; 3]>,
}

impl Opportunity {
    /// Sum of the legs' implied probabilities (unrounded).
    ///
    /// `None` if any leg has a non-positive price.
    pub fn total_implied_probability(&self) -> Option<Decimal> {
        self.legs.iter().map(Leg::implied_probability).sum()
    }

    /// Legs rendered as `Outcome@Price (Bookmaker)` joined by `"; "`.
    pub fn details(&self) -> String {
        self.legs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | edge {}% | {}",
            self.match_name,
            self.edge_percent,
            self.details()
        )
    }
}

/// Sort highest edge first. Equal edges keep their detection order.
pub fn rank_by_edge(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| b.edge_percent.cmp(&a.edge_percent));
}
