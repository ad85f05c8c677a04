//! Arbitrage opportunity detection.
//!
//! Quotes are grouped by match (exact string equality, no case or whitespace
//! normalization) and then by outcome, keeping the highest price per outcome.
//! A match qualifies when `(1 - sum(1 / best_price)) * 100` strictly exceeds
//! the threshold. Matches and legs are reported in first-seen order.
//!
//! Reciprocals are cut to 28 significant digits, so a fair book such as
//! 3.0/3.0/3.0 sums to 0.999...9. The raw edge is rounded to
//! [`EDGE_PRECISION_DP`] places before it is compared with the threshold.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, instrument};

use super::opportunity::{round_display, Leg, Opportunity};
use crate::config::Config;
use crate::error::QuoteError;
use crate::metrics;
use crate::quote::{is_excluded, Quote, RejectedQuote};

/// Default minimum number of distinct outcomes for a match to qualify.
pub const DEFAULT_MIN_OUTCOMES: usize = 2;

/// Decimal places kept on the raw edge (in percent) before the threshold test.
pub const EDGE_PRECISION_DP: u32 = 12;

/// Options for a detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorSettings {
    /// Minimum edge in percentage points, strictly exceeded for inclusion.
    pub threshold_percent: Decimal,
    /// Matches with fewer distinct outcomes never qualify.
    pub min_outcomes: usize,
    /// Outcome name dropped before grouping (case-insensitive).
    pub exclude_outcome: Option<String>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            threshold_percent: Decimal::ZERO,
            min_outcomes: DEFAULT_MIN_OUTCOMES,
            exclude_outcome: None,
        }
    }
}

impl From<&Config> for DetectorSettings {
    fn from(config: &Config) -> Self {
        Self {
            threshold_percent: config.threshold_percent,
            min_outcomes: config.min_outcomes,
            exclude_outcome: config.exclude_outcome.clone(),
        }
    }
}

/// Result of a detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// Qualifying opportunities, in first-seen match order.
    pub opportunities: Vec<Opportunity>,
    /// Quotes excluded from aggregation as malformed.
    pub rejected: Vec<RejectedQuote>,
    /// Number of distinct matches that had at least one valid quote.
    pub matches_scanned: usize,
}

impl Detection {
    /// Whether no opportunity qualified.
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// Best quote per outcome for one match.
struct MatchBook<'a> {
    match_name: &'a str,
    best: Vec<&'a Quote>,
    slots: HashMap<&'a str, usize>,
}

impl<'a> MatchBook<'a> {
    fn new(match_name: &'a str) -> Self {
        Self {
            match_name,
            best: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Keep the higher price; on a tie the earlier quote stays.
    fn offer(&mut self, quote: &'a Quote) {
        match self.slots.get(quote.outcome.as_str()) {
            Some(&slot) => {
                if quote.price > self.best[slot].price {
                    self.best[slot] = quote;
                }
            }
            None => {
                self.slots.insert(quote.outcome.as_str(), self.best.len());
                self.best.push(quote);
            }
        }
    }

    fn total_implied_probability(&self) -> Decimal {
        self.best
            .iter()
            .filter_map(|q| q.implied_probability())
            .sum()
    }

    fn edge_percent(&self) -> Decimal {
        ((Decimal::ONE - self.total_implied_probability()) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(EDGE_PRECISION_DP, RoundingStrategy::MidpointAwayFromZero)
    }

    fn evaluate(&self, settings: &DetectorSettings) -> Option<Opportunity> {
        if self.best.len() < settings.min_outcomes {
            debug!(
                match_name = self.match_name,
                outcomes = self.best.len(),
                min_outcomes = settings.min_outcomes,
                "Too few outcomes to cover the market"
            );
            return None;
        }

        let edge = self.edge_percent();
        if edge <= settings.threshold_percent {
            debug!(
                match_name = self.match_name,
                edge = %edge,
                threshold = %settings.threshold_percent,
                "No arbitrage opportunity"
            );
            return None;
        }

        let opportunity = Opportunity {
            match_name: self.match_name.to_string(),
            edge_percent: round_display(edge),
            legs: self.best.iter().map(|q| Leg::from(*q)).collect(),
        };

        info!(
            match_name = self.match_name,
            edge_percent = %opportunity.edge_percent,
            legs = %opportunity.details(),
            "Arbitrage opportunity detected"
        );

        Some(opportunity)
    }
}

fn rejection_reason(error: &QuoteError) -> &'static str {
    match error {
        QuoteError::NonPositivePrice { .. } => "non_positive_price",
        QuoteError::SubUnitPrice { .. } => "sub_unit_price",
        QuoteError::Malformed { .. } => "malformed",
        QuoteError::InvalidLeg(_) => "invalid_leg",
    }
}

/// Detect opportunities whose edge strictly exceeds `threshold_percent`,
/// using default settings for everything else.
pub fn detect(quotes: &[Quote], threshold_percent: Decimal) -> Detection {
    detect_with(
        quotes,
        &DetectorSettings {
            threshold_percent,
            ..DetectorSettings::default()
        },
    )
}

/// Detect opportunities over a quote batch.
///
/// Quotes with a price at or below 1.0 are rejected individually and
/// reported in [`Detection::rejected`]; the rest of their match still
/// aggregates.
#[instrument(skip(quotes, settings), fields(quotes = quotes.len(), threshold = %settings.threshold_percent))]
pub fn detect_with(quotes: &[Quote], settings: &DetectorSettings) -> Detection {
    let _timer = metrics::timer_detection();
    metrics::inc_quotes_processed(quotes.len());

    let excluded = settings.exclude_outcome.as_deref();
    let mut books: Vec<MatchBook<'_>> = Vec::new();
    let mut by_match: HashMap<&str, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for (index, quote) in quotes.iter().enumerate() {
        if is_excluded(quote, excluded) {
            continue;
        }

        if let Err(error) = quote.validate() {
            debug!(index, error = %error, "Rejecting malformed quote");
            metrics::inc_quotes_rejected(rejection_reason(&error));
            rejected.push(RejectedQuote { index, error });
            continue;
        }

        let slot = match by_match.get(quote.match_name.as_str()) {
            Some(&slot) => slot,
            None => {
                by_match.insert(quote.match_name.as_str(), books.len());
                books.push(MatchBook::new(&quote.match_name));
                books.len() - 1
            }
        };
        books[slot].offer(quote);
    }

    metrics::inc_matches_scanned(books.len());

    let opportunities: Vec<Opportunity> = books
        .iter()
        .filter_map(|book| book.evaluate(settings))
        .collect();

    metrics::inc_opportunities_detected(opportunities.len());

    debug!(
        matches = books.len(),
        opportunities = opportunities.len(),
        rejected = rejected.len(),
        "Detection complete"
    );

    Detection {
        opportunities,
        rejected,
        matches_scanned: books.len(),
    }
}
