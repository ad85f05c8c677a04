//! Unified error types for the arbitrage detector.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the arbitrage detector.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Quote data error.
    #[error("quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Arbitrage calculation error.
    #[error("arbitrage error: {0}")]
    Arbitrage(#[from] ArbitrageError),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-record quote defects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Price is zero or negative, so it has no implied probability.
    #[error("non-positive price {price} for {outcome} in {match_name} ({bookmaker})")]
    NonPositivePrice {
        /// Match the quote belongs to.
        match_name: String,
        /// Bookmaker offering the price.
        bookmaker: String,
        /// Outcome being priced.
        outcome: String,
        /// The offending price.
        price: Decimal,
    },

    /// Price is positive but at most 1.0, so a winning bet cannot return a profit.
    #[error("sub-unit price {price} for {outcome} in {match_name} ({bookmaker})")]
    SubUnitPrice {
        /// Match the quote belongs to.
        match_name: String,
        /// Bookmaker offering the price.
        bookmaker: String,
        /// Outcome being priced.
        outcome: String,
        /// The offending price.
        price: Decimal,
    },

    /// Record could not be decoded (missing field, non-numeric price).
    #[error("malformed quote: {reason}")]
    Malformed {
        /// Decoder message.
        reason: String,
    },

    /// A rendered leg did not match `Outcome@Price (Bookmaker)`.
    #[error("invalid leg: {0:?}")]
    InvalidLeg(String),
}

/// Arbitrage calculation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrageError {
    /// Bankroll must be positive to split into stakes.
    #[error("invalid bankroll: {0}")]
    InvalidBankroll(Decimal),

    /// Stake arithmetic exceeded the `Decimal` range.
    #[error("stake calculation overflowed for {match_name} with bankroll {bankroll}")]
    Overflow {
        /// Match being staked.
        match_name: String,
        /// Bankroll that was too large.
        bankroll: Decimal,
    },

    /// A leg's price has no implied probability.
    #[error("leg {outcome} in {match_name} has non-positive price {price}")]
    InvalidLegPrice {
        /// Match the leg belongs to.
        match_name: String,
        /// Outcome of the leg.
        outcome: String,
        /// The offending price.
        price: Decimal,
    },

    /// Opportunity carries no legs to stake.
    #[error("opportunity for {match_name} has no legs")]
    NoLegs {
        /// Match without legs.
        match_name: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
