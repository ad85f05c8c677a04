//! Quote module for bookmaker prices.
//!
//! This module handles:
//! - Quote types and validation
//! - Outcome exclusion before detection
//! - Loading quote batches from JSON

pub mod filter;
pub mod loader;
pub mod types;

pub use filter::is_excluded;
pub use loader::{load_quotes, parse_quotes, LoadedQuotes};
pub use types::{Quote, RejectedQuote};
