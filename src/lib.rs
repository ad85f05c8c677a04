//! Sure-bet arbitrage detection across bookmaker odds.
//!
//! Given decimal prices from several bookmakers, a match is an arbitrage when
//! backing the best price on every outcome costs less than the payout:
//!
//! ```text
//! Home @ 2.10 (B1)  ->  1 / 2.10 = 0.4762
//! Away @ 2.20 (B2)  ->  1 / 2.20 = 0.4545
//! ───────────────────────────────────────
//! Total implied:               0.9307 < 1.00
//! Edge:            (1 - 0.9307) * 100 = 6.93%
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`quote`]: Quote types, filtering and loading
//! - [`arbitrage`]: Opportunity detection and stake splitting
//! - [`metrics`]: Prometheus counters for detection runs

pub mod arbitrage;
pub mod config;
pub mod error;
pub mod metrics;
pub mod quote;

pub use config::Config;
pub use error::{AppError, Result};
