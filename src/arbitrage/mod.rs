//! Arbitrage module for detecting sure-bet opportunities.
//!
//! This module handles:
//! - Opportunity detection from bookmaker quotes
//! - Opportunity and leg types, details rendering and ranking
//! - Stake splitting across legs

pub mod calculator;
pub mod detector;
pub mod opportunity;

pub use calculator::{stake_plan, LegStake, StakePlan};
pub use detector::{detect, detect_with, Detection, DetectorSettings};
pub use opportunity::{parse_details, rank_by_edge, Leg, Opportunity};
