//! Stake and payout calculations for arbitrage opportunities.

use rust_decimal::Decimal;
use serde::Serialize;

use super::opportunity::{round_display, Leg, Opportunity};
use crate::error::ArbitrageError;

/// Stake to place on one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegStake {
    /// Leg being staked.
    pub leg: Leg,
    /// Amount to stake, rounded to 2 dp.
    pub stake: Decimal,
    /// Return if this leg wins (stake * price), rounded to 2 dp.
    pub payout: Decimal,
}

/// Bankroll split across every leg of an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakePlan {
    /// Total amount to be staked.
    pub bankroll: Decimal,
    /// Per-leg stakes, in leg order.
    pub stakes: Vec<LegStake>,
    /// Payout whichever outcome wins (bankroll / total implied probability).
    pub guaranteed_payout: Decimal,
    /// Guaranteed payout minus bankroll.
    pub guaranteed_profit: Decimal,
}

impl StakePlan {
    /// Return on the bankroll as a percentage.
    pub fn roi(&self) -> Decimal {
        if self.bankroll.is_zero() {
            Decimal::ZERO
        } else {
            round_display((self.guaranteed_profit / self.bankroll) * Decimal::ONE_HUNDRED)
        }
    }
}

/// Split `bankroll` so every leg pays out the same amount.
///
/// Each stake is proportional to its leg's implied probability:
/// `stake_i = bankroll * (1 / price_i) / sum(1 / price)`.
pub fn stake_plan(
    opportunity: &Opportunity,
    bankroll: Decimal,
) -> Result<StakePlan, ArbitrageError> {
    if bankroll <= Decimal::ZERO {
        return Err(ArbitrageError::InvalidBankroll(bankroll));
    }
    if opportunity.legs.is_empty() {
        return Err(ArbitrageError::NoLegs {
            match_name: opportunity.match_name.clone(),
        });
    }

    let overflow = || ArbitrageError::Overflow {
        match_name: opportunity.match_name.clone(),
        bankroll,
    };

    let mut total = Decimal::ZERO;
    for leg in &opportunity.legs {
        let probability = leg.implied_probability().ok_or_else(|| {
            ArbitrageError::InvalidLegPrice {
                match_name: opportunity.match_name.clone(),
                outcome: leg.outcome.clone(),
                price: leg.price,
            }
        })?;
        total = total.checked_add(probability).ok_or_else(overflow)?;
    }

    let mut stakes = Vec::with_capacity(opportunity.legs.len());
    for leg in &opportunity.legs {
        let raw = leg
            .implied_probability()
            .and_then(|p| bankroll.checked_mul(p))
            .and_then(|weighted| weighted.checked_div(total))
            .ok_or_else(overflow)?;
        let payout = raw.checked_mul(leg.price).ok_or_else(overflow)?;
        stakes.push(LegStake {
            leg: leg.clone(),
            stake: round_display(raw),
            payout: round_display(payout),
        });
    }

    let guaranteed_payout = round_display(bankroll.checked_div(total).ok_or_else(overflow)?);

    Ok(StakePlan {
        bankroll,
        stakes,
        guaranteed_payout,
        guaranteed_profit: guaranteed_payout - bankroll,
    })
}
