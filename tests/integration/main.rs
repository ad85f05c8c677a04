//! Integration tests for the arbitrage detector.
//!
//! These drive the public API end to end: loading a quote file, detecting,
//! ranking and splitting stakes.

use std::io::Write;

use odds_arb::arbitrage::{
    detect, detect_with, parse_details, rank_by_edge, stake_plan, DetectorSettings,
};
use odds_arb::error::QuoteError;
use odds_arb::quote::{load_quotes, Quote};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn q(m: &str, b: &str, o: &str, price: Decimal) -> Quote {
    Quote::new(m, b, o, price)
}

fn epl_book() -> Vec<Quote> {
    vec![
        // Arbitrage once the best prices are combined.
        q("Arsenal vs Chelsea", "Unibet", "Arsenal", dec!(2.50)),
        q("Arsenal vs Chelsea", "Betfair", "Arsenal", dec!(2.60)),
        q("Arsenal vs Chelsea", "Unibet", "Draw", dec!(3.40)),
        q("Arsenal vs Chelsea", "Bet365", "Draw", dec!(3.50)),
        q("Arsenal vs Chelsea", "Unibet", "Chelsea", dec!(3.30)),
        q("Arsenal vs Chelsea", "Betfair", "Chelsea", dec!(3.20)),
        // Normal overround book.
        q("Spurs vs Everton", "Unibet", "Spurs", dec!(1.80)),
        q("Spurs vs Everton", "Unibet", "Draw", dec!(3.50)),
        q("Spurs vs Everton", "Unibet", "Everton", dec!(4.20)),
        // Bigger edge, seen last.
        q("Leeds vs Wolves", "Bet365", "Leeds", dec!(2.60)),
        q("Leeds vs Wolves", "Betfair", "Wolves", dec!(2.70)),
    ]
}

fn edge_of(prices: &[Decimal]) -> Decimal {
    let total: Decimal = prices.iter().map(|p| Decimal::ONE / *p).sum();
    ((Decimal::ONE - total) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[test]
fn every_opportunity_matches_the_edge_formula() {
    let detection = detect(&epl_book(), Decimal::ZERO);

    for opp in &detection.opportunities {
        let prices: Vec<Decimal> = opp.legs.iter().map(|l| l.price).collect();
        assert_eq!(opp.edge_percent, edge_of(&prices));
    }
}

#[test]
fn every_leg_is_the_best_price_for_its_outcome() {
    let quotes = epl_book();
    let detection = detect(&quotes, Decimal::ZERO);

    for opp in &detection.opportunities {
        let outcomes: Vec<&str> = quotes
            .iter()
            .filter(|q| q.match_name == opp.match_name)
            .map(|q| q.outcome.as_str())
            .fold(Vec::new(), |mut seen, o| {
                if !seen.contains(&o) {
                    seen.push(o);
                }
                seen
            });
        assert_eq!(opp.legs.len(), outcomes.len());

        for leg in &opp.legs {
            let best = quotes
                .iter()
                .filter(|q| q.match_name == opp.match_name && q.outcome == leg.outcome)
                .map(|q| q.price)
                .max()
                .unwrap();
            assert_eq!(leg.price, best);
        }
    }
}

#[test]
fn output_keeps_first_seen_match_order_until_ranked() {
    let mut detection = detect(&epl_book(), Decimal::ZERO);

    let order: Vec<&str> = detection
        .opportunities
        .iter()
        .map(|o| o.match_name.as_str())
        .collect();
    assert_eq!(order, vec!["Arsenal vs Chelsea", "Leeds vs Wolves"]);

    rank_by_edge(&mut detection.opportunities);
    let ranked: Vec<&str> = detection
        .opportunities
        .iter()
        .map(|o| o.match_name.as_str())
        .collect();
    assert_eq!(ranked, vec!["Leeds vs Wolves", "Arsenal vs Chelsea"]);
}

#[test]
fn threshold_filters_smaller_edges() {
    // Arsenal vs Chelsea edge is 2.66%, Leeds vs Wolves 24.50%
    let detection = detect(&epl_book(), dec!(5));

    assert_eq!(detection.opportunities.len(), 1);
    assert_eq!(detection.opportunities[0].match_name, "Leeds vs Wolves");
    assert_eq!(detection.opportunities[0].edge_percent, dec!(24.50));
}

#[test]
fn repeated_runs_are_identical() {
    let quotes = epl_book();
    let first = detect(&quotes, Decimal::ZERO);
    let second = detect(&quotes, Decimal::ZERO);

    assert_eq!(first, second);
}

#[test]
fn details_survive_a_round_trip() {
    let detection = detect(&epl_book(), Decimal::ZERO);
    let opp = &detection.opportunities[0];

    assert_eq!(
        opp.details(),
        "Arsenal@2.60 (Betfair); Draw@3.50 (Bet365); Chelsea@3.30 (Unibet)"
    );
    assert_eq!(parse_details(&opp.details()).unwrap(), opp.legs.to_vec());
}

#[test]
fn two_way_market_after_excluding_draw() {
    let quotes = vec![
        q("MI vs CSK", "Bet365", "Mumbai Indians", dec!(2.15)),
        q("MI vs CSK", "Betfair", "Chennai Super Kings", dec!(2.05)),
        q("MI vs CSK", "Betfair", "Draw", dec!(50)),
    ];

    let settings = DetectorSettings {
        exclude_outcome: Some("DRAW".to_string()),
        ..DetectorSettings::default()
    };
    let detection = detect_with(&quotes, &settings);

    assert_eq!(detection.opportunities.len(), 1);
    assert!(detection.opportunities[0]
        .legs
        .iter()
        .all(|l| l.outcome != "Draw"));
}

#[test]
fn stake_plan_covers_every_leg() {
    let detection = detect(&epl_book(), Decimal::ZERO);
    let opp = &detection.opportunities[1];

    let plan = stake_plan(opp, dec!(1000)).unwrap();

    assert_eq!(plan.stakes.len(), opp.legs.len());
    let staked: Decimal = plan.stakes.iter().map(|s| s.stake).sum();
    assert!((staked - dec!(1000)).abs() <= dec!(0.02));
    assert!(plan.guaranteed_profit > Decimal::ZERO);
}

#[test]
fn loads_quote_file_and_reports_bad_records() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"Match": "A vs B", "Bookmaker": "Unibet", "Outcome": "A", "Price": 2.6}},
            {{"Match": "A vs B", "Bookmaker": "Betfair", "Outcome": "B", "Price": 2.7}},
            {{"Match": "A vs B", "Bookmaker": "Bet365", "Outcome": "B", "Price": "tbc"}},
            {{"Match": "A vs B", "Bookmaker": "Bet365", "Outcome": "A", "Price": 0}}
        ]"#
    )
    .unwrap();

    let loaded = load_quotes(file.path()).unwrap();
    assert_eq!(loaded.quotes.len(), 3);
    assert_eq!(loaded.rejected.len(), 1);
    assert_eq!(loaded.rejected[0].index, 2);

    let mut detection = detect(&loaded.quotes, Decimal::ZERO);
    assert_eq!(detection.rejected.len(), 1);
    assert_eq!(detection.rejected[0].index, 2);
    loaded.remap_rejected(&mut detection.rejected);
    assert_eq!(detection.rejected[0].index, 3);
    assert!(matches!(
        detection.rejected[0].error,
        QuoteError::NonPositivePrice { .. }
    ));
    assert_eq!(detection.opportunities.len(), 1);
    assert_eq!(detection.opportunities[0].edge_percent, dec!(24.50));
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_quotes(std::path::Path::new("/nonexistent/quotes.json")).is_err());
}
