//! Sure-bet arbitrage detector entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use odds_arb::arbitrage::{
    detect_with, rank_by_edge, stake_plan, DetectorSettings, Opportunity, StakePlan,
};
use odds_arb::config::{Config, LogFormat};
use odds_arb::error::AppError;
use odds_arb::metrics;
use odds_arb::quote::load_quotes;

/// Sure-bet arbitrage detector.
#[derive(Parser, Debug)]
#[command(name = "odds-arb")]
#[command(about = "Find risk-free arbitrage across bookmaker odds")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect arbitrage opportunities in a quote file (default).
    Detect(DetectArgs),

    /// Check configuration validity.
    CheckConfig,
}

#[derive(clap::Args, Debug, Default)]
struct DetectArgs {
    /// JSON file with quotes (overrides QUOTES_PATH).
    #[arg(short, long)]
    quotes: Option<PathBuf>,

    /// Minimum edge in percent, strictly exceeded (overrides THRESHOLD_PERCENT).
    #[arg(short, long, allow_hyphen_values = true)]
    threshold: Option<Decimal>,

    /// Minimum distinct outcomes per match (overrides MIN_OUTCOMES).
    #[arg(long)]
    min_outcomes: Option<usize>,

    /// Outcome to drop before detection, e.g. "Draw" (overrides EXCLUDE_OUTCOME).
    #[arg(long)]
    exclude_outcome: Option<String>,

    /// Sort opportunities by edge, highest first.
    #[arg(long)]
    rank: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Split this bankroll across each opportunity's legs (overrides BANKROLL).
    #[arg(long)]
    bankroll: Option<Decimal>,

    /// Print Prometheus metrics for the run to stderr.
    #[arg(long)]
    metrics: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    opportunities: &'a [Opportunity],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stake_plans: Vec<StakePlan>,
    rejected: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load()?;
    init_logging(&config, args.verbose);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Detect(detect)) => cmd_detect(config, detect),
        None => cmd_detect(config, DetectArgs::default()),
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("odds_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDS ARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Threshold: {}%", config.threshold_percent);
    println!("  Min Outcomes: {}", config.min_outcomes);
    println!(
        "  Excluded Outcome: {}",
        config.exclude_outcome.as_deref().unwrap_or("none")
    );
    match config.bankroll {
        Some(bankroll) => println!("  Bankroll: {}", bankroll),
        None => println!("  Bankroll: not set"),
    }
    println!("  Quotes Path: {}", config.quotes_path.display());
    println!("  Log Format: {}", config.log_format);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Load quotes, run detection and print the opportunities.
fn cmd_detect(mut config: Config, args: DetectArgs) -> anyhow::Result<()> {
    if let Some(path) = args.quotes {
        config.quotes_path = path;
    }
    if let Some(threshold) = args.threshold {
        config.threshold_percent = threshold;
    }
    if let Some(min_outcomes) = args.min_outcomes {
        config.min_outcomes = min_outcomes;
    }
    if args.exclude_outcome.is_some() {
        config.exclude_outcome = args.exclude_outcome;
    }
    if args.bankroll.is_some() {
        config.bankroll = args.bankroll;
    }
    config.validate().map_err(AppError::InvalidConfig)?;

    let prometheus = if args.metrics {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    info!(path = %config.quotes_path.display(), "Loading quotes");
    let loaded = load_quotes(&config.quotes_path)?;
    for rejected in &loaded.rejected {
        warn!(
            record = rejected.index,
            error = %rejected.error,
            "Skipping undecodable record"
        );
    }

    let settings = DetectorSettings::from(&config);
    let mut detection = detect_with(&loaded.quotes, &settings);
    loaded.remap_rejected(&mut detection.rejected);
    for rejected in &detection.rejected {
        warn!(
            record = rejected.index,
            error = %rejected.error,
            "Skipping invalid quote"
        );
    }
    if args.rank {
        rank_by_edge(&mut detection.opportunities);
    }

    let stake_plans = match config.bankroll {
        Some(bankroll) => detection
            .opportunities
            .iter()
            .map(|opp| stake_plan(opp, bankroll))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let rejected = loaded.rejected.len() + detection.rejected.len();
    info!(
        quotes = loaded.quotes.len(),
        matches = detection.matches_scanned,
        opportunities = detection.opportunities.len(),
        rejected,
        "Detection finished"
    );

    match args.format {
        OutputFormat::Json => {
            let report = Report {
                opportunities: &detection.opportunities,
                stake_plans,
                rejected,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&detection.opportunities, &stake_plans),
    }

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }

    Ok(())
}

fn print_text(opportunities: &[Opportunity], stake_plans: &[StakePlan]) {
    if opportunities.is_empty() {
        println!("No arbitrage opportunities found.");
        return;
    }

    println!("Arbitrage opportunities:");
    for (i, opp) in opportunities.iter().enumerate() {
        println!("[{}] {}", i, opp);
        if let Some(plan) = stake_plans.get(i) {
            for stake in &plan.stakes {
                println!(
                    "      stake {} on {} -> returns {}",
                    stake.stake, stake.leg, stake.payout
                );
            }
            println!(
                "      guaranteed payout {} (profit {}, {}%)",
                plan.guaranteed_payout,
                plan.guaranteed_profit,
                plan.roi()
            );
        }
    }
}
