//! Matka rules engine smoke test CLI
//!
//! Commands:
//! - `classify`: validate a bet number against a bet type
//! - `groups`: print the canonical patti sum groups
//! - `phase`: compute the betting phase of a market at an instant
//! - `settle`: evaluate a bet batch against a market's declared results
//!
//! # Usage
//! ```bash
//! mk_rules classify --bet-type single_patti --number 123
//! mk_rules groups --subtype double --key 4
//! mk_rules phase --open 09:30 --close 11:30 --buffer-secs 300
//! mk_rules phase --open 23:00 --close 00:30 --at 2026-03-03T00:20:00+05:30
//! mk_rules settle --market data/market.json --bets data/bets.json --rates data/rates.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use matka_engine::pattern::sum_groups;
use matka_engine::types::{Bet, BetType, Market, PattiSubtype, RateTable};
use matka_engine::{classify, evaluate_all, ClockConfig};

#[derive(Parser)]
#[command(name = "mk_rules")]
#[command(about = "Matka bet rules engine smoke test CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bet number against a bet type
    Classify {
        /// Bet type (single_digit, jodi, single_patti, double_patti,
        /// triple_patti, half_sangam_open, half_sangam_close, full_sangam)
        #[arg(long)]
        bet_type: String,

        /// Candidate number string
        #[arg(long)]
        number: String,
    },

    /// Print the canonical patti sum groups
    Groups {
        /// Patti subtype (single, double, triple)
        #[arg(long)]
        subtype: String,

        /// Restrict to one sum key 0..=9 (default: all ten groups)
        #[arg(long)]
        key: Option<u8>,
    },

    /// Compute the betting phase of a market at an instant
    Phase {
        /// Opening time, HH:MM[:SS] civil
        #[arg(long)]
        open: Option<String>,

        /// Closing time, HH:MM[:SS] civil
        #[arg(long)]
        close: Option<String>,

        /// Bet closure buffer in seconds
        #[arg(long, default_value = "0")]
        buffer_secs: u32,

        /// Instant to evaluate (RFC 3339, default: now)
        #[arg(long)]
        at: Option<String>,

        /// Civil timezone offset seconds east of UTC (default: IST +05:30)
        #[arg(long)]
        tz_offset_secs: Option<i32>,
    },

    /// Evaluate a bet batch against a market's declared results
    Settle {
        /// Market snapshot JSON file
        #[arg(long)]
        market: PathBuf,

        /// Bet batch JSON file (array of bets)
        #[arg(long)]
        bets: PathBuf,

        /// Rate table JSON file (default: compiled-in rates)
        #[arg(long)]
        rates: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    match cli.command {
        Commands::Classify { bet_type, number } => run_classify(&bet_type, &number),
        Commands::Groups { subtype, key } => run_groups(&subtype, key),
        Commands::Phase { open, close, buffer_secs, at, tz_offset_secs } => {
            run_phase(open, close, buffer_secs, at, tz_offset_secs)
        }
        Commands::Settle { market, bets, rates } => run_settle(&market, &bets, rates.as_deref()),
    }
}

fn parse_bet_type(s: &str) -> Result<BetType> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .with_context(|| format!("unknown bet type '{s}'"))
}

fn run_classify(bet_type: &str, number: &str) -> Result<()> {
    let bet_type = parse_bet_type(bet_type)?;

    match classify(bet_type, number) {
        Ok(c) => {
            info!("=== Classification OK ===");
            info!("Bet type: {:?}", c.bet_type);
            info!("Normalized: {}", c.normalized);
            if let Some(subtype) = c.subtype {
                info!("Patti subtype: {:?}", subtype);
            }
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "normalized": c.normalized,
                    "subtype": c.subtype,
                })
            );
        }
        Err(e) => {
            warn!("Rejected: {}", e);
            println!(
                "{}",
                serde_json::json!({
                    "valid": false,
                    "reason": e.to_string(),
                })
            );
        }
    }

    Ok(())
}

fn run_groups(subtype: &str, key: Option<u8>) -> Result<()> {
    let subtype: PattiSubtype = serde_json::from_value(serde_json::Value::String(
        subtype.to_lowercase(),
    ))
    .with_context(|| format!("unknown patti subtype '{subtype}'"))?;

    let groups = sum_groups(subtype);

    let selected: Vec<u8> = match key {
        Some(k) => {
            anyhow::ensure!(k <= 9, "sum key must be 0..=9, got {k}");
            vec![k]
        }
        None => (0..10).collect(),
    };

    for k in selected {
        let group = &groups[k as usize];
        info!("Sum group {}: {} pattis", k, group.len());
        println!("{k}: {}", group.join(" "));
    }

    Ok(())
}

fn run_phase(
    open: Option<String>,
    close: Option<String>,
    buffer_secs: u32,
    at: Option<String>,
    tz_offset_secs: Option<i32>,
) -> Result<()> {
    let parse_time = |label: &str, s: Option<String>| -> Result<Option<NaiveTime>> {
        s.map(|s| {
            s.parse::<NaiveTime>()
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
                .with_context(|| format!("invalid {label} time '{s}'"))
        })
        .transpose()
    };

    let market = Market {
        opening_time: parse_time("opening", open)?,
        closing_time: parse_time("closing", close)?,
        bet_closure_buffer_secs: buffer_secs,
        opening_number: None,
        closing_number: None,
    };

    let now: DateTime<Utc> = match at {
        Some(ref s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| anyhow::anyhow!("invalid instant '{}': {}", s, e))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let clock = match tz_offset_secs {
        Some(secs) => ClockConfig::with_offset_secs(secs),
        None => ClockConfig::default(),
    };

    info!(
        "Timezone offset: {} ({}s east)",
        clock.tz_offset,
        clock.tz_offset.local_minus_utc()
    );
    info!("Evaluating at: {}", now);

    let verdict = clock.phase(&market, now);

    info!("Phase: {:?}", verdict.phase);
    info!("Reason: {:?}", verdict.reason);
    info!("Offerable sessions: {:?}", verdict.phase.offerable_sessions());

    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(())
}

fn run_settle(
    market_path: &std::path::Path,
    bets_path: &std::path::Path,
    rates_path: Option<&std::path::Path>,
) -> Result<()> {
    let market: Market = read_json(market_path).context("reading market snapshot")?;
    let bets: Vec<Bet> = read_json(bets_path).context("reading bet batch")?;

    let rates = match rates_path {
        Some(path) => read_json::<RateTable>(path).context("reading rate table")?,
        None => RateTable::defaults(),
    };

    info!("=== Settlement ===");
    info!("Opening number: {:?}", market.opening_number);
    info!("Closing number: {:?}", market.closing_number);
    info!("Bets: {}", bets.len());

    let outcomes = evaluate_all(&market, &bets, &rates);

    let won = outcomes.iter().filter(|o| o.is_won()).count();
    let pending = outcomes.iter().filter(|o| o.is_pending()).count();
    let lost = outcomes.len() - won - pending;
    let total_payout: u64 = outcomes.iter().map(|o| o.payout()).sum();

    info!("");
    info!("=== Summary ===");
    info!("Won: {}", won);
    info!("Lost: {}", lost);
    info!("Pending: {}", pending);
    info!("Total payout: {}", total_payout);

    let report: Vec<serde_json::Value> = bets
        .iter()
        .zip(&outcomes)
        .map(|(bet, outcome)| {
            serde_json::json!({
                "bet": bet,
                "outcome": outcome,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
