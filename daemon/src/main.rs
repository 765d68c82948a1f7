//! `sprout`: command-line tools for the Sprout ledger.

mod script;

use anyhow::Context;
use clap::Parser;
use sprout_accrual::compute_balance;
use sprout_ledger::{Ledger, LedgerConfig};
use sprout_types::{Amount, Rate, Timestamp};
use sprout_utils::{format_duration, init_logging, parse_duration, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sprout", about = "Interest-accruing balance ledger tools")]
struct Cli {
    /// Path to a TOML ledger configuration file. CLI flags and env vars
    /// override its logging settings.
    #[arg(long, env = "SPROUT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SPROUT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SPROUT_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON script of timed operations against a fresh ledger.
    Replay {
        /// Script file.
        script: PathBuf,

        /// Stop at the first failing step instead of recording it.
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compute the balance a principal grows to.
    Preview {
        /// Principal in whole units, e.g. "1000" or "0.5".
        #[arg(long)]
        principal: Amount,

        /// Per-second rate at 1e18 precision. Defaults to the configured rate.
        #[arg(long, conflicts_with = "apy_bps")]
        rate: Option<u128>,

        /// Simple annual rate in basis points, converted to per-second.
        #[arg(long)]
        apy_bps: Option<u64>,

        /// Elapsed time: seconds, or units like "1h30m", "7d".
        #[arg(long, value_parser = parse_duration)]
        elapsed: u64,
    },
    /// Convert an annual rate in basis points to the per-second rate.
    Apy {
        #[arg(long)]
        bps: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LedgerConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LedgerConfig::default(),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let format: LogFormat = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.log_format)
        .parse()?;
    init_logging(format, level);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Replay {
            script,
            strict,
            json,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let parsed: script::Script = serde_json::from_str(&text)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let mut ledger = Ledger::from_config(&config, Timestamp::new(parsed.genesis))?;
            let report = script::replay(&mut ledger, &parsed, strict)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for step in &report.steps {
                    let status = match (&step.error, &step.amount) {
                        (Some(err), _) => format!("FAILED {err}"),
                        (None, Some(amount)) => amount.clone(),
                        (None, None) => "ok".to_string(),
                    };
                    println!("#{:<3} {:>8}s {:<20} {}", step.index, step.at, step.op, status);
                }
                println!();
                println!(
                    "after {}: global rate {}, total supply {}",
                    format_duration(report.final_at),
                    report.global_rate,
                    report.total_supply
                );
                for account in &report.accounts {
                    println!(
                        "  {:<16} balance {:<32} principal {:<32} rate {}",
                        account.account.as_str(),
                        account.balance,
                        account.principal,
                        account.assigned_rate
                    );
                }
            }
            if report.failures() > 0 {
                tracing::warn!(failures = report.failures(), "replay finished with failed steps");
            }
        }
        Command::Preview {
            principal,
            rate,
            apy_bps,
            elapsed,
        } => {
            let rate = match (rate, apy_bps) {
                (Some(raw), _) => Rate::new(raw),
                (None, Some(bps)) => Rate::from_annual_bps(u128::from(bps))
                    .context("annual rate out of range")?,
                (None, None) => config.initial_rate()?,
            };
            let balance = compute_balance(principal, rate, elapsed)?;
            let bps = rate
                .annual_bps()
                .map_or_else(|| "overflow".to_string(), |b| b.to_string());
            println!(
                "{} at {} ({} bps/yr) after {} -> {} (+{})",
                principal,
                rate,
                bps,
                format_duration(elapsed),
                balance,
                balance.saturating_sub(principal)
            );
        }
        Command::Apy { bps } => {
            let rate = Rate::from_annual_bps(u128::from(bps)).context("annual rate out of range")?;
            println!("{} bps/yr = {} raw per second", bps, rate.raw());
        }
    }

    Ok(())
}
