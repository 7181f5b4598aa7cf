//! Fixed Income Tracker CLI
//!
//! Previews single positions, recomputes a positions file at new market
//! rates, and reports deposit-insurance exposure.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fixed_income_tracker::exposure::ExposureReport;
use fixed_income_tracker::position::load_positions;
use fixed_income_tracker::projection::{ProjectedPosition, ProjectionEngine};
use fixed_income_tracker::recalc::RecomputeOutcome;
use fixed_income_tracker::store::InMemoryStore;
use fixed_income_tracker::{EngineConfig, IndexRegime, MarketRates, Position};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "fixed-income-tracker",
    version,
    about = "Fixed-income projection and exposure engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// JSON engine configuration (coverage limits, parallelism)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Project a single draft position
    Preview {
        #[command(flatten)]
        rates: RatesArgs,

        #[arg(long, default_value = "")]
        institution: String,

        #[arg(long)]
        principal: f64,

        /// POST_FIXED (CDI), INFLATION (IPCA) or FIXED (PRE)
        #[arg(long)]
        regime: String,

        /// Percent of index, real spread or nominal rate, depending on regime
        #[arg(long)]
        rate: f64,

        /// Withholding tax on the gain, percent
        #[arg(long, default_value_t = 0.0)]
        tax: f64,

        #[arg(long)]
        start: NaiveDate,

        #[arg(long)]
        due: NaiveDate,
    },
    /// Recompute every position in a CSV file
    Recompute {
        #[command(flatten)]
        rates: RatesArgs,

        #[arg(long)]
        positions: PathBuf,

        /// Output CSV (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Project a CSV file and report exposure per institution
    Exposure {
        #[command(flatten)]
        rates: RatesArgs,

        #[arg(long)]
        positions: PathBuf,
    },
}

#[derive(Args)]
struct RatesArgs {
    /// JSON market-rate snapshot
    #[arg(long)]
    rates_file: Option<PathBuf>,

    /// Reference index annual rate, percent (overrides the snapshot)
    #[arg(long)]
    reference_rate: Option<f64>,

    /// Inflation annual rate, percent (overrides the snapshot)
    #[arg(long)]
    inflation: Option<f64>,
}

impl RatesArgs {
    fn resolve(&self) -> Result<MarketRates> {
        let mut rates = match &self.rates_file {
            Some(path) => MarketRates::from_json_path(path)
                .with_context(|| format!("reading market rates from {}", path.display()))?,
            None => MarketRates::default(),
        };
        if let Some(r) = self.reference_rate {
            rates.reference_index_annual_rate = r;
        }
        if let Some(i) = self.inflation {
            rates.inflation_annual_rate = i;
        }
        Ok(rates)
    }
}

#[derive(Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Institution")]
    institution: &'a str,
    #[serde(rename = "DueDate")]
    due_date: NaiveDate,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Gross")]
    gross: f64,
    #[serde(rename = "Net")]
    net: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("reading config from {}", path.display()))?,
        None => EngineConfig::from_env(),
    };

    match cli.command {
        Command::Preview {
            rates,
            institution,
            principal,
            regime,
            rate,
            tax,
            start,
            due,
        } => {
            let rates = rates.resolve()?;
            let position = Position::new(
                institution,
                principal,
                IndexRegime::parse(&regime, rate)?,
                tax,
                start,
                due,
            );
            let breakdown = ProjectionEngine::new(rates).project_detailed(&position)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                println!(
                    "Effective annual rate: {:.4}%",
                    breakdown.effective_annual_rate * 100.0
                );
                println!(
                    "Period:                {:.4} years ({} days)",
                    breakdown.period_years,
                    position.holding_days()
                );
                println!("Gross at maturity:     {:.2}", breakdown.result.gross);
                println!("Tax withheld:          {:.2}", breakdown.result.tax_withheld());
                println!("Net at maturity:       {:.2}", breakdown.result.net);
            }
        }
        Command::Recompute {
            rates,
            positions,
            output,
        } => {
            let rates = rates.resolve()?;
            let outcome = recompute_file(&config, &positions, &rates)?;
            report_failures(&outcome);

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    write_rows(file, &outcome.projected)?;
                    eprintln!(
                        "Wrote {} projections to {}",
                        outcome.projected.len(),
                        path.display()
                    );
                }
                None if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&outcome.projected)?);
                }
                None => write_rows(std::io::stdout().lock(), &outcome.projected)?,
            }
        }
        Command::Exposure { rates, positions } => {
            let rates = rates.resolve()?;
            let mut store = load_store(&positions)?;
            let (outcome, report) = config.recalculator().recompute_with_exposure(
                &mut store,
                &rates,
                &config.aggregator(),
            )?;
            report_failures(&outcome);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &config);
            }
        }
    }

    Ok(())
}

fn load_store(path: &Path) -> Result<InMemoryStore> {
    let records = load_positions(path)?;
    Ok(InMemoryStore::from_records(records)?)
}

fn recompute_file(
    config: &EngineConfig,
    path: &Path,
    rates: &MarketRates,
) -> Result<RecomputeOutcome> {
    let mut store = load_store(path)?;
    let outcome = config.recalculator().recompute(&mut store, rates)?;
    Ok(outcome)
}

fn report_failures(outcome: &RecomputeOutcome) {
    for (id, err) in &outcome.failures {
        eprintln!("Position {} skipped: {}", id, err);
    }
}

fn write_rows<W: Write>(writer: W, projected: &[ProjectedPosition]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for p in projected {
        csv_writer.serialize(OutputRow {
            id: p.id,
            institution: &p.institution,
            due_date: p.due_date,
            principal: p.principal,
            gross: p.result.gross,
            net: p.result.net,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn print_report(report: &ExposureReport, config: &EngineConfig) {
    println!("{:<30} {:>5} {:>16} {:>10}", "Institution", "Count", "Gross", "Limit %");
    println!("{}", "-".repeat(64));
    for entry in &report.institutions {
        println!(
            "{:<30} {:>5} {:>16.2} {:>9.1}%",
            entry.institution,
            entry.position_count,
            entry.total_gross,
            entry.limit_usage * 100.0,
        );
    }
    println!("{}", "-".repeat(64));
    println!(
        "Global total: {:.2} of {:.2} ({:.1}%)",
        report.global_total,
        config.limits.global_limit,
        report.global_limit_usage * 100.0,
    );
    println!("Headroom:     {:.2}", report.headroom);
    println!("Risk level:   {:?}", report.risk_level);
}
