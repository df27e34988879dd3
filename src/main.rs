//! Mortgauge CLI
//!
//! Command-line interface for running mortgage amortization simulations

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use rust_decimal::Decimal;

use mortgauge::schedule::loader::{load_overpayment_anchors, load_rate_anchors};
use mortgauge::{report, Currency, Scenario, ScenarioConfig};

/// Mortgage amortization simulator
#[derive(Parser, Debug)]
#[command(name = "mortgauge", version, about)]
struct Cli {
    /// Loan principal
    #[arg(long, default_value = "500000")]
    principal: Decimal,

    /// Annual nominal rate as a fraction (0.05 = 5%)
    #[arg(long, default_value = "0.05")]
    rate: Decimal,

    /// Term in years
    #[arg(long, default_value_t = 25)]
    term: u32,

    /// Fixed-rate period in years (0 = none)
    #[arg(long, default_value_t = 1)]
    fixed_period: u32,

    /// Arrangement fee
    #[arg(long, default_value = "999")]
    fee: Decimal,

    /// Standard/reversion rate after the fixed period (defaults to --rate)
    #[arg(long)]
    standard_rate: Option<Decimal>,

    /// Ledger currency code
    #[arg(long, default_value = "GBP")]
    currency: Currency,

    /// Flat monthly overpayment applied to every payment
    #[arg(long)]
    overpay: Option<Decimal>,

    /// CSV of rate forecast anchors (payment,rate)
    #[arg(long)]
    forecast_csv: Option<PathBuf>,

    /// CSV of overpayment anchors (payment,amount)
    #[arg(long)]
    overpayments_csv: Option<PathBuf>,

    /// JSON scenario config; replaces the loan flags above
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Write the analysed ledger to a CSV file
    #[arg(long)]
    ledger_csv: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            currency: self.currency,
            principal: self.principal,
            annual_rate: self.rate,
            term_years: self.term,
            fixed_period_years: self.fixed_period,
            fee: self.fee,
            standard_rate: self.standard_rate,
            rate_forecast: Vec::new(),
            overpayments: Vec::new(),
            flat_overpayment: self.overpay,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.scenario {
        Some(path) => ScenarioConfig::from_json_path(path)?,
        None => cli.to_config(),
    };
    if let Some(path) = &cli.forecast_csv {
        config.rate_forecast = load_rate_anchors(path)?;
    }
    if let Some(path) = &cli.overpayments_csv {
        config.overpayments = load_overpayment_anchors(path)?;
        config.flat_overpayment = None;
    }

    let scenario = Scenario::from_config(&config)?;
    info!("running simulation");
    let result = scenario.run()?;
    let analysis = result.analyse(scenario.terms())?;

    println!("Mortgauge v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", report::render_ledger(&analysis));
    println!();
    println!("{}", report::render_summary(&analysis, scenario.terms()));

    if let Some(path) = &cli.ledger_csv {
        write_ledger_csv(path, &analysis)
            .with_context(|| format!("writing ledger to {}", path.display()))?;
        println!("Full ledger written to: {}", path.display());
    }

    Ok(())
}

/// Writes the analysed ledger as CSV, one row per payment.
fn write_ledger_csv(path: &Path, analysis: &mortgauge::Analysis) -> anyhow::Result<()> {
    let mut file = File::create(path)?;
    writeln!(
        file,
        "payment,balance,rate,monthly,interest,principal,overpayment,\
         cum_interest,cum_principal,cum_overpayment,cum_int_percent,cum_principal_percent"
    )?;
    for row in &analysis.rows {
        writeln!(
            file,
            "{},{:.2},{:.6},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.4},{:.4}",
            row.payment_number,
            row.balance.amount(),
            row.rate,
            row.total_monthly_payment.amount(),
            row.interest_payment.amount(),
            row.scheduled_principal_payment.amount(),
            row.overpayment.amount(),
            row.cumulative_interest.amount(),
            row.cumulative_principal.amount(),
            row.cumulative_overpayment.amount(),
            row.cumulative_interest_pct,
            row.cumulative_principal_pct,
        )?;
    }
    Ok(())
}
