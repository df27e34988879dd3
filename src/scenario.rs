//! Scenario construction for repeatable simulation runs
//!
//! A [`ScenarioConfig`] carries everything one run needs (loan terms plus
//! optional sparse forecast and overpayment anchors) and is validated
//! eagerly into a [`Scenario`]. `run` can then be called any number of
//! times; every call simulates from fresh state over the same terms.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::loan::LoanTerms;
use crate::money::{Currency, Money};
use crate::schedule::{AnchorPoint, OverpaymentSchedule, RateForecast};
use crate::simulation::{SimulationEngine, SimulationResult};

/// Declarative description of one simulation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Ledger currency for all monetary fields.
    pub currency: Currency,

    /// Loan principal.
    pub principal: Decimal,

    /// Annual nominal rate as a fraction (0.05 = 5%).
    pub annual_rate: Decimal,

    /// Term in years.
    pub term_years: u32,

    /// Fixed-rate period in years (0 = none).
    #[serde(default)]
    pub fixed_period_years: u32,

    /// Arrangement fee.
    #[serde(default)]
    pub fee: Decimal,

    /// Standard/reversion rate after the fixed period (defaults to
    /// `annual_rate`).
    #[serde(default)]
    pub standard_rate: Option<Decimal>,

    /// Sparse rate forecast anchors (payment index, rate fraction).
    #[serde(default)]
    pub rate_forecast: Vec<AnchorPoint>,

    /// Sparse overpayment anchors (payment index, amount).
    #[serde(default)]
    pub overpayments: Vec<AnchorPoint>,

    /// Convenience: a constant overpayment applied to every payment.
    /// Mutually exclusive with `overpayments`.
    #[serde(default)]
    pub flat_overpayment: Option<Decimal>,
}

impl ScenarioConfig {
    /// Loads a scenario from a JSON file.
    pub fn from_json_path(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        Ok(config)
    }
}

/// A validated scenario: loan terms paired with a configured engine.
#[derive(Debug, Clone)]
pub struct Scenario {
    terms: LoanTerms,
    engine: SimulationEngine,
}

impl Scenario {
    /// Validates a config into runnable terms + engine. All configuration
    /// problems surface here, never mid-simulation.
    pub fn from_config(config: &ScenarioConfig) -> EngineResult<Self> {
        let currency = config.currency;
        let principal = Money::new(config.principal, currency);
        let fee = Money::new(config.fee, currency);
        let terms = LoanTerms::with_options(
            principal,
            config.annual_rate,
            config.term_years,
            config.fixed_period_years,
            fee,
            config.standard_rate,
        )?;

        let mut engine = SimulationEngine::new();

        if !config.rate_forecast.is_empty() {
            let mut forecast = RateForecast::new(terms.total_payments());
            for anchor in &config.rate_forecast {
                forecast.add_point(anchor.payment, anchor.value)?;
            }
            forecast.finalize()?;
            engine = engine.with_rate_forecast(forecast)?;
        }

        if config.flat_overpayment.is_some() && !config.overpayments.is_empty() {
            return Err(EngineError::invalid_terms(
                "flat_overpayment and overpayments are mutually exclusive",
            ));
        }
        let overpayment_anchors: Vec<AnchorPoint> = match config.flat_overpayment {
            Some(amount) => vec![
                AnchorPoint { payment: 1, value: amount },
                AnchorPoint {
                    payment: terms.total_payments(),
                    value: amount,
                },
            ],
            None => config.overpayments.clone(),
        };
        if !overpayment_anchors.is_empty() {
            let mut schedule = OverpaymentSchedule::new(terms.total_payments());
            for anchor in &overpayment_anchors {
                schedule.add_point(anchor.payment, Money::new(anchor.value, currency))?;
            }
            schedule.finalize()?;
            engine = engine.with_overpayments(schedule)?;
        }

        info!(
            "scenario ready: {} over {}y at {}, {} forecast anchors, {} overpayment anchors",
            terms.principal(),
            terms.term_years(),
            terms.annual_rate(),
            config.rate_forecast.len(),
            overpayment_anchors.len(),
        );
        Ok(Self { terms, engine })
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Runs one simulation from fresh state.
    pub fn run(&self) -> EngineResult<SimulationResult> {
        self.engine.simulate(&self.terms)
    }
}
