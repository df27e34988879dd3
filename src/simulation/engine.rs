//! Core engine for month-by-month amortization runs

use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::ledger::{LedgerRow, SimulationResult};
use super::state::SimulationState;
use crate::error::{EngineError, EngineResult};
use crate::loan::{amortize, LoanTerms};
use crate::money::Money;
use crate::schedule::{OverpaymentSchedule, RateForecast};

/// Balances at or below this many currency units count as paid off,
/// tolerating rounding residue below a penny.
const BALANCE_EPSILON: Decimal = dec!(0.004);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Runs amortization simulations against immutable loan terms.
///
/// Holds the optional rate forecast and overpayment schedule; both must be
/// finalized before they are attached. Each `simulate` call starts from
/// fresh state, so an engine can be reused across runs and terms.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    rate_forecast: Option<RateForecast>,
    overpayments: Option<OverpaymentSchedule>,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a finalized rate forecast for payments after the fixed
    /// period.
    pub fn with_rate_forecast(mut self, forecast: RateForecast) -> EngineResult<Self> {
        if !forecast.is_finalized() {
            return Err(EngineError::UninitializedSeries);
        }
        self.rate_forecast = Some(forecast);
        Ok(self)
    }

    /// Attaches a finalized overpayment schedule.
    pub fn with_overpayments(mut self, schedule: OverpaymentSchedule) -> EngineResult<Self> {
        if !schedule.is_finalized() {
            return Err(EngineError::UninitializedSeries);
        }
        self.overpayments = Some(schedule);
        Ok(self)
    }

    pub fn rate_forecast(&self) -> Option<&RateForecast> {
        self.rate_forecast.as_ref()
    }

    pub fn overpayments(&self) -> Option<&OverpaymentSchedule> {
        self.overpayments.as_ref()
    }

    /// Resolves the annual rate for a payment index.
    ///
    /// Inside the fixed period (boundary inclusive) the contractual rate
    /// applies; after it, the forecast if one is attached, otherwise the
    /// standard/reversion rate.
    fn resolve_rate(&self, payment: u32, terms: &LoanTerms) -> EngineResult<Decimal> {
        if payment <= terms.fixed_period_payments() {
            Ok(terms.annual_rate())
        } else if let Some(forecast) = &self.rate_forecast {
            forecast.value(payment)
        } else {
            Ok(terms.standard_rate())
        }
    }

    /// Checks the attached schedules against the terms before a run.
    fn validate(&self, terms: &LoanTerms) -> EngineResult<()> {
        if let Some(forecast) = &self.rate_forecast {
            if forecast.domain() < terms.total_payments() {
                return Err(EngineError::invalid_terms(format!(
                    "rate forecast covers {} payments, loan has {}",
                    forecast.domain(),
                    terms.total_payments()
                )));
            }
        }
        if let Some(schedule) = &self.overpayments {
            if schedule.domain() < terms.total_payments() {
                return Err(EngineError::invalid_terms(format!(
                    "overpayment schedule covers {} payments, loan has {}",
                    schedule.domain(),
                    terms.total_payments()
                )));
            }
            if let Some(template) = schedule.template() {
                if template.currency() != terms.currency() {
                    return Err(EngineError::currency_mismatch(
                        terms.currency(),
                        template.currency(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Runs one full simulation from fresh state.
    ///
    /// Advances payment by payment until the balance is paid off (within
    /// the sub-penny epsilon) or the declared term is exhausted. The balance
    /// is non-increasing throughout and never goes negative: a final
    /// payment that would overshoot is clamped to exactly the outstanding
    /// balance, trimming the overpayment first and the scheduled principal
    /// only if the overpayment alone is not enough.
    pub fn simulate(&self, terms: &LoanTerms) -> EngineResult<SimulationResult> {
        self.validate(terms)?;

        let zero = Money::zero(terms.currency());
        let mut state = SimulationState::new(terms);
        let mut result = SimulationResult::new();

        while state.balance().amount() > BALANCE_EPSILON
            && state.next_payment() <= terms.total_payments()
        {
            let payment = state.next_payment();
            let balance = state.balance();
            let rate = self.resolve_rate(payment, terms)?;

            let interest_payment = balance * (rate / MONTHS_PER_YEAR);

            // Inside the fixed period the precomputed level payment holds;
            // afterwards the schedule re-amortizes every month from the
            // current balance and rate over the payments left (current one
            // included).
            let mut scheduled_monthly_payment = if payment <= terms.fixed_period_payments() {
                terms.level_payment()
            } else {
                let remaining_payments = terms.total_payments() - payment + 1;
                amortize(balance, rate, remaining_payments)?
            };
            let mut scheduled_principal_payment =
                scheduled_monthly_payment.try_sub(interest_payment)?;

            let mut overpayment = match &self.overpayments {
                Some(schedule) => schedule.value(payment)?,
                None => zero,
            };

            let mut total_principal_payment = scheduled_principal_payment.try_add(overpayment)?;

            // Final payment: never pay off more than is owed.
            if total_principal_payment > balance {
                if scheduled_principal_payment > balance {
                    scheduled_principal_payment = balance;
                    overpayment = zero;
                } else {
                    overpayment = balance.try_sub(scheduled_principal_payment)?;
                }
                scheduled_monthly_payment = scheduled_principal_payment.try_add(interest_payment)?;
                total_principal_payment = balance;
                debug!("payment {payment}: clamped to outstanding balance {balance}");
            }

            let total_monthly_payment = scheduled_monthly_payment.try_add(overpayment)?;

            state.apply_payment(total_principal_payment)?;

            result.add_row(LedgerRow {
                payment_number: payment,
                balance: state.balance(),
                rate,
                total_monthly_payment,
                interest_payment,
                scheduled_principal_payment,
                overpayment,
            });
        }

        info!(
            "simulation complete: {} payments, final balance {}",
            result.len(),
            state.balance()
        );
        Ok(result)
    }
}
