//! Immutable mortgage terms and the level-payment formula
//!
//! `LoanTerms` describes the contract only; per-run balance tracking lives
//! in `simulation::SimulationState` so the same terms can back any number
//! of independent simulations.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::money::{Currency, Money};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Level payment that fully amortizes `principal` at `annual_rate` over
/// `payment_count` monthly payments.
///
/// Standard annuity formula with monthly rate `i = annual_rate / 12`:
/// `payment = P * i * (1+i)^n / ((1+i)^n - 1)`.
///
/// A zero rate degenerates the formula; the loan then amortizes linearly
/// as `P / n`. Negative rates are rejected.
pub fn amortize(principal: Money, annual_rate: Decimal, payment_count: u32) -> EngineResult<Money> {
    if payment_count == 0 {
        return Err(EngineError::invalid_terms("payment count cannot be zero"));
    }
    if annual_rate < Decimal::ZERO {
        return Err(EngineError::invalid_terms(format!(
            "annual rate cannot be negative, got {annual_rate}"
        )));
    }
    if annual_rate.is_zero() {
        return Ok(principal / Decimal::from(payment_count));
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let growth = (Decimal::ONE + monthly_rate).powu(u64::from(payment_count));
    Ok(principal * (monthly_rate * growth / (growth - Decimal::ONE)))
}

/// Immutable description of a mortgage.
///
/// Validated eagerly at construction; the level payment for the declared
/// term is derived once and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    principal: Money,
    annual_rate: Decimal,
    term_years: u32,
    fixed_period_years: u32,
    fee: Money,
    standard_rate: Decimal,
    total_payments: u32,
    level_payment: Money,
}

impl LoanTerms {
    /// Creates terms with no fixed period, no fee, and the standard rate
    /// equal to the nominal rate.
    pub fn new(principal: Money, annual_rate: Decimal, term_years: u32) -> EngineResult<Self> {
        let fee = Money::zero(principal.currency());
        Self::with_options(principal, annual_rate, term_years, 0, fee, None)
    }

    /// Creates terms with a fixed-rate period, arrangement fee, and an
    /// optional standard/reversion rate (defaults to `annual_rate`).
    pub fn with_options(
        principal: Money,
        annual_rate: Decimal,
        term_years: u32,
        fixed_period_years: u32,
        fee: Money,
        standard_rate: Option<Decimal>,
    ) -> EngineResult<Self> {
        if principal.amount() <= Decimal::ZERO {
            return Err(EngineError::invalid_terms("principal must be positive"));
        }
        if term_years == 0 {
            return Err(EngineError::invalid_terms("term must be at least one year"));
        }
        if fixed_period_years > term_years {
            return Err(EngineError::invalid_terms(format!(
                "fixed period of {fixed_period_years}y exceeds {term_years}y term"
            )));
        }
        if fee.currency() != principal.currency() {
            return Err(EngineError::currency_mismatch(
                principal.currency(),
                fee.currency(),
            ));
        }
        if fee.amount() < Decimal::ZERO {
            return Err(EngineError::invalid_terms("fee cannot be negative"));
        }
        let standard_rate = standard_rate.unwrap_or(annual_rate);
        if standard_rate < Decimal::ZERO {
            return Err(EngineError::invalid_terms("standard rate cannot be negative"));
        }

        let total_payments = term_years * 12;
        let level_payment = amortize(principal, annual_rate, total_payments)?;

        Ok(Self {
            principal,
            annual_rate,
            term_years,
            fixed_period_years,
            fee,
            standard_rate,
            total_payments,
            level_payment,
        })
    }

    /// Original loan amount.
    pub fn principal(&self) -> Money {
        self.principal
    }

    /// Annual nominal rate, held during the fixed period.
    pub fn annual_rate(&self) -> Decimal {
        self.annual_rate
    }

    /// Term in years.
    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    /// Fixed-rate period in years (0 = none).
    pub fn fixed_period_years(&self) -> u32 {
        self.fixed_period_years
    }

    /// Arrangement fee.
    pub fn fee(&self) -> Money {
        self.fee
    }

    /// Rate applied after the fixed period absent a forecast.
    pub fn standard_rate(&self) -> Decimal {
        self.standard_rate
    }

    /// Number of monthly payments over the declared term.
    pub fn total_payments(&self) -> u32 {
        self.total_payments
    }

    /// Number of payments inside the fixed period.
    pub fn fixed_period_payments(&self) -> u32 {
        self.fixed_period_years * 12
    }

    /// Constant monthly payment that amortizes the principal at the
    /// nominal rate over the full term.
    pub fn level_payment(&self) -> Money {
        self.level_payment
    }

    /// Ledger currency.
    pub fn currency(&self) -> Currency {
        self.principal.currency()
    }
}
