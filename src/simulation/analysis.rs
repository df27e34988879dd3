//! Cumulative analysis over a completed ledger

use rust_decimal::Decimal;
use serde::Serialize;

use super::ledger::SimulationResult;
use crate::error::EngineResult;
use crate::loan::LoanTerms;
use crate::money::Money;

/// A ledger row with its running cumulative totals.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRow {
    pub payment_number: u32,
    pub balance: Money,
    pub rate: Decimal,
    pub total_monthly_payment: Money,
    pub interest_payment: Money,
    pub scheduled_principal_payment: Money,
    pub overpayment: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
    pub cumulative_overpayment: Money,
    /// Cumulative interest as a percentage of total interest paid.
    pub cumulative_interest_pct: Decimal,
    /// Cumulative principal plus overpayment as a percentage of the
    /// original principal.
    pub cumulative_principal_pct: Decimal,
}

/// Aggregates derived from one completed simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub rows: Vec<AnalysisRow>,
    /// Interest paid over the whole run.
    pub total_interest: Money,
    /// Cumulative interest through the last fixed-period payment. `None`
    /// when there is no fixed period or the loan paid off before it ended.
    pub fixed_term_cost: Option<Money>,
}

impl SimulationResult {
    /// Builds cumulative totals and summary aggregates over the ledger.
    pub fn analyse(&self, terms: &LoanTerms) -> EngineResult<Analysis> {
        let currency = terms.currency();
        let mut cumulative_interest = Money::zero(currency);
        let mut cumulative_principal = Money::zero(currency);
        let mut cumulative_overpayment = Money::zero(currency);

        let mut running = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            cumulative_interest = cumulative_interest.try_add(row.interest_payment)?;
            cumulative_principal =
                cumulative_principal.try_add(row.scheduled_principal_payment)?;
            cumulative_overpayment = cumulative_overpayment.try_add(row.overpayment)?;
            running.push((cumulative_interest, cumulative_principal, cumulative_overpayment));
        }
        let total_interest = cumulative_interest;

        let rows: Vec<AnalysisRow> = self
            .rows
            .iter()
            .zip(running)
            .map(|(row, (interest, principal, overpayment))| {
                // A zero-rate run pays no interest at all; report 0 rather
                // than divide by zero.
                let interest_pct = if total_interest.is_zero() {
                    Decimal::ZERO
                } else {
                    interest.amount() / total_interest.amount() * Decimal::ONE_HUNDRED
                };
                let principal_pct = (principal.amount() + overpayment.amount())
                    / terms.principal().amount()
                    * Decimal::ONE_HUNDRED;
                AnalysisRow {
                    payment_number: row.payment_number,
                    balance: row.balance,
                    rate: row.rate,
                    total_monthly_payment: row.total_monthly_payment,
                    interest_payment: row.interest_payment,
                    scheduled_principal_payment: row.scheduled_principal_payment,
                    overpayment: row.overpayment,
                    cumulative_interest: interest,
                    cumulative_principal: principal,
                    cumulative_overpayment: overpayment,
                    cumulative_interest_pct: interest_pct,
                    cumulative_principal_pct: principal_pct,
                }
            })
            .collect();

        let fixed_payments = terms.fixed_period_payments();
        let fixed_term_cost = if fixed_payments == 0 {
            None
        } else {
            rows.iter()
                .find(|row| row.payment_number == fixed_payments)
                .map(|row| row.cumulative_interest)
        };

        Ok(Analysis {
            rows,
            total_interest,
            fixed_term_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use crate::schedule::OverpaymentSchedule;
    use crate::simulation::SimulationEngine;
    use rust_decimal_macros::dec;

    fn gbp(amount: Decimal) -> Money {
        Money::new(amount, Currency::Gbp)
    }

    fn fixed_year_terms() -> LoanTerms {
        LoanTerms::with_options(
            gbp(dec!(500000)),
            dec!(0.05),
            25,
            1,
            gbp(dec!(999)),
            Some(dec!(0.07)),
        )
        .unwrap()
    }

    #[test]
    fn test_cumulative_totals() {
        let terms = fixed_year_terms();
        let result = SimulationEngine::new().simulate(&terms).unwrap();
        let analysis = result.analyse(&terms).unwrap();

        assert_eq!(analysis.rows.len(), result.len());

        // Cumulative interest is monotone and ends at the total.
        let mut previous = Decimal::ZERO;
        for row in &analysis.rows {
            assert!(row.cumulative_interest.amount() >= previous);
            previous = row.cumulative_interest.amount();
        }
        let last = analysis.rows.last().unwrap();
        assert_eq!(last.cumulative_interest, analysis.total_interest);
        assert_eq!(last.cumulative_interest_pct, Decimal::ONE_HUNDRED);

        // All principal repaid by term's end.
        let repaid_pct = last.cumulative_principal_pct;
        assert!((repaid_pct - Decimal::ONE_HUNDRED).abs() < dec!(0.001));
    }

    #[test]
    fn test_fixed_term_cost_matches_ledger() {
        let terms = fixed_year_terms();
        let result = SimulationEngine::new().simulate(&terms).unwrap();
        let analysis = result.analyse(&terms).unwrap();

        let cost = analysis.fixed_term_cost.unwrap();
        assert_eq!(cost, analysis.rows[11].cumulative_interest);

        // Twelve payments of fixed-rate interest on a 500k loan at 5%
        // land a little under 12 * 2083.33.
        assert!(cost.amount() > dec!(24000) && cost.amount() < dec!(25000));
    }

    #[test]
    fn test_fixed_term_cost_absent_without_fixed_period() {
        let terms = LoanTerms::new(gbp(dec!(500000)), dec!(0.05), 25).unwrap();
        let result = SimulationEngine::new().simulate(&terms).unwrap();
        let analysis = result.analyse(&terms).unwrap();
        assert!(analysis.fixed_term_cost.is_none());
    }

    #[test]
    fn test_fixed_term_cost_guarded_on_early_payoff() {
        // Heavy overpayments clear the loan inside the fixed period, so
        // there is no fixed-period-end row to read.
        let terms = LoanTerms::with_options(
            gbp(dec!(10000)),
            dec!(0.05),
            25,
            2,
            gbp(Decimal::ZERO),
            None,
        )
        .unwrap();
        let mut schedule = OverpaymentSchedule::new(terms.total_payments());
        schedule.add_point(1, gbp(dec!(5000))).unwrap();
        schedule
            .add_point(terms.total_payments(), gbp(dec!(5000)))
            .unwrap();
        schedule.finalize().unwrap();

        let engine = SimulationEngine::new().with_overpayments(schedule).unwrap();
        let result = engine.simulate(&terms).unwrap();
        assert!(result.len() < 24);

        let analysis = result.analyse(&terms).unwrap();
        assert!(analysis.fixed_term_cost.is_none());
    }

    #[test]
    fn test_overpayments_tracked_separately() {
        let terms = fixed_year_terms();
        let mut schedule = OverpaymentSchedule::new(terms.total_payments());
        schedule.add_point(1, gbp(dec!(500))).unwrap();
        schedule
            .add_point(terms.total_payments(), gbp(dec!(500)))
            .unwrap();
        schedule.finalize().unwrap();

        let engine = SimulationEngine::new().with_overpayments(schedule).unwrap();
        let result = engine.simulate(&terms).unwrap();
        let analysis = result.analyse(&terms).unwrap();

        let first = &analysis.rows[0];
        assert_eq!(first.cumulative_overpayment.amount(), dec!(500));
        assert_eq!(first.overpayment.amount(), dec!(500));

        // Principal + overpayment together clear the loan.
        let last = analysis.rows.last().unwrap();
        let repaid = last
            .cumulative_principal
            .try_add(last.cumulative_overpayment)
            .unwrap();
        let diff = (repaid.amount() - terms.principal().amount()).abs();
        assert!(diff < dec!(0.001), "repaid {repaid}");
    }
}
