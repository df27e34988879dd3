//! Mutable run state for a single simulation
//!
//! Created fresh by the engine for every run, so one set of loan terms can
//! back any number of independent simulations.

use crate::error::EngineResult;
use crate::loan::LoanTerms;
use crate::money::Money;

/// Running balance and payment counter for one simulation.
#[derive(Debug, Clone)]
pub struct SimulationState {
    balance: Money,
    payments_made: u32,
}

impl SimulationState {
    /// Initializes state at the start of a run: full principal owed, no
    /// payments made.
    pub fn new(terms: &LoanTerms) -> Self {
        Self {
            balance: terms.principal(),
            payments_made: 0,
        }
    }

    /// Outstanding balance.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Number of payments processed so far.
    pub fn payments_made(&self) -> u32 {
        self.payments_made
    }

    /// Index of the payment about to be processed (1-based).
    pub fn next_payment(&self) -> u32 {
        self.payments_made + 1
    }

    /// Records one processed payment: reduces the balance by the total
    /// principal paid and advances the payment counter.
    pub fn apply_payment(&mut self, total_principal: Money) -> EngineResult<()> {
        self.balance = self.balance.try_sub(total_principal)?;
        self.payments_made += 1;
        Ok(())
    }
}
