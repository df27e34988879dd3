//! Ledger output structures for simulations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One processed payment.
///
/// `balance` is the outstanding balance after this payment was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    pub payment_number: u32,
    pub balance: Money,
    pub rate: Decimal,
    pub total_monthly_payment: Money,
    pub interest_payment: Money,
    pub scheduled_principal_payment: Money,
    pub overpayment: Money,
}

/// Ordered, append-only ledger produced by one simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Per-payment ledger rows, in payment order.
    pub rows: Vec<LedgerRow>,
}

impl SimulationResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Appends a ledger row.
    pub fn add_row(&mut self, row: LedgerRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Payment index of the last processed payment.
    pub fn payoff_payment(&self) -> Option<u32> {
        self.rows.last().map(|row| row.payment_number)
    }

    /// Balance outstanding after the last processed payment.
    pub fn final_balance(&self) -> Option<Money> {
        self.rows.last().map(|row| row.balance)
    }
}
