//! Mortgauge - mortgage amortization simulator
//!
//! This library provides:
//! - Exact-decimal monetary values in a single ledger currency
//! - Immutable loan terms with a derived level payment
//! - Sparse rate forecasts and overpayment schedules, linearly
//!   interpolated over the payment domain
//! - A month-by-month amortization engine producing a per-payment ledger
//! - Cumulative analysis and psql-style table reporting

pub mod error;
pub mod loan;
pub mod money;
pub mod report;
pub mod scenario;
pub mod schedule;
pub mod simulation;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use loan::{amortize, LoanTerms};
pub use money::{Currency, Money};
pub use scenario::{Scenario, ScenarioConfig};
pub use schedule::{AnchorPoint, OverpaymentSchedule, RateForecast};
pub use simulation::{Analysis, LedgerRow, SimulationEngine, SimulationResult};
