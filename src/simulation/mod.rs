//! Month-by-month amortization simulation

pub mod analysis;
pub mod engine;
pub mod ledger;
pub mod state;

pub use analysis::{Analysis, AnalysisRow};
pub use engine::SimulationEngine;
pub use ledger::{LedgerRow, SimulationResult};
pub use state::SimulationState;
