//! Loan contract types and the closed-form amortization formula

pub mod terms;

pub use terms::{amortize, LoanTerms};
