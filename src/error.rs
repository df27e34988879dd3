//! Error types for loan construction and simulation.

use thiserror::Error;

use crate::money::Currency;

/// A specialized Result type for simulation operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while building or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Arithmetic between two monetary values in different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },

    /// Payment index outside a series' configured domain.
    #[error("payment index {index} outside series domain 1..={domain}")]
    IndexOutOfRange {
        /// The offending payment index.
        index: u32,
        /// Upper bound of the series domain.
        domain: u32,
    },

    /// Series read before `finalize()` interpolated it.
    #[error("series read before finalize")]
    UninitializedSeries,

    /// Series written after `finalize()` made it read-only.
    #[error("series already finalized")]
    SeriesFinalized,

    /// Series finalized without any data points to interpolate from.
    #[error("series has no data points")]
    EmptySeries,

    /// Currency code that is not recognised.
    #[error("unknown currency code: {code}")]
    UnknownCurrency {
        /// The unrecognised code.
        code: String,
    },

    /// Malformed loan or scenario configuration, rejected at construction.
    #[error("invalid loan terms: {reason}")]
    InvalidTerms {
        /// Description of the invalid input.
        reason: String,
    },
}

impl EngineError {
    /// Creates a currency mismatch error.
    #[must_use]
    pub fn currency_mismatch(left: Currency, right: Currency) -> Self {
        Self::CurrencyMismatch { left, right }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub fn index_out_of_range(index: u32, domain: u32) -> Self {
        Self::IndexOutOfRange { index, domain }
    }

    /// Creates an invalid terms error.
    #[must_use]
    pub fn invalid_terms(reason: impl Into<String>) -> Self {
        Self::InvalidTerms {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::currency_mismatch(Currency::Gbp, Currency::Usd);
        assert!(err.to_string().contains("GBP"));
        assert!(err.to_string().contains("USD"));

        let err = EngineError::index_out_of_range(301, 300);
        assert!(err.to_string().contains("301"));
    }
}
