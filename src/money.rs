//! Monetary value types
//!
//! All monetary quantities are exact decimals tagged with a currency.
//! Arithmetic between two amounts is only defined within one currency;
//! scaling by a dimensionless rate is always allowed.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Ledger currency, identified by its ISO 4217 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
}

impl Currency {
    /// ISO 4217 alphabetic code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GBP" => Ok(Currency::Gbp),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(EngineError::UnknownCurrency {
                code: s.to_string(),
            }),
        }
    }
}

/// An exact decimal amount in a single currency.
///
/// Immutable value type: every operation returns a new `Money`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a monetary amount.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// The zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Numeric amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Currency tag.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns `true` if the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Adds two amounts, rejecting mixed currencies.
    pub fn try_add(self, other: Money) -> EngineResult<Money> {
        self.ensure_same_currency(&other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Subtracts `other` from `self`, rejecting mixed currencies.
    pub fn try_sub(self, other: Money) -> EngineResult<Money> {
        self.ensure_same_currency(&other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    fn ensure_same_currency(&self, other: &Money) -> EngineResult<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(EngineError::currency_mismatch(self.currency, other.currency))
        }
    }
}

/// Scaling by a dimensionless rate yields `Money`.
impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money::new(self.amount * rhs, self.currency)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, rhs: Decimal) -> Money {
        Money::new(self.amount / rhs, self.currency)
    }
}

/// Amounts are ordered only within one currency.
impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency == other.currency {
            Some(self.amount.cmp(&other.amount))
        } else {
            None
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}
