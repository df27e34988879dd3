//! Sparse-to-dense series over the payment domain
//!
//! A schedule is declared with a handful of anchor points and densified by
//! `finalize()`, which linearly interpolates every payment index in
//! `1..=domain`. Interpolation always runs on a raw decimal; payloads that
//! carry more than a number (monetary amounts and their currency) project
//! in and out of that raw form via [`SeriesValue`].

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::money::Money;

/// A sparse (payment index, value) data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    /// Payment index in `1..=total_payments`.
    pub payment: u32,
    /// Raw value at that payment (rate fraction or monetary amount).
    pub value: Decimal,
}

/// Payload that can be projected to a raw decimal for interpolation and
/// reconstructed afterwards.
pub trait SeriesValue: Copy + fmt::Debug {
    /// Raw numeric value to interpolate on.
    fn to_raw(&self) -> Decimal;

    /// Rebuilds a payload from an interpolated raw value, using `self` as
    /// the template for any non-numeric payload state.
    fn with_raw(&self, raw: Decimal) -> Self;

    /// Rejects payloads that cannot share one series.
    fn check_compatible(&self, _other: &Self) -> EngineResult<()> {
        Ok(())
    }
}

impl SeriesValue for Decimal {
    fn to_raw(&self) -> Decimal {
        *self
    }

    fn with_raw(&self, raw: Decimal) -> Self {
        raw
    }
}

impl SeriesValue for Money {
    fn to_raw(&self) -> Decimal {
        self.amount()
    }

    fn with_raw(&self, raw: Decimal) -> Self {
        Money::new(raw, self.currency())
    }

    fn check_compatible(&self, other: &Self) -> EngineResult<()> {
        if self.currency() == other.currency() {
            Ok(())
        } else {
            Err(EngineError::currency_mismatch(
                self.currency(),
                other.currency(),
            ))
        }
    }
}

/// A mapping from payment index `1..=domain` to an interpolated value.
///
/// Lifecycle: `add_point` any number of anchors, `finalize` once, then
/// `value` reads only. Writes after finalize and reads before it are
/// rejected.
#[derive(Debug, Clone)]
pub struct SparseSeries<T: SeriesValue> {
    domain: u32,
    anchors: BTreeMap<u32, Decimal>,
    template: Option<T>,
    dense: Option<Vec<Decimal>>,
}

/// Annual rate fractions indexed by payment number.
pub type RateForecast = SparseSeries<Decimal>;

/// Monetary overpayments indexed by payment number.
pub type OverpaymentSchedule = SparseSeries<Money>;

impl<T: SeriesValue> SparseSeries<T> {
    /// Creates an empty series over payment indices `1..=domain`.
    pub fn new(domain: u32) -> Self {
        Self {
            domain,
            anchors: BTreeMap::new(),
            template: None,
            dense: None,
        }
    }

    /// Convenience constructor for a whole-term series.
    pub fn for_term_years(term_years: u32) -> Self {
        Self::new(term_years * 12)
    }

    /// Upper bound of the payment domain.
    pub fn domain(&self) -> u32 {
        self.domain
    }

    /// First anchor payload, if any anchors were added.
    pub fn template(&self) -> Option<&T> {
        self.template.as_ref()
    }

    /// Whether `finalize()` has densified the series.
    pub fn is_finalized(&self) -> bool {
        self.dense.is_some()
    }

    /// Sets a known anchor point. Later anchors at the same index replace
    /// earlier ones.
    pub fn add_point(&mut self, payment: u32, value: T) -> EngineResult<()> {
        if self.is_finalized() {
            return Err(EngineError::SeriesFinalized);
        }
        if payment == 0 || payment > self.domain {
            return Err(EngineError::index_out_of_range(payment, self.domain));
        }
        match &self.template {
            Some(template) => template.check_compatible(&value)?,
            None => self.template = Some(value),
        }
        self.anchors.insert(payment, value.to_raw());
        Ok(())
    }

    /// Densifies the series: every index in `1..=domain` gets a value,
    /// linearly interpolated between anchors and held flat beyond the
    /// first and last anchor.
    pub fn finalize(&mut self) -> EngineResult<()> {
        if self.is_finalized() {
            return Err(EngineError::SeriesFinalized);
        }
        if self.anchors.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        let dense = (1..=self.domain)
            .map(|payment| self.interpolate_at(payment))
            .collect();
        self.dense = Some(dense);
        Ok(())
    }

    fn interpolate_at(&self, payment: u32) -> Decimal {
        let below = self.anchors.range(..=payment).next_back();
        let above = self.anchors.range(payment..).next();
        match (below, above) {
            (Some((&a, &va)), Some((&b, &vb))) => {
                if a == b {
                    va
                } else {
                    let offset = Decimal::from(payment - a);
                    let span = Decimal::from(b - a);
                    va + (vb - va) * offset / span
                }
            }
            // Beyond the anchored range: hold the nearest anchor flat.
            (Some((_, &va)), None) => va,
            (None, Some((_, &vb))) => vb,
            (None, None) => unreachable!("finalize requires at least one anchor"),
        }
    }

    /// Value at a payment index. Only valid after `finalize()`.
    pub fn value(&self, payment: u32) -> EngineResult<T> {
        let dense = self.dense.as_ref().ok_or(EngineError::UninitializedSeries)?;
        if payment == 0 || payment > self.domain {
            return Err(EngineError::index_out_of_range(payment, self.domain));
        }
        let template = self
            .template
            .as_ref()
            .ok_or(EngineError::UninitializedSeries)?;
        Ok(template.with_raw(dense[(payment - 1) as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use rust_decimal_macros::dec;

    fn forecast_6_to_5() -> RateForecast {
        let mut forecast = RateForecast::for_term_years(25);
        forecast.add_point(1, dec!(0.06)).unwrap();
        forecast.add_point(24, dec!(0.05)).unwrap();
        forecast.add_point(100, dec!(0.05)).unwrap();
        forecast.add_point(300, dec!(0.05)).unwrap();
        forecast.finalize().unwrap();
        forecast
    }

    #[test]
    fn test_linear_interpolation_between_anchors() {
        let forecast = forecast_6_to_5();

        // Strictly between the surrounding anchor values.
        let mid = forecast.value(12).unwrap();
        assert!(mid < dec!(0.06) && mid > dec!(0.05), "got {mid}");

        // Exact at the anchors themselves.
        assert_eq!(forecast.value(1).unwrap(), dec!(0.06));
        assert_eq!(forecast.value(24).unwrap(), dec!(0.05));

        // Flat across a constant segment.
        assert_eq!(forecast.value(200).unwrap(), dec!(0.05));
    }

    #[test]
    fn test_interpolation_arithmetic() {
        let mut series = RateForecast::new(10);
        series.add_point(1, dec!(0.02)).unwrap();
        series.add_point(5, dec!(0.06)).unwrap();
        series.finalize().unwrap();

        assert_eq!(series.value(3).unwrap(), dec!(0.04));
        assert_eq!(series.value(4).unwrap(), dec!(0.05));
    }

    #[test]
    fn test_extrapolation_holds_nearest_anchor() {
        let mut series = RateForecast::new(24);
        series.add_point(6, dec!(0.05)).unwrap();
        series.add_point(12, dec!(0.04)).unwrap();
        series.finalize().unwrap();

        assert_eq!(series.value(1).unwrap(), dec!(0.05));
        assert_eq!(series.value(24).unwrap(), dec!(0.04));
    }

    #[test]
    fn test_read_before_finalize_rejected() {
        let mut series = RateForecast::new(12);
        series.add_point(1, dec!(0.05)).unwrap();
        assert_eq!(series.value(1), Err(EngineError::UninitializedSeries));
    }

    #[test]
    fn test_write_after_finalize_rejected() {
        let mut series = RateForecast::new(12);
        series.add_point(1, dec!(0.05)).unwrap();
        series.finalize().unwrap();
        assert_eq!(
            series.add_point(2, dec!(0.06)),
            Err(EngineError::SeriesFinalized)
        );
        assert_eq!(series.finalize(), Err(EngineError::SeriesFinalized));
    }

    #[test]
    fn test_domain_bounds_enforced() {
        let mut series = RateForecast::new(12);
        assert_eq!(
            series.add_point(0, dec!(0.05)),
            Err(EngineError::index_out_of_range(0, 12))
        );
        assert_eq!(
            series.add_point(13, dec!(0.05)),
            Err(EngineError::index_out_of_range(13, 12))
        );

        series.add_point(1, dec!(0.05)).unwrap();
        series.finalize().unwrap();
        assert_eq!(series.value(13), Err(EngineError::index_out_of_range(13, 12)));
    }

    #[test]
    fn test_empty_series_cannot_finalize() {
        let mut series = RateForecast::new(12);
        assert_eq!(series.finalize(), Err(EngineError::EmptySeries));
    }

    #[test]
    fn test_money_series_keeps_currency() {
        let mut schedule = OverpaymentSchedule::new(300);
        schedule
            .add_point(1, Money::new(dec!(500), Currency::Gbp))
            .unwrap();
        schedule
            .add_point(300, Money::new(dec!(800), Currency::Gbp))
            .unwrap();
        schedule.finalize().unwrap();

        let mid = schedule.value(150).unwrap();
        assert_eq!(mid.currency(), Currency::Gbp);
        assert!(mid.amount() > dec!(500) && mid.amount() < dec!(800));
    }

    #[test]
    fn test_money_series_rejects_mixed_currencies() {
        let mut schedule = OverpaymentSchedule::new(300);
        schedule
            .add_point(1, Money::new(dec!(500), Currency::Gbp))
            .unwrap();
        let err = schedule
            .add_point(2, Money::new(dec!(500), Currency::Eur))
            .unwrap_err();
        assert!(matches!(err, EngineError::CurrencyMismatch { .. }));
    }
}
