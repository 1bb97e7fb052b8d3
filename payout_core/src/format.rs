//! # Result Formatter
//!
//! Turns a raw dollar figure into the low/mid/high range the calculator pages
//! show. The ordered breakdown travels with the range so a UI can render
//! every intermediate step of the estimate.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::format::{format, ToleranceBand};
//!
//! let result = format(5000.0, ToleranceBand::DEFAULT, Vec::new());
//! assert_eq!((result.low, result.mid, result.high), (4000.0, 5000.0, 6000.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::Currency;

/// One step of a calculation, in the order it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// What this step is, e.g. `"engagement factor"`
    pub factor: String,
    /// The value applied or produced at this step
    pub value: f64,
}

impl BreakdownEntry {
    pub fn new(factor: impl Into<String>, value: f64) -> Self {
        Self {
            factor: factor.into(),
            value,
        }
    }
}

/// Multipliers producing the low and high ends of a range.
///
/// `low <= 1.0 <= high`, so the midpoint always sits inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub low: f64,
    pub high: f64,
}

impl ToleranceBand {
    /// The ±20% spread used wherever no explicit range is stated
    pub const DEFAULT: ToleranceBand = ToleranceBand { low: 0.8, high: 1.2 };

    /// A zero-width band for exact conversions
    pub const EXACT: ToleranceBand = ToleranceBand { low: 1.0, high: 1.0 };

    /// Build a band, rejecting spreads that would not bracket the midpoint.
    pub fn new(low: f64, high: f64) -> CalcResult<Self> {
        let band = ToleranceBand { low, high };
        band.validate("tolerance_band")?;
        Ok(band)
    }

    pub(crate) fn validate(&self, table: &str) -> CalcResult<()> {
        if !(self.low.is_finite() && self.high.is_finite()) {
            return Err(CalcError::configuration(table, "spread must be finite"));
        }
        if self.low < 0.0 || self.low > 1.0 || self.high < 1.0 {
            return Err(CalcError::configuration(
                table,
                format!(
                    "spread [{}, {}] must satisfy 0 <= low <= 1 <= high",
                    self.low, self.high
                ),
            ));
        }
        Ok(())
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rounding applied to every figure of an [`EstimateResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Precision {
    /// Nearest whole dollar
    #[default]
    WholeUnits,
    /// Nearest cent, for coin and gift amounts that are often below a dollar
    Cents,
}

impl Precision {
    pub fn round(self, value: f64) -> f64 {
        match self {
            Precision::WholeUnits => value.round(),
            Precision::Cents => (value * 100.0).round() / 100.0,
        }
    }
}

/// A monetary estimate presented as a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    pub currency: Currency,
    /// Every intermediate value, in application order
    pub breakdown: Vec<BreakdownEntry>,
}

impl EstimateResult {
    /// Look up a breakdown value by factor name
    pub fn step(&self, factor: &str) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|entry| entry.factor == factor)
            .map(|entry| entry.value)
    }

    /// One-line summary, e.g. `"$4,000 - $6,000 (typical $5,000)"`
    pub fn summary(&self) -> String {
        format!(
            "{} - {} (typical {})",
            format_usd(self.low),
            format_usd(self.high),
            format_usd(self.mid)
        )
    }
}

/// Spread `raw` by `band` and round to whole dollars.
pub fn format(raw: f64, band: ToleranceBand, breakdown: Vec<BreakdownEntry>) -> EstimateResult {
    format_with(raw, band, breakdown, Precision::WholeUnits)
}

/// [`format`] with an explicit rounding precision.
pub fn format_with(
    raw: f64,
    band: ToleranceBand,
    breakdown: Vec<BreakdownEntry>,
    precision: Precision,
) -> EstimateResult {
    format_bounds_with(raw * band.low, raw, raw * band.high, breakdown, precision)
}

/// Build a result from bounds computed by the calculator itself, e.g. from
/// the two ends of an RPM band.
pub fn format_bounds(low: f64, mid: f64, high: f64, breakdown: Vec<BreakdownEntry>) -> EstimateResult {
    format_bounds_with(low, mid, high, breakdown, Precision::WholeUnits)
}

/// [`format_bounds`] with an explicit rounding precision.
pub fn format_bounds_with(
    low: f64,
    mid: f64,
    high: f64,
    breakdown: Vec<BreakdownEntry>,
    precision: Precision,
) -> EstimateResult {
    EstimateResult {
        low: precision.round(low),
        mid: precision.round(mid),
        high: precision.round(high),
        currency: Currency::Usd,
        breakdown,
    }
}

/// Format a dollar figure with thousands separators: `12345.6` → `"$12,346"`.
///
/// Amounts under $100 keep their cents.
pub fn format_usd(value: f64) -> String {
    if value.abs() < 100.0 && value.fract() != 0.0 {
        return format!("${:.2}", value);
    }
    format!("${}", group_thousands(value.round() as i64))
}

/// Group digits in threes: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spread() {
        let result = format(2500.0, ToleranceBand::DEFAULT, vec![BreakdownEntry::new("base", 2500.0)]);
        assert_eq!(result.low, 2000.0);
        assert_eq!(result.mid, 2500.0);
        assert_eq!(result.high, 3000.0);
        assert_eq!(result.currency, Currency::Usd);
        assert_eq!(result.step("base"), Some(2500.0));
    }

    #[test]
    fn test_asymmetric_spread_rounds_to_whole_dollars() {
        let band = ToleranceBand::new(0.85, 1.3).unwrap();
        let result = format(1234.56, band, Vec::new());
        assert_eq!(result.mid, 1235.0);
        assert_eq!(result.low, 1049.0);
        assert_eq!(result.high, 1605.0);
    }

    #[test]
    fn test_cent_precision() {
        let result = format_with(2.5, ToleranceBand::EXACT, Vec::new(), Precision::Cents);
        assert_eq!(result.mid, 2.5);
        assert_eq!(result.low, result.high);
    }

    #[test]
    fn test_invalid_bands() {
        assert!(ToleranceBand::new(1.1, 1.2).is_err());
        assert!(ToleranceBand::new(0.8, 0.9).is_err());
        assert!(ToleranceBand::new(-0.1, 1.2).is_err());
        assert!(ToleranceBand::new(0.8, f64::INFINITY).is_err());
    }

    #[test]
    fn test_usd_formatting() {
        assert_eq!(format_usd(1234567.0), "$1,234,567");
        assert_eq!(format_usd(2.5), "$2.50");
        assert_eq!(format_usd(750.0), "$750");
        assert_eq!(group_thousands(-1000), "-1,000");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn test_summary() {
        let result = format_bounds(400.0, 575.0, 750.0, Vec::new());
        assert_eq!(result.summary(), "$400 - $750 (typical $575)");
    }
}
