//! # Follower Growth
//!
//! ```text
//! growth %       = (end - start) / start × 100
//! daily rate     = (end / start)^(1 / period_days) - 1
//! 30-day rate %  = ((1 + daily)^30 - 1) × 100
//! ```
//!
//! Classification always uses the 30-day rate so windows of different
//! lengths compare fairly. Negative growth is [`GrowthBand::Declining`]; the
//! band table only covers `[0, ∞)`.
//!
//! An optional projection compounds the daily rate forward and spreads the
//! projected gain (not the whole audience) by ±20%.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::GrowthBand;
use crate::errors::{CalcError, CalcResult};
use crate::format::{BreakdownEntry, ToleranceBand};
use crate::tables::RateTables;

/// Days in the normalization window
const NORMALIZED_DAYS: f64 = 30.0;

/// ## JSON Example
///
/// ```json
/// { "starting_followers": 10000, "ending_followers": 11500, "period_days": 30, "projection_days": 90 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrowthInput {
    pub starting_followers: u64,
    pub ending_followers: u64,
    pub period_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_days: Option<u32>,
}

impl GrowthInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.starting_followers == 0 {
            return Err(CalcError::invalid_input(
                "starting_followers",
                "0",
                "Starting follower count must be positive",
            ));
        }
        if self.period_days == 0 {
            return Err(CalcError::invalid_input(
                "period_days",
                "0",
                "Period must be at least one day",
            ));
        }
        Ok(())
    }
}

/// Follower count expected after `days` more days at the observed rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub days: u32,
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub growth_percent: f64,
    pub daily_growth_percent: f64,
    pub monthly_growth_percent: f64,
    pub average_daily_gain: f64,
    pub band: GrowthBand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<GrowthProjection>,
    pub breakdown: Vec<BreakdownEntry>,
}

pub fn calculate(tables: &RateTables, input: &GrowthInput) -> CalcResult<GrowthReport> {
    input.validate()?;

    let start = input.starting_followers as f64;
    let end = input.ending_followers as f64;
    let period = f64::from(input.period_days);
    let ratio = end / start;

    let growth_percent = (end - start) * 100.0 / start;
    let daily = ratio.powf(1.0 / period) - 1.0;
    let monthly_percent = (ratio.powf(NORMALIZED_DAYS / period) - 1.0) * 100.0;
    let average_daily_gain = (end - start) / period;

    let band = if monthly_percent < 0.0 {
        GrowthBand::Declining
    } else {
        *tables.growth_bands().value_for("growth_rate", monthly_percent)?
    };

    let projection = input.projection_days.map(|days| {
        let projected = end * ratio.powf(f64::from(days) / period);
        let gain = projected - end;
        let band = ToleranceBand::DEFAULT;
        let (a, b) = (end + gain * band.low, end + gain * band.high);
        GrowthProjection {
            days,
            low: a.min(b).round(),
            mid: projected.round(),
            high: a.max(b).round(),
        }
    });

    debug!(
        growth_percent,
        monthly_percent,
        band = band.display_name(),
        "Follower growth classified"
    );

    Ok(GrowthReport {
        growth_percent,
        daily_growth_percent: daily * 100.0,
        monthly_growth_percent: monthly_percent,
        average_daily_gain,
        band,
        projection,
        breakdown: vec![
            BreakdownEntry::new("starting followers", start),
            BreakdownEntry::new("ending followers", end),
            BreakdownEntry::new("period days", period),
            BreakdownEntry::new("growth %", growth_percent),
            BreakdownEntry::new("daily growth %", daily * 100.0),
            BreakdownEntry::new("30-day growth %", monthly_percent),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(start: u64, end: u64, days: u32, projection_days: Option<u32>) -> CalcResult<GrowthReport> {
        calculate(
            RateTables::bundled().unwrap(),
            &GrowthInput {
                starting_followers: start,
                ending_followers: end,
                period_days: days,
                projection_days,
            },
        )
    }

    #[test]
    fn test_monthly_growth() {
        let report = run(10_000, 11_500, 30, None).unwrap();
        assert!((report.growth_percent - 15.0).abs() < 1e-9);
        assert!((report.monthly_growth_percent - 15.0).abs() < 1e-9);
        assert_eq!(report.average_daily_gain, 50.0);
        assert_eq!(report.band, GrowthBand::Fast);
        assert!(report.projection.is_none());
    }

    #[test]
    fn test_longer_window_is_normalized() {
        // 25.44% over 60 days is 12% per 30 days
        let report = run(10_000, 12_544, 60, None).unwrap();
        assert!((report.monthly_growth_percent - 12.0).abs() < 1e-9);
        assert_eq!(report.band, GrowthBand::Fast);
    }

    #[test]
    fn test_declining() {
        let report = run(10_000, 9_000, 30, None).unwrap();
        assert!(report.growth_percent < 0.0);
        assert_eq!(report.band, GrowthBand::Declining);
    }

    #[test]
    fn test_flat_is_stalled() {
        let report = run(10_000, 10_000, 14, None).unwrap();
        assert_eq!(report.growth_percent, 0.0);
        assert_eq!(report.band, GrowthBand::Stalled);
    }

    #[test]
    fn test_projection_spreads_the_gain() {
        let report = run(10_000, 11_000, 30, Some(30)).unwrap();
        let projection = report.projection.unwrap();
        assert_eq!(projection.mid, 12_100.0);
        assert_eq!(projection.low, 11_880.0);
        assert_eq!(projection.high, 12_320.0);
    }

    #[test]
    fn test_declining_projection_stays_ordered() {
        let projection = run(10_000, 9_000, 30, Some(30)).unwrap().projection.unwrap();
        assert!(projection.low <= projection.mid);
        assert!(projection.mid <= projection.high);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(run(0, 100, 30, None).unwrap_err().field(), Some("starting_followers"));
        assert_eq!(run(100, 200, 0, None).unwrap_err().field(), Some("period_days"));
    }
}
