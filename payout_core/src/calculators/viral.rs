//! # Viral Coefficient
//!
//! ```text
//! i = shares / viewers            (invitations per viewer)
//! c = conversions / shares        (0 when nothing was shared)
//! K = i × c
//! ```
//!
//! `K >= 1` means each wave of viewers brings at least as many new ones. The
//! optional reach projection sums the geometric series
//! `viewers × (1 + K + K² + … + K^cycles)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::ViralBand;
use crate::errors::{CalcError, CalcResult};
use crate::format::BreakdownEntry;
use crate::tables::RateTables;

/// Sharing cycles beyond this are not meaningful to project
pub const MAX_CYCLES: u32 = 50;

/// ## JSON Example
///
/// ```json
/// { "viewers": 10000, "shares": 1200, "conversions": 900, "cycles": 5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViralInput {
    pub viewers: u64,
    pub shares: u64,
    pub conversions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<u32>,
}

impl ViralInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.viewers == 0 {
            return Err(CalcError::invalid_input("viewers", "0", "Viewer count must be positive"));
        }
        if let Some(cycles) = self.cycles {
            if cycles > MAX_CYCLES {
                return Err(CalcError::invalid_input(
                    "cycles",
                    cycles.to_string(),
                    format!("Projection is limited to {} cycles", MAX_CYCLES),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViralReport {
    /// Shares per viewer
    pub share_rate: f64,
    /// New viewers per share
    pub conversion_rate: f64,
    pub coefficient: f64,
    pub band: ViralBand,
    /// Cumulative viewers after the requested number of cycles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_reach: Option<f64>,
    pub breakdown: Vec<BreakdownEntry>,
}

pub fn calculate(tables: &RateTables, input: &ViralInput) -> CalcResult<ViralReport> {
    input.validate()?;

    let viewers = input.viewers as f64;
    let share_rate = input.shares as f64 / viewers;
    let conversion_rate = if input.shares == 0 {
        0.0
    } else {
        input.conversions as f64 / input.shares as f64
    };
    let coefficient = share_rate * conversion_rate;
    let band = *tables.viral_bands().value_for("viral_coefficient", coefficient)?;

    let projected_reach = input.cycles.map(|cycles| {
        let mut reach = 0.0;
        let mut wave = viewers;
        for _ in 0..=cycles {
            reach += wave;
            wave *= coefficient;
        }
        reach.round()
    });

    debug!(coefficient, band = band.display_name(), "Viral coefficient classified");

    Ok(ViralReport {
        share_rate,
        conversion_rate,
        coefficient,
        band,
        projected_reach,
        breakdown: vec![
            BreakdownEntry::new("viewers", viewers),
            BreakdownEntry::new("shares", input.shares as f64),
            BreakdownEntry::new("conversions", input.conversions as f64),
            BreakdownEntry::new("share rate", share_rate),
            BreakdownEntry::new("conversion rate", conversion_rate),
            BreakdownEntry::new("viral coefficient", coefficient),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(viewers: u64, shares: u64, conversions: u64, cycles: Option<u32>) -> CalcResult<ViralReport> {
        calculate(
            RateTables::bundled().unwrap(),
            &ViralInput {
                viewers,
                shares,
                conversions,
                cycles,
            },
        )
    }

    #[test]
    fn test_coefficient() {
        let report = run(10_000, 2_000, 3_000, None).unwrap();
        assert_eq!(report.share_rate, 0.2);
        assert_eq!(report.conversion_rate, 1.5);
        assert!((report.coefficient - 0.3).abs() < 1e-12);
        assert_eq!(report.band, ViralBand::Moderate);
    }

    #[test]
    fn test_self_sustaining() {
        let report = run(1_000, 500, 1_000, None).unwrap();
        assert_eq!(report.coefficient, 1.0);
        assert_eq!(report.band, ViralBand::Viral);
        assert_eq!(report.band.display_name(), "Self-Sustaining");
    }

    #[test]
    fn test_no_shares() {
        let report = run(1_000, 0, 0, Some(3)).unwrap();
        assert_eq!(report.coefficient, 0.0);
        assert_eq!(report.band, ViralBand::Low);
        assert_eq!(report.projected_reach, Some(1_000.0));
    }

    #[test]
    fn test_reach_projection() {
        // K = 0.5: 1000 + 500 + 250 + 125
        let report = run(1_000, 250, 500, Some(3)).unwrap();
        assert_eq!(report.coefficient, 0.5);
        assert_eq!(report.projected_reach, Some(1_875.0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(run(0, 10, 10, None).unwrap_err().field(), Some("viewers"));
        assert_eq!(run(10, 1, 1, Some(MAX_CYCLES + 1)).unwrap_err().field(), Some("cycles"));
    }
}
