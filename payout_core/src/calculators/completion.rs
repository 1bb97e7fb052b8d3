//! # Completion Rate
//!
//! ```text
//! completion % = average watch time / video length × 100
//! ```
//!
//! Values above 100% mean viewers replay the video and are reported as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RateReport;
use crate::categories::CompletionBand;
use crate::errors::{ensure_non_negative, CalcError, CalcResult};
use crate::format::BreakdownEntry;
use crate::tables::RateTables;

/// ## JSON Example
///
/// ```json
/// { "avg_watch_time_seconds": 20.0, "video_length_seconds": 25 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionInput {
    pub avg_watch_time_seconds: f64,
    pub video_length_seconds: u32,
}

impl CompletionInput {
    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("avg_watch_time_seconds", self.avg_watch_time_seconds)?;
        if self.video_length_seconds == 0 {
            return Err(CalcError::invalid_input(
                "video_length_seconds",
                "0",
                "Video length must be positive",
            ));
        }
        Ok(())
    }
}

pub fn calculate(tables: &RateTables, input: &CompletionInput) -> CalcResult<RateReport<CompletionBand>> {
    input.validate()?;

    let length = f64::from(input.video_length_seconds);
    let rate = input.avg_watch_time_seconds * 100.0 / length;
    let band = *tables.completion_bands().value_for("completion_rate", rate)?;

    debug!(rate, band = band.display_name(), "Completion rate classified");

    Ok(RateReport {
        value_percent: rate,
        band,
        breakdown: vec![
            BreakdownEntry::new("average watch time seconds", input.avg_watch_time_seconds),
            BreakdownEntry::new("video length seconds", length),
            BreakdownEntry::new("completion rate %", rate),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(watch: f64, length: u32) -> CalcResult<RateReport<CompletionBand>> {
        calculate(
            RateTables::bundled().unwrap(),
            &CompletionInput {
                avg_watch_time_seconds: watch,
                video_length_seconds: length,
            },
        )
    }

    #[test]
    fn test_excellent_completion() {
        let report = run(20.0, 25).unwrap();
        assert_eq!(report.value_percent, 80.0);
        assert_eq!(report.band, CompletionBand::Excellent);
    }

    #[test]
    fn test_replays_exceed_one_hundred() {
        let report = run(30.0, 15).unwrap();
        assert_eq!(report.value_percent, 200.0);
        assert_eq!(report.band, CompletionBand::ReplayDriven);
    }

    #[test]
    fn test_low_completion() {
        assert_eq!(run(3.0, 60).unwrap().band, CompletionBand::Low);
        assert_eq!(run(0.0, 60).unwrap().value_percent, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(run(10.0, 0).unwrap_err().field(), Some("video_length_seconds"));
        assert_eq!(run(-1.0, 30).unwrap_err().field(), Some("avg_watch_time_seconds"));
        assert_eq!(run(f64::INFINITY, 30).unwrap_err().field(), Some("avg_watch_time_seconds"));
    }
}
