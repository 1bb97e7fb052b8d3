//! # Creator Fund / Creativity Program Earnings
//!
//! View-based payouts from an RPM (revenue per 1,000 views) band:
//!
//! ```text
//! rpm      = niche RPM band × region multiplier
//! earnings = monthly views / 1000 × rpm
//! ```
//!
//! Low and high come from the two ends of the band, mid from its midpoint.
//! The Creativity Program pays from a separate, higher band but only counts
//! videos at or above the program's minimum length.
//!
//! Program eligibility thresholds are reported by [`eligibility`]; they never
//! change the estimate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MetricInput;
use crate::categories::PayoutProgram;
use crate::errors::{CalcError, CalcResult};
use crate::format::{format_bounds, BreakdownEntry, EstimateResult};
use crate::tables::RateTables;

/// How a creator measures up against a program's entry thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub program: PayoutProgram,
    pub meets_followers: bool,
    pub meets_monthly_views: bool,
    /// `None` when the program has no length rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_video_length: Option<bool>,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        self.meets_followers && self.meets_monthly_views && self.meets_video_length.unwrap_or(true)
    }
}

/// Check the program's entry thresholds.
pub fn eligibility(tables: &RateTables, input: &MetricInput) -> CalcResult<Eligibility> {
    let rule = tables.program(input.program)?;
    Ok(Eligibility {
        program: input.program,
        meets_followers: input.followers >= rule.min_followers,
        meets_monthly_views: input.monthly_views >= rule.min_monthly_views,
        meets_video_length: rule
            .min_video_seconds
            .map(|min| input.video_length_seconds.is_some_and(|len| len >= min)),
    })
}

/// Estimate monthly view payouts for the input's program.
pub fn estimate(tables: &RateTables, input: &MetricInput) -> CalcResult<EstimateResult> {
    input.validate()?;

    let rule = tables.program(input.program)?;
    if let Some(min_seconds) = rule.min_video_seconds {
        match input.video_length_seconds {
            None => {
                return Err(CalcError::invalid_input(
                    "video_length_seconds",
                    "none",
                    format!("{} requires a video length", input.program),
                ))
            }
            Some(seconds) if seconds < min_seconds => {
                return Err(CalcError::invalid_input(
                    "video_length_seconds",
                    seconds.to_string(),
                    format!(
                        "{} only pays for videos of at least {} seconds",
                        input.program, min_seconds
                    ),
                ))
            }
            Some(_) => {}
        }
    }

    let niche_rpm = tables.niche(input.niche)?.rpm(input.program);
    let region_multiplier = tables.region(input.region)?.rpm_multiplier;
    let rpm = niche_rpm.scaled(region_multiplier);
    let thousands = input.monthly_views as f64 / 1000.0;

    debug!(
        program = input.program.key(),
        niche = input.niche.key(),
        region = input.region.key(),
        rpm_low = rpm.low,
        rpm_high = rpm.high,
        "View payout estimated"
    );

    let breakdown = vec![
        BreakdownEntry::new("monthly views", input.monthly_views as f64),
        BreakdownEntry::new("niche rpm low", niche_rpm.low),
        BreakdownEntry::new("niche rpm high", niche_rpm.high),
        BreakdownEntry::new("region multiplier", region_multiplier),
        BreakdownEntry::new("effective rpm low", rpm.low),
        BreakdownEntry::new("effective rpm high", rpm.high),
    ];

    Ok(format_bounds(
        thousands * rpm.low,
        thousands * rpm.midpoint(),
        thousands * rpm.high,
        breakdown,
    ))
}
