//! # Engagement Rate
//!
//! ```text
//! rate % = (likes + comments + shares) / followers × 100
//! ```
//!
//! The rate is classified against the `bands.engagement` table. Rates above
//! 100% are possible for small accounts with a viral post and land in the top
//! band.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RateReport;
use crate::categories::EngagementBand;
use crate::errors::{CalcError, CalcResult};
use crate::format::BreakdownEntry;
use crate::tables::RateTables;

/// Interaction totals for a post or an averaging window.
///
/// ## JSON Example
///
/// ```json
/// { "likes": 2500, "comments": 150, "shares": 100, "followers": 50000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngagementInput {
    pub likes: u64,
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    pub followers: u64,
}

impl EngagementInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.followers == 0 {
            return Err(CalcError::invalid_input(
                "followers",
                "0",
                "Follower count must be positive",
            ));
        }
        Ok(())
    }

    pub fn interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }
}

/// Compute and classify the engagement rate.
pub fn calculate(tables: &RateTables, input: &EngagementInput) -> CalcResult<RateReport<EngagementBand>> {
    input.validate()?;

    let interactions = input.interactions() as f64;
    let followers = input.followers as f64;
    let rate = interactions * 100.0 / followers;
    let band = *tables.engagement_bands().value_for("engagement_rate", rate)?;

    debug!(rate, band = band.display_name(), "Engagement rate classified");

    Ok(RateReport {
        value_percent: rate,
        band,
        breakdown: vec![
            BreakdownEntry::new("interactions", interactions),
            BreakdownEntry::new("followers", followers),
            BreakdownEntry::new("engagement rate %", rate),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> &'static RateTables {
        RateTables::bundled().unwrap()
    }

    #[test]
    fn test_good_engagement() {
        let input = EngagementInput {
            likes: 2500,
            comments: 150,
            shares: 100,
            followers: 50_000,
        };
        let report = calculate(tables(), &input).unwrap();
        assert_eq!(report.value_percent, 5.5);
        assert_eq!(report.band, EngagementBand::Good);
    }

    #[test]
    fn test_band_edges() {
        let at = |likes| {
            calculate(
                tables(),
                &EngagementInput { likes, comments: 0, shares: 0, followers: 1000 },
            )
            .unwrap()
            .band
        };
        assert_eq!(at(0), EngagementBand::BelowAverage);
        assert_eq!(at(19), EngagementBand::BelowAverage);
        assert_eq!(at(20), EngagementBand::Average);
        assert_eq!(at(50), EngagementBand::Good);
        assert_eq!(at(100), EngagementBand::Excellent);
        assert_eq!(at(5000), EngagementBand::Excellent);
    }

    #[test]
    fn test_zero_followers_rejected() {
        let input = EngagementInput { likes: 10, comments: 0, shares: 0, followers: 0 };
        let err = calculate(tables(), &input).unwrap_err();
        assert_eq!(err.field(), Some("followers"));
    }

    #[test]
    fn test_shares_default_to_zero() {
        let input: EngagementInput =
            serde_json::from_str(r#"{ "likes": 10, "comments": 5, "followers": 100 }"#).unwrap();
        assert_eq!(input.shares, 0);
        assert_eq!(calculate(tables(), &input).unwrap().value_percent, 15.0);
    }
}
