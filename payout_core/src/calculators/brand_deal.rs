//! # Brand Deal Rate
//!
//! Prices a sponsored deliverable from audience size, engagement and deal
//! terms.
//!
//! ## Formula
//!
//! ```text
//! base      = followers × niche rate per follower
//! subtotal  = base × (engagement rate / niche baseline engagement)
//! adjusted  = subtotal × (1 + (exclusivity% + usage% + deliverable%) / 100)
//! low, high = adjusted × follower-tier spread
//! ```
//!
//! The deliverable multiplier from the rate tables enters as a premium of
//! `(multiplier - 1) × 100` percent, so a three-post package at 2.5× adds
//! 150% alongside the other deal premiums instead of compounding with them.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::calculators::{brand_deal, MetricInput};
//! use payout_core::categories::Niche;
//! use payout_core::tables::RateTables;
//!
//! let tables = RateTables::bundled().unwrap();
//! let input = MetricInput::new(50_000, 10.0, Niche::Fitness).with_baseline_engagement(5.0);
//! let result = brand_deal::estimate(tables, &input).unwrap();
//! assert_eq!(result.mid, 5000.0);
//! ```

use tracing::debug;

use super::{MetricInput, UsageRights};
use crate::categories::{DeliverableType, Region};
use crate::errors::CalcResult;
use crate::format::{format, format_bounds, BreakdownEntry, EstimateResult};
use crate::multiplier::{compose_multipliers, Multiplier};
use crate::tables::{FollowerTier, RateTables};

/// Resolve the follower tier a creator falls in.
pub fn follower_tier(tables: &RateTables, followers: u64) -> CalcResult<&FollowerTier> {
    tables
        .brand_deal()
        .follower_tiers
        .value_for("followers", followers as f64)
}

/// Estimate the fee for one sponsored deliverable.
pub fn estimate(tables: &RateTables, input: &MetricInput) -> CalcResult<EstimateResult> {
    input.validate()?;

    let niche = tables.niche(input.niche)?;
    let rates = tables.brand_deal();

    let baseline = input
        .baseline_engagement
        .unwrap_or(niche.baseline_engagement);
    let followers = input.followers as f64;
    let base = followers * niche.per_follower_usd;
    let engagement_factor = input.engagement_rate / baseline;

    let exclusivity = *rates
        .exclusivity_premiums
        .value_for("exclusivity_days", f64::from(input.exclusivity_days))?;
    let usage = match input.usage_rights {
        UsageRights::Days(days) => *rates
            .usage_rights_premiums
            .value_for("usage_rights", f64::from(days))?,
        UsageRights::Perpetual => rates.perpetual_usage_premium,
    };
    let deliverable = (tables.deliverable_multiplier(input.deliverable)? - 1.0) * 100.0;

    let tier = follower_tier(tables, input.followers)?;
    let spread = tier.spread.unwrap_or(rates.default_spread);

    let composed = compose_multipliers(
        base,
        &[
            Multiplier::multiplicative("engagement factor", engagement_factor),
            Multiplier::additive_percent("exclusivity premium %", exclusivity),
            Multiplier::additive_percent("usage rights premium %", usage),
            Multiplier::additive_percent("deliverable premium %", deliverable),
        ],
    )?;

    debug!(
        followers = input.followers,
        niche = input.niche.key(),
        tier = %tier.name,
        adjusted = composed.adjusted,
        "Brand deal estimated"
    );

    let mut breakdown = vec![
        BreakdownEntry::new("followers", followers),
        BreakdownEntry::new("niche rate per follower", niche.per_follower_usd),
        BreakdownEntry::new("baseline engagement %", baseline),
    ];
    breakdown.extend(composed.breakdown);
    breakdown.push(BreakdownEntry::new("range low factor", spread.low));
    breakdown.push(BreakdownEntry::new("range high factor", spread.high));

    Ok(format(composed.adjusted, spread, breakdown))
}

/// What `impressions` would cost a brand as paid ads in `region`, from the
/// regional CPM band. Useful as a sanity check next to a sponsored-post fee.
pub fn cpm_benchmark(tables: &RateTables, region: Region, impressions: u64) -> CalcResult<EstimateResult> {
    let cpm = tables.region(region)?.cpm_usd;
    let thousands = impressions as f64 / 1000.0;
    let breakdown = vec![
        BreakdownEntry::new("impressions", impressions as f64),
        BreakdownEntry::new("cpm low", cpm.low),
        BreakdownEntry::new("cpm high", cpm.high),
    ];
    Ok(format_bounds(
        thousands * cpm.low,
        thousands * cpm.midpoint(),
        thousands * cpm.high,
        breakdown,
    ))
}

/// Estimate every deliverable for the same creator and deal terms.
pub fn rate_card(
    tables: &RateTables,
    input: &MetricInput,
) -> CalcResult<Vec<(DeliverableType, EstimateResult)>> {
    DeliverableType::ALL
        .iter()
        .map(|&deliverable| {
            let priced = input.clone().with_deliverable(deliverable);
            estimate(tables, &priced).map(|result| (deliverable, result))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Niche;

    fn tables() -> &'static RateTables {
        RateTables::bundled().unwrap()
    }

    fn fitness_creator() -> MetricInput {
        MetricInput::new(50_000, 10.0, Niche::Fitness).with_baseline_engagement(5.0)
    }

    #[test]
    fn test_mid_tier_fitness_post() {
        let result = estimate(tables(), &fitness_creator()).unwrap();
        assert_eq!(result.mid, 5000.0);
        assert_eq!(result.low, 4000.0);
        assert_eq!(result.high, 6250.0);
        assert_eq!(result.step("base"), Some(2500.0));
        assert_eq!(result.step("engagement factor"), Some(2.0));
        assert_eq!(result.step("subtotal"), Some(5000.0));
    }

    #[test]
    fn test_premiums_add_rather_than_compound() {
        let input = fitness_creator()
            .with_exclusivity_days(30)
            .with_usage_rights(UsageRights::Days(30));
        let result = estimate(tables(), &input).unwrap();
        // 50% exclusivity + 30% usage = +80%
        assert_eq!(result.step("total premium %"), Some(80.0));
        assert_eq!(result.mid, 9000.0);
    }

    #[test]
    fn test_exclusivity_premium_steps_by_band() {
        for (days, premium) in [(0, 0.0), (29, 0.0), (30, 50.0), (89, 50.0), (90, 100.0), (365, 100.0)] {
            let input = fitness_creator().with_exclusivity_days(days);
            let result = estimate(tables(), &input).unwrap();
            assert_eq!(result.step("exclusivity premium %"), Some(premium), "{} days", days);
        }
        let result = estimate(tables(), &fitness_creator().with_exclusivity_days(90)).unwrap();
        assert_eq!(result.mid, 10000.0);
    }

    #[test]
    fn test_usage_rights_premium_steps_by_band() {
        for (days, premium) in [(0, 0.0), (1, 20.0), (89, 30.0), (90, 50.0), (364, 50.0), (365, 75.0), (1000, 75.0)] {
            let input = fitness_creator().with_usage_rights(UsageRights::Days(days));
            let result = estimate(tables(), &input).unwrap();
            assert_eq!(result.step("usage rights premium %"), Some(premium), "{} days", days);
        }
    }

    #[test]
    fn test_perpetual_usage() {
        let input = fitness_creator().with_usage_rights(UsageRights::Perpetual);
        let result = estimate(tables(), &input).unwrap();
        assert_eq!(result.mid, 10000.0);
    }

    #[test]
    fn test_three_post_package() {
        let input = fitness_creator().with_deliverable(DeliverableType::ThreePostPackage);
        let result = estimate(tables(), &input).unwrap();
        assert_eq!(result.step("deliverable premium %"), Some(150.0));
        assert_eq!(result.mid, 12500.0);
    }

    #[test]
    fn test_niche_baseline_used_when_not_overridden() {
        // Finance baseline is 4%, so 4% engagement is a neutral factor
        let input = MetricInput::new(20_000, 4.0, Niche::Finance);
        let result = estimate(tables(), &input).unwrap();
        assert_eq!(result.step("engagement factor"), Some(1.0));
        assert_eq!(result.mid, 1600.0);
        // Micro tier uses the default ±20% spread
        assert_eq!(result.low, 1280.0);
        assert_eq!(result.high, 1920.0);
    }

    #[test]
    fn test_zero_followers_is_zero_fee() {
        let result = estimate(tables(), &MetricInput::new(0, 5.0, Niche::Tech)).unwrap();
        assert_eq!((result.low, result.mid, result.high), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_monotone_in_followers() {
        let mut previous = estimate(tables(), &MetricInput::new(0, 6.0, Niche::Beauty)).unwrap();
        for followers in [
            5_000, 9_999, 10_000, 49_999, 50_000, 499_999, 500_000, 999_999, 1_000_000, 5_000_000,
        ] {
            let current = estimate(tables(), &MetricInput::new(followers, 6.0, Niche::Beauty)).unwrap();
            assert!(current.low >= previous.low, "low dropped at {}", followers);
            assert!(current.mid >= previous.mid, "mid dropped at {}", followers);
            assert!(current.high >= previous.high, "high dropped at {}", followers);
            previous = current;
        }
    }

    #[test]
    fn test_monotone_in_engagement() {
        let mut previous = 0.0;
        for rate in [0.0, 1.0, 2.5, 5.0, 7.5, 10.0, 20.0] {
            let result = estimate(tables(), &MetricInput::new(100_000, rate, Niche::Food)).unwrap();
            assert!(result.mid >= previous);
            previous = result.mid;
        }
    }

    #[test]
    fn test_invalid_engagement_rejected() {
        let err = estimate(tables(), &MetricInput::new(1000, -1.0, Niche::Tech)).unwrap_err();
        assert_eq!(err.field(), Some("engagement_rate"));
        let err = estimate(tables(), &MetricInput::new(1000, f64::NAN, Niche::Tech)).unwrap_err();
        assert_eq!(err.field(), Some("engagement_rate"));
    }

    #[test]
    fn test_follower_tier_lookup() {
        assert_eq!(follower_tier(tables(), 9_999).unwrap().name, "Nano");
        assert_eq!(follower_tier(tables(), 10_000).unwrap().name, "Micro");
        assert_eq!(follower_tier(tables(), 1_000_000).unwrap().name, "Mega");
    }

    #[test]
    fn test_cpm_benchmark() {
        let result = cpm_benchmark(tables(), Region::Us, 100_000).unwrap();
        assert_eq!((result.low, result.mid, result.high), (800.0, 1000.0, 1200.0));
        let india = cpm_benchmark(tables(), Region::India, 100_000).unwrap();
        assert!(india.high < result.low);
    }

    #[test]
    fn test_rate_card_covers_every_deliverable() {
        let card = rate_card(tables(), &fitness_creator()).unwrap();
        assert_eq!(card.len(), DeliverableType::ALL.len());
        let single = card
            .iter()
            .find(|(d, _)| *d == DeliverableType::SinglePost)
            .map(|(_, r)| r.mid);
        assert_eq!(single, Some(5000.0));
    }
}
