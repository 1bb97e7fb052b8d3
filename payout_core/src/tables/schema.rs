//! On-disk TOML layout of the rate tables and its conversion into the
//! validated [`RateTables`](super::RateTables).
//!
//! Categorical tables are authored as arrays of rows (`[[niches]]`) so each
//! row names its own key. Conversion checks that every enum variant appears
//! exactly once.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{
    gift_key, BrandDealRates, CoinPackage, CoinRates, FollowerTier, Gift, NicheRates, ProgramRule,
    RateRange, RateTables, RegionRates,
};
use crate::categories::{
    CompletionBand, DeliverableType, EngagementBand, GrowthBand, Niche, PayoutProgram, Region,
    ShopCategory, ViralBand,
};
use crate::errors::{CalcError, CalcResult};
use crate::format::ToleranceBand;
use crate::tier::{TierBand, TierTable};

/// Engagement baseline used when a niche row omits one
const DEFAULT_BASELINE_ENGAGEMENT: f64 = 5.0;

fn default_baseline_engagement() -> f64 {
    DEFAULT_BASELINE_ENGAGEMENT
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawRateTables {
    version: String,
    coins: RawCoins,
    niches: Vec<RawNiche>,
    regions: Vec<RawRegion>,
    deliverables: Vec<RawDeliverable>,
    shop_commissions: Vec<RawCommission>,
    brand_deal: RawBrandDeal,
    programs: RawPrograms,
    bands: RawBands,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCoins {
    coins_per_diamond: u64,
    usd_per_diamond: f64,
    packages: Vec<CoinPackage>,
    gifts: Vec<Gift>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNiche {
    niche: Niche,
    per_follower_usd: f64,
    #[serde(default = "default_baseline_engagement")]
    baseline_engagement: f64,
    fund_rpm: RateRange,
    creativity_rpm: RateRange,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegion {
    region: Region,
    cpm_usd: RateRange,
    rpm_multiplier: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeliverable {
    deliverable: DeliverableType,
    multiplier: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCommission {
    category: ShopCategory,
    rate_percent: RateRange,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBrandDeal {
    default_spread: ToleranceBand,
    perpetual_usage_premium: f64,
    follower_tiers: Vec<TierBand<FollowerTier>>,
    exclusivity_premiums: Vec<TierBand<f64>>,
    usage_rights_premiums: Vec<TierBand<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPrograms {
    creator_fund: ProgramRule,
    creativity_program: ProgramRule,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBands {
    engagement: Vec<TierBand<EngagementBand>>,
    completion: Vec<TierBand<CompletionBand>>,
    growth: Vec<TierBand<GrowthBand>>,
    viral: Vec<TierBand<ViralBand>>,
}

impl RawRateTables {
    pub(super) fn into_tables(self) -> CalcResult<RateTables> {
        if self.version.trim().is_empty() {
            return Err(CalcError::configuration("version", "version must not be empty"));
        }

        let coins = convert_coins(self.coins)?;

        let niches = keyed("niches", &Niche::ALL, Niche::key, self.niches, |row| {
            require_positive("niches", row.niche.key(), "per_follower_usd", row.per_follower_usd)?;
            require_positive("niches", row.niche.key(), "baseline_engagement", row.baseline_engagement)?;
            row.fund_rpm.validate("niches.fund_rpm")?;
            row.creativity_rpm.validate("niches.creativity_rpm")?;
            Ok((
                row.niche,
                NicheRates {
                    per_follower_usd: row.per_follower_usd,
                    baseline_engagement: row.baseline_engagement,
                    fund_rpm: row.fund_rpm,
                    creativity_rpm: row.creativity_rpm,
                },
            ))
        })?;

        let regions = keyed("regions", &Region::ALL, Region::key, self.regions, |row| {
            require_positive("regions", row.region.key(), "rpm_multiplier", row.rpm_multiplier)?;
            row.cpm_usd.validate("regions.cpm_usd")?;
            Ok((
                row.region,
                RegionRates {
                    cpm_usd: row.cpm_usd,
                    rpm_multiplier: row.rpm_multiplier,
                },
            ))
        })?;

        let deliverables = keyed(
            "deliverables",
            &DeliverableType::ALL,
            DeliverableType::key,
            self.deliverables,
            |row| {
                require_positive("deliverables", row.deliverable.key(), "multiplier", row.multiplier)?;
                Ok((row.deliverable, row.multiplier))
            },
        )?;

        let shop_commissions = keyed(
            "shop_commissions",
            &ShopCategory::ALL,
            ShopCategory::key,
            self.shop_commissions,
            |row| {
                row.rate_percent.validate("shop_commissions")?;
                if row.rate_percent.high > 100.0 {
                    return Err(CalcError::configuration(
                        "shop_commissions",
                        format!("{}: commission cannot exceed 100%", row.category.key()),
                    ));
                }
                Ok((row.category, row.rate_percent))
            },
        )?;

        let brand_deal = convert_brand_deal(self.brand_deal)?;

        for (program, rule) in [
            (PayoutProgram::CreatorFund, &self.programs.creator_fund),
            (PayoutProgram::CreativityProgram, &self.programs.creativity_program),
        ] {
            if rule.min_video_seconds == Some(0) {
                return Err(CalcError::configuration(
                    "programs",
                    format!("{}: min_video_seconds must be positive", program.key()),
                ));
            }
        }
        let mut programs = BTreeMap::new();
        programs.insert(PayoutProgram::CreatorFund, self.programs.creator_fund);
        programs.insert(PayoutProgram::CreativityProgram, self.programs.creativity_program);

        Ok(RateTables {
            version: self.version,
            coins,
            niches,
            regions,
            deliverables,
            shop_commissions,
            brand_deal,
            programs,
            engagement_bands: TierTable::new("bands.engagement", self.bands.engagement)?,
            completion_bands: TierTable::new("bands.completion", self.bands.completion)?,
            growth_bands: TierTable::new("bands.growth", self.bands.growth)?,
            viral_bands: TierTable::new("bands.viral", self.bands.viral)?,
        })
    }
}

/// Build an enum-keyed map, requiring each variant exactly once.
fn keyed<K, V, R>(
    table: &str,
    all: &[K],
    key: fn(&K) -> &'static str,
    rows: Vec<R>,
    convert: impl Fn(R) -> CalcResult<(K, V)>,
) -> CalcResult<BTreeMap<K, V>>
where
    K: Ord + Copy,
{
    let mut map = BTreeMap::new();
    for row in rows {
        let (k, v) = convert(row)?;
        if map.insert(k, v).is_some() {
            return Err(CalcError::configuration(table, format!("duplicate entry '{}'", key(&k))));
        }
    }
    let missing: Vec<&str> = all.iter().filter(|k| !map.contains_key(*k)).map(key).collect();
    if !missing.is_empty() {
        return Err(CalcError::configuration(
            table,
            format!("missing entries: {}", missing.join(", ")),
        ));
    }
    Ok(map)
}

fn require_positive(table: &str, row: &str, field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::configuration(
            table,
            format!("{}: {} must be a positive number, got {}", row, field, value),
        ));
    }
    Ok(())
}

fn convert_coins(raw: RawCoins) -> CalcResult<CoinRates> {
    if raw.coins_per_diamond == 0 {
        return Err(CalcError::configuration("coins", "coins_per_diamond must be positive"));
    }
    require_positive("coins", "coins", "usd_per_diamond", raw.usd_per_diamond)?;

    if raw.packages.is_empty() {
        return Err(CalcError::configuration("coins.packages", "at least one package is required"));
    }
    for package in &raw.packages {
        if package.coins == 0 {
            return Err(CalcError::configuration("coins.packages", "package size must be positive"));
        }
        require_positive("coins.packages", &package.coins.to_string(), "price_usd", package.price_usd)?;
    }
    for pair in raw.packages.windows(2) {
        let (smaller, larger) = (&pair[0], &pair[1]);
        if larger.coins <= smaller.coins {
            return Err(CalcError::configuration(
                "coins.packages",
                format!("packages must be sorted by size ({} before {})", smaller.coins, larger.coins),
            ));
        }
        if larger.per_coin_usd() > smaller.per_coin_usd() {
            return Err(CalcError::configuration(
                "coins.packages",
                format!(
                    "{}-coin package costs more per coin than the {}-coin package",
                    larger.coins, smaller.coins
                ),
            ));
        }
    }

    let mut gifts = BTreeMap::new();
    for gift in raw.gifts {
        if gift.coins == 0 {
            return Err(CalcError::configuration(
                "coins.gifts",
                format!("{}: gift price must be positive", gift.key),
            ));
        }
        let key = gift_key(&gift.key);
        if gifts.contains_key(&key) {
            return Err(CalcError::configuration(
                "coins.gifts",
                format!("duplicate gift key '{}'", key),
            ));
        }
        gifts.insert(key, gift);
    }

    Ok(CoinRates {
        coins_per_diamond: raw.coins_per_diamond,
        usd_per_diamond: raw.usd_per_diamond,
        packages: raw.packages,
        gifts,
    })
}

fn convert_brand_deal(raw: RawBrandDeal) -> CalcResult<BrandDealRates> {
    raw.default_spread.validate("brand_deal.default_spread")?;
    for band in &raw.follower_tiers {
        if let Some(spread) = band.value.spread {
            spread.validate("brand_deal.follower_tiers")?;
        }
    }
    for (table, bands) in [
        ("brand_deal.exclusivity_premiums", &raw.exclusivity_premiums),
        ("brand_deal.usage_rights_premiums", &raw.usage_rights_premiums),
    ] {
        if let Some(band) = bands.iter().find(|b| !b.value.is_finite() || b.value < 0.0) {
            return Err(CalcError::configuration(
                table,
                format!("premium for {} days must be non-negative", band.range_label()),
            ));
        }
    }
    if !raw.perpetual_usage_premium.is_finite() || raw.perpetual_usage_premium < 0.0 {
        return Err(CalcError::configuration(
            "brand_deal.perpetual_usage_premium",
            "premium must be non-negative",
        ));
    }

    // Estimates stay monotone in followers only if no tier narrows its range
    let follower_tiers = TierTable::new("brand_deal.follower_tiers", raw.follower_tiers)?;
    for pair in follower_tiers.bands().windows(2) {
        let below = pair[0].value.spread.unwrap_or(raw.default_spread);
        let above = pair[1].value.spread.unwrap_or(raw.default_spread);
        if above.low < below.low || above.high < below.high {
            return Err(CalcError::configuration(
                "brand_deal.follower_tiers",
                format!(
                    "{} spread {}-{} falls below the {} spread {}-{}",
                    pair[1].value.name, above.low, above.high, pair[0].value.name, below.low, below.high
                ),
            ));
        }
    }

    Ok(BrandDealRates {
        default_spread: raw.default_spread,
        perpetual_usage_premium: raw.perpetual_usage_premium,
        follower_tiers,
        exclusivity_premiums: TierTable::new("brand_deal.exclusivity_premiums", raw.exclusivity_premiums)?,
        usage_rights_premiums: TierTable::new("brand_deal.usage_rights_premiums", raw.usage_rights_premiums)?,
    })
}
