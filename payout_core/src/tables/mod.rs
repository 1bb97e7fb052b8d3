//! # Rate Tables
//!
//! Static reference data for every calculator: conversion ratios, price
//! lists, niche/region rate bands, premium bands and classification bands.
//!
//! Tables ship as versioned TOML bundled into the binary
//! (`payout_core/rates.toml`). They are parsed and validated once, then
//! shared read-only:
//!
//! ```rust
//! use payout_core::tables::RateTables;
//! use payout_core::categories::Niche;
//!
//! let tables = RateTables::bundled().unwrap();
//! assert_eq!(tables.niche(Niche::Fitness).unwrap().per_follower_usd, 0.05);
//! ```
//!
//! Updating rates only touches data. Callers that need different numbers
//! load their own file with [`RateTables::from_file`] and pass that table
//! to the calculators instead.

mod schema;

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::categories::{
    CompletionBand, DeliverableType, EngagementBand, GrowthBand, Niche, PayoutProgram, Region,
    ShopCategory, ViralBand,
};
use crate::errors::{CalcError, CalcResult};
use crate::format::ToleranceBand;
use crate::tier::TierTable;

/// Rate tables compiled into the crate
const BUNDLED_RATES: &str = include_str!("../../rates.toml");

static BUNDLED: Lazy<CalcResult<RateTables>> = Lazy::new(|| RateTables::from_toml_str(BUNDLED_RATES));

// ============================================================================
// Table Rows
// ============================================================================

/// A closed `[low, high]` range of rates (RPM, CPM, commission percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRange {
    pub low: f64,
    pub high: f64,
}

impl RateRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Scale both ends
    pub fn scaled(&self, factor: f64) -> RateRange {
        RateRange {
            low: self.low * factor,
            high: self.high * factor,
        }
    }

    pub(crate) fn validate(&self, table: &str) -> CalcResult<()> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low < 0.0 || self.high < self.low {
            return Err(CalcError::configuration(
                table,
                format!("range [{}, {}] must satisfy 0 <= low <= high", self.low, self.high),
            ));
        }
        Ok(())
    }
}

/// Per-niche rates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NicheRates {
    /// Brand-deal price per follower for one post (USD)
    pub per_follower_usd: f64,
    /// Engagement rate (percent) a brand expects in this niche
    pub baseline_engagement: f64,
    /// Creator Fund RPM band (USD per 1,000 views)
    pub fund_rpm: RateRange,
    /// Creativity Program RPM band (USD per 1,000 qualified views)
    pub creativity_rpm: RateRange,
}

impl NicheRates {
    pub fn rpm(&self, program: PayoutProgram) -> RateRange {
        match program {
            PayoutProgram::CreatorFund => self.fund_rpm,
            PayoutProgram::CreativityProgram => self.creativity_rpm,
        }
    }
}

/// Per-region ad market rates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRates {
    /// What advertisers pay per 1,000 impressions in this market
    pub cpm_usd: RateRange,
    /// RPM scale relative to a US audience
    pub rpm_multiplier: f64,
}

/// Viewer-side coin pack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoinPackage {
    pub coins: u64,
    pub price_usd: f64,
}

impl CoinPackage {
    pub fn per_coin_usd(&self) -> f64 {
        self.price_usd / self.coins as f64
    }
}

/// LIVE gift catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gift {
    pub key: String,
    pub name: String,
    pub coins: u64,
}

/// Coin/diamond economy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinRates {
    /// Gifted coins needed for one diamond
    pub coins_per_diamond: u64,
    /// Creator payout per diamond
    pub usd_per_diamond: f64,
    /// Sorted ascending by size, per-coin price non-increasing
    pub packages: Vec<CoinPackage>,
    /// Keyed by lowercase gift key
    pub gifts: BTreeMap<String, Gift>,
}

/// Follower tier descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FollowerTier {
    pub name: String,
    /// Explicit range for this tier; falls back to the default spread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<ToleranceBand>,
}

/// Brand-deal pricing bands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandDealRates {
    pub default_spread: ToleranceBand,
    /// Premium percent for perpetual usage rights
    pub perpetual_usage_premium: f64,
    pub follower_tiers: TierTable<FollowerTier>,
    /// Premium percent by exclusivity days
    pub exclusivity_premiums: TierTable<f64>,
    /// Premium percent by usage-rights days
    pub usage_rights_premiums: TierTable<f64>,
}

/// Eligibility thresholds for a payout program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramRule {
    pub min_followers: u64,
    pub min_monthly_views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_video_seconds: Option<u32>,
}

// ============================================================================
// RateTables
// ============================================================================

/// The complete, validated set of rate tables.
///
/// Built only through the loaders, so every instance satisfies the band and
/// completeness invariants. Immutable after load and safe to share across
/// threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTables {
    version: String,
    coins: CoinRates,
    niches: BTreeMap<Niche, NicheRates>,
    regions: BTreeMap<Region, RegionRates>,
    deliverables: BTreeMap<DeliverableType, f64>,
    shop_commissions: BTreeMap<ShopCategory, RateRange>,
    brand_deal: BrandDealRates,
    programs: BTreeMap<PayoutProgram, ProgramRule>,
    engagement_bands: TierTable<EngagementBand>,
    completion_bands: TierTable<CompletionBand>,
    growth_bands: TierTable<GrowthBand>,
    viral_bands: TierTable<ViralBand>,
}

impl RateTables {
    /// The tables bundled with the crate, parsed on first use.
    ///
    /// An error here means the shipped `rates.toml` is broken; callers
    /// should treat it as fatal at startup.
    pub fn bundled() -> CalcResult<&'static RateTables> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    /// Parse and validate tables from TOML text.
    #[instrument(skip(source), fields(bytes = source.len()))]
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let raw: schema::RawRateTables = toml::from_str(source)
            .map_err(|e| CalcError::serialization(format!("Failed to parse rate tables: {}", e)))?;
        let tables = raw.into_tables()?;
        debug!(
            version = %tables.version,
            niches = tables.niches.len(),
            regions = tables.regions.len(),
            "Rate tables validated"
        );
        Ok(tables)
    }

    /// Load tables from a TOML file on disk.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let tables = Self::from_toml_str(&contents)?;
        info!(version = %tables.version, "Loaded rate table override");
        Ok(tables)
    }

    /// Version tag of the loaded tables, e.g. `"2025.1"`
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn coins(&self) -> &CoinRates {
        &self.coins
    }

    pub fn brand_deal(&self) -> &BrandDealRates {
        &self.brand_deal
    }

    pub fn niche(&self, niche: Niche) -> CalcResult<&NicheRates> {
        self.niches
            .get(&niche)
            .ok_or_else(|| CalcError::unknown_entry("niches", niche.key()))
    }

    pub fn region(&self, region: Region) -> CalcResult<&RegionRates> {
        self.regions
            .get(&region)
            .ok_or_else(|| CalcError::unknown_entry("regions", region.key()))
    }

    /// Price of a deliverable relative to one in-feed post
    pub fn deliverable_multiplier(&self, deliverable: DeliverableType) -> CalcResult<f64> {
        self.deliverables
            .get(&deliverable)
            .copied()
            .ok_or_else(|| CalcError::unknown_entry("deliverables", deliverable.key()))
    }

    /// Commission band in percent of sales
    pub fn shop_commission(&self, category: ShopCategory) -> CalcResult<RateRange> {
        self.shop_commissions
            .get(&category)
            .copied()
            .ok_or_else(|| CalcError::unknown_entry("shop_commissions", category.key()))
    }

    pub fn program(&self, program: PayoutProgram) -> CalcResult<&ProgramRule> {
        self.programs
            .get(&program)
            .ok_or_else(|| CalcError::unknown_entry("programs", program.key()))
    }

    /// Look up a gift by key, case-insensitively. Gift names are user input,
    /// so a miss is an input error rather than a table error.
    pub fn gift(&self, key: &str) -> CalcResult<&Gift> {
        self.coins.gifts.get(&gift_key(key)).ok_or_else(|| {
            CalcError::invalid_input("gift", key, "Unknown gift; see the gift catalog for valid keys")
        })
    }

    pub fn engagement_bands(&self) -> &TierTable<EngagementBand> {
        &self.engagement_bands
    }

    pub fn completion_bands(&self) -> &TierTable<CompletionBand> {
        &self.completion_bands
    }

    pub fn growth_bands(&self) -> &TierTable<GrowthBand> {
        &self.growth_bands
    }

    pub fn viral_bands(&self) -> &TierTable<ViralBand> {
        &self.viral_bands
    }
}

/// Canonical gift key: lowercase, with spaces and dashes as underscores.
fn gift_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}
