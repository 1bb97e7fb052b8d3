//! # Calculators
//!
//! One module per calculator. Each follows the same pattern:
//!
//! - `*Input` - caller-supplied facts (JSON-serializable)
//! - `estimate(tables, input)` / `calculate(tables, input)` - pure function
//!   returning a result or a [`CalcError`](crate::errors::CalcError)
//!
//! Monetary calculators return an [`EstimateResult`] range. Metric
//! calculators (engagement, completion, growth, viral) return a report with
//! the raw value and its classification band.
//!
//! ## Available Calculators
//!
//! - [`brand_deal`] - sponsored post pricing
//! - [`creator_fund`] - view-based payouts (Creator Fund / Creativity Program)
//! - [`coins`] - LIVE gift coin/diamond/cash conversion and coin purchases
//! - [`shop`] - Shop/affiliate commission
//! - [`engagement`] - engagement rate
//! - [`completion`] - video completion rate
//! - [`growth`] - follower growth and projection
//! - [`viral`] - viral coefficient

pub mod brand_deal;
pub mod coins;
pub mod completion;
pub mod creator_fund;
pub mod engagement;
pub mod growth;
pub mod shop;
pub mod viral;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::categories::{
    CompletionBand, DeliverableType, EngagementBand, Niche, PayoutProgram, Region,
};
use crate::errors::{ensure_percent, CalcError, CalcResult};
use crate::format::{BreakdownEntry, EstimateResult};
use crate::tables::RateTables;

pub use coins::{CoinConversion, CoinInput, GiftInput, GiftValue, PurchaseQuote};
pub use completion::CompletionInput;
pub use engagement::EngagementInput;
pub use growth::{GrowthInput, GrowthReport};
pub use shop::ShopInput;
pub use viral::{ViralInput, ViralReport};

// ============================================================================
// Shared Input
// ============================================================================

/// How long a brand may reuse the content in its own paid ads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageRights {
    /// A fixed window; `Days(0)` means organic posting only
    Days(u32),
    Perpetual,
}

impl Default for UsageRights {
    fn default() -> Self {
        UsageRights::Days(0)
    }
}

impl fmt::Display for UsageRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageRights::Days(0) => write!(f, "none"),
            UsageRights::Days(days) => write!(f, "{} days", days),
            UsageRights::Perpetual => write!(f, "perpetual"),
        }
    }
}

impl FromStr for UsageRights {
    type Err = CalcError;

    /// Accepts a day count (`"90"`), `"none"` or `"perpetual"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "perpetual" | "forever" => Ok(UsageRights::Perpetual),
            "none" | "" => Ok(UsageRights::Days(0)),
            days => days.parse::<u32>().map(UsageRights::Days).map_err(|_| {
                CalcError::invalid_input("usage_rights", s, "expected a day count or 'perpetual'")
            }),
        }
    }
}

/// Creator metrics shared by the brand-deal and view-payout calculators.
///
/// ## JSON Example
///
/// ```json
/// {
///   "followers": 50000,
///   "engagement_rate": 10.0,
///   "niche": "fitness",
///   "region": "us",
///   "deliverable": "single_post",
///   "exclusivity_days": 0,
///   "usage_rights": { "days": 30 }
/// }
/// ```
///
/// `followers`, `engagement_rate` and `niche` are required; every other
/// field has a default. Unknown fields are rejected so a misspelled name
/// cannot fall back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricInput {
    pub followers: u64,
    /// Average engagement rate in percent (0-100)
    pub engagement_rate: f64,
    pub niche: Niche,
    #[serde(default)]
    pub monthly_views: u64,
    /// Typical video length; required for the Creativity Program
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_length_seconds: Option<u32>,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub deliverable: DeliverableType,
    #[serde(default)]
    pub exclusivity_days: u32,
    #[serde(default)]
    pub usage_rights: UsageRights,
    /// Overrides the niche's baseline engagement (percent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_engagement: Option<f64>,
    #[serde(default)]
    pub program: PayoutProgram,
}

impl MetricInput {
    /// Start from the three facts every brand-deal estimate needs
    pub fn new(followers: u64, engagement_rate: f64, niche: Niche) -> Self {
        Self {
            followers,
            engagement_rate,
            niche,
            ..Self::default()
        }
    }

    pub fn with_monthly_views(mut self, views: u64) -> Self {
        self.monthly_views = views;
        self
    }

    pub fn with_video_length(mut self, seconds: u32) -> Self {
        self.video_length_seconds = Some(seconds);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_deliverable(mut self, deliverable: DeliverableType) -> Self {
        self.deliverable = deliverable;
        self
    }

    pub fn with_exclusivity_days(mut self, days: u32) -> Self {
        self.exclusivity_days = days;
        self
    }

    pub fn with_usage_rights(mut self, rights: UsageRights) -> Self {
        self.usage_rights = rights;
        self
    }

    pub fn with_baseline_engagement(mut self, percent: f64) -> Self {
        self.baseline_engagement = Some(percent);
        self
    }

    pub fn with_program(mut self, program: PayoutProgram) -> Self {
        self.program = program;
        self
    }

    /// Validate the fields whose types allow out-of-domain values.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_percent("engagement_rate", self.engagement_rate)?;
        if let Some(baseline) = self.baseline_engagement {
            ensure_percent("baseline_engagement", baseline)?;
            if baseline == 0.0 {
                return Err(CalcError::invalid_input(
                    "baseline_engagement",
                    "0",
                    "Baseline engagement must be positive",
                ));
            }
        }
        if self.video_length_seconds == Some(0) {
            return Err(CalcError::invalid_input(
                "video_length_seconds",
                "0",
                "Video length must be positive",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Metric Reports
// ============================================================================

/// Result of a percentage calculator: the raw value and its band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateReport<B> {
    pub value_percent: f64,
    pub band: B,
    pub breakdown: Vec<BreakdownEntry>,
}

// ============================================================================
// Request Dispatch
// ============================================================================

/// Any calculator invocation as one JSON document.
///
/// ```json
/// { "type": "engagement", "likes": 2500, "comments": 150, "shares": 100, "followers": 50000 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationRequest {
    BrandDeal(MetricInput),
    CreatorFund(MetricInput),
    Engagement(EngagementInput),
    Completion(CompletionInput),
    CoinConversion(CoinInput),
    CoinPurchase(CoinInput),
    GiftValue(GiftInput),
    ShopCommission(ShopInput),
    FollowerGrowth(GrowthInput),
    ViralCoefficient(ViralInput),
}

/// Output of [`CalculationRequest::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationOutput {
    Estimate(EstimateResult),
    Engagement(RateReport<EngagementBand>),
    Completion(RateReport<CompletionBand>),
    CoinConversion(CoinConversion),
    CoinPurchase(PurchaseQuote),
    GiftValue(GiftValue),
    FollowerGrowth(GrowthReport),
    ViralCoefficient(ViralReport),
}

impl CalculationOutput {
    pub fn to_json_pretty(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CalcError::serialization(format!("Failed to serialize result: {}", e)))
    }
}

impl CalculationRequest {
    /// Get the calculator name as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRequest::BrandDeal(_) => "Brand Deal Rate",
            CalculationRequest::CreatorFund(_) => "Creator Fund RPM",
            CalculationRequest::Engagement(_) => "Engagement Rate",
            CalculationRequest::Completion(_) => "Completion Rate",
            CalculationRequest::CoinConversion(_) => "Coin Conversion",
            CalculationRequest::CoinPurchase(_) => "Coin Purchase",
            CalculationRequest::GiftValue(_) => "Gift Value",
            CalculationRequest::ShopCommission(_) => "Shop Commission",
            CalculationRequest::FollowerGrowth(_) => "Follower Growth",
            CalculationRequest::ViralCoefficient(_) => "Viral Coefficient",
        }
    }

    /// Parse a request from its JSON form.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CalcError::serialization(format!("Invalid calculation request: {}", e)))
    }

    /// Run the calculator this request names.
    pub fn run(&self, tables: &RateTables) -> CalcResult<CalculationOutput> {
        tracing::debug!(calculator = self.calc_type(), "Running calculation request");
        Ok(match self {
            CalculationRequest::BrandDeal(input) => {
                CalculationOutput::Estimate(brand_deal::estimate(tables, input)?)
            }
            CalculationRequest::CreatorFund(input) => {
                CalculationOutput::Estimate(creator_fund::estimate(tables, input)?)
            }
            CalculationRequest::Engagement(input) => {
                CalculationOutput::Engagement(engagement::calculate(tables, input)?)
            }
            CalculationRequest::Completion(input) => {
                CalculationOutput::Completion(completion::calculate(tables, input)?)
            }
            CalculationRequest::CoinConversion(input) => {
                CalculationOutput::CoinConversion(coins::to_usd(tables, input.coins)?)
            }
            CalculationRequest::CoinPurchase(input) => {
                CalculationOutput::CoinPurchase(coins::purchase_quote(tables, input.coins)?)
            }
            CalculationRequest::GiftValue(input) => {
                CalculationOutput::GiftValue(coins::gift_value(tables, &input.gift, input.count)?)
            }
            CalculationRequest::ShopCommission(input) => {
                CalculationOutput::Estimate(shop::estimate(tables, input)?)
            }
            CalculationRequest::FollowerGrowth(input) => {
                CalculationOutput::FollowerGrowth(growth::calculate(tables, input)?)
            }
            CalculationRequest::ViralCoefficient(input) => {
                CalculationOutput::ViralCoefficient(viral::calculate(tables, input)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_rights_parsing() {
        assert_eq!("90".parse::<UsageRights>().unwrap(), UsageRights::Days(90));
        assert_eq!("Perpetual".parse::<UsageRights>().unwrap(), UsageRights::Perpetual);
        assert_eq!("none".parse::<UsageRights>().unwrap(), UsageRights::Days(0));
        assert!("-3".parse::<UsageRights>().is_err());
    }

    #[test]
    fn test_usage_rights_json() {
        assert_eq!(serde_json::to_string(&UsageRights::Days(30)).unwrap(), r#"{"days":30}"#);
        assert_eq!(serde_json::to_string(&UsageRights::Perpetual).unwrap(), r#""perpetual""#);
    }

    #[test]
    fn test_metric_input_defaults_from_json() {
        let input: MetricInput =
            serde_json::from_str(r#"{ "followers": 1000, "engagement_rate": 4.5, "niche": "gaming" }"#).unwrap();
        assert_eq!(input.region, Region::Us);
        assert_eq!(input.deliverable, DeliverableType::SinglePost);
        assert_eq!(input.usage_rights, UsageRights::Days(0));
        assert_eq!(input.program, PayoutProgram::CreatorFund);
    }

    #[test]
    fn test_metric_input_validation() {
        assert!(MetricInput::new(1000, 101.0, Niche::Tech).validate().is_err());
        assert!(MetricInput::new(1000, 5.0, Niche::Tech).with_baseline_engagement(0.0).validate().is_err());
        assert!(MetricInput::new(1000, 5.0, Niche::Tech).with_video_length(0).validate().is_err());
        assert!(MetricInput::new(1000, 5.0, Niche::Tech).validate().is_ok());
    }

    #[test]
    fn test_request_dispatch() {
        let tables = RateTables::bundled().unwrap();
        let request: CalculationRequest = serde_json::from_str(
            r#"{ "type": "engagement", "likes": 2500, "comments": 150, "shares": 100, "followers": 50000 }"#,
        )
        .unwrap();
        assert_eq!(request.calc_type(), "Engagement Rate");
        match request.run(tables).unwrap() {
            CalculationOutput::Engagement(report) => assert_eq!(report.value_percent, 5.5),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_metric_input_requires_core_fields() {
        let err = CalculationRequest::from_json(r#"{ "type": "brand_deal", "folowers": 50000 }"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let err = CalculationRequest::from_json(
            r#"{ "type": "brand_deal", "followers": 50000, "engagment_rate": 10.0, "engagement_rate": 10.0, "niche": "fitness" }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("engagment_rate"));

        let missing: Result<MetricInput, _> = serde_json::from_str(r#"{ "followers": 50000, "niche": "fitness" }"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_every_input_rejects_unknown_fields() {
        for json in [
            r#"{ "type": "engagement", "likes": 1, "comments": 1, "followers": 10, "folowers": 10 }"#,
            r#"{ "type": "completion", "avg_watch_time_seconds": 5.0, "video_length_seconds": 10, "extra": 1 }"#,
            r#"{ "type": "coin_conversion", "coins": 10, "diamonds": 5 }"#,
            r#"{ "type": "coin_purchase", "coin": 10 }"#,
            r#"{ "type": "gift_value", "gift": "rose", "cout": 2 }"#,
            r#"{ "type": "shop_commission", "monthly_sales_volume": 100.0, "category": "fashion", "rate": 5 }"#,
            r#"{ "type": "follower_growth", "starting_followers": 1, "ending_followers": 2, "period_days": 7, "days": 7 }"#,
            r#"{ "type": "viral_coefficient", "viewers": 10, "shares": 1, "conversions": 1, "cycle": 3 }"#,
        ] {
            assert!(CalculationRequest::from_json(json).is_err(), "accepted {}", json);
        }
    }

    #[test]
    fn test_malformed_request() {
        let err = CalculationRequest::from_json(r#"{ "type": "horoscope" }"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_request_dispatch_brand_deal() {
        let tables = RateTables::bundled().unwrap();
        let request: CalculationRequest = serde_json::from_str(
            r#"{ "type": "brand_deal", "followers": 50000, "engagement_rate": 10.0, "niche": "fitness", "baseline_engagement": 5.0 }"#,
        )
        .unwrap();
        let output = request.run(tables).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["type"], "estimate");
        assert_eq!(json["mid"], 5000.0);
    }
}
