//! # Categories
//!
//! Enumerated inputs (niche, region, deliverable, shop category, payout
//! program) and the classification labels the metric calculators report.
//!
//! Every enum serializes as its snake_case key (`"rest_of_world"`,
//! `"three_post_package"`), which is also what [`FromStr`] accepts. Parsing is
//! case-insensitive and treats `-` and spaces like `_`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CalcError;

/// Shared lookup behind every `FromStr` impl in this module.
fn from_key<T: Copy>(all: &[T], key: fn(&T) -> &'static str, field: &str, input: &str) -> Result<T, CalcError> {
    let normalized = input.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    all.iter().copied().find(|v| key(v) == normalized).ok_or_else(|| {
        let expected: Vec<&str> = all.iter().map(key).collect();
        CalcError::invalid_input(field, input, format!("expected one of: {}", expected.join(", ")))
    })
}

// ============================================================================
// Niche
// ============================================================================

/// Content niche. Drives per-follower pricing, baseline engagement and RPM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Niche {
    Fitness,
    Beauty,
    Fashion,
    Finance,
    Tech,
    Gaming,
    Food,
    Travel,
    Education,
    #[default]
    Lifestyle,
    Comedy,
    Parenting,
}

impl Niche {
    pub const ALL: [Niche; 12] = [
        Niche::Fitness,
        Niche::Beauty,
        Niche::Fashion,
        Niche::Finance,
        Niche::Tech,
        Niche::Gaming,
        Niche::Food,
        Niche::Travel,
        Niche::Education,
        Niche::Lifestyle,
        Niche::Comedy,
        Niche::Parenting,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Niche::Fitness => "fitness",
            Niche::Beauty => "beauty",
            Niche::Fashion => "fashion",
            Niche::Finance => "finance",
            Niche::Tech => "tech",
            Niche::Gaming => "gaming",
            Niche::Food => "food",
            Niche::Travel => "travel",
            Niche::Education => "education",
            Niche::Lifestyle => "lifestyle",
            Niche::Comedy => "comedy",
            Niche::Parenting => "parenting",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Niche::Fitness => "Fitness & Health",
            Niche::Beauty => "Beauty & Skincare",
            Niche::Fashion => "Fashion",
            Niche::Finance => "Finance & Investing",
            Niche::Tech => "Tech & Gadgets",
            Niche::Gaming => "Gaming",
            Niche::Food => "Food & Cooking",
            Niche::Travel => "Travel",
            Niche::Education => "Education",
            Niche::Lifestyle => "Lifestyle",
            Niche::Comedy => "Comedy & Entertainment",
            Niche::Parenting => "Parenting & Family",
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Niche {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(&Niche::ALL, Niche::key, "niche", s)
    }
}

// ============================================================================
// Region
// ============================================================================

/// Audience region. Scales RPM by how much advertisers pay in that market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Us,
    Uk,
    Canada,
    Australia,
    Germany,
    France,
    Spain,
    Italy,
    Brazil,
    Mexico,
    India,
    Philippines,
    RestOfWorld,
}

impl Region {
    pub const ALL: [Region; 13] = [
        Region::Us,
        Region::Uk,
        Region::Canada,
        Region::Australia,
        Region::Germany,
        Region::France,
        Region::Spain,
        Region::Italy,
        Region::Brazil,
        Region::Mexico,
        Region::India,
        Region::Philippines,
        Region::RestOfWorld,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Uk => "uk",
            Region::Canada => "canada",
            Region::Australia => "australia",
            Region::Germany => "germany",
            Region::France => "france",
            Region::Spain => "spain",
            Region::Italy => "italy",
            Region::Brazil => "brazil",
            Region::Mexico => "mexico",
            Region::India => "india",
            Region::Philippines => "philippines",
            Region::RestOfWorld => "rest_of_world",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Us => "United States",
            Region::Uk => "United Kingdom",
            Region::Canada => "Canada",
            Region::Australia => "Australia",
            Region::Germany => "Germany",
            Region::France => "France",
            Region::Spain => "Spain",
            Region::Italy => "Italy",
            Region::Brazil => "Brazil",
            Region::Mexico => "Mexico",
            Region::India => "India",
            Region::Philippines => "Philippines",
            Region::RestOfWorld => "Rest of World",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Region {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(&Region::ALL, Region::key, "region", s)
    }
}

// ============================================================================
// Deliverable
// ============================================================================

/// What the brand is buying. Priced relative to one in-feed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableType {
    /// One in-feed video (the reference price)
    #[default]
    SinglePost,
    /// Three in-feed videos sold as a bundle
    ThreePostPackage,
    /// Shout-out during a LIVE stream
    LiveMention,
    /// A full LIVE stream built around the brand
    DedicatedLive,
    /// Post plus Spark Ads authorization for the brand to boost it
    SparkAds,
    /// Short-lived story post
    StoryPost,
    /// Link placement in the profile bio
    LinkInBio,
}

impl DeliverableType {
    pub const ALL: [DeliverableType; 7] = [
        DeliverableType::SinglePost,
        DeliverableType::ThreePostPackage,
        DeliverableType::LiveMention,
        DeliverableType::DedicatedLive,
        DeliverableType::SparkAds,
        DeliverableType::StoryPost,
        DeliverableType::LinkInBio,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DeliverableType::SinglePost => "single_post",
            DeliverableType::ThreePostPackage => "three_post_package",
            DeliverableType::LiveMention => "live_mention",
            DeliverableType::DedicatedLive => "dedicated_live",
            DeliverableType::SparkAds => "spark_ads",
            DeliverableType::StoryPost => "story_post",
            DeliverableType::LinkInBio => "link_in_bio",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeliverableType::SinglePost => "Single Post",
            DeliverableType::ThreePostPackage => "3-Post Package",
            DeliverableType::LiveMention => "LIVE Mention",
            DeliverableType::DedicatedLive => "Dedicated LIVE",
            DeliverableType::SparkAds => "Post + Spark Ads",
            DeliverableType::StoryPost => "Story",
            DeliverableType::LinkInBio => "Link in Bio",
        }
    }
}

impl fmt::Display for DeliverableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DeliverableType {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(&DeliverableType::ALL, DeliverableType::key, "deliverable", s)
    }
}

// ============================================================================
// Shop Category
// ============================================================================

/// Product category for Shop/affiliate commission rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    BeautyPersonalCare,
    Fashion,
    Electronics,
    HomeKitchen,
    HealthWellness,
    FoodBeverage,
    ToysGames,
    SportsOutdoors,
    BabyMaternity,
}

impl ShopCategory {
    pub const ALL: [ShopCategory; 9] = [
        ShopCategory::BeautyPersonalCare,
        ShopCategory::Fashion,
        ShopCategory::Electronics,
        ShopCategory::HomeKitchen,
        ShopCategory::HealthWellness,
        ShopCategory::FoodBeverage,
        ShopCategory::ToysGames,
        ShopCategory::SportsOutdoors,
        ShopCategory::BabyMaternity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ShopCategory::BeautyPersonalCare => "beauty_personal_care",
            ShopCategory::Fashion => "fashion",
            ShopCategory::Electronics => "electronics",
            ShopCategory::HomeKitchen => "home_kitchen",
            ShopCategory::HealthWellness => "health_wellness",
            ShopCategory::FoodBeverage => "food_beverage",
            ShopCategory::ToysGames => "toys_games",
            ShopCategory::SportsOutdoors => "sports_outdoors",
            ShopCategory::BabyMaternity => "baby_maternity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShopCategory::BeautyPersonalCare => "Beauty & Personal Care",
            ShopCategory::Fashion => "Fashion & Apparel",
            ShopCategory::Electronics => "Electronics",
            ShopCategory::HomeKitchen => "Home & Kitchen",
            ShopCategory::HealthWellness => "Health & Wellness",
            ShopCategory::FoodBeverage => "Food & Beverage",
            ShopCategory::ToysGames => "Toys & Games",
            ShopCategory::SportsOutdoors => "Sports & Outdoors",
            ShopCategory::BabyMaternity => "Baby & Maternity",
        }
    }
}

impl fmt::Display for ShopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ShopCategory {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(&ShopCategory::ALL, ShopCategory::key, "category", s)
    }
}

// ============================================================================
// Payout Program
// ============================================================================

/// View-based payout program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayoutProgram {
    /// Original Creator Fund: any video length, low RPM
    #[default]
    CreatorFund,
    /// Creativity Program: videos of a minimum length, higher RPM
    CreativityProgram,
}

impl PayoutProgram {
    pub const ALL: [PayoutProgram; 2] = [PayoutProgram::CreatorFund, PayoutProgram::CreativityProgram];

    pub fn key(&self) -> &'static str {
        match self {
            PayoutProgram::CreatorFund => "creator_fund",
            PayoutProgram::CreativityProgram => "creativity_program",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PayoutProgram::CreatorFund => "Creator Fund",
            PayoutProgram::CreativityProgram => "Creativity Program",
        }
    }
}

impl fmt::Display for PayoutProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PayoutProgram {
    type Err = CalcError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(&PayoutProgram::ALL, PayoutProgram::key, "program", s)
    }
}

// ============================================================================
// Classification Labels
// ============================================================================

/// Engagement rate classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementBand {
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl EngagementBand {
    pub fn display_name(&self) -> &'static str {
        match self {
            EngagementBand::BelowAverage => "Below Average",
            EngagementBand::Average => "Average",
            EngagementBand::Good => "Good",
            EngagementBand::Excellent => "Excellent",
        }
    }
}

/// Watch-through classification. `ReplayDriven` means viewers loop the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBand {
    Low,
    Average,
    Good,
    Excellent,
    ReplayDriven,
}

impl CompletionBand {
    pub fn display_name(&self) -> &'static str {
        match self {
            CompletionBand::Low => "Low",
            CompletionBand::Average => "Average",
            CompletionBand::Good => "Good",
            CompletionBand::Excellent => "Excellent",
            CompletionBand::ReplayDriven => "Replay-Driven",
        }
    }
}

/// Follower growth classification, on a 30-day basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthBand {
    Declining,
    Stalled,
    Steady,
    Healthy,
    Fast,
    Viral,
}

impl GrowthBand {
    pub fn display_name(&self) -> &'static str {
        match self {
            GrowthBand::Declining => "Declining",
            GrowthBand::Stalled => "Stalled",
            GrowthBand::Steady => "Steady",
            GrowthBand::Healthy => "Healthy",
            GrowthBand::Fast => "Fast",
            GrowthBand::Viral => "Viral",
        }
    }
}

/// Viral coefficient classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViralBand {
    Low,
    Moderate,
    Strong,
    Viral,
}

impl ViralBand {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViralBand::Low => "Low",
            ViralBand::Moderate => "Moderate",
            ViralBand::Strong => "Strong",
            ViralBand::Viral => "Self-Sustaining",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_serde() {
        for niche in Niche::ALL {
            let json = serde_json::to_string(&niche).unwrap();
            assert_eq!(json, format!("\"{}\"", niche.key()));
        }
        for region in Region::ALL {
            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.key()));
        }
        for deliverable in DeliverableType::ALL {
            let json = serde_json::to_string(&deliverable).unwrap();
            assert_eq!(json, format!("\"{}\"", deliverable.key()));
        }
        for category in ShopCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_parse_is_forgiving() {
        assert_eq!("US".parse::<Region>().unwrap(), Region::Us);
        assert_eq!("rest-of-world".parse::<Region>().unwrap(), Region::RestOfWorld);
        assert_eq!("Three Post Package".parse::<DeliverableType>().unwrap(), DeliverableType::ThreePostPackage);
        assert_eq!(" Finance ".parse::<Niche>().unwrap(), Niche::Finance);
    }

    #[test]
    fn test_unknown_key_names_field() {
        let err = "knitting".parse::<Niche>().unwrap_err();
        assert_eq!(err.field(), Some("niche"));
        assert!(err.to_string().contains("fitness"));
    }
}
