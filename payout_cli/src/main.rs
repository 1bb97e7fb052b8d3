//! # Payout CLI
//!
//! Command line front end for `payout_core`. Each subcommand builds one
//! calculation, runs it against the active rate tables and prints either a
//! readable summary or, with `--json`, the serialized result.
//!
//! Rate tables default to the set bundled with the engine. `--rates <FILE>`
//! or `PAYOUT_RATES_PATH` loads an override file instead.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

mod render;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error};

use payout_core::calculators::{
    brand_deal, creator_fund, CalculationRequest, CoinInput, CompletionInput,
    EngagementInput, GiftInput, GrowthInput, MetricInput, ShopInput, UsageRights, ViralInput,
};
use payout_core::categories::{DeliverableType, Niche, PayoutProgram, Region, ShopCategory};
use payout_core::units::Coins;
use payout_core::{CalcError, CalcResult, EstimateResult, RateTables};

#[derive(Parser)]
#[command(name = "payout", version, about = "Creator monetization calculator")]
struct Cli {
    /// Rate table file to use instead of the bundled tables
    #[arg(long, global = true, env = "PAYOUT_RATES_PATH")]
    rates: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price a sponsored deliverable
    BrandDeal(BrandDealArgs),
    /// Estimate Creator Fund or Creativity Program payouts
    CreatorFund(CreatorFundArgs),
    /// Engagement rate from interaction counts
    Engagement {
        #[arg(long)]
        likes: u64,
        #[arg(long)]
        comments: u64,
        #[arg(long, default_value_t = 0)]
        shares: u64,
        #[arg(long)]
        followers: u64,
    },
    /// Video completion rate
    Completion {
        /// Average watch time in seconds
        #[arg(long)]
        watch_time: f64,
        /// Video length in seconds
        #[arg(long)]
        length: u32,
    },
    /// Convert gifted coins to diamonds and cash
    Coins {
        coins: u64,
    },
    /// Value of sending a LIVE gift
    Gift {
        gift: String,
        #[arg(long, default_value_t = 1)]
        count: u64,
    },
    /// Quote the coin packs needed to buy an amount of coins
    BuyCoins {
        coins: u64,
    },
    /// Shop affiliate commission
    Shop {
        /// Monthly sales volume in USD
        #[arg(long)]
        sales: f64,
        #[arg(long)]
        category: ShopCategory,
    },
    /// Follower growth rate and projection
    Growth {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        end: u64,
        #[arg(long)]
        days: u32,
        /// Project this many days ahead
        #[arg(long)]
        project: Option<u32>,
    },
    /// Viral coefficient and reach projection
    Viral {
        #[arg(long)]
        viewers: u64,
        #[arg(long)]
        shares: u64,
        #[arg(long)]
        conversions: u64,
        #[arg(long)]
        cycles: Option<u32>,
    },
    /// Run a JSON calculation request from a file or stdin
    Run {
        /// Request file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
    /// Show the active rate tables
    Tables,
}

/// Creator facts shared by the brand-deal and creator-fund commands
#[derive(Args, Debug, Clone)]
struct MetricArgs {
    #[arg(long)]
    followers: u64,
    #[arg(long)]
    niche: Niche,
    /// Typical video length in seconds
    #[arg(long)]
    video_length: Option<u32>,
    #[arg(long, default_value = "us")]
    region: Region,
    #[arg(long, default_value = "creator_fund")]
    program: PayoutProgram,
}

#[derive(Args, Debug, Clone)]
struct CreatorFundArgs {
    #[command(flatten)]
    metrics: MetricArgs,
    /// Qualified views per month
    #[arg(long)]
    views: u64,
}

#[derive(Args, Debug, Clone)]
struct BrandDealArgs {
    #[command(flatten)]
    metrics: MetricArgs,
    /// Engagement rate in percent
    #[arg(long)]
    engagement: f64,
    /// Monthly views, for the paid-ad comparison
    #[arg(long, default_value_t = 0)]
    views: u64,
    #[arg(long, default_value = "single_post")]
    deliverable: DeliverableType,
    #[arg(long, default_value_t = 0)]
    exclusivity_days: u32,
    /// Usage rights window in days, or "perpetual"
    #[arg(long, default_value = "none")]
    usage_rights: UsageRights,
    /// Override the niche's baseline engagement (percent)
    #[arg(long)]
    baseline: Option<f64>,
    /// Price every deliverable type
    #[arg(long)]
    rate_card: bool,
}

impl MetricArgs {
    fn to_input(&self, engagement_rate: f64, views: u64) -> MetricInput {
        let mut input = MetricInput::new(self.followers, engagement_rate, self.niche)
            .with_monthly_views(views)
            .with_region(self.region)
            .with_program(self.program);
        if let Some(seconds) = self.video_length {
            input = input.with_video_length(seconds);
        }
        input
    }
}

impl CreatorFundArgs {
    fn to_input(&self) -> MetricInput {
        // View payouts are priced per view, not per engagement
        self.metrics.to_input(0.0, self.views)
    }
}

impl BrandDealArgs {
    fn to_input(&self) -> MetricInput {
        let mut input = self
            .metrics
            .to_input(self.engagement, self.views)
            .with_deliverable(self.deliverable)
            .with_exclusivity_days(self.exclusivity_days)
            .with_usage_rights(self.usage_rights);
        if let Some(baseline) = self.baseline {
            input = input.with_baseline_engagement(baseline);
        }
        input
    }
}

#[derive(Serialize)]
struct RateCardRow {
    deliverable: DeliverableType,
    estimate: EstimateResult,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "Calculation failed");
            if json {
                if let Ok(body) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", body);
                }
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_tables(path: Option<&PathBuf>) -> CalcResult<RateTables> {
    match path {
        Some(path) => RateTables::from_file(path),
        None => RateTables::bundled().cloned(),
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let tables = load_tables(cli.rates.as_ref())?;
    debug!(version = tables.version(), "Rate tables ready");

    let request = match cli.command {
        Command::BrandDeal(args) if args.rate_card => {
            let card = brand_deal::rate_card(&tables, &args.to_input())?;
            if cli.json {
                let rows: Vec<RateCardRow> = card
                    .into_iter()
                    .map(|(deliverable, estimate)| RateCardRow { deliverable, estimate })
                    .collect();
                print_json(&rows)?;
            } else {
                render::rate_card(&card);
            }
            return Ok(());
        }
        Command::BrandDeal(args) => {
            let input = args.to_input();
            if !cli.json {
                let tier = brand_deal::follower_tier(&tables, input.followers)?;
                println!("Follower tier: {}", tier.name);
                if input.monthly_views > 0 {
                    let ads = brand_deal::cpm_benchmark(&tables, input.region, input.monthly_views)?;
                    println!("Same views as paid ads: {}", ads.summary());
                }
            }
            CalculationRequest::BrandDeal(input)
        }
        Command::CreatorFund(args) => {
            let input = args.to_input();
            if !cli.json {
                render::eligibility(&creator_fund::eligibility(&tables, &input)?);
            }
            CalculationRequest::CreatorFund(input)
        }
        Command::Engagement {
            likes,
            comments,
            shares,
            followers,
        } => CalculationRequest::Engagement(EngagementInput {
            likes,
            comments,
            shares,
            followers,
        }),
        Command::Completion { watch_time, length } => CalculationRequest::Completion(CompletionInput {
            avg_watch_time_seconds: watch_time,
            video_length_seconds: length,
        }),
        Command::Coins { coins } => CalculationRequest::CoinConversion(CoinInput { coins: Coins(coins) }),
        Command::Gift { gift, count } => CalculationRequest::GiftValue(GiftInput { gift, count }),
        Command::BuyCoins { coins } => CalculationRequest::CoinPurchase(CoinInput { coins: Coins(coins) }),
        Command::Shop { sales, category } => CalculationRequest::ShopCommission(ShopInput {
            monthly_sales_volume: sales,
            category,
        }),
        Command::Growth {
            start,
            end,
            days,
            project,
        } => CalculationRequest::FollowerGrowth(GrowthInput {
            starting_followers: start,
            ending_followers: end,
            period_days: days,
            projection_days: project,
        }),
        Command::Viral {
            viewers,
            shares,
            conversions,
            cycles,
        } => CalculationRequest::ViralCoefficient(ViralInput {
            viewers,
            shares,
            conversions,
            cycles,
        }),
        Command::Run { file } => CalculationRequest::from_json(&read_request(file.as_ref())?)?,
        Command::Tables => {
            if cli.json {
                print_json(&tables)?;
            } else {
                render::tables(&tables);
            }
            return Ok(());
        }
    };

    let output = request.run(&tables)?;
    if cli.json {
        println!("{}", output.to_json_pretty()?);
    } else {
        render::output(request.calc_type(), &output);
    }
    Ok(())
}

fn read_request(file: Option<&PathBuf>) -> CalcResult<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
            Ok(buffer)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> CalcResult<()> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| CalcError::serialization(format!("Failed to serialize result: {}", e)))?;
    println!("{}", body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payout_core::calculators::CalculationOutput;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_brand_deal_args() {
        let cli = Cli::try_parse_from([
            "payout",
            "brand-deal",
            "--followers",
            "50000",
            "--engagement",
            "10",
            "--niche",
            "fitness",
            "--usage-rights",
            "perpetual",
            "--baseline",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::BrandDeal(args) => {
                let input = args.to_input();
                assert_eq!(input.niche, Niche::Fitness);
                assert_eq!(input.usage_rights, UsageRights::Perpetual);
                assert_eq!(input.baseline_engagement, Some(5.0));
                assert_eq!(input.deliverable, DeliverableType::SinglePost);
            }
            _ => panic!("expected brand-deal"),
        }
    }

    #[test]
    fn test_unknown_niche_rejected() {
        let args = ["payout", "brand-deal", "--followers", "10", "--engagement", "5", "--niche", "astrology"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_brand_deal_requires_core_metrics() {
        assert!(Cli::try_parse_from(["payout", "brand-deal", "--engagement", "5", "--niche", "tech"]).is_err());
        assert!(Cli::try_parse_from(["payout", "brand-deal", "--followers", "10", "--niche", "tech"]).is_err());
        assert!(Cli::try_parse_from(["payout", "brand-deal", "--followers", "10", "--engagement", "5"]).is_err());
        assert!(
            Cli::try_parse_from(["payout", "brand-deal", "--followers", "10", "--engagement", "5", "--niche", "tech"])
                .is_ok()
        );
    }

    #[test]
    fn test_creator_fund_requires_views() {
        assert!(Cli::try_parse_from(["payout", "creator-fund", "--followers", "10", "--niche", "tech"]).is_err());
        let cli = Cli::try_parse_from([
            "payout", "creator-fund", "--followers", "500000", "--niche", "finance", "--views", "5000000",
        ])
        .unwrap();
        match cli.command {
            Command::CreatorFund(args) => assert_eq!(args.to_input().monthly_views, 5_000_000),
            _ => panic!("expected creator-fund"),
        }
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["payout", "coins", "1000", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Coins { coins: 1000 }));
    }

    #[test]
    fn test_output_is_printable_for_every_request() {
        let tables = RateTables::bundled().unwrap();
        let request = CalculationRequest::CoinPurchase(CoinInput { coins: Coins(1000) });
        let output = request.run(tables).unwrap();
        assert!(matches!(output, CalculationOutput::CoinPurchase(_)));
        assert!(output.to_json_pretty().unwrap().contains("total_usd"));
    }
}
