//! Human-readable output.

use payout_core::calculators::creator_fund::Eligibility;
use payout_core::calculators::CalculationOutput;
use payout_core::categories::{DeliverableType, Niche, Region, ShopCategory};
use payout_core::format::{format_usd, group_thousands};
use payout_core::{BreakdownEntry, EstimateResult, RateTables};

const RULE: &str = "═══════════════════════════════════════";

fn header(title: &str) {
    println!("{}", RULE);
    println!("  {}", title.to_uppercase());
    println!("{}", RULE);
}

fn breakdown(entries: &[BreakdownEntry]) {
    println!();
    println!("Breakdown:");
    for entry in entries {
        println!("  {:<26} {}", entry.factor, number(entry.value));
    }
}

/// Whole numbers print grouped, fractions with up to four decimals.
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        group_thousands(value as i64)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[--]"
    }
}

fn estimate(result: &EstimateResult) {
    println!("  Low:     {}", format_usd(result.low));
    println!("  Typical: {}", format_usd(result.mid));
    println!("  High:    {}", format_usd(result.high));
    breakdown(&result.breakdown);
}

pub fn output(title: &str, output: &CalculationOutput) {
    header(title);
    match output {
        CalculationOutput::Estimate(result) => estimate(result),
        CalculationOutput::Engagement(report) => {
            println!("  Rate: {:.2}% ({})", report.value_percent, report.band.display_name());
            breakdown(&report.breakdown);
        }
        CalculationOutput::Completion(report) => {
            println!("  Rate: {:.2}% ({})", report.value_percent, report.band.display_name());
            breakdown(&report.breakdown);
        }
        CalculationOutput::CoinConversion(conversion) => {
            println!("  {} → {} → {}", conversion.coins, conversion.diamonds, conversion.usd);
            if conversion.remainder_coins > 0 {
                println!("  ({} coin(s) short of another diamond)", conversion.remainder_coins);
            }
        }
        CalculationOutput::CoinPurchase(quote) => {
            for line in &quote.packs {
                println!(
                    "  {:>3} × {:>6} coins @ ${:.2}  = {}",
                    line.count, line.package.coins, line.package.price_usd, line.subtotal_usd
                );
            }
            println!();
            println!("  Total: {} for {}", quote.total_usd, quote.total_coins);
            if quote.surplus() > 0 {
                println!("  ({} coins more than requested)", quote.surplus());
            }
        }
        CalculationOutput::GiftValue(value) => {
            println!("  {} × {}", value.count, value.gift);
            println!("  {} → {} → {} to the creator", value.coins, value.diamonds, value.usd);
        }
        CalculationOutput::FollowerGrowth(report) => {
            println!("  Growth:       {:.2}%", report.growth_percent);
            println!("  Per 30 days:  {:.2}% ({})", report.monthly_growth_percent, report.band.display_name());
            println!("  Daily gain:   {:.1} followers", report.average_daily_gain);
            if let Some(projection) = &report.projection {
                println!(
                    "  In {} days:   {} - {} (typical {})",
                    projection.days,
                    number(projection.low),
                    number(projection.high),
                    number(projection.mid)
                );
            }
            breakdown(&report.breakdown);
        }
        CalculationOutput::ViralCoefficient(report) => {
            println!("  K = {:.3} ({})", report.coefficient, report.band.display_name());
            if let Some(reach) = report.projected_reach {
                println!("  Projected reach: {}", number(reach));
            }
            breakdown(&report.breakdown);
        }
    }
    println!("{}", RULE);
}

pub fn rate_card(card: &[(DeliverableType, EstimateResult)]) {
    header("Rate Card");
    for (deliverable, result) in card {
        println!("  {:<24} {}", deliverable.display_name(), result.summary());
    }
    println!("{}", RULE);
}

pub fn eligibility(report: &Eligibility) {
    println!("{} eligibility:", report.program);
    println!("  Followers     {}", status_icon(report.meets_followers));
    println!("  Monthly views {}", status_icon(report.meets_monthly_views));
    if let Some(meets) = report.meets_video_length {
        println!("  Video length  {}", status_icon(meets));
    }
    println!();
}

pub fn tables(tables: &RateTables) {
    header("Rate Tables");
    println!("  Version: {}", tables.version());
    println!("  Status:  valid");
    println!();
    println!("Niches (per follower, Creator Fund RPM):");
    for niche in Niche::ALL {
        if let Ok(rates) = tables.niche(niche) {
            println!(
                "  {:<22} ${:<6} ${:.2}-${:.2}",
                niche.display_name(),
                rates.per_follower_usd,
                rates.fund_rpm.low,
                rates.fund_rpm.high
            );
        }
    }
    println!();
    println!("Regions (RPM multiplier, ad CPM):");
    for region in Region::ALL {
        if let Ok(rates) = tables.region(region) {
            println!(
                "  {:<22} {:.2}  ${:.2}-${:.2}",
                region.display_name(),
                rates.rpm_multiplier,
                rates.cpm_usd.low,
                rates.cpm_usd.high
            );
        }
    }
    println!();
    println!("Follower tiers:");
    for band in tables.brand_deal().follower_tiers.bands() {
        println!("  {:<10} {}", band.value.name, band.range_label());
    }
    println!();
    println!("Shop commission:");
    for category in ShopCategory::ALL {
        if let Ok(rate) = tables.shop_commission(category) {
            println!("  {:<22} {}-{}%", category.display_name(), rate.low, rate.high);
        }
    }
    println!();
    println!(
        "Coins: {} coins per diamond, ${} per diamond, {} gifts",
        tables.coins().coins_per_diamond,
        tables.coins().usd_per_diamond,
        tables.coins().gifts.len()
    );
    println!("{}", RULE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(50000.0), "50,000");
        assert_eq!(number(0.05), "0.05");
        assert_eq!(number(2.5), "2.5");
        assert_eq!(number(1.0 / 3.0), "0.3333");
    }
}
