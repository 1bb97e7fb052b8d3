//! # LIVE Gift Coins
//!
//! Viewers buy coins in packs and send them as gifts. Gifted coins become
//! diamonds for the creator, and diamonds cash out in USD:
//!
//! ```text
//! diamonds = coins / coins_per_diamond     (integer, remainder lost)
//! usd      = diamonds × usd_per_diamond    (rounded to cents)
//! ```
//!
//! With the bundled tables 1,000 coins → 500 diamonds → $2.50.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::calculators::coins;
//! use payout_core::tables::RateTables;
//! use payout_core::units::Coins;
//!
//! let tables = RateTables::bundled().unwrap();
//! let conversion = coins::to_usd(tables, Coins(1000)).unwrap();
//! assert_eq!(conversion.usd.0, 2.5);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::format::{format_bounds_with, BreakdownEntry, EstimateResult, Precision};
use crate::tables::{CoinPackage, RateTables};
use crate::units::{Coins, Diamonds, Usd};

/// ## JSON Example
///
/// ```json
/// { "coins": 1000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoinInput {
    pub coins: Coins,
}

/// ## JSON Example
///
/// ```json
/// { "gift": "galaxy", "count": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GiftInput {
    pub gift: String,
    #[serde(default = "default_gift_count")]
    pub count: u64,
}

fn default_gift_count() -> u64 {
    1
}

/// Creator-side value of a batch of gifted coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinConversion {
    pub coins: Coins,
    pub diamonds: Diamonds,
    /// Coins that did not make up a whole diamond
    pub remainder_coins: u64,
    pub usd: Usd,
}

/// Creator-side value of sending a gift `count` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftValue {
    pub gift: String,
    pub count: u64,
    pub coins: Coins,
    pub diamonds: Diamonds,
    pub usd: Usd,
}

/// One line of a purchase quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackLine {
    pub package: CoinPackage,
    pub count: u64,
    pub subtotal_usd: Usd,
}

/// Coin packs covering a requested amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseQuote {
    pub requested: Coins,
    /// Largest pack first
    pub packs: Vec<PackLine>,
    pub total_coins: Coins,
    pub total_usd: Usd,
}

impl PurchaseQuote {
    /// Coins bought beyond the request
    pub fn surplus(&self) -> u64 {
        self.total_coins.0.saturating_sub(self.requested.0)
    }
}

pub fn coins_to_diamonds(tables: &RateTables, coins: Coins) -> Diamonds {
    Diamonds(coins.0 / tables.coins().coins_per_diamond)
}

pub fn diamonds_to_coins(tables: &RateTables, diamonds: Diamonds) -> CalcResult<Coins> {
    diamonds
        .0
        .checked_mul(tables.coins().coins_per_diamond)
        .map(Coins)
        .ok_or_else(|| CalcError::invalid_input("diamonds", diamonds.0.to_string(), "Diamond count is too large"))
}

pub fn diamonds_to_usd(tables: &RateTables, diamonds: Diamonds) -> Usd {
    Usd(diamonds.0 as f64 * tables.coins().usd_per_diamond).round_cents()
}

/// Convert gifted coins to the creator's diamonds and cash.
pub fn to_usd(tables: &RateTables, coins: Coins) -> CalcResult<CoinConversion> {
    let diamonds = coins_to_diamonds(tables, coins);
    let remainder_coins = coins.0 % tables.coins().coins_per_diamond;
    let usd = diamonds_to_usd(tables, diamonds);
    debug!(coins = coins.0, diamonds = diamonds.0, usd = usd.0, "Coins converted");
    Ok(CoinConversion {
        coins,
        diamonds,
        remainder_coins,
        usd,
    })
}

/// The cash value of gifted coins as an exact, cent-precision estimate.
pub fn estimate(tables: &RateTables, coins: Coins) -> CalcResult<EstimateResult> {
    let conversion = to_usd(tables, coins)?;
    let breakdown = vec![
        BreakdownEntry::new("coins", coins.0 as f64),
        BreakdownEntry::new("coins per diamond", tables.coins().coins_per_diamond as f64),
        BreakdownEntry::new("diamonds", conversion.diamonds.0 as f64),
        BreakdownEntry::new("usd per diamond", tables.coins().usd_per_diamond),
    ];
    let usd = conversion.usd.0;
    Ok(format_bounds_with(usd, usd, usd, breakdown, Precision::Cents))
}

/// Value of sending a catalog gift `count` times.
pub fn gift_value(tables: &RateTables, gift: &str, count: u64) -> CalcResult<GiftValue> {
    if count == 0 {
        return Err(CalcError::invalid_input("count", "0", "Gift count must be positive"));
    }
    let entry = tables.gift(gift)?;
    let coins = entry
        .coins
        .checked_mul(count)
        .map(Coins)
        .ok_or_else(|| CalcError::invalid_input("count", count.to_string(), "Gift count is too large"))?;
    let conversion = to_usd(tables, coins)?;
    Ok(GiftValue {
        gift: entry.name.clone(),
        count,
        coins,
        diamonds: conversion.diamonds,
        usd: conversion.usd,
    })
}

/// Price `coins` from the pack table.
///
/// Packs are taken largest first; whatever is left is covered by the
/// smallest pack that holds it. A request matching a pack size exactly
/// buys that pack alone.
pub fn purchase_quote(tables: &RateTables, coins: Coins) -> CalcResult<PurchaseQuote> {
    if coins.0 == 0 {
        return Err(CalcError::invalid_input("coins", "0", "Coin amount must be positive"));
    }
    let packages = &tables.coins().packages;

    let mut packs: Vec<PackLine> = Vec::new();
    let mut remaining = coins.0;
    for package in packages.iter().rev() {
        let count = remaining / package.coins;
        if count > 0 {
            packs.push(pack_line(*package, count));
            remaining -= count * package.coins;
        }
    }

    if remaining > 0 {
        let cover = packages
            .iter()
            .find(|package| package.coins >= remaining)
            .copied()
            .ok_or_else(|| CalcError::configuration("coins.packages", "no package covers the remainder"))?;
        match packs.iter_mut().find(|line| line.package == cover) {
            Some(line) => *line = pack_line(cover, line.count + 1),
            None => packs.push(pack_line(cover, 1)),
        }
    }

    // Rounding the remainder up to a whole pack can pass u64::MAX
    let total_coins = packs
        .iter()
        .try_fold(Coins(0), |total, line| {
            Coins(line.package.coins)
                .checked_mul(line.count)
                .and_then(|coins| total.checked_add(coins))
        })
        .ok_or_else(|| CalcError::invalid_input("coins", coins.0.to_string(), "Coin amount is too large"))?;
    let total_usd = Usd(packs.iter().map(|line| line.subtotal_usd.0).sum()).round_cents();

    debug!(
        requested = coins.0,
        total_coins = total_coins.0,
        total_usd = total_usd.0,
        "Coin purchase quoted"
    );

    Ok(PurchaseQuote {
        requested: coins,
        packs,
        total_coins,
        total_usd,
    })
}

fn pack_line(package: CoinPackage, count: u64) -> PackLine {
    PackLine {
        package,
        count,
        subtotal_usd: Usd(package.price_usd * count as f64).round_cents(),
    }
}
