//! # Shop Commission
//!
//! Affiliate earnings on products sold through a creator's showcase:
//! `earnings = monthly sales volume × category commission %`. The category's
//! commission band gives low and high; mid uses the band midpoint.

use serde::{Deserialize, Serialize};

use crate::categories::ShopCategory;
use crate::errors::{ensure_non_negative, CalcResult};
use crate::format::{format_bounds, BreakdownEntry, EstimateResult};
use crate::tables::RateTables;

/// ## JSON Example
///
/// ```json
/// { "monthly_sales_volume": 10000.0, "category": "beauty_personal_care" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopInput {
    /// Gross sales in USD per month
    pub monthly_sales_volume: f64,
    pub category: ShopCategory,
}

pub fn estimate(tables: &RateTables, input: &ShopInput) -> CalcResult<EstimateResult> {
    let volume = ensure_non_negative("monthly_sales_volume", input.monthly_sales_volume)?;
    let rate = tables.shop_commission(input.category)?;

    let breakdown = vec![
        BreakdownEntry::new("monthly sales volume", volume),
        BreakdownEntry::new("commission low %", rate.low),
        BreakdownEntry::new("commission high %", rate.high),
    ];
    Ok(format_bounds(
        volume * rate.low / 100.0,
        volume * rate.midpoint() / 100.0,
        volume * rate.high / 100.0,
        breakdown,
    ))
}
