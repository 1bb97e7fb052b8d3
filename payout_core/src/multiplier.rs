//! # Multiplier Composer
//!
//! Combines independent adjustments into one net rate. Composition always
//! runs in two phases:
//!
//! ```text
//! subtotal = base × F₁ × F₂ × …            (multiplicative: engagement, niche)
//! adjusted = subtotal × (1 + Σ Pᵢ / 100)   (additive %: exclusivity, usage, bundle)
//! ```
//!
//! Premiums are summed, then applied once to the multiplied subtotal. They
//! never compound with each other. The order in which factors are passed only
//! affects the order of the breakdown, never the result.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::multiplier::{compose_multipliers, Multiplier};
//!
//! let composed = compose_multipliers(2500.0, &[
//!     Multiplier::multiplicative("engagement factor", 2.0),
//!     Multiplier::additive_percent("exclusivity premium", 50.0),
//! ]).unwrap();
//!
//! assert_eq!(composed.subtotal, 5000.0);
//! assert_eq!(composed.adjusted, 7500.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::format::BreakdownEntry;

/// How a [`Multiplier`] combines with the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum FactorKind {
    /// Scales the running rate directly (1.6 = +60%)
    Multiplicative(f64),
    /// Percentage premium added to the premium sum (50.0 = +50%)
    AdditivePercent(f64),
}

/// A named adjustment applied to a base rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multiplier {
    pub name: String,
    pub kind: FactorKind,
}

impl Multiplier {
    pub fn multiplicative(name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            kind: FactorKind::Multiplicative(factor),
        }
    }

    pub fn additive_percent(name: impl Into<String>, percent: f64) -> Self {
        Self {
            name: name.into(),
            kind: FactorKind::AdditivePercent(percent),
        }
    }

    fn amount(&self) -> f64 {
        match self.kind {
            FactorKind::Multiplicative(factor) => factor,
            FactorKind::AdditivePercent(percent) => percent,
        }
    }
}

/// Outcome of [`compose_multipliers`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Base rate before any adjustment
    pub base: f64,
    /// Base after all multiplicative factors
    pub subtotal: f64,
    /// Sum of all additive premiums, in percent
    pub premium_percent: f64,
    /// Final rate: `subtotal × (1 + premium_percent / 100)`
    pub adjusted: f64,
    /// base, each factor in caller order, subtotal, premium sum, adjusted
    pub breakdown: Vec<BreakdownEntry>,
}

impl Composition {
    /// Net multiplier from base to adjusted rate
    pub fn net_factor(&self) -> f64 {
        if self.base == 0.0 {
            return 0.0;
        }
        self.adjusted / self.base
    }
}

/// Compose `factors` onto `base` using the two-phase rule.
///
/// Fails if any factor is non-finite, if a multiplicative factor is
/// negative, or if the premiums sum below -100% (which would flip the rate
/// negative).
pub fn compose_multipliers(base: f64, factors: &[Multiplier]) -> CalcResult<Composition> {
    if !base.is_finite() || base < 0.0 {
        return Err(CalcError::invalid_input(
            "base",
            base.to_string(),
            "Base rate must be a non-negative finite number",
        ));
    }

    let mut breakdown = Vec::with_capacity(factors.len() + 4);
    breakdown.push(BreakdownEntry::new("base", base));

    let mut subtotal = base;
    let mut premium_percent = 0.0;

    for factor in factors {
        let amount = factor.amount();
        if !amount.is_finite() {
            return Err(CalcError::invalid_input(
                &factor.name,
                amount.to_string(),
                "Adjustment must be a finite number",
            ));
        }
        match factor.kind {
            FactorKind::Multiplicative(value) => {
                if value < 0.0 {
                    return Err(CalcError::invalid_input(
                        &factor.name,
                        value.to_string(),
                        "Multiplicative factor cannot be negative",
                    ));
                }
                subtotal *= value;
            }
            FactorKind::AdditivePercent(percent) => premium_percent += percent,
        }
        breakdown.push(BreakdownEntry::new(factor.name.clone(), amount));
    }

    let premium_factor = 1.0 + premium_percent / 100.0;
    if premium_factor < 0.0 {
        return Err(CalcError::invalid_input(
            "premiums",
            format!("{}%", premium_percent),
            "Premiums cannot sum below -100%",
        ));
    }
    let adjusted = subtotal * premium_factor;

    breakdown.push(BreakdownEntry::new("subtotal", subtotal));
    breakdown.push(BreakdownEntry::new("total premium %", premium_percent));
    breakdown.push(BreakdownEntry::new("adjusted", adjusted));

    debug!(base, subtotal, premium_percent, adjusted, "composed multipliers");

    Ok(Composition {
        base,
        subtotal,
        premium_percent,
        adjusted,
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_then_additive() {
        // 1000 × 1.6 × 1.2 = 1920, then × (1 + 0.5 + 0.3) = 3456
        let composed = compose_multipliers(
            1000.0,
            &[
                Multiplier::multiplicative("engagement factor", 1.6),
                Multiplier::additive_percent("exclusivity premium", 50.0),
                Multiplier::multiplicative("niche factor", 1.2),
                Multiplier::additive_percent("usage rights premium", 30.0),
            ],
        )
        .unwrap();

        assert!((composed.subtotal - 1920.0).abs() < 1e-9);
        assert_eq!(composed.premium_percent, 80.0);
        assert!((composed.adjusted - 3456.0).abs() < 1e-9);
        assert!((composed.net_factor() - 3.456).abs() < 1e-9);
    }

    #[test]
    fn test_premiums_do_not_compound() {
        let composed = compose_multipliers(
            100.0,
            &[
                Multiplier::additive_percent("a", 50.0),
                Multiplier::additive_percent("b", 100.0),
            ],
        )
        .unwrap();
        // Compounding would give 300; summing gives 250.
        assert_eq!(composed.adjusted, 250.0);
    }

    #[test]
    fn test_factor_order_does_not_change_result() {
        let forward = [
            Multiplier::additive_percent("exclusivity premium", 50.0),
            Multiplier::multiplicative("engagement factor", 2.0),
        ];
        let reversed = [forward[1].clone(), forward[0].clone()];
        let a = compose_multipliers(2500.0, &forward).unwrap();
        let b = compose_multipliers(2500.0, &reversed).unwrap();
        assert_eq!(a.adjusted, b.adjusted);
        assert_eq!(a.adjusted, 7500.0);
    }

    #[test]
    fn test_breakdown_order() {
        let composed = compose_multipliers(10.0, &[Multiplier::multiplicative("x", 3.0)]).unwrap();
        let names: Vec<&str> = composed.breakdown.iter().map(|e| e.factor.as_str()).collect();
        assert_eq!(names, ["base", "x", "subtotal", "total premium %", "adjusted"]);
    }

    #[test]
    fn test_negative_discount_allowed_but_not_below_zero() {
        let discounted =
            compose_multipliers(100.0, &[Multiplier::additive_percent("live mention", -50.0)]).unwrap();
        assert_eq!(discounted.adjusted, 50.0);

        let err = compose_multipliers(100.0, &[Multiplier::additive_percent("bad", -150.0)]).unwrap_err();
        assert_eq!(err.field(), Some("premiums"));
    }

    #[test]
    fn test_rejects_bad_factors() {
        assert!(compose_multipliers(-1.0, &[]).is_err());
        assert!(compose_multipliers(1.0, &[Multiplier::multiplicative("x", f64::NAN)]).is_err());
        assert!(compose_multipliers(1.0, &[Multiplier::multiplicative("x", -2.0)]).is_err());
    }
}
