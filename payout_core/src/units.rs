//! # Unit Types
//!
//! Type-safe wrappers for the three currencies the calculators move between.
//! They keep coins, diamonds and dollars from being mixed up while still
//! serializing as plain numbers.
//!
//! Conversion rates between them live in the rate tables, not here, so the
//! wrappers carry no `From` impls between each other. See
//! [`crate::calculators::coins`] for the conversions.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::units::{Coins, Usd};
//!
//! let total = Coins(700).checked_add(Coins(70));
//! assert_eq!(total, Some(Coins(770)));
//! assert_eq!(Coins(u64::MAX).checked_mul(2), None);
//! assert_eq!(Usd(2.5).to_string(), "$2.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Platform Currencies
// ============================================================================

/// Gift coins bought by viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(pub u64);

/// Diamonds credited to a creator when coins are gifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diamonds(pub u64);

impl Coins {
    /// Sum of two amounts, or `None` past `u64::MAX`
    pub fn checked_add(self, rhs: Coins) -> Option<Coins> {
        self.0.checked_add(rhs.0).map(Coins)
    }

    /// `count` copies of this amount, or `None` past `u64::MAX`
    pub fn checked_mul(self, count: u64) -> Option<Coins> {
        self.0.checked_mul(count).map(Coins)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} coins", self.0)
    }
}

impl fmt::Display for Diamonds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} diamonds", self.0)
    }
}

// ============================================================================
// Cash
// ============================================================================

/// US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(pub f64);

impl Usd {
    /// Round to the nearest cent
    pub fn round_cents(self) -> Usd {
        Usd((self.0 * 100.0).round() / 100.0)
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// ISO currency of every estimate the engine produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_arithmetic_is_checked() {
        let total = Coins(350).checked_mul(2).and_then(|c| c.checked_add(Coins(70)));
        assert_eq!(total, Some(Coins(770)));
        assert_eq!(Coins(u64::MAX).checked_add(Coins(1)), None);
        assert_eq!(Coins(u64::MAX / 2 + 1).checked_mul(2), None);
    }

    #[test]
    fn test_usd_rounding() {
        assert_eq!(Usd(2.499).round_cents(), Usd(2.5));
        assert_eq!(Usd(0.006).to_string(), "$0.01");
        assert_eq!(Usd(12.0).to_string(), "$12.00");
    }

    #[test]
    fn test_transparent_serialization() {
        assert_eq!(serde_json::to_string(&Coins(1000)).unwrap(), "1000");
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }
}
