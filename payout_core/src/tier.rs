//! # Tier Resolver
//!
//! Maps a scalar metric (followers, days, percent) to the band that contains
//! it. Bands are half-open `[lower, upper)` intervals, so a value sitting
//! exactly on a boundary belongs to the band that starts there:
//!
//! ```text
//! [0, 10K)  [10K, 50K)  [50K, 500K)  [500K, 1M)  [1M, ∞)
//!            50_000 ──────^
//! ```
//!
//! A [`TierTable`] is validated once when it is built. After that every
//! non-negative value resolves to exactly one band.
//!
//! ## Example
//!
//! ```rust
//! use payout_core::tier::{TierBand, TierTable};
//!
//! let table = TierTable::new("exclusivity", vec![
//!     TierBand::new(0.0, Some(30.0), 0.0),
//!     TierBand::new(30.0, Some(90.0), 50.0),
//!     TierBand::new(90.0, None, 100.0),
//! ]).unwrap();
//!
//! assert_eq!(table.resolve("exclusivity_days", 30.0).unwrap().value, 50.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{CalcError, CalcResult};

/// One half-open interval `[lower, upper)` of a tier table.
///
/// `upper = None` marks the final, unbounded band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBand<T> {
    /// Inclusive lower bound
    pub lower: f64,
    /// Exclusive upper bound, `None` for the last band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// Rate, premium or descriptor attached to this band
    pub value: T,
}

impl<T> TierBand<T> {
    pub fn new(lower: f64, upper: Option<f64>, value: T) -> Self {
        Self { lower, upper, value }
    }

    /// Whether `value` falls inside `[lower, upper)`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value < upper)
    }

    /// Human-readable range, e.g. `"50K-500K"` or `"1M+"`
    pub fn range_label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{}-{}", compact(self.lower), compact(upper)),
            None => format!("{}+", compact(self.lower)),
        }
    }
}

fn compact(value: f64) -> String {
    if value >= 1_000_000.0 && value % 100_000.0 == 0.0 {
        format!("{}M", value / 1_000_000.0)
    } else if value >= 1_000.0 && value % 100.0 == 0.0 {
        format!("{}K", value / 1_000.0)
    } else {
        format!("{}", value)
    }
}

/// An ordered, gap-free set of bands covering `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierTable<T> {
    name: String,
    bands: Vec<TierBand<T>>,
}

impl<T> TierTable<T> {
    /// Build and validate a table.
    ///
    /// The bands must start at 0, be sorted ascending, touch end to end and
    /// finish with an unbounded band. Anything else is a
    /// [`CalcError::Configuration`] naming the table.
    pub fn new(name: impl Into<String>, bands: Vec<TierBand<T>>) -> CalcResult<Self> {
        let name = name.into();
        validate_bands(&name, &bands)?;
        Ok(Self { name, bands })
    }

    /// Table name used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All bands in ascending order
    pub fn bands(&self) -> &[TierBand<T>] {
        &self.bands
    }

    /// Find the band containing `value`.
    ///
    /// `field` names the caller's input so a rejected value can be traced
    /// back to the form field it came from.
    pub fn resolve(&self, field: &str, value: f64) -> CalcResult<&TierBand<T>> {
        if value.is_nan() {
            return Err(CalcError::invalid_input(field, "NaN", "Value must be a number"));
        }
        if value < 0.0 {
            return Err(CalcError::invalid_input(
                field,
                value.to_string(),
                "Value cannot be negative",
            ));
        }

        // First band whose lower bound is above `value`; the one before it wins.
        let index = self.bands.partition_point(|band| band.lower <= value);
        let band = index
            .checked_sub(1)
            .and_then(|i| self.bands.get(i))
            .ok_or_else(|| CalcError::configuration(&self.name, "table does not start at 0"))?;

        trace!(table = %self.name, field, value, band = %band.range_label(), "resolved tier");
        Ok(band)
    }

    /// Convenience for [`resolve`](Self::resolve) returning only the payload
    pub fn value_for(&self, field: &str, value: f64) -> CalcResult<&T> {
        self.resolve(field, value).map(|band| &band.value)
    }
}

fn validate_bands<T>(name: &str, bands: &[TierBand<T>]) -> CalcResult<()> {
    let first = bands
        .first()
        .ok_or_else(|| CalcError::configuration(name, "table has no bands"))?;
    if first.lower != 0.0 {
        return Err(CalcError::configuration(
            name,
            format!("first band must start at 0, starts at {}", first.lower),
        ));
    }

    for (i, band) in bands.iter().enumerate() {
        if !band.lower.is_finite() {
            return Err(CalcError::configuration(
                name,
                format!("band {} has a non-finite lower bound", i),
            ));
        }
        match (band.upper, bands.get(i + 1)) {
            (Some(upper), Some(next)) => {
                if upper <= band.lower {
                    return Err(CalcError::configuration(
                        name,
                        format!("band {} is empty or reversed: [{}, {})", i, band.lower, upper),
                    ));
                }
                if upper != next.lower {
                    let problem = if upper < next.lower { "gap" } else { "overlap" };
                    return Err(CalcError::configuration(
                        name,
                        format!(
                            "{} between band {} (ends {}) and band {} (starts {})",
                            problem,
                            i,
                            upper,
                            i + 1,
                            next.lower
                        ),
                    ));
                }
            }
            (None, Some(_)) => {
                return Err(CalcError::configuration(
                    name,
                    format!("band {} is unbounded but is not the last band", i),
                ));
            }
            (Some(upper), None) => {
                return Err(CalcError::configuration(
                    name,
                    format!("last band must be unbounded, ends at {}", upper),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower_table() -> TierTable<&'static str> {
        TierTable::new(
            "followers",
            vec![
                TierBand::new(0.0, Some(10_000.0), "nano"),
                TierBand::new(10_000.0, Some(50_000.0), "micro"),
                TierBand::new(50_000.0, Some(500_000.0), "mid"),
                TierBand::new(500_000.0, Some(1_000_000.0), "macro"),
                TierBand::new(1_000_000.0, None, "mega"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_boundary_belongs_to_upper_band() {
        let table = follower_table();
        assert_eq!(*table.value_for("followers", 49_999.0).unwrap(), "micro");
        assert_eq!(*table.value_for("followers", 50_000.0).unwrap(), "mid");
        assert_eq!(*table.value_for("followers", 500_000.0).unwrap(), "macro");
        assert_eq!(*table.value_for("followers", 0.0).unwrap(), "nano");
        assert_eq!(*table.value_for("followers", f64::INFINITY).unwrap(), "mega");
    }

    #[test]
    fn test_every_value_hits_exactly_one_band() {
        let table = follower_table();
        let probes = [0.0, 0.5, 9_999.99, 10_000.0, 123_456.0, 999_999.0, 1e6, 1e12];
        for value in probes {
            let matches = table.bands().iter().filter(|b| b.contains(value)).count();
            assert_eq!(matches, 1, "value {} matched {} bands", value, matches);
            let resolved = table.resolve("followers", value).unwrap();
            assert!(resolved.contains(value));
        }
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        let table = follower_table();
        let err = table.resolve("followers", -1.0).unwrap_err();
        assert_eq!(err.field(), Some("followers"));
        assert!(table.resolve("followers", f64::NAN).is_err());
    }

    #[test]
    fn test_gap_is_configuration_error() {
        let err = TierTable::new(
            "broken",
            vec![TierBand::new(0.0, Some(10.0), 1), TierBand::new(20.0, None, 2)],
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn test_overlap_and_order_errors() {
        let overlap = TierTable::new(
            "broken",
            vec![TierBand::new(0.0, Some(30.0), 1), TierBand::new(20.0, None, 2)],
        );
        assert!(overlap.unwrap_err().to_string().contains("overlap"));

        let bounded_tail = TierTable::new("broken", vec![TierBand::new(0.0, Some(5.0), 1)]);
        assert!(bounded_tail.is_err());

        let late_start = TierTable::new("broken", vec![TierBand::new(1.0, None, 1)]);
        assert!(late_start.is_err());

        let empty: CalcResult<TierTable<i32>> = TierTable::new("broken", vec![]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_range_labels() {
        let table = follower_table();
        assert_eq!(table.bands()[2].range_label(), "50K-500K");
        assert_eq!(table.bands()[4].range_label(), "1M+");
    }
}
