//! # payout_core - Creator Monetization Calculation Engine
//!
//! `payout_core` estimates what short-video creators earn: brand-deal fees,
//! view-based fund payouts, LIVE gift value and shop commissions, plus the
//! audience metrics those estimates depend on. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over caller input and read-only rate tables
//! - **Data-Driven**: Every rate lives in versioned TOML, never in formula code
//! - **Ranges, Not Points**: Money is reported as low / mid / high with a breakdown
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use payout_core::calculators::{brand_deal, MetricInput};
//! use payout_core::categories::Niche;
//! use payout_core::RateTables;
//!
//! let tables = RateTables::bundled().unwrap();
//! let input = MetricInput::new(50_000, 10.0, Niche::Fitness).with_baseline_engagement(5.0);
//! let estimate = brand_deal::estimate(tables, &input).unwrap();
//!
//! assert_eq!(estimate.summary(), "$4,000 - $6,250 (typical $5,000)");
//! ```
//!
//! ## Modules
//!
//! - [`calculators`] - One module per calculator, plus JSON request dispatch
//! - [`tables`] - Rate tables: bundled TOML, override loading, validation
//! - [`tier`] - Half-open band tables and value-to-band resolution
//! - [`multiplier`] - Two-phase multiplier composition
//! - [`format`] - Low/mid/high range formatting
//! - [`categories`] - Niches, regions, deliverables and classification labels
//! - [`units`] - Coins, diamonds and dollars
//! - [`errors`] - Structured error types

pub mod calculators;
pub mod categories;
pub mod errors;
pub mod format;
pub mod multiplier;
pub mod tables;
pub mod tier;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculators::{CalculationOutput, CalculationRequest, MetricInput, RateReport, UsageRights};
pub use errors::{CalcError, CalcResult};
pub use format::{BreakdownEntry, EstimateResult, ToleranceBand};
pub use tables::RateTables;
