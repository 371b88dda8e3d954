//! Infrastructure impact assessment
//!
//! Reduces overlay results into risk metrics, plus the amenity-based
//! critical-infrastructure classifier that populates the flag the
//! aggregation reads.

mod aggregate;
mod classify;

pub use aggregate::{aggregate_impact, assess_impact, ImpactParams, ImpactReport};
pub use classify::{mark_critical, CRITICAL_AMENITIES};
