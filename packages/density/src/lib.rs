#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seasonal geospatial density engine.
//!
//! The engine runs in three synchronous stages over immutable inputs:
//!
//! 1. [`estimator`] turns `(site, reproduction period, migratory pattern)`
//!    groups into a per-site seasonal vector.
//! 2. [`aggregator`] attributes sites to municipality polygons and sums
//!    their vectors and distinct species per region.
//! 3. [`presenter`] derives the per-season color scale maximum and the
//!    non-empty region count for the choropleth.
//!
//! [`pipeline`] loads the inputs concurrently through the [`SiteSource`]
//! and [`RegionSource`] traits and then runs the stages.

pub mod aggregator;
pub mod estimator;
pub mod pipeline;
pub mod presenter;

pub use aggregator::{aggregate, aggregate_with};
pub use estimator::{estimate, estimate_group, estimate_observation};
pub use pipeline::{RegionSource, SiteSource, SourceError};
pub use presenter::{
    DensityView, INITIAL_FALLBACK_MAX, SEASON_SWITCH_FALLBACK_MAX, present, present_named,
};

use thiserror::Error;

/// Errors that can occur while computing density.
///
/// Season names are validated before a run starts, through
/// [`aves_mallorca_density_models::Season`]'s `FromStr`.
#[derive(Debug, Error)]
pub enum DensityError {
    /// One of the concurrent input fetches failed. No partial aggregate is
    /// produced.
    #[error("Failed to fetch {input}: {source}")]
    SourceFetch {
        /// Which input failed (`"seasonal groups"`, `"observations"`,
        /// `"regions"`).
        input: &'static str,
        /// The underlying source error.
        source: SourceError,
    },
}
