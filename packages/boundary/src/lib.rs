#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary fetching and normalization.
//!
//! Downloads municipality polygons as a `GeoJSON` `FeatureCollection` and
//! turns each feature into a [`Region`]. Sources are defined as TOML files
//! embedded at compile time.

pub mod fetchers;
pub mod normalize;
pub mod registry;

use aves_mallorca_boundary_models::BoundarySource;
use aves_mallorca_geometry::Region;
use thiserror::Error;

/// Errors that can occur while loading boundaries.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No registered source has the requested id.
    #[error("Unknown boundary source: {id}")]
    UnknownSource {
        /// The requested id.
        id: String,
    },

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Fetches a source's features and normalizes them into regions.
///
/// # Errors
///
/// Returns [`BoundaryError`] if fetching or parsing the collection fails.
/// Individual malformed geometries do not fail the load.
pub async fn load_regions(
    client: &reqwest::Client,
    source: &BoundarySource,
) -> Result<Vec<Region>, BoundaryError> {
    let features = fetchers::fetch_features(client, source).await?;
    let regions = normalize::normalize_features(&features, &source.fields);

    let malformed = regions
        .iter()
        .filter(|region| region.geometry.malformed_reason().is_some())
        .count();
    log::info!(
        "Loaded {} regions from {} ({malformed} with unusable geometry)",
        regions.len(),
        source.id,
    );

    Ok(regions)
}
