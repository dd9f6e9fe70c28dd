//! Fetcher dispatch for boundary sources.
//!
//! Each fetcher returns the `features` array of a `GeoJSON`
//! `FeatureCollection`.

pub mod file;
pub mod geojson_url;

use aves_mallorca_boundary_models::{BoundaryFetcherConfig, BoundarySource};

use crate::BoundaryError;

/// Fetches raw `GeoJSON` features for `source`.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request, file read, or response
/// parsing fails.
pub async fn fetch_features(
    client: &reqwest::Client,
    source: &BoundarySource,
) -> Result<Vec<serde_json::Value>, BoundaryError> {
    match &source.fetcher {
        BoundaryFetcherConfig::GeojsonUrl { url } => geojson_url::fetch(client, url).await,
        BoundaryFetcherConfig::File { path } => file::fetch(path).await,
    }
}

/// Extracts the `features` array from a parsed `FeatureCollection`.
pub(crate) fn features_of(json: serde_json::Value) -> Result<Vec<serde_json::Value>, BoundaryError> {
    match json {
        serde_json::Value::Object(mut object) => match object.remove("features") {
            Some(serde_json::Value::Array(features)) => Ok(features),
            _ => Err(BoundaryError::Conversion {
                message: "No features array in GeoJSON response".to_string(),
            }),
        },
        _ => Err(BoundaryError::Conversion {
            message: "GeoJSON response is not an object".to_string(),
        }),
    }
}
