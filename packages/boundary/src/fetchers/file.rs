//! Local `GeoJSON` file fetcher.

use crate::BoundaryError;

/// Reads all features from a `GeoJSON` file on disk.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the file cannot be read or is not a
/// `FeatureCollection`.
pub async fn fetch(path: &str) -> Result<Vec<serde_json::Value>, BoundaryError> {
    log::debug!("Reading boundaries from {path}");

    let body = tokio::fs::read_to_string(path).await?;
    let json: serde_json::Value = serde_json::from_str(&body)?;

    super::features_of(json)
}
