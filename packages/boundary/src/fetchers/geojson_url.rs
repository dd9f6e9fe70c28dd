//! Direct `GeoJSON` URL fetcher.

use crate::BoundaryError;

/// Fetches all features from a direct `GeoJSON` URL.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request fails, the server answers with
/// a non-success status, or the body is not a `FeatureCollection`.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, BoundaryError> {
    log::debug!("Fetching boundaries from {url}");

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(BoundaryError::Conversion {
            message: format!("GeoJSON request failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    let json: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| BoundaryError::Conversion {
            message: format!("Failed to parse GeoJSON response: {e}"),
        })?;

    super::features_of(json)
}
