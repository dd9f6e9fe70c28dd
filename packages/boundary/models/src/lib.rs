#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary source definition types.
//!
//! Defines the TOML schema for boundary sources: where the `GeoJSON`
//! `FeatureCollection` comes from and which feature properties hold the
//! region key and display name.

use serde::{Deserialize, Serialize};

/// A region boundary source, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundarySource {
    /// Unique source identifier (e.g., `"mallorca_municipalities"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Fetcher configuration.
    pub fetcher: BoundaryFetcherConfig,
    /// Property mapping for region key and name.
    pub fields: BoundaryFieldMapping,
}

impl BoundarySource {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How to fetch the boundary `FeatureCollection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryFetcherConfig {
    /// Direct `GeoJSON` URL.
    GeojsonUrl {
        /// Full URL that returns a `GeoJSON` `FeatureCollection`.
        url: String,
    },
    /// Local `GeoJSON` file.
    File {
        /// Path to a `GeoJSON` `FeatureCollection`.
        path: String,
    },
}

/// Feature property names used to build regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryFieldMapping {
    /// Property holding the stable region key.
    pub key: String,
    /// Property tried when `key` is absent.
    #[serde(default)]
    pub key_fallback: Option<String>,
    /// Property holding the display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_fetcher_without_fallback() {
        let source: BoundarySource = toml::de::from_str(
            r#"
            id = "local"
            name = "Local file"

            [fetcher]
            type = "file"
            path = "/tmp/mallorca.json"

            [fields]
            key = "id"
            name = "name"
            "#,
        )
        .unwrap();

        assert_eq!(source.id(), "local");
        assert!(matches!(source.fetcher, BoundaryFetcherConfig::File { ref path } if path == "/tmp/mallorca.json"));
        assert_eq!(source.fields.key_fallback, None);
    }
}
