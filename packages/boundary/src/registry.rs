//! Compile-time registry of boundary sources.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.

use aves_mallorca_boundary_models::BoundarySource;

use crate::BoundaryError;

/// Number of registered boundary sources. Enforced by a test.
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 1;

/// Id of the source used when none is configured.
pub const DEFAULT_SOURCE_ID: &str = "mallorca_municipalities";

/// Embedded TOML source definitions.
const SOURCE_TOMLS: &[(&str, &str)] = &[(
    "mallorca_municipalities",
    include_str!("../sources/mallorca_municipalities.toml"),
)];

/// Returns all registered boundary sources.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are compile-time
/// constants, so a failure is a development error caught by the tests.
#[must_use]
pub fn all_sources() -> Vec<BoundarySource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse boundary source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a registered source by id.
///
/// # Errors
///
/// Returns [`BoundaryError::UnknownSource`] if no source has that id.
pub fn source_by_id(id: &str) -> Result<BoundarySource, BoundaryError> {
    all_sources()
        .into_iter()
        .find(|source| source.id == id)
        .ok_or_else(|| BoundaryError::UnknownSource { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use aves_mallorca_boundary_models::BoundaryFetcherConfig;

    #[test]
    fn loads_all_sources() {
        let sources = all_sources();
        assert_eq!(
            sources.len(),
            EXPECTED_SOURCE_COUNT,
            "Expected {EXPECTED_SOURCE_COUNT} boundary sources, found {}. \
             Update EXPECTED_SOURCE_COUNT after adding/removing sources.",
            sources.len()
        );
    }

    #[test]
    fn source_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for source in all_sources() {
            assert!(seen.insert(source.id.clone()), "Duplicate boundary source ID: {}", source.id);
        }
    }

    #[test]
    fn default_source_uses_municipality_properties() {
        let source = source_by_id(DEFAULT_SOURCE_ID).unwrap();
        assert_eq!(source.fields.key, "neighbourhood_id");
        assert_eq!(source.fields.key_fallback.as_deref(), Some("hc-key"));
        assert_eq!(source.fields.name, "neighbourhood");
        assert!(matches!(
            source.fetcher,
            BoundaryFetcherConfig::GeojsonUrl { ref url } if url.ends_with("mallorca.json")
        ));
    }

    #[test]
    fn unknown_source_is_an_error() {
        assert!(matches!(
            source_by_id("menorca"),
            Err(BoundaryError::UnknownSource { ref id }) if id == "menorca"
        ));
    }
}
