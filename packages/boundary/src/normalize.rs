//! Normalizes raw `GeoJSON` features into [`Region`] values.
//!
//! Uses the source's [`BoundaryFieldMapping`] to read the region key and
//! name. Features are never dropped: a feature with unusable geometry
//! still becomes a region that contains no sites.

use aves_mallorca_boundary_models::BoundaryFieldMapping;
use aves_mallorca_geometry::Region;

/// Normalizes a list of raw `GeoJSON` features into regions, preserving
/// their order.
#[must_use]
pub fn normalize_features(
    features: &[serde_json::Value],
    fields: &BoundaryFieldMapping,
) -> Vec<Region> {
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| normalize_feature(index, feature, fields))
        .collect()
}

/// Reads a property as a non-empty string. Numeric keys are accepted.
fn property(props: Option<&serde_json::Value>, field: &str) -> Option<String> {
    match props?.get(field)? {
        serde_json::Value::String(s) => Some(s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_feature(
    index: usize,
    feature: &serde_json::Value,
    fields: &BoundaryFieldMapping,
) -> Region {
    let props = feature.get("properties");

    let name = property(props, &fields.name);
    let key = property(props, &fields.key)
        .or_else(|| {
            fields
                .key_fallback
                .as_deref()
                .and_then(|fallback| property(props, fallback))
        })
        .or_else(|| name.clone())
        .unwrap_or_else(|| {
            log::warn!("Boundary feature {index} has no key; using its position");
            format!("feature-{index}")
        });
    let name = name.unwrap_or_else(|| key.clone());

    Region::from_geojson(key, name, feature.get("geometry"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> BoundaryFieldMapping {
        BoundaryFieldMapping {
            key: "neighbourhood_id".to_string(),
            key_fallback: Some("hc-key".to_string()),
            name: "neighbourhood".to_string(),
        }
    }

    fn square() -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[2.6, 39.5], [2.6, 39.7], [2.8, 39.7], [2.8, 39.5]]]
        })
    }

    #[test]
    fn reads_key_and_name() {
        let features = vec![json!({
            "type": "Feature",
            "properties": { "neighbourhood_id": "07040", "neighbourhood": "Palma" },
            "geometry": square()
        })];

        let regions = normalize_features(&features, &fields());

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].key, "07040");
        assert_eq!(regions[0].name, "Palma");
        assert!(regions[0].geometry.contains([2.7, 39.6]));
    }

    #[test]
    fn falls_back_to_secondary_key_then_name() {
        let features = vec![
            json!({
                "type": "Feature",
                "properties": { "hc-key": "es-pm-ll", "neighbourhood": "Llucmajor" },
                "geometry": square()
            }),
            json!({
                "type": "Feature",
                "properties": { "neighbourhood_id": 7031, "neighbourhood": "Inca" },
                "geometry": square()
            }),
            json!({
                "type": "Feature",
                "properties": { "neighbourhood": "Sóller" },
                "geometry": square()
            }),
            json!({ "type": "Feature", "properties": {}, "geometry": square() }),
        ];

        let regions = normalize_features(&features, &fields());
        let keys: Vec<_> = regions.iter().map(|r| r.key.as_str()).collect();

        assert_eq!(keys, vec!["es-pm-ll", "7031", "Sóller", "feature-3"]);
        assert_eq!(regions[3].name, "feature-3");
    }

    #[test]
    fn keeps_features_with_malformed_geometry() {
        let features = vec![
            json!({
                "type": "Feature",
                "properties": { "neighbourhood_id": "a", "neighbourhood": "A" },
                "geometry": null
            }),
            json!({
                "type": "Feature",
                "properties": { "neighbourhood_id": "b", "neighbourhood": "B" },
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }
            }),
        ];

        let regions = normalize_features(&features, &fields());

        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.geometry.malformed_reason().is_some()));
    }
}
