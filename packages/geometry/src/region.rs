//! Region geometry parsed from `GeoJSON`.
//!
//! Only `Polygon` and `MultiPolygon` geometries are usable. Anything else
//! is kept as [`RegionGeometry::Malformed`] so the region still shows up
//! in aggregated output, just without any contained sites.

use geojson::Value;

use crate::{GeometryError, HoleMode, Point, Polygon, Ring};

/// A polygon-defined area sites are attributed to.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Stable key from the boundary metadata.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Parsed geometry.
    pub geometry: RegionGeometry,
}

impl Region {
    /// Builds a region from a raw `GeoJSON` geometry object.
    ///
    /// Malformed geometry is logged and kept on the region.
    #[must_use]
    pub fn from_geojson(
        key: impl Into<String>,
        name: impl Into<String>,
        geometry: Option<&serde_json::Value>,
    ) -> Self {
        let key = key.into();
        let geometry = RegionGeometry::from_geojson(geometry);

        if let Some(reason) = geometry.malformed_reason() {
            log::warn!("Region {key}: {reason}; it will contain no sites");
        }

        Self {
            key,
            name: name.into(),
            geometry,
        }
    }

    /// Containment with an explicit [`HoleMode`].
    #[must_use]
    pub fn contains_with(&self, point: Point, holes: HoleMode) -> bool {
        self.geometry.contains_with(point, holes)
    }
}

/// Geometry of a region, or the reason it could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionGeometry {
    /// A single polygon as `[outer, ...holes]`.
    Polygon(Polygon),
    /// Several polygons, each `[outer, ...holes]`.
    MultiPolygon(Vec<Polygon>),
    /// Unusable geometry. Contains no points.
    Malformed(GeometryError),
}

impl RegionGeometry {
    /// Parses a `GeoJSON` geometry object.
    ///
    /// `None` and JSON `null` are treated as a missing geometry. Parse
    /// failures never propagate; they become [`RegionGeometry::Malformed`].
    #[must_use]
    pub fn from_geojson(value: Option<&serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::Malformed(GeometryError::Missing),
            Some(value) => Self::parse(value).unwrap_or_else(Self::Malformed),
        }
    }

    fn parse(value: &serde_json::Value) -> Result<Self, GeometryError> {
        let geometry: geojson::Geometry =
            serde_json::from_value(value.clone()).map_err(|e| GeometryError::Invalid {
                message: e.to_string(),
            })?;

        match geometry.value {
            Value::Polygon(rings) => Ok(Self::Polygon(convert_polygon(&rings)?)),
            Value::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(GeometryError::EmptyPolygon);
                }
                let polygons = polygons
                    .iter()
                    .map(|rings| convert_polygon(rings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::MultiPolygon(polygons))
            }
            other => Err(GeometryError::UnsupportedType(
                type_name(&other).to_string(),
            )),
        }
    }

    /// Returns the reason this geometry is unusable, if it is.
    #[must_use]
    pub const fn malformed_reason(&self) -> Option<&GeometryError> {
        match self {
            Self::Malformed(reason) => Some(reason),
            Self::Polygon(_) | Self::MultiPolygon(_) => None,
        }
    }

    /// Outer-ring containment; holes are ignored.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.contains_with(point, HoleMode::Ignore)
    }

    /// Containment with an explicit [`HoleMode`].
    #[must_use]
    pub fn contains_with(&self, point: Point, holes: HoleMode) -> bool {
        match (self, holes) {
            (Self::Polygon(polygon), HoleMode::Ignore) => polygon
                .first()
                .is_some_and(|outer| crate::contains(point, outer)),
            (Self::Polygon(polygon), HoleMode::Subtract) => {
                crate::contains_excluding_holes(point, polygon)
            }
            (Self::MultiPolygon(polygons), HoleMode::Ignore) => {
                crate::contains_multi(point, polygons)
            }
            (Self::MultiPolygon(polygons), HoleMode::Subtract) => polygons
                .iter()
                .any(|polygon| crate::contains_excluding_holes(point, polygon)),
            (Self::Malformed(_), _) => false,
        }
    }
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon, GeometryError> {
    if rings.is_empty() {
        return Err(GeometryError::EmptyPolygon);
    }
    rings.iter().map(|ring| convert_ring(ring)).collect()
}

fn convert_ring(positions: &[Vec<f64>]) -> Result<Ring, GeometryError> {
    if positions.len() < 3 {
        return Err(GeometryError::DegenerateRing {
            vertices: positions.len(),
        });
    }

    positions
        .iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok([*lng, *lat]),
            _ => Err(GeometryError::Invalid {
                message: format!("position has {} coordinates", position.len()),
            }),
        })
        .collect()
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
