#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Season, seasonal vector, site, and regional density types.
//!
//! These types are shared by the density engine, the storage layer that
//! produces site and observation rows, and the API layer that serializes
//! the aggregated output for the choropleth.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the four fixed seasons used by the density estimate.
///
/// The string form is the Spanish season name used throughout the
/// catalog data and the API (`"Primavera"`, `"Verano"`, `"Otoño"`,
/// `"Invierno"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
pub enum Season {
    /// Spring.
    #[serde(rename = "Primavera")]
    #[strum(serialize = "Primavera")]
    Spring,
    /// Summer.
    #[serde(rename = "Verano")]
    #[strum(serialize = "Verano")]
    Summer,
    /// Autumn.
    #[serde(rename = "Otoño")]
    #[strum(serialize = "Otoño")]
    Autumn,
    /// Winter.
    #[serde(rename = "Invierno")]
    #[strum(serialize = "Invierno")]
    Winter,
}

impl Season {
    /// All seasons in display order.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];
}

impl std::str::FromStr for Season {
    type Err = InvalidSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.as_ref() == s)
            .ok_or_else(|| InvalidSeasonError {
                name: s.to_string(),
            })
    }
}

/// Error returned when a season name is not one of the four fixed names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeasonError {
    /// The name that was provided.
    pub name: String,
}

impl std::fmt::Display for InvalidSeasonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid season '{}': expected one of Primavera, Verano, Otoño, Invierno",
            self.name
        )
    }
}

impl std::error::Error for InvalidSeasonError {}

/// Reproduction period category recorded for a species.
///
/// Unknown strings do not parse; callers treat them like a missing period.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ReproductionPeriod {
    /// Breeds in spring.
    #[serde(rename = "Primavera")]
    #[strum(serialize = "Primavera")]
    Spring,
    /// Breeds in summer.
    #[serde(rename = "Verano")]
    #[strum(serialize = "Verano")]
    Summer,
    /// Breeds in autumn.
    #[serde(rename = "Otoño")]
    #[strum(serialize = "Otoño")]
    Autumn,
    /// Breeds in winter.
    #[serde(rename = "Invierno")]
    #[strum(serialize = "Invierno")]
    Winter,
    /// Breeds all year round.
    #[serde(rename = "Todo el año")]
    #[strum(serialize = "Todo el año")]
    AllYear,
}

/// Per-season species counts.
///
/// Always holds exactly the four seasons; serialized with the Spanish
/// season names as keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalVector {
    /// Spring count.
    #[serde(rename = "Primavera")]
    pub spring: u64,
    /// Summer count.
    #[serde(rename = "Verano")]
    pub summer: u64,
    /// Autumn count.
    #[serde(rename = "Otoño")]
    pub autumn: u64,
    /// Winter count.
    #[serde(rename = "Invierno")]
    pub winter: u64,
}

impl SeasonalVector {
    /// Creates a vector from the four season values.
    #[must_use]
    pub const fn new(spring: u64, summer: u64, autumn: u64, winter: u64) -> Self {
        Self {
            spring,
            summer,
            autumn,
            winter,
        }
    }

    /// Returns the count for `season`.
    #[must_use]
    pub const fn get(&self, season: Season) -> u64 {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Autumn => self.autumn,
            Season::Winter => self.winter,
        }
    }

    /// Adds `count` to `season`.
    pub const fn add(&mut self, season: Season, count: u64) {
        match season {
            Season::Spring => self.spring += count,
            Season::Summer => self.summer += count,
            Season::Autumn => self.autumn += count,
            Season::Winter => self.winter += count,
        }
    }

    /// Adds every season of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for season in Season::ALL {
            self.add(season, other.get(season));
        }
    }

    /// Iterates `(season, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Season, u64)> + '_ {
        Season::ALL
            .into_iter()
            .map(move |season| (season, self.get(season)))
    }

    /// Sum over all four seasons.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count).sum()
    }

    /// Largest single-season count.
    #[must_use]
    pub fn max(&self) -> u64 {
        self.iter().map(|(_, count)| count).max().unwrap_or(0)
    }
}

/// A point-located site (park, reserve, center).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Site primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl Site {
    /// Returns `[longitude, latitude]` when both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<[f64; 2]> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some([lon, lat]),
            _ => None,
        }
    }
}

/// Identity used to deduplicate species across sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpeciesKey {
    /// Species primary key.
    Id(i64),
    /// Scientific name, used when no id is available.
    ScientificName(String),
}

/// A species recorded at a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesObservation {
    /// Species primary key.
    pub species_id: Option<i64>,
    /// Common (Spanish) name.
    pub common_name: Option<String>,
    /// Scientific name.
    pub scientific_name: Option<String>,
    /// Taxonomic family.
    pub family: Option<String>,
    /// Reproduction period category (e.g. `"Primavera"`, `"Todo el año"`).
    pub reproduction_period: Option<String>,
    /// Free-text migratory pattern (e.g. `"Migrador estival"`).
    pub migratory_pattern: Option<String>,
    /// Whether the species is endemic to the Balearic Islands.
    pub endemic: bool,
    /// Conservation category.
    pub conservation_category: Option<String>,
}

impl SpeciesObservation {
    /// Returns the deduplication key: the id when present, otherwise the
    /// non-empty scientific name.
    #[must_use]
    pub fn species_key(&self) -> Option<SpeciesKey> {
        if let Some(id) = self.species_id {
            return Some(SpeciesKey::Id(id));
        }
        self.scientific_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| SpeciesKey::ScientificName(name.to_string()))
    }
}

/// A site together with every species observed there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteObservations {
    /// The site.
    #[serde(flatten)]
    pub site: Site,
    /// Species observed at the site.
    pub species: Vec<SpeciesObservation>,
}

/// Number of distinct species at one `(site, period, pattern)` combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalGroupRow {
    /// The site the species belong to.
    pub site: Site,
    /// Reproduction period shared by the group.
    pub reproduction_period: Option<String>,
    /// Migratory pattern shared by the group.
    pub migratory_pattern: Option<String>,
    /// Distinct species in the group (0 for a site with no species).
    pub species_count: u64,
}

/// Estimated seasonal vector for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSeasons {
    /// The site.
    #[serde(flatten)]
    pub site: Site,
    /// Estimated species count per season.
    pub seasons: SeasonalVector,
}

/// Site-level seasonal density report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalDensity {
    /// Number of sites in the report.
    pub count: usize,
    /// Largest seasonal count over every site and season.
    pub max_intensity: u64,
    /// Running seasonal statistic accumulated over all groups.
    pub seasonal_stats: SeasonalVector,
    /// Per-site seasonal vectors in first-appearance order.
    pub locations: Vec<SiteSeasons>,
}

/// Seasonal and species aggregate for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAggregate {
    /// Stable region key from the boundary metadata.
    pub key: String,
    /// Region display name.
    pub name: String,
    /// Distinct species observed at sites inside the region.
    pub total_distinct_species: usize,
    /// Number of sites inside the region.
    pub contributing_sites: usize,
    /// Summed seasonal vectors of the contained sites.
    pub seasons: SeasonalVector,
}

/// A region aggregate with the value for the active season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionValue {
    /// The aggregate.
    #[serde(flatten)]
    pub aggregate: RegionAggregate,
    /// `aggregate.seasons` for the active season.
    pub value: u64,
}

/// Display-ready regional density for one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensitySummary {
    /// The active season.
    pub season: Season,
    /// Every region with its active-season value.
    pub regions: Vec<RegionValue>,
    /// Color scale maximum for the active season.
    pub max_for_season: u64,
    /// Regions with a non-zero value for the active season.
    pub subtitle_count: usize,
    /// Number of regions.
    pub total_regions: usize,
    /// Sum of the active-season values over all regions.
    pub total_for_season: u64,
}

impl DensitySummary {
    /// Chart subtitle, e.g. `"12 de 53 municipios con registros de aves (Verano)"`.
    #[must_use]
    pub fn subtitle(&self) -> String {
        format!(
            "{} de {} municipios con registros de aves ({})",
            self.subtitle_count, self.total_regions, self.season
        )
    }
}
