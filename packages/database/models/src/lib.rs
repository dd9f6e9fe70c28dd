#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database row types and query parameter definitions.
//!
//! These types mirror the `parks` and `birds` tables. Site and observation
//! rows used by the density engine live in `aves_mallorca_density_models`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A park, reserve or center as stored in `parks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkRow {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text location (town, area).
    pub location: Option<String>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Website.
    pub url: Option<String>,
    /// Image path as stored.
    pub image: Option<String>,
}

/// A park as listed on the contribution page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSiteRow {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text location (town, area).
    pub location: Option<String>,
    /// Website.
    pub url: Option<String>,
    /// Image path as stored.
    pub image: Option<String>,
    /// Long-form description, when one has been written.
    pub description: Option<String>,
}

/// A member of the project team, as stored in `team_members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberRow {
    /// Primary key.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Role in the project.
    pub role: Option<String>,
    /// Short biography.
    pub description: Option<String>,
    /// Area of expertise.
    pub specialization: Option<String>,
    /// Photo path as stored.
    pub photo: Option<String>,
    /// Position in the listing, ascending.
    pub display_order: i32,
}

/// A `(label, count)` pair from a `GROUP BY` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// Group label.
    pub label: String,
    /// Number of birds in the group.
    pub total: i64,
}

/// A bird species as stored in `birds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdRow {
    /// Primary key.
    pub id: i64,
    /// Common (Spanish) name.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: Option<String>,
    /// Taxonomic family.
    pub family: Option<String>,
    /// Bird type (e.g. raptor, seabird).
    pub bird_type: Option<String>,
    /// Endemic to the Balearic Islands.
    pub endemic: bool,
    /// Description.
    pub description: Option<String>,
    /// Weight range.
    pub weight: Option<String>,
    /// Size range.
    pub size: Option<String>,
    /// Average lifespan in years.
    pub lifespan: Option<i32>,
    /// Habitat and breeding notes.
    pub habitat: Option<String>,
    /// Wintering area.
    pub wintering_area: Option<String>,
    /// Migratory pattern.
    pub migratory_pattern: Option<String>,
    /// Conservation category.
    pub conservation_category: Option<String>,
    /// Recovery plan, if one exists.
    pub recovery_plan: Option<String>,
    /// Reproduction period.
    pub reproduction_period: Option<String>,
    /// Curiosities.
    pub curiosities: Option<String>,
    /// Photo path as stored.
    pub photo: Option<String>,
}

/// Name column the initial-letter filter applies to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InitialField {
    /// `birds.common_name`.
    #[default]
    CommonName,
    /// `birds.scientific_name`.
    ScientificName,
}

impl InitialField {
    /// SQL column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CommonName => "common_name",
            Self::ScientificName => "scientific_name",
        }
    }
}

/// Initial-letter filter for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LetterFilter {
    /// Names starting with this ASCII letter, case-insensitive.
    Letter(char),
    /// Names starting with anything but an ASCII letter (`#`).
    NonAlphabetic,
}

impl LetterFilter {
    /// Parses `"A"`..`"Z"` (either case) or `"#"`.
    ///
    /// Anything else yields `None` and the filter is not applied.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.trim().chars();
        match (chars.next(), chars.next()) {
            (Some('#'), None) => Some(Self::NonAlphabetic),
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Some(Self::Letter(c.to_ascii_uppercase()))
            }
            _ => None,
        }
    }
}

/// Catalog columns that accept an equality filter.
///
/// Only these identifiers are ever interpolated into catalog SQL.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CatalogColumn {
    /// `birds.family`.
    Family,
    /// `birds.weight`.
    Weight,
    /// `birds.size`.
    Size,
    /// `birds.conservation_category`.
    ConservationCategory,
    /// `birds.reproduction_period`.
    ReproductionPeriod,
}

impl CatalogColumn {
    /// Every filterable column.
    pub const ALL: [Self; 5] = [
        Self::Family,
        Self::Weight,
        Self::Size,
        Self::ConservationCategory,
        Self::ReproductionPeriod,
    ];

    /// SQL column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Family => "family",
            Self::Weight => "weight",
            Self::Size => "size",
            Self::ConservationCategory => "conservation_category",
            Self::ReproductionPeriod => "reproduction_period",
        }
    }
}

/// Parameters for querying the bird catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Column the letter filter applies to.
    pub initial_field: InitialField,
    /// Initial-letter filter.
    pub letter: Option<LetterFilter>,
    /// Substring search over common and scientific names.
    pub name: Option<String>,
    /// Equality filters over allow-listed columns.
    pub filters: BTreeMap<CatalogColumn, String>,
    /// Minimum lifespan in years.
    pub lifespan_min: Option<i32>,
    /// Maximum lifespan in years.
    pub lifespan_max: Option<i32>,
    /// Only endemic species.
    pub endemic_only: bool,
    /// Only species with a recovery plan.
    pub recovery_plan_only: bool,
}

/// Distinct values available for each catalog filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilterValues {
    /// Distinct families.
    pub families: Vec<String>,
    /// Distinct weight ranges.
    pub weights: Vec<String>,
    /// Distinct size ranges.
    pub sizes: Vec<String>,
    /// Distinct conservation categories.
    pub conservation_categories: Vec<String>,
    /// Distinct reproduction periods.
    pub reproduction_periods: Vec<String>,
}

impl CatalogFilterValues {
    /// Mutable access to the list for `column`.
    pub const fn values_mut(&mut self, column: CatalogColumn) -> &mut Vec<String> {
        match column {
            CatalogColumn::Family => &mut self.families,
            CatalogColumn::Weight => &mut self.weights,
            CatalogColumn::Size => &mut self.sizes,
            CatalogColumn::ConservationCategory => &mut self.conservation_categories,
            CatalogColumn::ReproductionPeriod => &mut self.reproduction_periods,
        }
    }
}
